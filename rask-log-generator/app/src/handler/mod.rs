pub mod api_logs;
pub mod client_ip;
pub mod failure;
pub mod generate;
pub mod health;
pub mod home;
pub mod system;

use serde::Deserialize;

/// `?username=` accepted by every route.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}
