pub mod router;
pub mod server;
pub mod state;
pub mod tracing;

use crate::config;
use crate::error::GeneratorError;
use crate::generation::spawn_delayed_generation;

/// Application entry point. Initializes tracing and configuration, schedules
/// the optional startup run and serves HTTP.
pub async fn run() -> Result<(), GeneratorError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings = config::get_configuration()?;
    ::tracing::info!(
        collector = %settings.collector.address(),
        http_port = settings.http_port,
        "Loaded settings"
    );

    let http_port = settings.http_port;
    let startup = settings.startup.clone();
    let app_state = state::AppState::from_settings(settings);

    if let Some(startup) = startup {
        spawn_delayed_generation(
            &app_state.generation_tasks,
            app_state.generation_context(),
            startup.target,
            startup.delay,
        );
    }

    let generation_tasks = app_state.generation_tasks.clone();
    let shutdown_token = app_state.shutdown.clone();
    let app = router::main_router(app_state);

    server::serve(app, http_port, shutdown_token, generation_tasks).await
}
