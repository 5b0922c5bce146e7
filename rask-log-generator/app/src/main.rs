use rask_log_generator::error::GeneratorError;

#[tokio::main]
async fn main() -> Result<(), GeneratorError> {
    rask_log_generator::app::run().await
}
