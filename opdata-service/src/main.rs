use opdata_service::config::OpDataConfig;
use opdata_service::services::init_metrics;
use opdata_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = OpDataConfig::load()?;

    init_tracing(
        "opdata-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics();

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start opdata-service: {}", e);
        e
    })?;

    app.run_until_stopped().await?;

    Ok(())
}
