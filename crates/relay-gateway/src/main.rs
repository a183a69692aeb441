use relay_common::{AppConfig, TracingConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    relay_common::init_tracing_with_config(TracingConfig::for_environment(config.app.env));

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        "Starting gateway"
    );

    relay_gateway::run_server(config).await
}
