use anyhow::{anyhow, Result};
use retail_assistant::integration::ClientConfig;
use retail_assistant::speech::HostCapabilities;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retail_assistant=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();
    config.validate()?;

    info!("Starting Retail Analytics Assistant (backend: {})", config.endpoint);

    // No speech engines ship with the desktop build
    retail_assistant::ui::run(config, HostCapabilities::none())
        .map_err(|e| anyhow!("GUI error: {}", e))?;

    info!("Retail Analytics Assistant stopped");
    Ok(())
}
