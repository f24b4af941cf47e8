use multitenant_login::{config, server::start_server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "multitenant_login=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::init(config::RESOURCE)?;

    start_server(config.clone()).await?;

    Ok(())
}
