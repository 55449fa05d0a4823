use anyhow::Context;
use newsletter_signup::{
    configuration::WarmupSettings,
    telemetry::{get_subscriber, init_subscriber},
    warmup::ping,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("warmup", "info", std::io::stdout);
    init_subscriber(subscriber)?;
    let _ = dotenvy::dotenv();

    let settings = WarmupSettings::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "No url"))
        .context("Failed to read warmup settings")?;

    let client = reqwest::Client::new();
    let status = ping(&client, &settings.backend_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Warmup failed"))
        .context("Warmup failed")?;

    tracing::info!(%status, "Warmup ping successful");
    Ok(())
}
