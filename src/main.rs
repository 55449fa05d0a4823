use newsletter_signup::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("newsletter-signup", "info", std::io::stdout);
    init_subscriber(subscriber)?;
    let config = get_configuration()?;

    // A server that fails to come up is reported, not escalated.
    let outcome = match Application::build(&config).await {
        Ok(application) => application.run_until_stopped().await.map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    if let Err(e) = outcome {
        tracing::error!(error = ?e, "Error starting server");
    }
    Ok(())
}
