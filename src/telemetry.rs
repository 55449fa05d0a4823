use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::{LogTracer, log::SetLoggerError};
use tracing_subscriber::{EnvFilter, Registry, fmt::MakeWriter, layer::SubscriberExt};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("a `log` logger is already installed")]
    Logger(#[from] SetLoggerError),
    #[error("a global tracing subscriber is already installed")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Bunyan JSON lines tagged with `name`, written to `sink`.
///
/// `default_directives` only apply when `RUST_LOG` is unset or unparsable.
pub fn get_subscriber<Sink>(
    name: &str,
    default_directives: &str,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    Registry::default()
        .with(filter_or(default_directives))
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name.to_owned(), sink))
}

fn filter_or(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Both the api and the warmup binary call this once, first thing in `main`.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
