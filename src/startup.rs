use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::{App, HttpServer, dev::Server, http::header, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::Settings,
    routes::{SubscribeError, home, subscribe, unsubscribe},
    subscriber_store::{RestSubscriberStore, SubscriberStore},
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: &Settings) -> Result<Self, anyhow::Error> {
        let store = RestSubscriberStore::new(
            config.datastore.base_url.clone(),
            config.datastore.api_key.clone(),
            config.datastore.timeout(),
        )
        .context("Failed to build the datastore HTTP client")?;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();
        tracing::info!(%address, port, "Listening");

        let server = run(listener, store, config.application.allowed_origin.clone())?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Browsers may only call us from `allowed_origin`.
fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

pub fn run<S>(
    listener: TcpListener,
    store: S,
    allowed_origin: String,
) -> Result<Server, std::io::Error>
where
    S: SubscriberStore + Send + Sync + 'static,
{
    let store = web::Data::new(store);
    let server = HttpServer::new(move || {
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| SubscribeError::InvalidJson(err).into());
        App::new()
            .wrap(cors(&allowed_origin))
            .wrap(TracingLogger::default())
            .route("/", web::get().to(home))
            .route("/Email", web::post().to(subscribe::<S>))
            .route("/Email", web::delete().to(unsubscribe))
            .app_data(json_config)
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
