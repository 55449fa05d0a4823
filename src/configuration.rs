use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment as EnvSource, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub datastore: DatastoreSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// The single origin the browser frontend is served from.
    pub allowed_origin: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatastoreSettings {
    pub base_url: String,
    pub api_key: SecretString,
    #[serde(default)]
    pub timeout_milliseconds: Option<u64>,
}

impl DatastoreSettings {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_milliseconds
            .map(std::time::Duration::from_millis)
    }
}

/// Settings for the one-shot warmup pinger, read straight from the environment.
#[derive(Deserialize, Clone, Debug)]
pub struct WarmupSettings {
    pub backend_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WarmupSettingsError {
    #[error("BACKEND_URL is not set")]
    MissingBackendUrl(#[source] envy::Error),
    #[error("BACKEND_URL is empty")]
    EmptyBackendUrl,
}

impl WarmupSettings {
    pub fn from_env() -> Result<Self, WarmupSettingsError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, WarmupSettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let settings = envy::from_iter::<_, Self>(vars)
            .map_err(WarmupSettingsError::MissingBackendUrl)?;
        if settings.backend_url.trim().is_empty() {
            return Err(WarmupSettingsError::EmptyBackendUrl);
        }
        Ok(settings)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Layers `configuration/base.yaml`, the per-environment file and `APP_*`
/// variables, then the datastore variables the deployment already exports.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    // a missing .env is fine, the platform usually injects variables directly
    let _ = dotenvy::dotenv();

    let base_path = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    settings_from(
        &base_path.join("configuration"),
        &environment,
        std::env::var("SUPABASE_URL").ok(),
        std::env::var("SUPABASE_API_KEY").ok(),
    )
}

/// Only `local.yaml` carries datastore defaults, production must be given them.
fn settings_from(
    configuration_directory: &Path,
    environment: &Environment,
    datastore_url: Option<String>,
    datastore_api_key: Option<String>,
) -> Result<Settings, ConfigError> {
    let environment_filename = format!("{}.yaml", environment.as_str());

    Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        .add_source(File::from(configuration_directory.join(environment_filename)))
        .add_source(
            EnvSource::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("datastore.base_url", datastore_url)?
        .set_override_option("datastore.api_key", datastore_api_key)?
        .build()?
        .try_deserialize::<Settings>()
}
