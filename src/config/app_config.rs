use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{DispatchClientConfig, ServerConfig};

/// Application configuration for Sentinel.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Database URL for the SQLite database.
    pub database_url: String,

    /// Global signing secret for the Alchemy webhook endpoint.
    ///
    /// This is the process-wide secret used to verify the
    /// `x-alchemy-signature` header. If unset, every Alchemy webhook request
    /// is rejected.
    #[serde(default = "default_alchemy_signing_secret_from_env")]
    pub alchemy_signing_secret: Option<String>,

    /// Configuration for the HTTP server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Configuration for the outbound alert-dispatch HTTP client.
    #[serde(default)]
    pub dispatch: DispatchClientConfig,
}

/// Loads the Alchemy signing secret from the environment when the config
/// file does not provide one.
fn default_alchemy_signing_secret_from_env() -> Option<String> {
    std::env::var("ALCHEMY_WEBHOOK_SIGNING_SECRET").ok()
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("SENTINEL").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
