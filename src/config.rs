use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.goabstract.com";
pub const DEFAULT_PREVIEWS_URL: &str = "https://previews.goabstract.com";

/// Which transport carries requests to the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Api,
    Cli,
    /// Use the CLI when one is installed, the HTTP API otherwise
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub access_token: Option<String>,
    pub api_url: String,
    pub previews_url: String,
    pub cli_path: Option<PathBuf>,
    pub transport_mode: TransportMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            previews_url: DEFAULT_PREVIEWS_URL.to_string(),
            cli_path: None,
            transport_mode: TransportMode::Auto,
        }
    }
}

impl ClientConfig {
    /// Load configuration from an optional `abstract` config file and
    /// `ABSTRACT_*` environment variables, on top of the defaults.
    pub fn load() -> anyhow::Result<Self> {
        // Load environment variables from .env file if it exists
        dotenvy::dotenv().ok();

        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&ClientConfig::default())?);

        config = config.add_source(config::File::with_name("abstract").required(false));

        // ABSTRACT_API_URL, ABSTRACT_CLI_PATH, ABSTRACT_TRANSPORT_MODE, ...
        config = config.add_source(
            config::Environment::with_prefix("ABSTRACT").prefix_separator("_"),
        );

        // The token is conventionally exported as ABSTRACT_TOKEN
        config = config.set_override_option("access_token", std::env::var("ABSTRACT_TOKEN").ok())?;

        let config = config.build()?;
        let client_config: ClientConfig = config.try_deserialize()?;

        log::debug!(
            "Configuration loaded: api={} previews={} mode={:?}",
            client_config.api_url,
            client_config.previews_url,
            client_config.transport_mode
        );

        Ok(client_config)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    pub fn with_cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    pub fn with_previews_url(mut self, url: impl Into<String>) -> Self {
        self.previews_url = url.into();
        self
    }

    /// Previews host without a trailing slash.
    pub fn previews_base(&self) -> &str {
        self.previews_url.trim_end_matches('/')
    }

    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
