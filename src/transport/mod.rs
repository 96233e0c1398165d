pub mod cli;
pub mod http;
pub mod mock;
pub mod traits;

pub use cli::*;
pub use http::*;
pub use mock::*;
pub use traits::*;

use anyhow::{bail, Result};
use std::sync::Arc;

use crate::config::{ClientConfig, TransportMode};

/// Build the transport selected by `config.transport_mode`.
pub fn from_config(config: &ClientConfig) -> Result<Arc<dyn Transport>> {
    match config.transport_mode {
        TransportMode::Api => {
            log::info!("Using HTTP transport against {}", config.api_base());
            Ok(Arc::new(HttpTransport::new(config)?))
        }
        TransportMode::Cli => {
            let Some(cli_path) = &config.cli_path else {
                bail!("transport mode 'cli' requires a cli_path");
            };
            log::info!("Using CLI transport at {}", cli_path.display());
            Ok(Arc::new(CliTransport::new(cli_path.clone(), config)))
        }
        TransportMode::Auto => match config.cli_path.as_ref().filter(|path| path.is_file()) {
            Some(cli_path) => {
                log::info!("Found CLI at {}, using CLI transport", cli_path.display());
                Ok(Arc::new(CliTransport::new(cli_path.clone(), config)))
            }
            None => {
                log::info!("No CLI available, using HTTP transport against {}", config.api_base());
                Ok(Arc::new(HttpTransport::new(config)?))
            }
        },
    }
}
