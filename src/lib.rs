pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod transport;

pub use api::AbstractApi;
pub use config::{ClientConfig, TransportMode};
pub use error::{Error, Result};
pub use logic::{Lookup, LookupOutput, Plan, Resolved, Resolver};
pub use model::*;
pub use transport::{CliTransport, Host, HttpTransport, Method, MockTransport, Request, Response, Transport};

/// Load configuration from the environment and build a client with the
/// transport it selects.
pub fn connect() -> anyhow::Result<AbstractApi> {
    let config = ClientConfig::load()?;
    Ok(AbstractApi::from_config(&config)?)
}
