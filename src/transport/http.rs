use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::ClientConfig;
use crate::transport::traits::{Host, Method, Request, Response, Transport};

/// Talks to the service's HTTP API and previews host directly.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_url: String,
    previews_url: String,
    access_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("Abstract SDK {}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_base().to_string(),
            previews_url: config.previews_base().to_string(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn url(&self, request: &Request) -> String {
        let base = match request.host {
            Host::Api => &self.api_url,
            Host::Previews => &self.previews_url,
        };
        format!("{}/{}", base, request.path)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let url = self.url(&request);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        builder = builder.header("Accept", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to reach {} {}", request.method, url))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(Response::new(status, body.to_vec()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
