pub mod branches;
pub mod changesets;
pub mod collections;
pub mod comments;
pub mod commits;
pub mod data;
pub mod files;
pub mod layers;
pub mod organizations;
pub mod pages;
pub mod previews;
pub mod projects;

pub use branches::Branches;
pub use changesets::Changesets;
pub use collections::Collections;
pub use comments::Comments;
pub use commits::Commits;
pub use data::LayerData;
pub use files::Files;
pub use layers::Layers;
pub use organizations::Organizations;
pub use pages::Pages;
pub use previews::Previews;
pub use projects::Projects;

use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::logic::{shape, Resolver};
use crate::model::{Descriptor, Field};
use crate::transport::{self, Request, Response, Transport};

pub const API_VERSION: &str = "8";

/// Entry point: addresses service resources by descriptor and resolves
/// whatever the descriptor leaves out.
#[derive(Clone)]
pub struct AbstractApi {
    transport: Arc<dyn Transport>,
    previews_url: String,
}

impl fmt::Debug for AbstractApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbstractApi")
            .field("transport", &self.transport.name())
            .field("previews_url", &self.previews_url)
            .finish()
    }
}

impl AbstractApi {
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            previews_url: config.previews_base().to_string(),
        }
    }

    /// Build a client with the transport selected by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = transport::from_config(config).map_err(Error::Transport)?;
        Ok(Self::new(transport, config))
    }

    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(self)
    }

    pub fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    pub fn branches(&self) -> Branches<'_> {
        Branches::new(self)
    }

    pub fn commits(&self) -> Commits<'_> {
        Commits::new(self)
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    pub fn pages(&self) -> Pages<'_> {
        Pages::new(self)
    }

    pub fn layers(&self) -> Layers<'_> {
        Layers::new(self)
    }

    pub fn comments(&self) -> Comments<'_> {
        Comments::new(self)
    }

    pub fn changesets(&self) -> Changesets<'_> {
        Changesets::new(self)
    }

    pub fn collections(&self) -> Collections<'_> {
        Collections::new(self)
    }

    pub fn previews(&self) -> Previews<'_> {
        Previews::new(self)
    }

    pub fn data(&self) -> LayerData<'_> {
        LayerData::new(self)
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    pub(crate) fn previews_base(&self) -> &str {
        &self.previews_url
    }

    /// Send one request. Error statuses become `Error::Upstream`.
    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        let request = request
            .header("X-Amzn-Trace-Id", trace_id())
            .header("Abstract-Api-Version", API_VERSION);

        log::debug!(
            "{} {} via {}",
            request.method,
            request.target(),
            self.transport.name()
        );

        let target = request.target();
        let response = self
            .transport
            .send(request)
            .await
            .map_err(Error::Transport)?;

        if !response.is_success() {
            log::warn!("{} responded with status {}", target, response.status);
            return Err(Error::Upstream {
                status: response.status,
                body: response.text(),
            });
        }

        Ok(response)
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let response = self.send(request).await?;
        shape::decode(&response)
    }
}

/// `Root=1-<unix seconds as hex>-<24 random hex digits>`
fn trace_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "Root=1-{:08x}-{}",
        chrono::Utc::now().timestamp(),
        &random[..24]
    )
}

/// One percent-encoded path segment of an API URL.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Path prefix addressing the commit a descriptor points at. Without a sha
/// the branch's latest commit is addressed.
pub(crate) fn commit_scope(descriptor: &Descriptor) -> Result<String> {
    let project_id = segment(descriptor.require(Field::ProjectId)?);
    let branch_id = descriptor.get(Field::BranchId).map(segment);
    let sha = descriptor.get(Field::Sha).map(segment);
    match (branch_id, sha) {
        (Some(branch_id), Some(sha)) => Ok(format!(
            "projects/{}/branches/{}/commits/{}",
            project_id, branch_id, sha
        )),
        (None, Some(sha)) => Ok(format!("projects/{}/commits/{}", project_id, sha)),
        (Some(branch_id), None) => Ok(format!(
            "projects/{}/branches/{}/commits/latest",
            project_id, branch_id
        )),
        (None, None) => Err(Error::invalid(descriptor.kind(), Field::Sha)),
    }
}
