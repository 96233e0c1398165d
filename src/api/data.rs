use crate::api::{commit_scope, segment, AbstractApi};
use crate::error::Result;
use crate::model::{Descriptor, Field, LayerDescriptor};
use crate::transport::Request;

pub struct LayerData<'a> {
    api: &'a AbstractApi,
}

impl<'a> LayerData<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Per-layer design data. Read at the pinned sha, or at the branch's
    /// latest commit.
    pub async fn info(&self, layer: &LayerDescriptor) -> Result<serde_json::Value> {
        let descriptor = Descriptor::from(layer);
        descriptor.validate()?;

        self.api
            .fetch(Request::get(format!(
                "{}/files/{}/layers/{}/data",
                commit_scope(&descriptor)?,
                segment(descriptor.require(Field::FileId)?),
                segment(descriptor.require(Field::LayerId)?)
            )))
            .await
    }
}
