use crate::api::{commit_scope, segment, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Descriptor, Field, Layer, LayerDescriptor, LayerInfo};
use crate::transport::Request;

pub struct Layers<'a> {
    api: &'a AbstractApi,
}

/// Layer info: the layer with its page and file, in one round trip. Also
/// used to resolve a layer's page.
pub(crate) fn info_request(descriptor: &Descriptor) -> Result<Request> {
    let scope = commit_scope(descriptor)?;
    Ok(Request::get(format!(
        "{}/files/{}/layers/{}",
        scope,
        segment(descriptor.require(Field::FileId)?),
        segment(descriptor.require(Field::LayerId)?)
    )))
}

impl<'a> Layers<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Layers of a file, or of one page when given a page descriptor.
    pub async fn list(&self, descriptor: impl Into<Descriptor>) -> Result<Vec<Layer>> {
        let descriptor = descriptor.into();
        let resolved = self.api.resolver().resolve(&descriptor, &[Field::Sha]).await?;
        let scope = commit_scope(&resolved.descriptor)?;
        let file_id = resolved.descriptor.require(Field::FileId)?;

        let request = Request::get(format!("{}/files/{}/layers", scope, segment(file_id)))
            .query_opt("pageId", resolved.descriptor.get(Field::PageId));

        let envelope: shape::LayerList = self.api.fetch(request).await?;
        Ok(envelope.layers)
    }

    pub async fn info(&self, layer: &LayerDescriptor) -> Result<LayerInfo> {
        let descriptor = Descriptor::from(layer);
        descriptor.validate()?;
        self.api.fetch(info_request(&descriptor)?).await
    }
}
