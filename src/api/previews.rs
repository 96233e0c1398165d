use crate::api::AbstractApi;
use crate::error::Result;
use crate::model::{Descriptor, Field, LayerDescriptor};
use crate::transport::{Host, Request};

pub struct Previews<'a> {
    api: &'a AbstractApi,
}

/// `projects/<projectId>/commits/<sha>/files/<fileId>/layers/<layerId>`
fn preview_path(descriptor: &Descriptor) -> Result<String> {
    descriptor.validate()?;
    Ok(format!(
        "projects/{}/commits/{}/files/{}/layers/{}",
        descriptor.require(Field::ProjectId)?,
        descriptor.require(Field::Sha)?,
        descriptor.require(Field::FileId)?,
        descriptor.require(Field::LayerId)?
    ))
}

impl<'a> Previews<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Address of a layer's rendered preview. Makes no request, so the
    /// descriptor must already be pinned to a sha.
    pub fn url(&self, layer: &LayerDescriptor) -> Result<String> {
        let path = preview_path(&Descriptor::from(layer))?;
        Ok(format!("{}/{}", self.api.previews_base(), path))
    }

    /// Rendered preview image, fetched from the previews host. An unpinned
    /// descriptor is pinned to its branch head first.
    pub async fn blob(&self, layer: &LayerDescriptor) -> Result<Vec<u8>> {
        let resolved = self
            .api
            .resolver()
            .resolve(&Descriptor::from(layer), &[Field::Sha])
            .await?;
        let path = preview_path(&resolved.descriptor)?;

        let response = self.api.send(Request::get(path).on(Host::Previews)).await?;
        Ok(response.body)
    }
}
