use crate::api::{segment, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Collection, CollectionDescriptor, Descriptor, Field};
use crate::transport::Request;

pub struct Collections<'a> {
    api: &'a AbstractApi,
}

impl<'a> Collections<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Collections of a project, narrowed to a branch when one is given.
    pub async fn list(&self, scope: impl Into<Descriptor>) -> Result<Vec<Collection>> {
        let scope = scope.into();
        scope.validate()?;

        let request = Request::get(format!(
            "projects/{}/collections",
            segment(scope.require(Field::ProjectId)?)
        ))
        .query_opt("branchId", scope.get(Field::BranchId));

        let envelope: shape::Data<shape::CollectionList> = self.api.fetch(request).await?;
        Ok(envelope.data.collections)
    }

    pub async fn info(&self, collection: &CollectionDescriptor) -> Result<Collection> {
        let descriptor = Descriptor::from(collection);
        descriptor.validate()?;

        let request = Request::get(format!(
            "projects/{}/collections/{}",
            segment(descriptor.require(Field::ProjectId)?),
            segment(descriptor.require(Field::CollectionId)?)
        ))
        .query_opt("branchId", descriptor.get(Field::BranchId));

        let envelope: shape::Data<Collection> = self.api.fetch(request).await?;
        Ok(envelope.data)
    }
}
