use crate::api::{segment, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Descriptor, Field, Organization, OrganizationDescriptor};
use crate::transport::Request;

pub struct Organizations<'a> {
    api: &'a AbstractApi,
}

impl<'a> Organizations<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Organization>> {
        let envelope: shape::Data<Vec<Organization>> =
            self.api.fetch(Request::get("organizations")).await?;
        Ok(envelope.data)
    }

    pub async fn info(&self, descriptor: &OrganizationDescriptor) -> Result<Organization> {
        let descriptor = Descriptor::from(descriptor);
        let organization_id = descriptor.require(Field::OrganizationId)?;

        let envelope: shape::Data<Organization> = self
            .api
            .fetch(Request::get(format!("organizations/{}", segment(organization_id))))
            .await?;
        Ok(envelope.data)
    }
}
