use crate::api::{segment, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Descriptor, Field, ListOptions, OrganizationDescriptor, Project, ProjectDescriptor};
use crate::transport::Request;

pub struct Projects<'a> {
    api: &'a AbstractApi,
}

impl<'a> Projects<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Projects visible to the caller, optionally narrowed to one
    /// organization.
    pub async fn list(
        &self,
        organization: Option<&OrganizationDescriptor>,
        options: &ListOptions,
    ) -> Result<Vec<Project>> {
        let organization_id = match organization {
            Some(organization) => Some(
                Descriptor::from(organization)
                    .require(Field::OrganizationId)?
                    .to_string(),
            ),
            None => None,
        };

        let request = Request::get("projects")
            .query_opt("organizationId", organization_id)
            .query_opt("filter", options.filter.as_deref())
            .query_opt("limit", options.limit.map(|limit| limit.to_string()));

        let envelope: shape::Data<Vec<Project>> = self.api.fetch(request).await?;
        Ok(envelope.data)
    }

    pub async fn info(&self, descriptor: &ProjectDescriptor) -> Result<Project> {
        let descriptor = Descriptor::from(descriptor);
        let project_id = descriptor.require(Field::ProjectId)?;

        let envelope: shape::Data<Project> = self
            .api
            .fetch(Request::get(format!("projects/{}", segment(project_id))))
            .await?;
        Ok(envelope.data)
    }
}
