use crate::api::{segment, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Branch, BranchDescriptor, Descriptor, Field, ListOptions, ProjectDescriptor};
use crate::transport::Request;

pub struct Branches<'a> {
    api: &'a AbstractApi,
}

/// Branch info; also used to resolve a branch head.
pub(crate) fn info_request(project_id: &str, branch_id: &str) -> Request {
    Request::get(format!(
        "projects/{}/branches/{}",
        segment(project_id),
        segment(branch_id)
    ))
}

impl<'a> Branches<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    pub async fn list(&self, project: &ProjectDescriptor, options: &ListOptions) -> Result<Vec<Branch>> {
        let descriptor = Descriptor::from(project);
        let project_id = descriptor.require(Field::ProjectId)?;

        let request = Request::get(format!("projects/{}/branches", segment(project_id)))
            .query_opt("filter", options.filter.as_deref())
            .query_opt("limit", options.limit.map(|limit| limit.to_string()));

        let envelope: shape::Data<shape::BranchList> = self.api.fetch(request).await?;
        Ok(envelope.data.branches)
    }

    pub async fn info(&self, branch: &BranchDescriptor) -> Result<Branch> {
        let descriptor = Descriptor::from(branch);
        descriptor.validate()?;

        self.api
            .fetch(info_request(
                descriptor.require(Field::ProjectId)?,
                descriptor.require(Field::BranchId)?,
            ))
            .await
    }
}
