use crate::api::{segment, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Commit, Descriptor, Field};
use crate::transport::Request;

pub struct Commits<'a> {
    api: &'a AbstractApi,
}

/// Commit listing for a branch, narrowed to a file or layer when the
/// descriptor names one. A pinned sha starts the listing at that commit.
pub(crate) fn list_request(descriptor: &Descriptor) -> Result<Request> {
    descriptor.validate()?;
    let project_id = descriptor.require(Field::ProjectId)?;
    let branch_id = descriptor.require(Field::BranchId)?;

    Ok(
        Request::get(format!(
            "projects/{}/branches/{}/commits",
            segment(project_id),
            segment(branch_id)
        ))
            .query_opt("fileId", descriptor.get(Field::FileId))
            .query_opt("layerId", descriptor.get(Field::LayerId))
            .query_opt("startSha", descriptor.get(Field::Sha)),
    )
}

impl<'a> Commits<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Commits touching the branch, file or layer, newest first.
    pub async fn list(&self, descriptor: impl Into<Descriptor>) -> Result<Vec<Commit>> {
        let descriptor = descriptor.into();
        let envelope: shape::Data<shape::CommitList> =
            self.api.fetch(list_request(&descriptor)?).await?;
        Ok(envelope.data.commits)
    }

    /// The most recent commit touching the branch, file or layer.
    pub async fn info(&self, descriptor: impl Into<Descriptor>) -> Result<Commit> {
        let descriptor = descriptor.into();
        let commits = self.list(descriptor.clone()).await?;
        let scope = descriptor
            .get(Field::LayerId)
            .or(descriptor.get(Field::FileId))
            .or(descriptor.get(Field::BranchId))
            .unwrap_or_default();
        shape::first_commit(commits, scope)
    }
}
