use crate::api::{commit_scope, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Changeset, CommitDescriptor, Descriptor};
use crate::transport::Request;

pub struct Changesets<'a> {
    api: &'a AbstractApi,
}

impl<'a> Changesets<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Changes introduced by one commit. The commit sha is authoritative, so
    /// nothing is resolved.
    pub async fn info(&self, commit: &CommitDescriptor) -> Result<Changeset> {
        let descriptor = Descriptor::from(commit);
        descriptor.validate()?;

        let envelope: shape::ChangesetEnvelope<Changeset> = self
            .api
            .fetch(Request::get(format!("{}/changeset", commit_scope(&descriptor)?)))
            .await?;
        Ok(envelope.changeset)
    }
}
