use crate::api::{commit_scope, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{BranchDescriptor, Descriptor, Field, File, FileDescriptor};
use crate::transport::Request;

pub struct Files<'a> {
    api: &'a AbstractApi,
}

impl<'a> Files<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Files at the branch's pinned sha, or at its current head.
    pub async fn list(&self, branch: &BranchDescriptor) -> Result<Vec<File>> {
        self.list_at(&Descriptor::from(branch)).await
    }

    /// Looks the file up in the listing of its commit.
    pub async fn info(&self, file: &FileDescriptor) -> Result<File> {
        let descriptor = Descriptor::from(file);
        let file_id = descriptor.require(Field::FileId)?.to_string();
        let files = self.list_at(&descriptor).await?;
        shape::find_file(files, &file_id)
    }

    async fn list_at(&self, descriptor: &Descriptor) -> Result<Vec<File>> {
        let resolved = self.api.resolver().resolve(descriptor, &[Field::Sha]).await?;
        let scope = commit_scope(&resolved.descriptor)?;

        let envelope: shape::FileList = self
            .api
            .fetch(Request::get(format!("{}/files", scope)))
            .await?;
        Ok(envelope.files)
    }
}
