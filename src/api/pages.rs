use crate::api::{commit_scope, segment, AbstractApi};
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Descriptor, Field, FileDescriptor, Page, PageDescriptor};
use crate::transport::Request;

pub struct Pages<'a> {
    api: &'a AbstractApi,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    pub async fn list(&self, file: &FileDescriptor) -> Result<Vec<Page>> {
        self.list_at(&Descriptor::from(file)).await
    }

    pub async fn info(&self, page: &PageDescriptor) -> Result<Page> {
        let descriptor = Descriptor::from(page);
        let page_id = descriptor.require(Field::PageId)?.to_string();
        let pages = self.list_at(&descriptor).await?;
        shape::find_page(pages, &page_id)
    }

    async fn list_at(&self, descriptor: &Descriptor) -> Result<Vec<Page>> {
        let resolved = self.api.resolver().resolve(descriptor, &[Field::Sha]).await?;
        let scope = commit_scope(&resolved.descriptor)?;
        let file_id = resolved.descriptor.require(Field::FileId)?;

        let envelope: shape::PageList = self
            .api
            .fetch(Request::get(format!("{}/files/{}/pages", scope, segment(file_id))))
            .await?;
        Ok(envelope.pages)
    }
}
