use serde::Serialize;

use crate::api::AbstractApi;
use crate::error::Result;
use crate::logic::shape;
use crate::model::{Annotation, Comment, Descriptor, DescriptorKind, Field, NewComment};
use crate::transport::Request;

pub struct Comments<'a> {
    api: &'a AbstractApi,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentPayload<'a> {
    project_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_id: Option<&'a str>,
    commit_sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layer_id: Option<&'a str>,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<&'a Annotation>,
}

/// Fields a comment on `kind` must be anchored with.
fn anchor_fields(kind: DescriptorKind) -> &'static [Field] {
    match kind {
        DescriptorKind::Layer => &[Field::Sha, Field::PageId],
        _ => &[Field::Sha],
    }
}

impl<'a> Comments<'a> {
    pub(crate) fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Post a comment on a branch or layer. Comments are anchored to a
    /// commit, so an unpinned descriptor is pinned to its branch head first;
    /// layer comments also need the layer's page.
    pub async fn create(
        &self,
        target: impl Into<Descriptor>,
        comment: &NewComment,
    ) -> Result<Comment> {
        let target = target.into();
        let resolved = self
            .api
            .resolver()
            .resolve(&target, anchor_fields(target.kind()))
            .await?;
        let descriptor = &resolved.descriptor;

        let payload = CommentPayload {
            project_id: descriptor.require(Field::ProjectId)?,
            branch_id: descriptor.get(Field::BranchId),
            commit_sha: descriptor.require(Field::Sha)?,
            file_id: descriptor.get(Field::FileId),
            page_id: descriptor.get(Field::PageId),
            layer_id: descriptor.get(Field::LayerId),
            body: &comment.body,
            annotation: comment.annotation.as_ref(),
        };

        self.api
            .fetch(Request::post("comments", serde_json::to_value(&payload)?))
            .await
    }

    /// Comments within whatever scope the descriptor names. Nothing is
    /// resolved: an unpinned descriptor lists comments across commits.
    pub async fn list(&self, scope: impl Into<Descriptor>) -> Result<Vec<Comment>> {
        let scope = scope.into();
        scope.validate()?;

        let request = Request::get("comments")
            .query("projectId", scope.require(Field::ProjectId)?)
            .query_opt("branchId", scope.get(Field::BranchId))
            .query_opt("commitSha", scope.get(Field::Sha))
            .query_opt("fileId", scope.get(Field::FileId))
            .query_opt("pageId", scope.get(Field::PageId))
            .query_opt("layerId", scope.get(Field::LayerId));

        let envelope: shape::Data<Vec<Comment>> = self.api.fetch(request).await?;
        Ok(envelope.data)
    }
}
