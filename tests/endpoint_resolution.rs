use std::sync::Arc;

use abstract_sdk::{
    AbstractApi, Annotation, BranchDescriptor, ClientConfig, CollectionDescriptor,
    CommitDescriptor, Descriptor, Error, Field, FileDescriptor, Host, LayerDescriptor,
    ListOptions, Method, MockTransport, NewComment, OrganizationDescriptor, PageDescriptor,
    ProjectDescriptor, Response,
};
use serde_json::{json, Value};

// Test harness pairing a client with the scripted transport it talks to
struct TestClient {
    api: AbstractApi,
    transport: Arc<MockTransport>,
}

impl TestClient {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let transport = Arc::new(MockTransport::new());
        let api = AbstractApi::new(transport.clone(), &ClientConfig::default());
        Self { api, transport }
    }

    fn respond(&self, body: Value) -> &Self {
        self.transport.respond_json(200, body);
        self
    }

    fn targets(&self) -> Vec<String> {
        self.transport.targets()
    }
}

fn branch_info() -> Value {
    json!({"name": "branch-name"})
}

fn commit_list() -> Value {
    json!({"data": {"commits": [{"sha": "commit-sha"}, {"sha": "next-commit-sha"}]}})
}

fn file_list() -> Value {
    json!({"files": [{"id": "file-id"}, {"id": "not-file-id"}]})
}

fn layer_info() -> Value {
    json!({
        "layer": {"name": "layer-name"},
        "page": {"name": "page-name", "id": "page-id"},
        "file": {"name": "file-name"}
    })
}

fn branch() -> BranchDescriptor {
    BranchDescriptor::new("project-id", "branch-id")
}

fn file() -> FileDescriptor {
    FileDescriptor::new("project-id", "file-id").on_branch("branch-id")
}

fn layer() -> LayerDescriptor {
    LayerDescriptor::new("project-id", "file-id", "layer-id").on_branch("branch-id")
}

#[tokio::test]
async fn test_organizations_list() {
    let client = TestClient::new();
    client.respond(json!({"data": [{"id": "org-id", "name": "Org"}]}));

    let organizations = client.api.organizations().list().await.unwrap();

    assert_eq!(organizations.len(), 1);
    assert_eq!(organizations[0].id, "org-id");
    assert_eq!(client.targets(), vec!["organizations"]);
}

#[tokio::test]
async fn test_projects_list_scoped_and_filtered() {
    let client = TestClient::new();
    client.respond(json!({"data": [{"id": "project-id"}]}));
    client.respond(json!({"data": []}));

    let organization = OrganizationDescriptor::new("org-id");
    let projects = client
        .api
        .projects()
        .list(Some(&organization), &ListOptions::default())
        .await
        .unwrap();
    assert_eq!(projects[0].id, "project-id");

    client
        .api
        .projects()
        .list(None, &ListOptions::filter("active"))
        .await
        .unwrap();

    assert_eq!(
        client.targets(),
        vec!["projects?organizationId=org-id", "projects?filter=active"]
    );
}

#[tokio::test]
async fn test_projects_info() {
    let client = TestClient::new();
    client.respond(json!({"data": {"id": "project-id", "name": "Project"}}));

    let project = client
        .api
        .projects()
        .info(&ProjectDescriptor::new("project-id"))
        .await
        .unwrap();

    assert_eq!(project.attributes["name"], "Project");
    assert_eq!(client.targets(), vec!["projects/project-id"]);
}

#[tokio::test]
async fn test_collections_list_and_info() {
    let client = TestClient::new();
    client.respond(json!({"data": {"collections": [{"id": "collection-id"}]}}));
    client.respond(json!({"data": {"collections": []}}));
    client.respond(json!({"data": {"id": "collection-id"}}));

    let by_project = client
        .api
        .collections()
        .list(ProjectDescriptor::new("project-id"))
        .await
        .unwrap();
    assert_eq!(by_project.len(), 1);

    let by_branch = client.api.collections().list(branch()).await.unwrap();
    assert!(by_branch.is_empty());

    let collection = client
        .api
        .collections()
        .info(&CollectionDescriptor::new("project-id", "collection-id").on_branch("branch-id"))
        .await
        .unwrap();
    assert_eq!(collection.id.as_deref(), Some("collection-id"));

    assert_eq!(
        client.targets(),
        vec![
            "projects/project-id/collections",
            "projects/project-id/collections?branchId=branch-id",
            "projects/project-id/collections/collection-id?branchId=branch-id",
        ]
    );
}

#[tokio::test]
async fn test_branches_list_and_info() {
    let client = TestClient::new();
    client.respond(json!({"data": {"branches": [{"id": "branch-id", "name": "feature"}]}}));
    client.respond(branch_info());

    let branches = client
        .api
        .branches()
        .list(&ProjectDescriptor::new("project-id"), &ListOptions::filter("mine"))
        .await
        .unwrap();
    assert_eq!(branches[0].id.as_deref(), Some("branch-id"));

    let info = client.api.branches().info(&branch()).await.unwrap();
    assert_eq!(info.head_sha(), Some("branch-name"));

    assert_eq!(
        client.targets(),
        vec![
            "projects/project-id/branches?filter=mine",
            "projects/project-id/branches/branch-id",
        ]
    );
}

#[tokio::test]
async fn test_commits_list_scopes_to_file_and_layer() {
    let client = TestClient::new();
    client.respond(commit_list());
    client.respond(commit_list());
    client.respond(commit_list());

    let commits = client.api.commits().list(branch()).await.unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].sha, "commit-sha");

    client.api.commits().list(file()).await.unwrap();
    client.api.commits().list(layer()).await.unwrap();

    assert_eq!(
        client.targets(),
        vec![
            "projects/project-id/branches/branch-id/commits",
            "projects/project-id/branches/branch-id/commits?fileId=file-id",
            "projects/project-id/branches/branch-id/commits?fileId=file-id&layerId=layer-id",
        ]
    );
}

#[tokio::test]
async fn test_commits_info_takes_most_recent() {
    for descriptor in [
        Descriptor::from(branch()),
        file().into(),
        layer().into(),
    ] {
        let client = TestClient::new();
        client.respond(commit_list());

        let commit = client.api.commits().info(descriptor).await.unwrap();

        assert_eq!(serde_json::to_value(&commit).unwrap(), json!({"sha": "commit-sha"}));
        assert_eq!(client.transport.request_count(), 1);
    }
}

#[tokio::test]
async fn test_commits_info_on_empty_history_is_not_found() {
    let client = TestClient::new();
    client.respond(json!({"data": {"commits": []}}));

    let result = client.api.commits().info(branch()).await;

    assert!(matches!(result, Err(Error::NotFound { resource: "commit", .. })));
}

#[tokio::test]
async fn test_commits_list_requires_branch() {
    let client = TestClient::new();
    let detached = FileDescriptor::new("project-id", "file-id").at_sha("sha");

    let result = client.api.commits().list(detached).await;

    assert!(matches!(
        result,
        Err(Error::InvalidDescriptor {
            field: Field::BranchId,
            ..
        })
    ));
    assert_eq!(client.transport.request_count(), 0);
}

#[tokio::test]
async fn test_files_list_resolves_branch_head() {
    let client = TestClient::new();
    client.respond(branch_info());
    client.respond(file_list());

    let files = client.api.files().list(&branch()).await.unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(
        client.targets(),
        vec![
            "projects/project-id/branches/branch-id",
            "projects/project-id/branches/branch-id/commits/branch-name/files",
        ]
    );
}

#[tokio::test]
async fn test_files_info_filters_listing() {
    let client = TestClient::new();
    client.respond(file_list());

    let pinned = FileDescriptor::new("project-id", "file-id")
        .on_branch("branch-id")
        .at_sha("sha");
    let file = client.api.files().info(&pinned).await.unwrap();

    assert_eq!(serde_json::to_value(&file).unwrap(), json!({"id": "file-id"}));
    assert_eq!(
        client.targets(),
        vec!["projects/project-id/branches/branch-id/commits/sha/files"]
    );
}

#[tokio::test]
async fn test_files_info_missing_from_listing_is_not_found() {
    let client = TestClient::new();
    client.respond(file_list());

    let missing = FileDescriptor::new("project-id", "other-file-id").at_sha("sha");
    let result = client.api.files().info(&missing).await;

    match result {
        Err(Error::NotFound { resource, id }) => {
            assert_eq!(resource, "file");
            assert_eq!(id, "other-file-id");
        }
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pages_list_and_info() {
    let client = TestClient::new();
    client.respond(branch_info());
    client.respond(json!({"pages": [{"id": "page-id"}, {"id": "other-page-id"}]}));
    client.respond(json!({"pages": [{"id": "other-page-id"}]}));

    let pages = client.api.pages().list(&file()).await.unwrap();
    assert_eq!(pages.len(), 2);

    let page = PageDescriptor::new("project-id", "file-id", "page-id").at_sha("sha");
    let result = client.api.pages().info(&page).await;
    assert!(matches!(result, Err(Error::NotFound { resource: "page", .. })));

    assert_eq!(
        client.targets(),
        vec![
            "projects/project-id/branches/branch-id",
            "projects/project-id/branches/branch-id/commits/branch-name/files/file-id/pages",
            "projects/project-id/commits/sha/files/file-id/pages",
        ]
    );
}

#[tokio::test]
async fn test_layers_list_by_page() {
    let client = TestClient::new();
    client.respond(json!({"layers": [{"id": "layer-id"}]}));

    let page = PageDescriptor::new("project-id", "file-id", "page-id")
        .on_branch("branch-id")
        .at_sha("sha");
    let layers = client.api.layers().list(page).await.unwrap();

    assert_eq!(layers[0].id.as_deref(), Some("layer-id"));
    assert_eq!(
        client.targets(),
        vec!["projects/project-id/branches/branch-id/commits/sha/files/file-id/layers?pageId=page-id"]
    );
}

#[tokio::test]
async fn test_layers_info_is_single_round_trip() {
    let client = TestClient::new();
    client.respond(layer_info());

    let info = client.api.layers().info(&layer()).await.unwrap();

    assert_eq!(info.page.id.as_deref(), Some("page-id"));
    assert_eq!(info.layer.attributes["name"], "layer-name");
    assert_eq!(
        client.targets(),
        vec!["projects/project-id/branches/branch-id/commits/latest/files/file-id/layers/layer-id"]
    );
}

#[tokio::test]
async fn test_layers_info_without_file_is_invalid() {
    let client = TestClient::new();
    let broken = LayerDescriptor::new("project-id", "", "layer-id").on_branch("branch-id");

    let result = client.api.layers().info(&broken).await;

    assert!(matches!(
        result,
        Err(Error::InvalidDescriptor {
            field: Field::FileId,
            ..
        })
    ));
    assert_eq!(client.transport.request_count(), 0);
}

#[tokio::test]
async fn test_comment_on_layer_resolves_head_then_layer() {
    let client = TestClient::new();
    client.respond(branch_info());
    client.respond(layer_info());
    client.respond(json!({"id": "comment-id"}));

    let comment = client
        .api
        .comments()
        .create(layer(), &NewComment::new("Comment on layer"))
        .await
        .unwrap();
    assert_eq!(comment.id.as_deref(), Some("comment-id"));

    let requests = client.transport.requests();
    assert_eq!(
        client.targets(),
        vec![
            "projects/project-id/branches/branch-id",
            "projects/project-id/branches/branch-id/commits/branch-name/files/file-id/layers/layer-id",
            "comments",
        ]
    );
    assert_eq!(requests[2].method, Method::Post);
    assert_eq!(
        requests[2].body,
        Some(json!({
            "projectId": "project-id",
            "branchId": "branch-id",
            "commitSha": "branch-name",
            "fileId": "file-id",
            "pageId": "page-id",
            "layerId": "layer-id",
            "body": "Comment on layer"
        }))
    );
}

#[tokio::test]
async fn test_comment_with_annotation() {
    let client = TestClient::new();
    client.respond(branch_info());
    client.respond(layer_info());

    let comment = NewComment::new("Comment on layer with annotation").with_annotation(Annotation {
        x: 1.0,
        y: 1.0,
        width: 1.0,
        height: 1.0,
    });
    client.api.comments().create(layer(), &comment).await.unwrap();

    let requests = client.transport.requests();
    let body = requests[2].body.as_ref().unwrap();
    assert_eq!(body["annotation"], json!({"x": 1.0, "y": 1.0, "width": 1.0, "height": 1.0}));
}

#[tokio::test]
async fn test_comment_on_branch_head_resolves_once() {
    let client = TestClient::new();
    client.respond(branch_info());

    client
        .api
        .comments()
        .create(branch(), &NewComment::new("Comment on branch HEAD"))
        .await
        .unwrap();

    let requests = client.transport.requests();
    assert_eq!(
        client.targets(),
        vec!["projects/project-id/branches/branch-id", "comments"]
    );
    assert_eq!(
        requests[1].body,
        Some(json!({
            "projectId": "project-id",
            "branchId": "branch-id",
            "commitSha": "branch-name",
            "body": "Comment on branch HEAD"
        }))
    );
}

#[tokio::test]
async fn test_comment_on_pinned_branch_skips_lookups() {
    let client = TestClient::new();

    client
        .api
        .comments()
        .create(branch().at_sha("my-sha"), &NewComment::new("Comment on branch at my-sha"))
        .await
        .unwrap();

    let requests = client.transport.requests();
    assert_eq!(client.targets(), vec!["comments"]);
    assert_eq!(requests[0].body.as_ref().unwrap()["commitSha"], "my-sha");
}

#[tokio::test]
async fn test_comments_list_uses_descriptor_scope() {
    let client = TestClient::new();
    client.respond(json!({"data": [{"id": "comment-id"}]}));

    let comments = client.api.comments().list(layer().at_sha("sha")).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(
        client.targets(),
        vec!["comments?projectId=project-id&branchId=branch-id&commitSha=sha&fileId=file-id&layerId=layer-id"]
    );
}

#[tokio::test]
async fn test_failed_second_lookup_aborts_request() {
    let client = TestClient::new();
    client.respond(branch_info());
    client
        .transport
        .respond_json(404, json!({"error": "layer not found"}));

    let result = client
        .api
        .comments()
        .create(layer(), &NewComment::new("never posted"))
        .await;

    match result {
        Err(Error::Upstream { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("layer not found"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    assert_eq!(client.transport.request_count(), 2);
    assert!(client.targets().iter().all(|target| target != "comments"));
}

#[tokio::test]
async fn test_unreachable_transport_during_lookup() {
    let client = TestClient::new();
    client.transport.unreachable("connection refused");

    let result = client.api.files().list(&branch()).await;

    assert!(matches!(result, Err(Error::Transport(_))));
    assert_eq!(client.transport.request_count(), 1);
}

#[tokio::test]
async fn test_explicit_sha_never_looks_up_branch_head() {
    let client = TestClient::new();
    client.respond(file_list());
    client.respond(json!({"pages": []}));
    client.respond(json!({"layers": []}));
    client.respond(layer_info());
    client.respond(json!({}));

    let pinned_branch = branch().at_sha("sha");
    let pinned_file = file().at_sha("sha");
    let pinned_layer = layer().at_sha("sha");

    client.api.files().list(&pinned_branch).await.unwrap();
    client.api.pages().list(&pinned_file).await.unwrap();
    client.api.layers().list(pinned_file.clone()).await.unwrap();
    client
        .api
        .comments()
        .create(pinned_layer.clone(), &NewComment::new("pinned"))
        .await
        .unwrap();
    client.api.previews().blob(&pinned_layer).await.unwrap();

    let branch_head = "projects/project-id/branches/branch-id".to_string();
    assert!(!client.targets().contains(&branch_head));
}

#[tokio::test]
async fn test_complete_descriptor_resolves_without_lookups() {
    let client = TestClient::new();
    let complete: Descriptor = layer().at_sha("sha").in_page("page-id").into();

    let resolved = client
        .api
        .resolver()
        .resolve(&complete, &[Field::Sha, Field::PageId])
        .await
        .unwrap();

    assert_eq!(resolved.lookup_count(), 0);
    assert_eq!(resolved.descriptor, complete);
    assert_eq!(client.transport.request_count(), 0);
}

#[tokio::test]
async fn test_resolution_leaves_caller_descriptor_untouched() {
    let client = TestClient::new();
    client.respond(branch_info());
    client.respond(layer_info());

    let original: Descriptor = layer().into();
    let resolved = client
        .api
        .resolver()
        .resolve(&original, &[Field::Sha, Field::PageId])
        .await
        .unwrap();

    assert_eq!(original.get(Field::Sha), None);
    assert_eq!(resolved.descriptor.get(Field::Sha), Some("branch-name"));
    assert_eq!(resolved.descriptor.get(Field::PageId), Some("page-id"));
    assert_eq!(resolved.lookup_count(), 2);
}

#[tokio::test]
async fn test_changesets_info_needs_no_resolution() {
    let client = TestClient::new();
    client.respond(json!({"changeset": {"changes": []}}));

    let changeset = client
        .api
        .changesets()
        .info(&CommitDescriptor::new("project-id", "sha").on_branch("branch-id"))
        .await
        .unwrap();

    assert_eq!(changeset.attributes["changes"], json!([]));
    assert_eq!(
        client.targets(),
        vec!["projects/project-id/branches/branch-id/commits/sha/changeset"]
    );
}

#[tokio::test]
async fn test_preview_url_makes_no_requests() {
    let client = TestClient::new();
    let layer = LayerDescriptor::new("project-id", "file-id", "layer-id").at_sha("layer-sha");

    let url = client.api.previews().url(&layer).unwrap();

    assert_eq!(
        url,
        "https://previews.goabstract.com/projects/project-id/commits/layer-sha/files/file-id/layers/layer-id"
    );
    assert_eq!(client.api.previews().url(&layer).unwrap(), url);
    assert_eq!(client.transport.request_count(), 0);
}

#[tokio::test]
async fn test_preview_blob_fetches_from_previews_host() {
    let client = TestClient::new();
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    client.respond(branch_info());
    client
        .transport
        .respond(Response::new(200, png.clone()));

    let blob = client.api.previews().blob(&layer()).await.unwrap();

    assert_eq!(blob, png);
    let requests = client.transport.requests();
    assert_eq!(requests[0].host, Host::Api);
    assert_eq!(requests[1].host, Host::Previews);
    assert_eq!(
        requests[1].path,
        "projects/project-id/commits/branch-name/files/file-id/layers/layer-id"
    );
}

#[tokio::test]
async fn test_data_info_with_and_without_sha() {
    let client = TestClient::new();
    client.respond(json!({"layerId": "layer-id", "properties": {}}));
    client.respond(json!({}));

    let payload = client.api.data().info(&layer()).await.unwrap();
    assert_eq!(payload["layerId"], "layer-id");

    client.api.data().info(&layer().at_sha("sha")).await.unwrap();

    assert_eq!(
        client.targets(),
        vec![
            "projects/project-id/branches/branch-id/commits/latest/files/file-id/layers/layer-id/data",
            "projects/project-id/branches/branch-id/commits/sha/files/file-id/layers/layer-id/data",
        ]
    );
}

#[tokio::test]
async fn test_requests_carry_trace_and_version_headers() {
    let client = TestClient::new();

    client.api.organizations().list().await.ok();

    let requests = client.transport.requests();
    assert!(requests[0]
        .header_value("x-amzn-trace-id")
        .unwrap()
        .starts_with("Root=1-"));
    assert_eq!(requests[0].header_value("Abstract-Api-Version"), Some("8"));
}

#[tokio::test]
async fn test_identifiers_are_encoded_in_api_paths_only() {
    let client = TestClient::new();
    client.respond(branch_info());

    client
        .api
        .branches()
        .info(&BranchDescriptor::new("team/project", "feature/x"))
        .await
        .unwrap();
    let pinned = LayerDescriptor::new("team/project", "file#1", "layer?id").at_sha("sha");
    let preview = client.api.previews().url(&pinned).unwrap();

    assert_eq!(
        client.targets(),
        vec!["projects/team%2Fproject/branches/feature%2Fx"]
    );
    assert_eq!(
        preview,
        "https://previews.goabstract.com/projects/team/project/commits/sha/files/file#1/layers/layer?id"
    );
}
