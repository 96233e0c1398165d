use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::common::{present, present_opt};
use crate::model::Id;

/// Identifier slots a descriptor may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    OrganizationId,
    ProjectId,
    BranchId,
    Sha,
    FileId,
    PageId,
    LayerId,
    CollectionId,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::OrganizationId => "organizationId",
            Field::ProjectId => "projectId",
            Field::BranchId => "branchId",
            Field::Sha => "sha",
            Field::FileId => "fileId",
            Field::PageId => "pageId",
            Field::LayerId => "layerId",
            Field::CollectionId => "collectionId",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Organization,
    Project,
    Branch,
    Commit,
    File,
    Page,
    Layer,
    Collection,
}

impl DescriptorKind {
    /// Fields a descriptor of this kind must carry; these are never inferred.
    pub fn mandatory_fields(&self) -> &'static [Field] {
        match self {
            DescriptorKind::Organization => &[Field::OrganizationId],
            DescriptorKind::Project => &[Field::ProjectId],
            DescriptorKind::Branch => &[Field::ProjectId, Field::BranchId],
            DescriptorKind::Commit => &[Field::ProjectId, Field::Sha],
            DescriptorKind::File => &[Field::ProjectId, Field::FileId],
            DescriptorKind::Page => &[Field::ProjectId, Field::FileId, Field::PageId],
            DescriptorKind::Layer => &[Field::ProjectId, Field::FileId, Field::LayerId],
            DescriptorKind::Collection => &[Field::ProjectId, Field::CollectionId],
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DescriptorKind::Organization => "organization",
            DescriptorKind::Project => "project",
            DescriptorKind::Branch => "branch",
            DescriptorKind::Commit => "commit",
            DescriptorKind::File => "file",
            DescriptorKind::Page => "page",
            DescriptorKind::Layer => "layer",
            DescriptorKind::Collection => "collection",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDescriptor {
    pub organization_id: Id,
}

impl OrganizationDescriptor {
    pub fn new(organization_id: impl Into<Id>) -> Self {
        Self {
            organization_id: organization_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Id>,
    pub project_id: Id,
}

impl ProjectDescriptor {
    pub fn new(project_id: impl Into<Id>) -> Self {
        Self {
            organization_id: None,
            project_id: project_id.into(),
        }
    }

    pub fn in_organization(mut self, organization_id: impl Into<Id>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }
}

/// A branch, optionally pinned to a commit. Without `sha` it denotes the
/// branch head at the time of each call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDescriptor {
    pub project_id: Id,
    pub branch_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl BranchDescriptor {
    pub fn new(project_id: impl Into<Id>, branch_id: impl Into<Id>) -> Self {
        Self {
            project_id: project_id.into(),
            branch_id: branch_id.into(),
            sha: None,
        }
    }

    pub fn at_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDescriptor {
    pub project_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Id>,
    pub sha: String,
}

impl CommitDescriptor {
    pub fn new(project_id: impl Into<Id>, sha: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            branch_id: None,
            sha: sha.into(),
        }
    }

    pub fn on_branch(mut self, branch_id: impl Into<Id>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub project_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub file_id: Id,
}

impl FileDescriptor {
    pub fn new(project_id: impl Into<Id>, file_id: impl Into<Id>) -> Self {
        Self {
            project_id: project_id.into(),
            branch_id: None,
            sha: None,
            file_id: file_id.into(),
        }
    }

    pub fn on_branch(mut self, branch_id: impl Into<Id>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn at_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub project_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub file_id: Id,
    pub page_id: Id,
}

impl PageDescriptor {
    pub fn new(project_id: impl Into<Id>, file_id: impl Into<Id>, page_id: impl Into<Id>) -> Self {
        Self {
            project_id: project_id.into(),
            branch_id: None,
            sha: None,
            file_id: file_id.into(),
            page_id: page_id.into(),
        }
    }

    pub fn on_branch(mut self, branch_id: impl Into<Id>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn at_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub project_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub file_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<Id>,
    pub layer_id: Id,
}

impl LayerDescriptor {
    pub fn new(
        project_id: impl Into<Id>,
        file_id: impl Into<Id>,
        layer_id: impl Into<Id>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            branch_id: None,
            sha: None,
            file_id: file_id.into(),
            page_id: None,
            layer_id: layer_id.into(),
        }
    }

    pub fn on_branch(mut self, branch_id: impl Into<Id>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn at_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    pub fn in_page(mut self, page_id: impl Into<Id>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDescriptor {
    pub project_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Id>,
    pub collection_id: Id,
}

impl CollectionDescriptor {
    pub fn new(project_id: impl Into<Id>, collection_id: impl Into<Id>) -> Self {
        Self {
            project_id: project_id.into(),
            branch_id: None,
            collection_id: collection_id.into(),
        }
    }

    pub fn on_branch(mut self, branch_id: impl Into<Id>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }
}

/// Any descriptor, as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Descriptor {
    Organization(OrganizationDescriptor),
    Project(ProjectDescriptor),
    Branch(BranchDescriptor),
    Commit(CommitDescriptor),
    File(FileDescriptor),
    Page(PageDescriptor),
    Layer(LayerDescriptor),
    Collection(CollectionDescriptor),
}

impl Descriptor {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Organization(_) => DescriptorKind::Organization,
            Descriptor::Project(_) => DescriptorKind::Project,
            Descriptor::Branch(_) => DescriptorKind::Branch,
            Descriptor::Commit(_) => DescriptorKind::Commit,
            Descriptor::File(_) => DescriptorKind::File,
            Descriptor::Page(_) => DescriptorKind::Page,
            Descriptor::Layer(_) => DescriptorKind::Layer,
            Descriptor::Collection(_) => DescriptorKind::Collection,
        }
    }

    /// Value of `field`, or `None` when the slot is absent, empty, or not
    /// part of this kind.
    pub fn get(&self, field: Field) -> Option<&str> {
        match (self, field) {
            (Descriptor::Organization(d), Field::OrganizationId) => present(&d.organization_id),

            (Descriptor::Project(d), Field::OrganizationId) => present_opt(&d.organization_id),
            (Descriptor::Project(d), Field::ProjectId) => present(&d.project_id),

            (Descriptor::Branch(d), Field::ProjectId) => present(&d.project_id),
            (Descriptor::Branch(d), Field::BranchId) => present(&d.branch_id),
            (Descriptor::Branch(d), Field::Sha) => present_opt(&d.sha),

            (Descriptor::Commit(d), Field::ProjectId) => present(&d.project_id),
            (Descriptor::Commit(d), Field::BranchId) => present_opt(&d.branch_id),
            (Descriptor::Commit(d), Field::Sha) => present(&d.sha),

            (Descriptor::File(d), Field::ProjectId) => present(&d.project_id),
            (Descriptor::File(d), Field::BranchId) => present_opt(&d.branch_id),
            (Descriptor::File(d), Field::Sha) => present_opt(&d.sha),
            (Descriptor::File(d), Field::FileId) => present(&d.file_id),

            (Descriptor::Page(d), Field::ProjectId) => present(&d.project_id),
            (Descriptor::Page(d), Field::BranchId) => present_opt(&d.branch_id),
            (Descriptor::Page(d), Field::Sha) => present_opt(&d.sha),
            (Descriptor::Page(d), Field::FileId) => present(&d.file_id),
            (Descriptor::Page(d), Field::PageId) => present(&d.page_id),

            (Descriptor::Layer(d), Field::ProjectId) => present(&d.project_id),
            (Descriptor::Layer(d), Field::BranchId) => present_opt(&d.branch_id),
            (Descriptor::Layer(d), Field::Sha) => present_opt(&d.sha),
            (Descriptor::Layer(d), Field::FileId) => present(&d.file_id),
            (Descriptor::Layer(d), Field::PageId) => present_opt(&d.page_id),
            (Descriptor::Layer(d), Field::LayerId) => present(&d.layer_id),

            (Descriptor::Collection(d), Field::ProjectId) => present(&d.project_id),
            (Descriptor::Collection(d), Field::BranchId) => present_opt(&d.branch_id),
            (Descriptor::Collection(d), Field::CollectionId) => present(&d.collection_id),

            _ => None,
        }
    }

    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Like [`Descriptor::get`], but a missing field is an `InvalidDescriptor`.
    pub fn require(&self, field: Field) -> Result<&str> {
        self.get(field)
            .ok_or_else(|| Error::invalid(self.kind(), field))
    }

    /// Checks every field this kind mandates.
    pub fn validate(&self) -> Result<()> {
        for field in self.kind().mandatory_fields() {
            self.require(*field)?;
        }
        Ok(())
    }

    /// A new descriptor with `field` filled in. Fields that are already
    /// present, or that this kind has no slot for, are left untouched.
    pub fn with_field(&self, field: Field, value: &str) -> Descriptor {
        let mut next = self.clone();
        if self.has(field) {
            return next;
        }
        let value = Some(value.to_string());
        match (&mut next, field) {
            (Descriptor::Project(d), Field::OrganizationId) => d.organization_id = value,
            (Descriptor::Branch(d), Field::Sha) => d.sha = value,
            (Descriptor::Commit(d), Field::BranchId) => d.branch_id = value,
            (Descriptor::File(d), Field::BranchId) => d.branch_id = value,
            (Descriptor::File(d), Field::Sha) => d.sha = value,
            (Descriptor::Page(d), Field::BranchId) => d.branch_id = value,
            (Descriptor::Page(d), Field::Sha) => d.sha = value,
            (Descriptor::Layer(d), Field::BranchId) => d.branch_id = value,
            (Descriptor::Layer(d), Field::Sha) => d.sha = value,
            (Descriptor::Layer(d), Field::PageId) => d.page_id = value,
            (Descriptor::Collection(d), Field::BranchId) => d.branch_id = value,
            _ => {}
        }
        next
    }
}

macro_rules! impl_from_descriptor {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Descriptor {
                fn from(descriptor: $ty) -> Self {
                    Descriptor::$variant(descriptor)
                }
            }

            impl From<&$ty> for Descriptor {
                fn from(descriptor: &$ty) -> Self {
                    Descriptor::$variant(descriptor.clone())
                }
            }
        )*
    };
}

impl_from_descriptor! {
    Organization => OrganizationDescriptor,
    Project => ProjectDescriptor,
    Branch => BranchDescriptor,
    Commit => CommitDescriptor,
    File => FileDescriptor,
    Page => PageDescriptor,
    Layer => LayerDescriptor,
    Collection => CollectionDescriptor,
}
