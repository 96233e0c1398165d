use crate::api::{branches, layers, AbstractApi};
use crate::error::{Error, Result};
use crate::model::{Branch, Descriptor, DescriptorKind, Field, LayerInfo};

/// A dependent request that fills in fields a descriptor is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Branch info; yields the branch head sha
    BranchHead,
    /// Layer info; yields the owning page (and file) in one round trip
    LayerInfo,
}

impl Lookup {
    /// The lookup that supplies `field` when a descriptor of `kind` lacks it,
    /// or `None` when the field can only come from the caller.
    pub fn supplying(kind: DescriptorKind, field: Field) -> Option<Lookup> {
        match kind {
            DescriptorKind::Organization | DescriptorKind::Project | DescriptorKind::Collection => {
                None
            }
            // The sha is what identifies a commit
            DescriptorKind::Commit => None,
            DescriptorKind::Branch | DescriptorKind::File | DescriptorKind::Page => match field {
                Field::Sha => Some(Lookup::BranchHead),
                _ => None,
            },
            DescriptorKind::Layer => match field {
                Field::Sha => Some(Lookup::BranchHead),
                Field::PageId => Some(Lookup::LayerInfo),
                _ => None,
            },
        }
    }

    pub fn inputs(self) -> &'static [Field] {
        match self {
            Lookup::BranchHead => &[Field::ProjectId, Field::BranchId],
            Lookup::LayerInfo => &[Field::ProjectId, Field::FileId, Field::LayerId],
        }
    }

    pub fn outputs(self) -> &'static [Field] {
        match self {
            Lookup::BranchHead => &[Field::Sha],
            Lookup::LayerInfo => &[Field::PageId],
        }
    }

    /// Lookups that must finish first when they are part of the same plan.
    /// Layer info is read at the resolved sha so both point at one commit.
    pub fn after(self) -> &'static [Lookup] {
        match self {
            Lookup::BranchHead => &[],
            Lookup::LayerInfo => &[Lookup::BranchHead],
        }
    }

    pub(crate) async fn run(self, api: &AbstractApi, descriptor: &Descriptor) -> Result<LookupOutput> {
        match self {
            Lookup::BranchHead => {
                let project_id = descriptor.require(Field::ProjectId)?;
                let branch_id = descriptor.require(Field::BranchId)?;
                let branch: Branch = api
                    .fetch(branches::info_request(project_id, branch_id))
                    .await?;
                Ok(LookupOutput::BranchHead(branch))
            }
            Lookup::LayerInfo => {
                let info: LayerInfo = api.fetch(layers::info_request(descriptor)?).await?;
                Ok(LookupOutput::LayerInfo(info))
            }
        }
    }
}

/// Response of a completed lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutput {
    BranchHead(Branch),
    LayerInfo(LayerInfo),
}

impl LookupOutput {
    pub fn lookup(&self) -> Lookup {
        match self {
            LookupOutput::BranchHead(_) => Lookup::BranchHead,
            LookupOutput::LayerInfo(_) => Lookup::LayerInfo,
        }
    }

    /// Value this response provides for `field`. A response that should carry
    /// one of the lookup's outputs but does not is an unexpected response.
    pub fn value(&self, field: Field) -> Result<&str> {
        let value = match (self, field) {
            (LookupOutput::BranchHead(branch), Field::Sha) => branch.head_sha(),
            (LookupOutput::LayerInfo(info), Field::PageId) => info.page.id.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.is_empty()).ok_or_else(|| {
            Error::UnexpectedResponse(format!(
                "{:?} response has no value for `{}`",
                self.lookup(),
                field
            ))
        })
    }
}
