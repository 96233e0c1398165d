use crate::model::{DescriptorKind, Field};

/// Every failure an endpoint can surface. Errors raised while resolving a
/// descriptor carry the same classification as errors from the final request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} descriptor is missing `{field}` and it cannot be resolved")]
    InvalidDescriptor { kind: DescriptorKind, field: Field },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("transport failure: {0:#}")]
    Transport(#[source] anyhow::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    pub fn invalid(kind: DescriptorKind, field: Field) -> Self {
        Error::InvalidDescriptor { kind, field }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// HTTP-like status of the failure, when the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::UnexpectedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
