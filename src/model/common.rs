use serde::{Deserialize, Serialize};

pub type Id = String;

/// Attributes the engine does not interpret, kept verbatim from the response.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Optional narrowing accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Service-side filter, e.g. `active` for projects or `mine` for branches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListOptions {
    pub fn filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Treats empty identifiers the same as missing ones.
pub(crate) fn present(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn present_opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(present)
}
