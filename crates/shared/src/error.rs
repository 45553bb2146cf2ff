use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the remote store (PostgREST shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiError {
    /// One-line summary for logs: message plus code and details when present.
    pub fn summary(&self) -> String {
        let mut summary = self.message.clone();
        if let Some(code) = &self.code {
            summary.push_str(&format!(" [{code}]"));
        }
        if let Some(details) = &self.details {
            summary.push_str(&format!(": {details}"));
        }
        summary
    }
}
