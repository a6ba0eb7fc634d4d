// Wire types shared by the client and its callers.
//
// Listing endpoints wrap results in `{ items: [...], paging: {...} }`;
// error responses use `{ error: { category, messages: [...], severity } }`.

use serde::{Deserialize, Serialize};

/// One page of a collection listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub paging: Paging,
}

/// Paging metadata attached to every listing response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub pages: u64,
}

/// Summary of any named controller object, as returned by an expanded listing.
///
/// Only the identity triple is guaranteed; `interfaces` is populated for
/// interface groups and left empty for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<serde_json::Value>,
}

/// Entry of the `serverversion` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerVersion {
    pub server_version: String,
}

/// A domain advertised by the token endpoint's `DOMAINS` header.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    pub uuid: String,
}

// ── Error envelope ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) messages: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMessage {
    #[serde(default)]
    pub(crate) description: String,
}

impl ErrorEnvelope {
    /// Join every message description into a single line.
    pub(crate) fn summary(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .error
            .messages
            .iter()
            .map(|m| m.description.trim())
            .filter(|d| !d.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
