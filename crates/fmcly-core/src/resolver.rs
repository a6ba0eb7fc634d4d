// ── Collaborator seams ──
//
// Rule builders never talk HTTP directly. Name lookups go through a
// `Resolver`, submissions through a `Transport`. `FmcClient` implements
// both; tests substitute an in-memory controller.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use fmcly_api::{FmcClient, Method, ObjectSummary};

use crate::error::CoreError;
use crate::model::{ControllerVersion, ObjectCategory, ResolvedObject};

/// Looks up named objects on the controller.
pub trait Resolver: Send + Sync {
    /// First object in `category` whose name matches exactly.
    fn find_by_name(
        &self,
        category: ObjectCategory,
        name: &str,
    ) -> impl Future<Output = Result<Option<ResolvedObject>, CoreError>> + Send;

    /// Version reported by the controller, when known.
    fn server_version(&self) -> Option<ControllerVersion>;
}

/// Sends one request relative to the domain configuration root.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<Value, CoreError>> + Send;
}

/// Try each category in order and return the first match.
pub async fn resolve_first<R: Resolver>(
    resolver: &R,
    categories: &[ObjectCategory],
    name: &str,
) -> Result<Option<ResolvedObject>, CoreError> {
    for &category in categories {
        if let Some(found) = resolver.find_by_name(category, name).await? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

// ── HTTP implementations ─────────────────────────────────────────────

impl Resolver for FmcClient {
    async fn find_by_name(
        &self,
        category: ObjectCategory,
        name: &str,
    ) -> Result<Option<ResolvedObject>, CoreError> {
        debug!(%category, name, "resolving object");
        let items: Vec<ObjectSummary> = self.list_all(category.collection_path()).await?;
        Ok(items
            .into_iter()
            .find(|item| item.name == name)
            .map(ResolvedObject::from))
    }

    fn server_version(&self) -> Option<ControllerVersion> {
        FmcClient::server_version(self).and_then(ControllerVersion::parse)
    }
}

impl Transport for FmcClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, CoreError> {
        Ok(self.send_json(method, path, body).await?)
    }
}
