// ── Rule builders ──
//
// Each builder owns one rule draft, resolves names through a `Resolver`
// as fields are added, and submits through a `Transport`.

pub mod access;
pub mod nat;
pub mod position;
pub mod warning;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::ObjectCategory;
use crate::resolver::Resolver;

/// How a rule's owning policy is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentPolicy {
    Id(String),
    Name(String),
}

/// Turn a parent reference into a policy id, looking names up in `category`.
pub(crate) async fn resolve_parent<R: Resolver>(
    resolver: &R,
    category: ObjectCategory,
    parent: ParentPolicy,
) -> Result<String, CoreError> {
    match parent {
        ParentPolicy::Id(id) => Ok(id),
        ParentPolicy::Name(name) => {
            debug!(%category, name, "resolving parent policy");
            match resolver.find_by_name(category, &name).await? {
                Some(found) => Ok(found.reference.id),
                None => Err(CoreError::ReferenceNotFound { category, name }),
            }
        }
    }
}

/// Replace characters the controller rejects in rule names with `_`.
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized != name {
        info!(original = name, sanitized = %sanitized, "rule name adjusted");
    }
    sanitized
}

/// Keys the controller adds to rules it returns and refuses on write.
const READ_ONLY_KEYS: &[&str] = &["metadata", "links"];

/// Serialize a draft for submission, dropping read-only keys a fetched
/// rule carried in.
pub(crate) fn payload<T: Serialize>(rule: &T) -> Result<Value, CoreError> {
    let mut value = serde_json::to_value(rule)?;
    if let Some(fields) = value.as_object_mut() {
        for key in READ_ONLY_KEYS {
            fields.remove(*key);
        }
    }
    Ok(value)
}

/// The `id` the controller assigned in a create response.
pub(crate) fn returned_id(response: &Value) -> Option<String> {
    response.get("id").and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_allowed_characters() {
        assert_eq!(sanitize_name("Allow web-01_v2.0 out"), "Allow web-01_v2.0 out");
        assert_eq!(sanitize_name("Zürich"), "Zürich");
    }

    #[test]
    fn sanitize_replaces_the_rest() {
        assert_eq!(sanitize_name("a/b:c*d"), "a_b_c_d");
    }

    #[test]
    fn payload_drops_read_only_keys() {
        let rule = serde_json::json!({
            "name": "r",
            "description": "kept",
            "metadata": {"ruleIndex": 3},
            "links": {"self": "https://fmc/rule"}
        });
        assert_eq!(
            payload(&rule).unwrap(),
            serde_json::json!({"name": "r", "description": "kept"})
        );
    }

    #[test]
    fn returned_id_reads_string_ids() {
        assert_eq!(
            returned_id(&serde_json::json!({"id": "r-1", "name": "x"})),
            Some("r-1".to_owned())
        );
        assert_eq!(returned_id(&serde_json::Value::Null), None);
    }
}
