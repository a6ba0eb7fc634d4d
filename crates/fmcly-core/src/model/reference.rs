// ── Object identity types ──
//
// Every rule field that points at a controller object stores one of these.
// Access rules keep the full `{name, id, type}` triple; automatic NAT rules
// only keep `{id, type}`.

use serde::{Deserialize, Serialize};

use fmcly_api::ObjectSummary;

/// A resolved handle to a named controller-side object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    #[serde(default)]
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ObjectReference {
    pub fn new(name: impl Into<String>, id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// Name-less reference, as used by NAT rule networks and interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectHandle {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ObjectHandle {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

impl From<&ObjectReference> for ObjectHandle {
    fn from(r: &ObjectReference) -> Self {
        Self {
            id: r.id.clone(),
            kind: r.kind.clone(),
        }
    }
}

/// What a resolver lookup yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObject {
    pub reference: ObjectReference,
    /// Member interfaces; non-zero only for interface groups.
    pub member_count: usize,
}

impl ResolvedObject {
    pub fn new(reference: ObjectReference) -> Self {
        Self {
            reference,
            member_count: 0,
        }
    }

    pub fn with_members(mut self, member_count: usize) -> Self {
        self.member_count = member_count;
        self
    }

    /// An interface group spanning several interfaces cannot anchor an
    /// automatic NAT rule.
    pub fn is_multi_member_group(&self) -> bool {
        self.reference.kind == "InterfaceGroup" && self.member_count > 1
    }
}

impl From<ObjectSummary> for ResolvedObject {
    fn from(summary: ObjectSummary) -> Self {
        let member_count = summary.interfaces.len();
        Self {
            reference: ObjectReference {
                name: summary.name,
                id: summary.id,
                kind: summary.kind,
            },
            member_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reference_uses_type_on_the_wire() {
        let r = ObjectReference::new("inside", "z1", "SecurityZone");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "inside", "id": "z1", "type": "SecurityZone"})
        );
    }

    #[test]
    fn handle_drops_name() {
        let r = ObjectReference::new("srv1", "abc", "Host");
        let json = serde_json::to_value(ObjectHandle::from(&r)).unwrap();
        assert_eq!(json, serde_json::json!({"id": "abc", "type": "Host"}));
    }

    #[test]
    fn interface_group_with_many_members_is_flagged() {
        let group = ResolvedObject::new(ObjectReference::new("lan", "g1", "InterfaceGroup"));
        assert!(!group.clone().with_members(1).is_multi_member_group());
        assert!(group.with_members(2).is_multi_member_group());

        let zone = ResolvedObject::new(ObjectReference::new("lan", "z1", "SecurityZone"))
            .with_members(3);
        assert!(!zone.is_multi_member_group());
    }
}
