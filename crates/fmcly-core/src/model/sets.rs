// ── Repeatable match-criterion containers ──
//
// `ObjectSet` backs zones, ports, VLAN tags, URLs and applications.
// Literals and any other keys the controller returns are carried through
// untouched so a fetched rule can be written back.
// `NetworkSet` additionally carries inline literals, kept as an ordered
// map from literal text to its derived kind and flattened to a list of
// `{type, value}` entries on the wire.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::literal::LiteralKind;
use super::reference::ObjectReference;

/// A list of object references, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSet {
    #[serde(default)]
    pub objects: Vec<ObjectReference>,
    /// Inline port, VLAN or URL literals, kept as the controller sent them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectSet {
    /// Append `reference` unless an entry with the same name exists.
    /// Returns `true` when the set changed.
    pub fn insert(&mut self, reference: ObjectReference) -> bool {
        if self.contains(&reference.name) {
            return false;
        }
        self.objects.push(reference);
        true
    }

    /// Drop every entry named `name`. Returns `true` when something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| o.name != name);
        self.objects.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o.name == name)
    }

    /// No objects and no literals.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

/// Source or destination networks: named objects plus inline literals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NetworkSetWire", into = "NetworkSetWire")]
pub struct NetworkSet {
    pub objects: ObjectSet,
    pub literals: IndexMap<String, LiteralKind>,
}

impl NetworkSet {
    pub fn insert_object(&mut self, reference: ObjectReference) -> bool {
        self.objects.insert(reference)
    }

    pub fn remove_object(&mut self, name: &str) -> bool {
        self.objects.remove(name)
    }

    /// Insert or re-tag a literal. Returns `true` when the key is new.
    pub fn insert_literal(&mut self, literal: impl Into<String>, kind: LiteralKind) -> bool {
        self.literals.insert(literal.into(), kind).is_none()
    }

    pub fn remove_literal(&mut self, literal: &str) -> bool {
        self.literals.shift_remove(literal).is_some()
    }

    /// No objects and no literals.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.literals.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct NetworkSetWire {
    #[serde(default)]
    objects: Vec<ObjectReference>,
    #[serde(default)]
    literals: Vec<LiteralEntry>,
}

#[derive(Serialize, Deserialize)]
struct LiteralEntry {
    #[serde(rename = "type")]
    kind: LiteralKind,
    value: String,
}

impl From<NetworkSetWire> for NetworkSet {
    fn from(wire: NetworkSetWire) -> Self {
        Self {
            objects: ObjectSet {
                objects: wire.objects,
                ..ObjectSet::default()
            },
            literals: wire
                .literals
                .into_iter()
                .map(|entry| (entry.value, entry.kind))
                .collect(),
        }
    }
}

impl From<NetworkSet> for NetworkSetWire {
    fn from(set: NetworkSet) -> Self {
        Self {
            objects: set.objects.objects,
            literals: set
                .literals
                .into_iter()
                .map(|(value, kind)| LiteralEntry { kind, value })
                .collect(),
        }
    }
}

/// Serde adapter that renders an `ObjectSet` as `{"applications": [...]}`.
pub mod application_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    use super::{ObjectReference, ObjectSet};

    #[derive(Serialize)]
    struct Out<'a> {
        applications: &'a [ObjectReference],
        #[serde(flatten)]
        extra: &'a Map<String, Value>,
    }

    #[derive(Deserialize)]
    struct In {
        #[serde(default)]
        applications: Vec<ObjectReference>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(set: &Option<ObjectSet>, s: S) -> Result<S::Ok, S::Error> {
        match set {
            Some(set) => Out {
                applications: &set.objects,
                extra: &set.extra,
            }
            .serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ObjectSet>, D::Error> {
        let wire = Option::<In>::deserialize(d)?;
        Ok(wire.map(|w| ObjectSet {
            objects: w.applications,
            extra: w.extra,
            ..ObjectSet::default()
        }))
    }
}
