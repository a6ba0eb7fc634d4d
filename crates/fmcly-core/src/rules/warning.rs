// ── Non-fatal rule building outcomes ──

use std::fmt;

use strum::IntoStaticStr;
use tracing::warn;

/// A condition noticed while building a rule that did not stop it.
///
/// Every warning is kept on the builder and also emitted as a `tracing`
/// event, so callers can either inspect them or just read the log.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RuleWarning {
    /// A named object does not exist; the field was left unchanged.
    ReferenceNotFound { field: &'static str, name: String },
    /// An action outside the accepted set.
    InvalidAction { value: String },
    /// Remove targeted an entry (or field) that is not there.
    NothingToRemove { field: &'static str, name: String },
    /// Interface groups spanning several interfaces cannot anchor auto NAT.
    InterfaceGroupRejected {
        field: &'static str,
        name: String,
        members: usize,
    },
    /// Both insertBefore and insertAfter were given.
    PositionConflict { insert_before: u32, insert_after: u32 },
    /// Translated network and interface-in-translated-network are exclusive.
    TranslationConflict {
        kept: &'static str,
        dropped: &'static str,
    },
    /// Neither a name nor a literal was supplied.
    MissingArgument { field: &'static str },
    /// The parent policy was bound a second time; the later binding wins.
    ParentPolicyReplaced { previous: String, current: String },
}

impl RuleWarning {
    /// Stable snake_case tag, used as the `kind` field of the log event.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReferenceNotFound { field, name } => {
                write!(f, "'{name}' not found on controller; {field} left unchanged")
            }
            Self::InvalidAction { value } => write!(f, "'{value}' is not a valid rule action"),
            Self::NothingToRemove { field, name } => {
                write!(f, "'{name}' is not present in {field}; nothing removed")
            }
            Self::InterfaceGroupRejected {
                field,
                name,
                members,
            } => write!(
                f,
                "interface group '{name}' has {members} member interfaces; not usable as {field}"
            ),
            Self::PositionConflict {
                insert_before,
                insert_after,
            } => write!(
                f,
                "both insertBefore={insert_before} and insertAfter={insert_after} given; \
                 the controller decides which applies"
            ),
            Self::TranslationConflict { kept, dropped } => {
                write!(f, "{kept} and {dropped} are mutually exclusive; {dropped} dropped")
            }
            Self::MissingArgument { field } => {
                write!(f, "{field}: neither an object name nor a literal was given")
            }
            Self::ParentPolicyReplaced { previous, current } => write!(
                f,
                "rule was already bound to policy '{previous}'; now bound to '{current}'"
            ),
        }
    }
}

/// Push `warning` onto `warnings` and emit it.
pub(crate) fn record(warnings: &mut Vec<RuleWarning>, warning: RuleWarning) {
    warn!(kind = warning.kind(), "{warning}");
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_snake_case() {
        let w = RuleWarning::ReferenceNotFound {
            field: "sourceZones",
            name: "inside".into(),
        };
        assert_eq!(w.kind(), "reference_not_found");
        assert_eq!(
            w.to_string(),
            "'inside' not found on controller; sourceZones left unchanged"
        );
    }

    #[test]
    fn record_keeps_the_warning() {
        let mut warnings = Vec::new();
        record(&mut warnings, RuleWarning::InvalidAction { value: "NOPE".into() });
        assert_eq!(warnings.len(), 1);
    }
}
