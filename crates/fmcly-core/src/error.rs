// ── Core error types ──
//
// Fatal outcomes of rule building and submission. Missing objects inside
// mutators are *not* errors: they are recorded as `RuleWarning`s so a rule
// can be partially built. Transport failures are carried unchanged.

use thiserror::Error;

use crate::model::ObjectCategory;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Reference errors ─────────────────────────────────────────────
    #[error("{category} '{name}' not found on controller")]
    ReferenceNotFound {
        category: ObjectCategory,
        name: String,
    },

    // ── Argument errors ──────────────────────────────────────────────
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ── Submission errors ────────────────────────────────────────────
    #[error("No parent policy set for this rule")]
    MissingParentPolicy,

    #[error("Rule has no id; create or fetch it before updating")]
    MissingRuleId,

    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Transport errors (carried unchanged) ─────────────────────────
    #[error(transparent)]
    Transport(#[from] fmcly_api::Error),
}

impl CoreError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised before anything was sent.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}
