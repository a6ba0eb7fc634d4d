//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fmcly_config::ConfigError;
use fmcly_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const WARNINGS: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to management center at {url}")]
    #[diagnostic(
        code(fmcly::connection_failed),
        help(
            "Check that the management center is reachable.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: fmcly_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fmcly::auth_failed),
        help(
            "Verify the API user's credentials.\n\
             The password is read from the profile's password_env, FMCLY_PASSWORD, \
             the system keyring, or the profile itself."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(fmcly::no_credentials),
        help("Set FMCLY_PASSWORD or add a keyring entry 'fmcly' / '{profile}/password'.")
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{category} '{name}' not found")]
    #[diagnostic(
        code(fmcly::not_found),
        help("Object names are matched exactly, including case.")
    )]
    NotFound { category: String, name: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(fmcly::api_error))]
    ApiError { status: u16, message: String },

    #[error(transparent)]
    #[diagnostic(code(fmcly::transport))]
    Transport(fmcly_api::Error),

    // ── Rule building ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fmcly::validation))]
    Validation { field: String, reason: String },

    #[error("{count} warning(s) while building the rule; nothing was submitted")]
    #[diagnostic(
        code(fmcly::strict),
        help("Re-run without --strict to submit the partially built rule.")
    )]
    Warnings { count: usize },

    #[error("Rule could not be submitted: {0}")]
    #[diagnostic(code(fmcly::rule))]
    Rule(CoreError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fmcly::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No management center configured")]
    #[diagnostic(
        code(fmcly::no_config),
        help(
            "Pass --controller and --username (or set FMCLY_CONTROLLER / FMCLY_USERNAME),\n\
             or create a profile at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(fmcly::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(fmcly::render))]
    Render(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            Self::Warnings { .. } => exit_code::WARNINGS,
            _ => exit_code::GENERAL,
        }
    }

    /// Login failures: anything below authentication is a connection problem.
    pub fn from_connect(err: CoreError, url: &str) -> Self {
        match err {
            CoreError::Transport(
                source @ (fmcly_api::Error::Transport(_) | fmcly_api::Error::Tls(_)),
            ) => Self::ConnectionFailed {
                url: url.to_owned(),
                source,
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ReferenceNotFound { category, name } => Self::NotFound {
                category: category.to_string(),
                name,
            },

            CoreError::InvalidArgument { message } => Self::Validation {
                field: "argument".into(),
                reason: message,
            },

            CoreError::Config { message } => Self::Validation {
                field: "connection".into(),
                reason: message,
            },

            CoreError::Transport(api) => match api {
                fmcly_api::Error::Authentication { message } => Self::AuthFailed { message },
                fmcly_api::Error::TokenExpired => Self::AuthFailed {
                    message: "access token rejected".into(),
                },
                fmcly_api::Error::UnknownDomain { name } => Self::NotFound {
                    category: "domain".into(),
                    name,
                },
                fmcly_api::Error::Api { status, message } => Self::ApiError { status, message },
                other => Self::Transport(other),
            },

            other @ (CoreError::MissingParentPolicy
            | CoreError::MissingRuleId
            | CoreError::Serialization(_)) => Self::Rule(other),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
