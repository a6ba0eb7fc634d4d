// fmcly-core: Access-control and auto NAT rule builders between fmcly-api and consumers.

pub mod config;
pub mod error;
pub mod model;
pub mod resolver;
pub mod rules;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, TlsVerification};
pub use error::CoreError;
pub use resolver::{Resolver, Transport, resolve_first};
pub use session::connect;

pub use rules::access::{AccessRule, AccessRuleBuilder};
pub use rules::nat::{NatRule, NatRuleBuilder, NatRuleSettings, PatOptions, PatPoolOptions};
pub use rules::position::{RulePosition, RuleSection};
pub use rules::warning::RuleWarning;
pub use rules::{ParentPolicy, sanitize_name};

pub use model::{
    // Identity
    ObjectCategory, ObjectHandle, ObjectReference, ResolvedObject,
    // Containers
    LiteralKind, NetworkSet, ObjectSet,
    // Enumerations
    Direction, NatType, PolicyAssignment, RuleAction, ServiceProtocol, SetAction,
    // Controller
    ControllerVersion,
};

pub use fmcly_api::{FmcClient, Method};
