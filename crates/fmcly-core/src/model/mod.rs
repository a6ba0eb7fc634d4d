// ── Domain model ──

mod category;
mod enums;
mod literal;
mod reference;
mod sets;
mod version;

pub use category::ObjectCategory;
pub use enums::{Direction, NatType, PolicyAssignment, RuleAction, ServiceProtocol, SetAction};
pub use literal::LiteralKind;
pub use reference::{ObjectHandle, ObjectReference, ResolvedObject};
pub use sets::{NetworkSet, ObjectSet, application_list};
pub use version::ControllerVersion;
