// ── Closed enumerations used by the rule builders ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which side of the traffic a match criterion applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Source,
    Destination,
}

/// Mutation applied to a repeatable match criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SetAction {
    Add,
    Remove,
    Clear,
}

/// Mutation applied to a single policy reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PolicyAssignment {
    Set,
    Clear,
}

/// Access rule verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    Allow,
    Trust,
    Block,
    Monitor,
    BlockReset,
    BlockInteractive,
    BlockResetInteractive,
}

/// Automatic NAT translation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NatType {
    Static,
    Dynamic,
}

/// Protocol used for port translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceProtocol {
    Tcp,
    Udp,
}
