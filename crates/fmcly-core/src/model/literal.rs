// ── Literal network values ──
//
// A literal is an address written inline in a rule instead of a named
// object. Its wire type is derived from its syntax.

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::CoreError;

/// Wire type of a literal network value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum LiteralKind {
    #[serde(alias = "host", alias = "HOST")]
    Host,
    #[serde(alias = "network", alias = "NETWORK")]
    Network,
    #[serde(alias = "range", alias = "RANGE")]
    Range,
}

impl LiteralKind {
    /// Classify a literal by its syntax.
    ///
    /// - `10.0.0.1`, `10.0.0.1/32`, `2001:db8::1/128` → `Host`
    /// - `10.0.0.0/24` → `Network`
    /// - `10.0.0.1-10.0.0.9` → `Range` (both ends of the same family)
    pub fn classify(literal: &str) -> Result<Self, CoreError> {
        let literal = literal.trim();

        if let Some((start, end)) = literal.split_once('-') {
            let start: IpAddr = parse_addr(literal, start)?;
            let end: IpAddr = parse_addr(literal, end)?;
            if start.is_ipv4() != end.is_ipv4() {
                return Err(CoreError::invalid_argument(format!(
                    "literal '{literal}' mixes IPv4 and IPv6 range ends"
                )));
            }
            return Ok(Self::Range);
        }

        if literal.contains('/') {
            let network: IpNetwork = literal.parse().map_err(|e| {
                CoreError::invalid_argument(format!("literal '{literal}' is not a valid prefix: {e}"))
            })?;
            let host_prefix = if network.is_ipv4() { 32 } else { 128 };
            return Ok(if network.prefix() == host_prefix {
                Self::Host
            } else {
                Self::Network
            });
        }

        parse_addr(literal, literal)?;
        Ok(Self::Host)
    }
}

fn parse_addr(literal: &str, part: &str) -> Result<IpAddr, CoreError> {
    part.trim().parse().map_err(|_| {
        CoreError::invalid_argument(format!("literal '{literal}' is not a valid address"))
    })
}
