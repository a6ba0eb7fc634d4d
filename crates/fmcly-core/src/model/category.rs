// ── Object categories known to the resolver ──

use strum::{Display, EnumIter};

/// A collection of named objects on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ObjectCategory {
    SecurityZone,
    ProtocolPort,
    PortGroup,
    VlanTag,
    Url,
    UrlGroup,
    Application,
    Address,
    NetworkGroup,
    Fqdn,
    Interface,
    IntrusionPolicy,
    VariableSet,
    FilePolicy,
    AccessControlPolicy,
    NatPolicy,
}

impl ObjectCategory {
    /// Collection path relative to the domain configuration root.
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::SecurityZone => "object/securityzones",
            Self::ProtocolPort => "object/protocolportobjects",
            Self::PortGroup => "object/portobjectgroups",
            Self::VlanTag => "object/vlantags",
            Self::Url => "object/urls",
            Self::UrlGroup => "object/urlgroups",
            Self::Application => "object/applications",
            // Hosts, networks and ranges share one listing.
            Self::Address => "object/networkaddresses",
            Self::NetworkGroup => "object/networkgroups",
            Self::Fqdn => "object/fqdns",
            Self::Interface => "object/interfaceobjects",
            Self::IntrusionPolicy => "policy/intrusionpolicies",
            Self::VariableSet => "object/variablesets",
            Self::FilePolicy => "policy/filepolicies",
            Self::AccessControlPolicy => "policy/accesspolicies",
            Self::NatPolicy => "policy/ftdnatpolicies",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn display_is_kebab_case() {
        assert_eq!(ObjectCategory::SecurityZone.to_string(), "security-zone");
        assert_eq!(
            ObjectCategory::AccessControlPolicy.to_string(),
            "access-control-policy"
        );
    }

    #[test]
    fn every_category_has_a_distinct_path() {
        let paths: HashSet<&str> = ObjectCategory::iter()
            .map(ObjectCategory::collection_path)
            .collect();
        assert_eq!(paths.len(), ObjectCategory::iter().count());
    }
}
