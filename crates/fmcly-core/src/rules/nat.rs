// ── Automatic NAT rules ──
//
// Auto NAT rules hang off an FTD NAT policy. Networks and interfaces are
// stored as bare `{id, type}` handles; only the PAT pool keeps its name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use fmcly_api::Method;

use super::warning::{RuleWarning, record};
use super::{ParentPolicy, payload, resolve_parent, returned_id};
use crate::error::CoreError;
use crate::model::{
    NatType, ObjectCategory, ObjectHandle, ObjectReference, ResolvedObject, ServiceProtocol,
};
use crate::resolver::{Resolver, Transport, resolve_first};

const RULE_KIND: &str = "FTDAutoNatRule";

const INTERFACE_IN_TRANSLATED: &str = "interfaceInTranslatedNetwork";
const TRANSLATED_NETWORK: &str = "translatedNetwork";

fn rule_kind() -> String {
    RULE_KIND.to_owned()
}

/// An automatic NAT rule as the controller accepts and returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "rule_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_network: Option<ObjectHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_network: Option<ObjectHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_in_translated_network: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_type: Option<NatType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_ipv6: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall_through: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_lookup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_proxy_arp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_to_net: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_interface: Option<ObjectHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_interface: Option<ObjectHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_protocol: Option<ServiceProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pat_options: Option<PatOptions>,
    /// Fields without a typed slot, such as `description`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for NatRule {
    fn default() -> Self {
        Self {
            id: None,
            kind: rule_kind(),
            original_network: None,
            translated_network: None,
            interface_in_translated_network: None,
            nat_type: None,
            interface_ipv6: None,
            fall_through: None,
            dns: None,
            route_lookup: None,
            no_proxy_arp: None,
            net_to_net: None,
            source_interface: None,
            destination_interface: None,
            original_port: None,
            translated_port: None,
            service_protocol: None,
            pat_options: None,
            extra: Map::new(),
        }
    }
}

/// Port address translation settings, as sent to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct PatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pat_pool_address: Option<ObjectReference>,
    #[serde(default)]
    pub interface_pat: bool,
    #[serde(default)]
    pub include_reserve: bool,
    #[serde(default = "default_round_robin")]
    pub round_robin: bool,
    #[serde(default)]
    pub extended_pat: bool,
    #[serde(default)]
    pub flat_port_range: bool,
}

fn default_round_robin() -> bool {
    true
}

/// Caller overrides for [`PatOptions`]; unset fields take the defaults
/// (round robin on, everything else off).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatPoolOptions {
    pub interface_pat: Option<bool>,
    pub include_reserve: Option<bool>,
    pub round_robin: Option<bool>,
    pub extended_pat: Option<bool>,
    pub flat_port_range: Option<bool>,
}

impl PatPoolOptions {
    fn build(&self, pool: ObjectReference) -> PatOptions {
        PatOptions {
            pat_pool_address: Some(pool),
            interface_pat: self.interface_pat.unwrap_or(false),
            include_reserve: self.include_reserve.unwrap_or(false),
            round_robin: self.round_robin.unwrap_or_else(default_round_robin),
            extended_pat: self.extended_pat.unwrap_or(false),
            flat_port_range: self.flat_port_range.unwrap_or(false),
        }
    }
}

/// A batch of optional NAT settings applied by [`NatRuleBuilder::configure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NatRuleSettings {
    /// Address object name.
    pub original_network: Option<String>,
    /// Address object name. Wins over `interface_in_translated_network`.
    pub translated_network: Option<String>,
    pub interface_in_translated_network: Option<bool>,
    pub nat_type: Option<NatType>,
    pub interface_ipv6: Option<bool>,
    pub fall_through: Option<bool>,
    pub dns: Option<bool>,
    pub route_lookup: Option<bool>,
    pub no_proxy_arp: Option<bool>,
    pub net_to_net: Option<bool>,
    /// Interface object name.
    pub source_interface: Option<String>,
    /// Interface object name.
    pub destination_interface: Option<String>,
    pub original_port: Option<u16>,
    pub translated_port: Option<u16>,
    pub service_protocol: Option<ServiceProtocol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterfaceSide {
    Source,
    Destination,
}

impl InterfaceSide {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Source => "sourceInterface",
            Self::Destination => "destinationInterface",
        }
    }
}

/// Builds one automatic NAT rule.
pub struct NatRuleBuilder<'r, R> {
    resolver: &'r R,
    policy_id: Option<String>,
    rule: NatRule,
    warnings: Vec<RuleWarning>,
}

impl<'r, R: Resolver> NatRuleBuilder<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self {
            resolver,
            policy_id: None,
            rule: NatRule::default(),
            warnings: Vec::new(),
        }
    }

    pub fn from_rule(resolver: &'r R, policy_id: impl Into<String>, rule: NatRule) -> Self {
        Self {
            resolver,
            policy_id: Some(policy_id.into()),
            rule,
            warnings: Vec::new(),
        }
    }

    pub async fn fetch<T: Transport>(
        resolver: &'r R,
        transport: &T,
        policy_id: &str,
        rule_id: &str,
    ) -> Result<Self, CoreError> {
        let path = format!("{}/{rule_id}", collection_for(policy_id));
        debug!(path, "fetching auto nat rule");
        let value = transport.send(Method::GET, &path, None).await?;
        let rule: NatRule = serde_json::from_value(value)?;
        Ok(Self::from_rule(resolver, policy_id, rule))
    }

    pub fn rule(&self) -> &NatRule {
        &self.rule
    }

    pub fn into_rule(self) -> NatRule {
        self.rule
    }

    pub fn policy_id(&self) -> Option<&str> {
        self.policy_id.as_deref()
    }

    pub fn warnings(&self) -> &[RuleWarning] {
        &self.warnings
    }

    /// Bind the rule to its FTD NAT policy. Rebinding is recorded as a
    /// warning.
    pub async fn set_parent_policy(&mut self, parent: ParentPolicy) -> Result<(), CoreError> {
        let id = resolve_parent(self.resolver, ObjectCategory::NatPolicy, parent).await?;
        if let Some(previous) = self.policy_id.take() {
            record(
                &mut self.warnings,
                RuleWarning::ParentPolicyReplaced {
                    previous,
                    current: id.clone(),
                },
            );
        }
        info!(policy_id = %id, "auto nat rule bound to policy");
        self.policy_id = Some(id);
        Ok(())
    }

    /// Apply every setting that is present. Lookups run in field order and
    /// stop at the first hard error.
    pub async fn configure(&mut self, settings: NatRuleSettings) -> Result<(), CoreError> {
        let NatRuleSettings {
            original_network,
            translated_network,
            interface_in_translated_network,
            nat_type,
            interface_ipv6,
            fall_through,
            dns,
            route_lookup,
            no_proxy_arp,
            net_to_net,
            source_interface,
            destination_interface,
            original_port,
            translated_port,
            service_protocol,
        } = settings;

        if let Some(name) = original_network {
            self.original_network(&name).await?;
        }
        match (translated_network, interface_in_translated_network) {
            (Some(name), Some(_)) => {
                record(
                    &mut self.warnings,
                    RuleWarning::TranslationConflict {
                        kept: TRANSLATED_NETWORK,
                        dropped: INTERFACE_IN_TRANSLATED,
                    },
                );
                self.translated_network(&name).await?;
            }
            (Some(name), None) => self.translated_network(&name).await?,
            (None, Some(flag)) => self.set_interface_in_translated_network(flag),
            (None, None) => {}
        }

        if let Some(nat_type) = nat_type {
            self.rule.nat_type = Some(nat_type);
        }
        if let Some(v) = interface_ipv6 {
            self.rule.interface_ipv6 = Some(v);
        }
        if let Some(v) = fall_through {
            self.rule.fall_through = Some(v);
        }
        if let Some(v) = dns {
            self.rule.dns = Some(v);
        }
        if let Some(v) = route_lookup {
            self.rule.route_lookup = Some(v);
        }
        if let Some(v) = no_proxy_arp {
            self.rule.no_proxy_arp = Some(v);
        }
        if let Some(v) = net_to_net {
            self.rule.net_to_net = Some(v);
        }
        if let Some(name) = source_interface {
            self.source_interface(&name).await?;
        }
        if let Some(name) = destination_interface {
            self.destination_interface(&name).await?;
        }
        if let Some(port) = original_port {
            self.rule.original_port = Some(port);
        }
        if let Some(port) = translated_port {
            self.rule.translated_port = Some(port);
        }
        if let Some(protocol) = service_protocol {
            self.rule.service_protocol = Some(protocol);
        }
        Ok(())
    }

    /// Translate to the egress interface address. Refused while a
    /// translated network is set.
    pub fn set_interface_in_translated_network(&mut self, enabled: bool) {
        if enabled && self.rule.translated_network.is_some() {
            record(
                &mut self.warnings,
                RuleWarning::TranslationConflict {
                    kept: TRANSLATED_NETWORK,
                    dropped: INTERFACE_IN_TRANSLATED,
                },
            );
            return;
        }
        self.rule.interface_in_translated_network = Some(enabled);
    }

    // ── Networks ─────────────────────────────────────────────────────

    /// Address object only; auto NAT does not take network groups here.
    pub async fn original_network(&mut self, name: &str) -> Result<(), CoreError> {
        if let Some(found) = self
            .lookup("originalNetwork", &[ObjectCategory::Address], name)
            .await?
        {
            self.rule.original_network = Some(ObjectHandle::from(&found.reference));
            info!(name, "original network set");
        }
        Ok(())
    }

    /// Address object only. Replaces interface-in-translated-network.
    pub async fn translated_network(&mut self, name: &str) -> Result<(), CoreError> {
        if let Some(found) = self
            .lookup(TRANSLATED_NETWORK, &[ObjectCategory::Address], name)
            .await?
        {
            self.drop_interface_translation();
            self.rule.translated_network = Some(ObjectHandle::from(&found.reference));
            info!(name, "translated network set");
        }
        Ok(())
    }

    /// Map an address object onto itself (exempt it from translation).
    pub async fn identity_nat(&mut self, name: &str) -> Result<(), CoreError> {
        let Some(found) = self
            .lookup("identityNat", &[ObjectCategory::Address], name)
            .await?
        else {
            return Ok(());
        };
        let handle = ObjectHandle::from(&found.reference);
        self.drop_interface_translation();
        self.rule.nat_type = Some(NatType::Static);
        self.rule.original_network = Some(handle.clone());
        self.rule.translated_network = Some(handle);
        info!(name, "identity nat set");
        Ok(())
    }

    fn drop_interface_translation(&mut self) {
        if self.rule.interface_in_translated_network == Some(true) {
            self.rule.interface_in_translated_network = None;
            record(
                &mut self.warnings,
                RuleWarning::TranslationConflict {
                    kept: TRANSLATED_NETWORK,
                    dropped: INTERFACE_IN_TRANSLATED,
                },
            );
        }
    }

    // ── Interfaces ───────────────────────────────────────────────────

    pub async fn source_interface(&mut self, name: &str) -> Result<(), CoreError> {
        self.set_interface(InterfaceSide::Source, name).await
    }

    pub async fn destination_interface(&mut self, name: &str) -> Result<(), CoreError> {
        self.set_interface(InterfaceSide::Destination, name).await
    }

    async fn set_interface(&mut self, side: InterfaceSide, name: &str) -> Result<(), CoreError> {
        let field = side.wire_name();
        let Some(found) = self.lookup(field, &[ObjectCategory::Interface], name).await? else {
            return Ok(());
        };
        if found.is_multi_member_group() {
            record(
                &mut self.warnings,
                RuleWarning::InterfaceGroupRejected {
                    field,
                    name: name.to_owned(),
                    members: found.member_count,
                },
            );
            return Ok(());
        }

        let handle = Some(ObjectHandle::from(&found.reference));
        match side {
            InterfaceSide::Source => self.rule.source_interface = handle,
            InterfaceSide::Destination => self.rule.destination_interface = handle,
        }
        info!(field, name, "interface set");
        Ok(())
    }

    // ── PAT ──────────────────────────────────────────────────────────

    /// Use an address object or network group as the PAT pool. Makes the
    /// rule dynamic.
    pub async fn pat_pool(
        &mut self,
        name: &str,
        options: &PatPoolOptions,
    ) -> Result<(), CoreError> {
        let categories = [ObjectCategory::Address, ObjectCategory::NetworkGroup];
        let Some(found) = self.lookup("patOptions", &categories, name).await? else {
            return Ok(());
        };
        self.rule.nat_type = Some(NatType::Dynamic);
        self.rule.pat_options = Some(options.build(found.reference));
        info!(name, "pat pool set");
        Ok(())
    }

    async fn lookup(
        &mut self,
        field: &'static str,
        categories: &[ObjectCategory],
        name: &str,
    ) -> Result<Option<ResolvedObject>, CoreError> {
        debug!(field, name, "resolving for auto nat rule");
        let found = resolve_first(self.resolver, categories, name).await?;
        if found.is_none() {
            record(
                &mut self.warnings,
                RuleWarning::ReferenceNotFound {
                    field,
                    name: name.to_owned(),
                },
            );
        }
        Ok(found)
    }

    // ── Serialization and submission ─────────────────────────────────

    pub fn serialize(&self) -> Result<Value, CoreError> {
        payload(&self.rule)
    }

    /// `policy/ftdnatpolicies/{policy}/autonatrules`.
    pub fn submission_path(&self) -> Result<String, CoreError> {
        let policy_id = self
            .policy_id
            .as_deref()
            .ok_or(CoreError::MissingParentPolicy)?;
        Ok(collection_for(policy_id))
    }

    pub async fn create<T: Transport>(&mut self, transport: &T) -> Result<Value, CoreError> {
        let path = self.submission_path()?;
        let body = self.serialize()?;
        info!(path, "creating auto nat rule");

        let response = transport.send(Method::POST, &path, Some(&body)).await?;
        if let Some(id) = returned_id(&response) {
            debug!(id, "auto nat rule created");
            self.rule.id = Some(id);
        }
        Ok(response)
    }

    pub async fn update<T: Transport>(&self, transport: &T) -> Result<Value, CoreError> {
        let collection = self.submission_path()?;
        let id = self.rule.id.as_deref().ok_or(CoreError::MissingRuleId)?;
        let body = self.serialize()?;
        info!(id, "updating auto nat rule");

        transport
            .send(Method::PUT, &format!("{collection}/{id}"), Some(&body))
            .await
    }
}

fn collection_for(policy_id: &str) -> String {
    format!(
        "{}/{policy_id}/autonatrules",
        ObjectCategory::NatPolicy.collection_path()
    )
}
