// ── Access-control rules ──
//
// `AccessRule` is the wire shape; `AccessRuleBuilder` owns one draft and
// mutates it field by field. Object-backed criteria are resolved by name
// at the moment they are added. A name that does not resolve is recorded
// as a warning and the draft keeps its previous state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use fmcly_api::Method;

use super::position::RulePosition;
use super::warning::{RuleWarning, record};
use super::{ParentPolicy, payload, resolve_parent, returned_id, sanitize_name};
use crate::error::CoreError;
use crate::model::{
    Direction, LiteralKind, NetworkSet, ObjectCategory, ObjectReference, ObjectSet,
    PolicyAssignment, ResolvedObject, RuleAction, SetAction, application_list,
};
use crate::resolver::{Resolver, Transport, resolve_first};

const RULE_KIND: &str = "AccessRule";

fn rule_kind() -> String {
    RULE_KIND.to_owned()
}

/// An access-control rule as the controller accepts and returns it.
///
/// Every `None` field is left out of the payload. Keys without a field
/// of their own (`description`, for one) are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "rule_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        rename = "sendEventsToFMC",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub send_events_to_fmc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_files: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_begin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_end: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_set: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_tags: Option<ObjectSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_networks: Option<NetworkSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_networks: Option<NetworkSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_source_networks: Option<NetworkSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ports: Option<ObjectSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_ports: Option<ObjectSet>,
    #[serde(rename = "ipsPolicy", default, skip_serializing_if = "Option::is_none")]
    pub intrusion_policy: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<ObjectSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_zones: Option<ObjectSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_zones: Option<ObjectSet>,
    #[serde(
        default,
        with = "application_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub applications: Option<ObjectSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_policy: Option<ObjectReference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessRule {
    /// A fresh rule with the controller's usual defaults: enabled, events
    /// sent to the management center, no connection logging.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: rule_kind(),
            action: None,
            enabled: Some(true),
            send_events_to_fmc: Some(true),
            log_files: Some(false),
            log_begin: Some(false),
            log_end: Some(false),
            variable_set: None,
            vlan_tags: None,
            source_networks: None,
            destination_networks: None,
            original_source_networks: None,
            source_ports: None,
            destination_ports: None,
            intrusion_policy: None,
            urls: None,
            source_zones: None,
            destination_zones: None,
            applications: None,
            file_policy: None,
            extra: Map::new(),
        }
    }
}

// ── Field addressing ─────────────────────────────────────────────────

/// Object-list fields sharing the add/remove/clear pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectField {
    SourceZones,
    DestinationZones,
    SourcePorts,
    DestinationPorts,
    VlanTags,
    Urls,
    Applications,
}

impl ObjectField {
    fn zones(direction: Direction) -> Self {
        match direction {
            Direction::Source => Self::SourceZones,
            Direction::Destination => Self::DestinationZones,
        }
    }

    fn ports(direction: Direction) -> Self {
        match direction {
            Direction::Source => Self::SourcePorts,
            Direction::Destination => Self::DestinationPorts,
        }
    }

    fn wire_name(self) -> &'static str {
        match self {
            Self::SourceZones => "sourceZones",
            Self::DestinationZones => "destinationZones",
            Self::SourcePorts => "sourcePorts",
            Self::DestinationPorts => "destinationPorts",
            Self::VlanTags => "vlanTags",
            Self::Urls => "urls",
            Self::Applications => "applications",
        }
    }

    /// Lookup order; the first category holding the name wins.
    fn categories(self) -> &'static [ObjectCategory] {
        match self {
            Self::SourceZones | Self::DestinationZones => &[ObjectCategory::SecurityZone],
            Self::SourcePorts | Self::DestinationPorts => {
                &[ObjectCategory::ProtocolPort, ObjectCategory::PortGroup]
            }
            Self::VlanTags => &[ObjectCategory::VlanTag],
            Self::Urls => &[ObjectCategory::Url, ObjectCategory::UrlGroup],
            Self::Applications => &[ObjectCategory::Application],
        }
    }

    fn slot(self, rule: &mut AccessRule) -> &mut Option<ObjectSet> {
        match self {
            Self::SourceZones => &mut rule.source_zones,
            Self::DestinationZones => &mut rule.destination_zones,
            Self::SourcePorts => &mut rule.source_ports,
            Self::DestinationPorts => &mut rule.destination_ports,
            Self::VlanTags => &mut rule.vlan_tags,
            Self::Urls => &mut rule.urls,
            Self::Applications => &mut rule.applications,
        }
    }
}

/// Single policy references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyField {
    Intrusion,
    VariableSet,
    File,
}

impl PolicyField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Intrusion => "ipsPolicy",
            Self::VariableSet => "variableSet",
            Self::File => "filePolicy",
        }
    }

    fn category(self) -> ObjectCategory {
        match self {
            Self::Intrusion => ObjectCategory::IntrusionPolicy,
            Self::VariableSet => ObjectCategory::VariableSet,
            Self::File => ObjectCategory::FilePolicy,
        }
    }

    fn slot(self, rule: &mut AccessRule) -> &mut Option<ObjectReference> {
        match self {
            Self::Intrusion => &mut rule.intrusion_policy,
            Self::VariableSet => &mut rule.variable_set,
            Self::File => &mut rule.file_policy,
        }
    }
}

fn network_field(direction: Direction) -> &'static str {
    match direction {
        Direction::Source => "sourceNetworks",
        Direction::Destination => "destinationNetworks",
    }
}

fn network_slot(rule: &mut AccessRule, direction: Direction) -> &mut Option<NetworkSet> {
    match direction {
        Direction::Source => &mut rule.source_networks,
        Direction::Destination => &mut rule.destination_networks,
    }
}

enum NetworkTarget<'a> {
    Object(&'a str),
    Literal(&'a str),
    Neither,
}

// ── Builder ──────────────────────────────────────────────────────────

/// Builds one access-control rule.
///
/// ```no_run
/// # async fn demo(client: &fmcly_api::FmcClient) -> Result<(), fmcly_core::CoreError> {
/// use fmcly_core::{AccessRuleBuilder, Direction, ParentPolicy, RulePosition, SetAction};
///
/// let mut rule = AccessRuleBuilder::new(client, "allow-dns", RulePosition::default());
/// rule.set_parent_policy(ParentPolicy::Name("Branch ACP".into())).await?;
/// rule.zone(Direction::Source, SetAction::Add, "inside").await?;
/// rule.network(Direction::Destination, SetAction::Add, None, Some("8.8.8.8")).await?;
/// rule.set_action("ALLOW");
/// rule.create(client).await?;
/// # Ok(())
/// # }
/// ```
pub struct AccessRuleBuilder<'r, R> {
    resolver: &'r R,
    policy_id: Option<String>,
    position: RulePosition,
    rule: AccessRule,
    warnings: Vec<RuleWarning>,
}

impl<'r, R: Resolver> AccessRuleBuilder<'r, R> {
    /// Start a new rule. The placement cannot be changed afterwards.
    pub fn new(resolver: &'r R, name: &str, position: RulePosition) -> Self {
        let mut warnings = Vec::new();
        if let (Some(insert_before), Some(insert_after)) =
            (position.insert_before, position.insert_after)
        {
            record(
                &mut warnings,
                RuleWarning::PositionConflict {
                    insert_before,
                    insert_after,
                },
            );
        }

        Self {
            resolver,
            policy_id: None,
            position,
            rule: AccessRule::new(sanitize_name(name)),
            warnings,
        }
    }

    /// Wrap a rule previously read from the controller.
    pub fn from_rule(resolver: &'r R, policy_id: impl Into<String>, rule: AccessRule) -> Self {
        Self {
            resolver,
            policy_id: Some(policy_id.into()),
            position: RulePosition::default(),
            rule,
            warnings: Vec::new(),
        }
    }

    /// Read an existing rule so it can be modified and updated.
    pub async fn fetch<T: Transport>(
        resolver: &'r R,
        transport: &T,
        policy_id: &str,
        rule_id: &str,
    ) -> Result<Self, CoreError> {
        let path = format!("{}/{rule_id}", collection_for(policy_id));
        debug!(path, "fetching access rule");
        let value = transport.send(Method::GET, &path, None).await?;
        let rule: AccessRule = serde_json::from_value(value)?;
        Ok(Self::from_rule(resolver, policy_id, rule))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn rule(&self) -> &AccessRule {
        &self.rule
    }

    pub fn into_rule(self) -> AccessRule {
        self.rule
    }

    pub fn policy_id(&self) -> Option<&str> {
        self.policy_id.as_deref()
    }

    pub fn position(&self) -> &RulePosition {
        &self.position
    }

    /// Everything that was skipped or adjusted so far.
    pub fn warnings(&self) -> &[RuleWarning] {
        &self.warnings
    }

    // ── Identity and scalars ─────────────────────────────────────────

    /// Bind the rule to its access-control policy. Meant to be called once;
    /// a second binding is recorded as a warning and replaces the first.
    pub async fn set_parent_policy(&mut self, parent: ParentPolicy) -> Result<(), CoreError> {
        let id =
            resolve_parent(self.resolver, ObjectCategory::AccessControlPolicy, parent).await?;
        if let Some(previous) = self.policy_id.take() {
            record(
                &mut self.warnings,
                RuleWarning::ParentPolicyReplaced {
                    previous,
                    current: id.clone(),
                },
            );
        }
        info!(policy_id = %id, "access rule bound to policy");
        self.policy_id = Some(id);
        Ok(())
    }

    /// Set the verdict from its wire name. Unknown names are recorded and
    /// leave the action unchanged.
    pub fn set_action(&mut self, action: &str) {
        match action.parse::<RuleAction>() {
            Ok(parsed) => self.set_rule_action(parsed),
            Err(_) => record(
                &mut self.warnings,
                RuleWarning::InvalidAction {
                    value: action.to_owned(),
                },
            ),
        }
    }

    pub fn set_rule_action(&mut self, action: RuleAction) {
        debug!(%action, "setting action");
        self.rule.action = Some(action);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.rule.enabled = Some(enabled);
    }

    pub fn set_send_events_to_fmc(&mut self, send: bool) {
        self.rule.send_events_to_fmc = Some(send);
    }

    pub fn set_log_files(&mut self, log: bool) {
        self.rule.log_files = Some(log);
    }

    pub fn set_log_begin(&mut self, log: bool) {
        self.rule.log_begin = Some(log);
    }

    pub fn set_log_end(&mut self, log: bool) {
        self.rule.log_end = Some(log);
    }

    // ── Object-list criteria ─────────────────────────────────────────

    pub async fn zone(
        &mut self,
        direction: Direction,
        action: SetAction,
        name: &str,
    ) -> Result<(), CoreError> {
        self.update_objects(ObjectField::zones(direction), action, name)
            .await
    }

    /// Protocol-port objects, falling back to port groups.
    pub async fn port(
        &mut self,
        direction: Direction,
        action: SetAction,
        name: &str,
    ) -> Result<(), CoreError> {
        self.update_objects(ObjectField::ports(direction), action, name)
            .await
    }

    pub async fn vlan_tag(&mut self, action: SetAction, name: &str) -> Result<(), CoreError> {
        self.update_objects(ObjectField::VlanTags, action, name).await
    }

    /// URL objects, falling back to URL groups.
    pub async fn url(&mut self, action: SetAction, name: &str) -> Result<(), CoreError> {
        self.update_objects(ObjectField::Urls, action, name).await
    }

    pub async fn application(&mut self, action: SetAction, name: &str) -> Result<(), CoreError> {
        self.update_objects(ObjectField::Applications, action, name)
            .await
    }

    async fn update_objects(
        &mut self,
        field: ObjectField,
        action: SetAction,
        name: &str,
    ) -> Result<(), CoreError> {
        let wire = field.wire_name();
        debug!(field = wire, %action, name, "updating access rule");

        match action {
            SetAction::Clear => {
                if field.slot(&mut self.rule).take().is_some() {
                    info!(field = wire, "field cleared");
                }
            }
            SetAction::Add => {
                let Some(found) = self.lookup(wire, field.categories(), name).await? else {
                    return Ok(());
                };
                let set = field.slot(&mut self.rule).get_or_insert_default();
                if set.insert(found.reference) {
                    info!(field = wire, name, "added");
                } else {
                    debug!(field = wire, name, "already present");
                }
            }
            SetAction::Remove => {
                if self.lookup(wire, field.categories(), name).await?.is_none() {
                    return Ok(());
                }
                let removed = field
                    .slot(&mut self.rule)
                    .as_mut()
                    .is_some_and(|set| set.remove(name));
                if removed {
                    info!(field = wire, name, "removed");
                } else {
                    record(
                        &mut self.warnings,
                        RuleWarning::NothingToRemove {
                            field: wire,
                            name: name.to_owned(),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    // ── Networks ─────────────────────────────────────────────────────

    /// Add, remove or clear a source or destination network.
    ///
    /// Give either `name` (an address object, network group, or on 6.4+
    /// an FQDN object) or `literal` (`10.0.0.1`, `10.0.0.0/24`,
    /// `10.0.0.1-10.0.0.9`). Giving both is an error and leaves the rule
    /// untouched. When removing an object empties the set, the whole
    /// field is dropped.
    pub async fn network(
        &mut self,
        direction: Direction,
        action: SetAction,
        name: Option<&str>,
        literal: Option<&str>,
    ) -> Result<(), CoreError> {
        let field = network_field(direction);
        let target = match (name, literal) {
            (Some(_), Some(_)) => {
                return Err(CoreError::invalid_argument(format!(
                    "{field}: give either an object name or a literal, not both"
                )));
            }
            (Some(name), None) => NetworkTarget::Object(name),
            (None, Some(literal)) => NetworkTarget::Literal(literal.trim()),
            (None, None) => NetworkTarget::Neither,
        };
        debug!(field, %action, ?name, ?literal, "updating access rule");

        match (action, target) {
            (SetAction::Clear, _) => {
                if network_slot(&mut self.rule, direction).take().is_some() {
                    info!(field, "field cleared");
                }
            }
            (SetAction::Add | SetAction::Remove, NetworkTarget::Neither) => {
                record(&mut self.warnings, RuleWarning::MissingArgument { field });
            }
            (SetAction::Add, NetworkTarget::Object(name)) => {
                let categories = self.network_categories();
                let Some(found) = self.lookup(field, &categories, name).await? else {
                    return Ok(());
                };
                let set = network_slot(&mut self.rule, direction).get_or_insert_default();
                if set.insert_object(found.reference) {
                    info!(field, name, "added");
                }
            }
            (SetAction::Add, NetworkTarget::Literal(literal)) => {
                let kind = LiteralKind::classify(literal)?;
                let set = network_slot(&mut self.rule, direction).get_or_insert_default();
                if set.insert_literal(literal, kind) {
                    info!(field, literal, %kind, "literal added");
                }
            }
            (SetAction::Remove, NetworkTarget::Object(name)) => {
                let slot = network_slot(&mut self.rule, direction);
                if !slot.as_mut().is_some_and(|set| set.remove_object(name)) {
                    record(
                        &mut self.warnings,
                        RuleWarning::NothingToRemove {
                            field,
                            name: name.to_owned(),
                        },
                    );
                    return Ok(());
                }
                info!(field, name, "removed");
                if slot.as_ref().is_some_and(NetworkSet::is_empty) {
                    *slot = None;
                    info!(field, "no networks left, field dropped");
                }
            }
            (SetAction::Remove, NetworkTarget::Literal(literal)) => {
                let slot = network_slot(&mut self.rule, direction);
                if slot.as_mut().is_some_and(|set| set.remove_literal(literal)) {
                    info!(field, literal, "literal removed");
                } else {
                    record(
                        &mut self.warnings,
                        RuleWarning::NothingToRemove {
                            field,
                            name: literal.to_owned(),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn network_categories(&self) -> Vec<ObjectCategory> {
        let mut categories = vec![ObjectCategory::Address, ObjectCategory::NetworkGroup];
        match self.resolver.server_version() {
            Some(version) if version.supports_fqdn_objects() => {
                categories.push(ObjectCategory::Fqdn);
            }
            Some(version) => debug!(%version, "controller predates FQDN objects"),
            None => debug!("controller version unknown, skipping FQDN lookup"),
        }
        categories
    }

    // ── Policies ─────────────────────────────────────────────────────

    pub async fn intrusion_policy(
        &mut self,
        action: PolicyAssignment,
        name: &str,
    ) -> Result<(), CoreError> {
        self.assign_policy(PolicyField::Intrusion, action, name)
            .await
    }

    pub async fn variable_set(
        &mut self,
        action: PolicyAssignment,
        name: &str,
    ) -> Result<(), CoreError> {
        self.assign_policy(PolicyField::VariableSet, action, name)
            .await
    }

    pub async fn file_policy(
        &mut self,
        action: PolicyAssignment,
        name: &str,
    ) -> Result<(), CoreError> {
        self.assign_policy(PolicyField::File, action, name).await
    }

    async fn assign_policy(
        &mut self,
        field: PolicyField,
        action: PolicyAssignment,
        name: &str,
    ) -> Result<(), CoreError> {
        let wire = field.wire_name();
        debug!(field = wire, %action, name, "updating access rule");

        match action {
            PolicyAssignment::Clear => {
                if field.slot(&mut self.rule).take().is_some() {
                    info!(field = wire, "field cleared");
                }
            }
            PolicyAssignment::Set => {
                if let Some(found) = self.lookup(wire, &[field.category()], name).await? {
                    *field.slot(&mut self.rule) = Some(found.reference);
                    info!(field = wire, name, "policy set");
                }
            }
        }
        Ok(())
    }

    async fn lookup(
        &mut self,
        field: &'static str,
        categories: &[ObjectCategory],
        name: &str,
    ) -> Result<Option<ResolvedObject>, CoreError> {
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

    /// The payload, containing only the fields that are set.
    pub fn serialize(&self) -> Result<Value, CoreError> {
        payload(&self.rule)
    }

    /// `policy/accesspolicies/{policy}/accessrules`.
    pub fn collection_path(&self) -> Result<String, CoreError> {
        let policy_id = self
            .policy_id
            .as_deref()
            .ok_or(CoreError::MissingParentPolicy)?;
        Ok(collection_for(policy_id))
    }

    /// Collection path plus the placement query fixed at construction.
    pub fn submission_path(&self) -> Result<String, CoreError> {
        Ok(format!(
            "{}{}",
            self.collection_path()?,
            self.position.query_suffix()
        ))
    }

    /// POST the rule and keep the id the controller assigns.
    pub async fn create<T: Transport>(&mut self, transport: &T) -> Result<Value, CoreError> {
        let path = self.submission_path()?;
        let body = self.serialize()?;
        info!(name = %self.rule.name, path, "creating access rule");

        let response = transport.send(Method::POST, &path, Some(&body)).await?;
        if let Some(id) = returned_id(&response) {
            debug!(id, "access rule created");
            self.rule.id = Some(id);
        }
        Ok(response)
    }

    /// PUT the rule over its existing id.
    pub async fn update<T: Transport>(&self, transport: &T) -> Result<Value, CoreError> {
        let collection = self.collection_path()?;
        let id = self.rule.id.as_deref().ok_or(CoreError::MissingRuleId)?;
        let body = self.serialize()?;
        info!(name = %self.rule.name, id, "updating access rule");

        transport
            .send(Method::PUT, &format!("{collection}/{id}"), Some(&body))
            .await
    }
}

fn collection_for(policy_id: &str) -> String {
    format!(
        "{}/{policy_id}/accessrules",
        ObjectCategory::AccessControlPolicy.collection_path()
    )
}
