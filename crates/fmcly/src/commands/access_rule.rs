//! Access-rule command handlers.

use tracing::info;

use fmcly_core::{
    AccessRuleBuilder, Direction, FmcClient, PolicyAssignment, RulePosition, SetAction,
};

use crate::cli::{AccessRuleArgs, AccessRuleCommand, AccessRuleCreateArgs, GlobalOpts};
use crate::error::CliError;

use super::{check_warnings, emit, parent_policy};

pub async fn handle(
    client: &FmcClient,
    args: AccessRuleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccessRuleCommand::Create(args) => create(client, &args, global).await,
    }
}

async fn create(
    client: &FmcClient,
    args: &AccessRuleCreateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let position = RulePosition {
        category: args.category.clone(),
        insert_before: args.insert_before,
        insert_after: args.insert_after,
        section: args.section.map(Into::into),
    };
    let mut rule = AccessRuleBuilder::new(client, &args.name, position);
    rule.set_parent_policy(parent_policy(&args.parent)?).await?;

    if let Some(action) = &args.action {
        rule.set_action(action);
    }
    if args.disabled {
        rule.set_enabled(false);
    }
    if args.no_events {
        rule.set_send_events_to_fmc(false);
    }
    if args.log_begin {
        rule.set_log_begin(true);
    }
    if args.log_end {
        rule.set_log_end(true);
    }
    if args.log_files {
        rule.set_log_files(true);
    }

    for (direction, zones, networks, literals, ports) in [
        (
            Direction::Source,
            &args.source_zones,
            &args.source_networks,
            &args.source_literals,
            &args.source_ports,
        ),
        (
            Direction::Destination,
            &args.destination_zones,
            &args.destination_networks,
            &args.destination_literals,
            &args.destination_ports,
        ),
    ] {
        for name in zones {
            rule.zone(direction, SetAction::Add, name).await?;
        }
        for name in networks {
            rule.network(direction, SetAction::Add, Some(name), None)
                .await?;
        }
        for literal in literals {
            rule.network(direction, SetAction::Add, None, Some(literal))
                .await?;
        }
        for name in ports {
            rule.port(direction, SetAction::Add, name).await?;
        }
    }
    for name in &args.vlan_tags {
        rule.vlan_tag(SetAction::Add, name).await?;
    }
    for name in &args.urls {
        rule.url(SetAction::Add, name).await?;
    }
    for name in &args.applications {
        rule.application(SetAction::Add, name).await?;
    }

    if let Some(name) = &args.intrusion_policy {
        rule.intrusion_policy(PolicyAssignment::Set, name).await?;
    }
    if let Some(name) = &args.variable_set {
        rule.variable_set(PolicyAssignment::Set, name).await?;
    }
    if let Some(name) = &args.file_policy {
        rule.file_policy(PolicyAssignment::Set, name).await?;
    }

    check_warnings(rule.warnings(), &args.submit)?;

    if args.submit.dry_run {
        info!(path = %rule.submission_path()?, "dry run, not submitting");
        return emit(global, &rule.serialize()?);
    }

    let created = rule.create(client).await?;
    info!(id = rule.rule().id.as_deref().unwrap_or("?"), "access rule created");
    emit(global, &created)
}
