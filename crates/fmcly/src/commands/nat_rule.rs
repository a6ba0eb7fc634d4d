//! Auto NAT rule command handlers.

use tracing::info;

use fmcly_core::{FmcClient, NatRuleBuilder, NatRuleSettings, PatPoolOptions};

use crate::cli::{GlobalOpts, NatRuleArgs, NatRuleCommand, NatRuleCreateArgs};
use crate::error::CliError;

use super::{check_warnings, emit, parent_policy};

pub async fn handle(
    client: &FmcClient,
    args: NatRuleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NatRuleCommand::Create(args) => create(client, &args, global).await,
    }
}

/// Flags that are only ever switched on from the command line.
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

fn settings(args: &NatRuleCreateArgs) -> NatRuleSettings {
    NatRuleSettings {
        original_network: args.original_network.clone(),
        translated_network: args.translated_network.clone(),
        interface_in_translated_network: flag(args.interface_in_translated_network),
        nat_type: args.nat_type.map(Into::into),
        interface_ipv6: flag(args.interface_ipv6),
        fall_through: flag(args.fall_through),
        dns: flag(args.dns),
        route_lookup: flag(args.route_lookup),
        no_proxy_arp: flag(args.no_proxy_arp),
        net_to_net: flag(args.net_to_net),
        source_interface: args.source_interface.clone(),
        destination_interface: args.destination_interface.clone(),
        original_port: args.original_port,
        translated_port: args.translated_port,
        service_protocol: args.protocol.map(Into::into),
    }
}

fn pat_options(args: &NatRuleCreateArgs) -> PatPoolOptions {
    PatPoolOptions {
        interface_pat: flag(args.pat_interface),
        include_reserve: flag(args.pat_include_reserve),
        round_robin: args.pat_no_round_robin.then_some(false),
        extended_pat: flag(args.pat_extended),
        flat_port_range: flag(args.pat_flat_port_range),
    }
}

async fn create(
    client: &FmcClient,
    args: &NatRuleCreateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut rule = NatRuleBuilder::new(client);
    rule.set_parent_policy(parent_policy(&args.parent)?).await?;

    if let Some(name) = &args.identity {
        rule.identity_nat(name).await?;
    }
    rule.configure(settings(args)).await?;
    if let Some(pool) = &args.pat_pool {
        rule.pat_pool(pool, &pat_options(args)).await?;
    }

    check_warnings(rule.warnings(), &args.submit)?;

    if args.submit.dry_run {
        info!(path = %rule.submission_path()?, "dry run, not submitting");
        return emit(global, &rule.serialize()?);
    }

    let created = rule.create(client).await?;
    info!(id = rule.rule().id.as_deref().unwrap_or("?"), "auto nat rule created");
    emit(global, &created)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn create_args(args: &[&str]) -> Box<NatRuleCreateArgs> {
        let mut argv = vec!["fmcly", "nat-rule", "create", "--policy", "Branch NAT"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).map(|cli| cli.command) {
            Ok(Command::NatRule(NatRuleArgs {
                command: NatRuleCommand::Create(args),
            })) => args,
            other => panic!("unexpected parse result: {other:?}"),
        }
    }

    #[test]
    fn unset_flags_stay_unset() {
        let args = create_args(&["--original-network", "lan", "--dns"]);
        let settings = settings(&args);
        assert_eq!(settings.original_network.as_deref(), Some("lan"));
        assert_eq!(settings.dns, Some(true));
        assert_eq!(settings.route_lookup, None);
        assert_eq!(settings.interface_in_translated_network, None);
    }

    #[test]
    fn round_robin_is_only_overridden_when_disabled() {
        let args = create_args(&["--pat-pool", "pool"]);
        assert_eq!(pat_options(&args).round_robin, None);

        let args = create_args(&["--pat-pool", "pool", "--pat-no-round-robin"]);
        assert_eq!(pat_options(&args).round_robin, Some(false));
    }

    #[test]
    fn pat_flags_need_a_pool() {
        let argv = ["fmcly", "nat-rule", "create", "--policy", "p", "--pat-extended"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
