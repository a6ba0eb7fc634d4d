//! Clap derive structures for the `fmcly` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use fmcly_core::{NatType, RuleSection, ServiceProtocol};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fmcly -- build access-control and auto NAT rules on a Firepower Management Center
#[derive(Debug, Parser)]
#[command(
    name = "fmcly",
    version,
    about = "Build Firepower Management Center access and NAT rules from the command line",
    long_about = "Resolves object names against the management center, assembles the rule \
        payload, and either prints it (--dry-run) or submits it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "FMCLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Management center URL (overrides profile)
    #[arg(long, short = 'c', env = "FMCLY_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// API username (overrides profile); the password comes from
    /// FMCLY_PASSWORD, the keyring, or the profile
    #[arg(long, short = 'u', env = "FMCLY_USERNAME", global = true)]
    pub username: Option<String>,

    /// Domain, e.g. "Global/Branch" (overrides profile)
    #[arg(long, short = 'd', env = "FMCLY_DOMAIN", global = true)]
    pub domain: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FMCLY_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FMCLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FMCLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build access-control rules
    #[command(alias = "acr")]
    AccessRule(AccessRuleArgs),

    /// Build automatic NAT rules
    #[command(alias = "nat")]
    NatRule(NatRuleArgs),

    /// Inspect the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared rule flags ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ParentArgs {
    /// Owning policy, by name
    #[arg(long, conflicts_with = "policy_id", required_unless_present = "policy_id")]
    pub policy: Option<String>,

    /// Owning policy, by id
    #[arg(long)]
    pub policy_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Print the payload instead of submitting it
    #[arg(long)]
    pub dry_run: bool,

    /// Refuse to submit when any lookup or setting produced a warning
    #[arg(long)]
    pub strict: bool,
}

// ── Access rules ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccessRuleArgs {
    #[command(subcommand)]
    pub command: AccessRuleCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccessRuleCommand {
    /// Create an access-control rule
    Create(Box<AccessRuleCreateArgs>),
}

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AccessRuleCreateArgs {
    /// Rule name
    pub name: String,

    #[command(flatten)]
    pub parent: ParentArgs,

    /// Verdict: ALLOW, TRUST, BLOCK, MONITOR, BLOCK_RESET,
    /// BLOCK_INTERACTIVE or BLOCK_RESET_INTERACTIVE
    #[arg(long, short = 'a')]
    pub action: Option<String>,

    /// Create the rule disabled
    #[arg(long)]
    pub disabled: bool,

    /// Do not send events to the management center
    #[arg(long)]
    pub no_events: bool,

    /// Log at connection start
    #[arg(long)]
    pub log_begin: bool,

    /// Log at connection end
    #[arg(long)]
    pub log_end: bool,

    /// Log file events
    #[arg(long)]
    pub log_files: bool,

    // ── Placement ──
    /// Rule category inside the policy
    #[arg(long)]
    pub category: Option<String>,

    /// Insert before this rule index
    #[arg(long)]
    pub insert_before: Option<u32>,

    /// Insert after this rule index
    #[arg(long)]
    pub insert_after: Option<u32>,

    /// Policy section
    #[arg(long, value_enum)]
    pub section: Option<SectionArg>,

    // ── Match criteria (repeatable) ──
    #[arg(long = "source-zone", value_name = "NAME")]
    pub source_zones: Vec<String>,

    #[arg(long = "destination-zone", value_name = "NAME")]
    pub destination_zones: Vec<String>,

    /// Address object, network group, or FQDN object
    #[arg(long = "source-network", value_name = "NAME")]
    pub source_networks: Vec<String>,

    /// Address object, network group, or FQDN object
    #[arg(long = "destination-network", value_name = "NAME")]
    pub destination_networks: Vec<String>,

    /// Inline host, prefix, or range
    #[arg(long = "source-literal", value_name = "ADDR")]
    pub source_literals: Vec<String>,

    /// Inline host, prefix, or range
    #[arg(long = "destination-literal", value_name = "ADDR")]
    pub destination_literals: Vec<String>,

    /// Protocol-port object or port group
    #[arg(long = "source-port", value_name = "NAME")]
    pub source_ports: Vec<String>,

    /// Protocol-port object or port group
    #[arg(long = "destination-port", value_name = "NAME")]
    pub destination_ports: Vec<String>,

    #[arg(long = "vlan-tag", value_name = "NAME")]
    pub vlan_tags: Vec<String>,

    /// URL object or URL group
    #[arg(long = "url", value_name = "NAME")]
    pub urls: Vec<String>,

    #[arg(long = "application", value_name = "NAME")]
    pub applications: Vec<String>,

    // ── Policies ──
    #[arg(long, value_name = "NAME")]
    pub intrusion_policy: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub variable_set: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub file_policy: Option<String>,

    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    Mandatory,
    Default,
}

impl From<SectionArg> for RuleSection {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Mandatory => Self::Mandatory,
            SectionArg::Default => Self::Default,
        }
    }
}

// ── NAT rules ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NatRuleArgs {
    #[command(subcommand)]
    pub command: NatRuleCommand,
}

#[derive(Debug, Subcommand)]
pub enum NatRuleCommand {
    /// Create an automatic NAT rule
    Create(Box<NatRuleCreateArgs>),
}

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct NatRuleCreateArgs {
    #[command(flatten)]
    pub parent: ParentArgs,

    /// Address object translated from
    #[arg(long, value_name = "NAME")]
    pub original_network: Option<String>,

    /// Address object translated to
    #[arg(long, value_name = "NAME")]
    pub translated_network: Option<String>,

    /// Translate to the destination interface address
    #[arg(long)]
    pub interface_in_translated_network: bool,

    /// Exempt an address object from translation (static, onto itself)
    #[arg(
        long,
        value_name = "NAME",
        conflicts_with_all = ["original_network", "translated_network", "pat_pool"]
    )]
    pub identity: Option<String>,

    #[arg(long, value_enum)]
    pub nat_type: Option<NatTypeArg>,

    #[arg(long, value_name = "NAME")]
    pub source_interface: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub destination_interface: Option<String>,

    #[arg(long)]
    pub original_port: Option<u16>,

    #[arg(long)]
    pub translated_port: Option<u16>,

    #[arg(long, value_enum)]
    pub protocol: Option<ProtocolArg>,

    #[arg(long)]
    pub dns: bool,

    #[arg(long)]
    pub route_lookup: bool,

    #[arg(long)]
    pub no_proxy_arp: bool,

    #[arg(long)]
    pub net_to_net: bool,

    #[arg(long)]
    pub fall_through: bool,

    #[arg(long)]
    pub interface_ipv6: bool,

    // ── PAT ──
    /// Address object or network group used as the PAT pool
    #[arg(long, value_name = "NAME")]
    pub pat_pool: Option<String>,

    #[arg(long, requires = "pat_pool")]
    pub pat_interface: bool,

    #[arg(long, requires = "pat_pool")]
    pub pat_include_reserve: bool,

    /// Disable round-robin allocation (on by default)
    #[arg(long, requires = "pat_pool")]
    pub pat_no_round_robin: bool,

    #[arg(long, requires = "pat_pool")]
    pub pat_extended: bool,

    #[arg(long, requires = "pat_pool")]
    pub pat_flat_port_range: bool,

    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NatTypeArg {
    Static,
    Dynamic,
}

impl From<NatTypeArg> for NatType {
    fn from(arg: NatTypeArg) -> Self {
        match arg {
            NatTypeArg::Static => Self::Static,
            NatTypeArg::Dynamic => Self::Dynamic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProtocolArg {
    Tcp,
    Udp,
}

impl From<ProtocolArg> for ServiceProtocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Tcp => Self::Tcp,
            ProtocolArg::Udp => Self::Udp,
        }
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Print the effective configuration (passwords hidden)
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }
}
