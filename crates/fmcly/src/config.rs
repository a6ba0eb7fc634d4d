//! Connection settings for the CLI: the selected profile from the config
//! file, with command-line flags layered on top.

use fmcly_config::{Config, Profile};
use fmcly_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = fmcly_config::load_config()?;
    let (name, profile) = select_profile(&cfg, global)?;
    let profile = apply_overrides(profile, global);
    Ok(fmcly_config::profile_to_controller_config(
        &profile,
        &name,
        &cfg.defaults,
    )?)
}

/// The named profile, the default profile, or (with neither on disk) a
/// profile assembled from `--controller` / `--username` alone.
fn select_profile(cfg: &Config, global: &GlobalOpts) -> Result<(String, Profile), CliError> {
    match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => return Ok((name.to_owned(), profile.clone())),
        Err(_) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: global.profile.clone().unwrap_or_default(),
                available: available_profiles(cfg),
            });
        }
        Err(_) => {}
    }

    let controller = global.controller.clone().ok_or_else(|| CliError::NoConfig {
        path: fmcly_config::config_path().display().to_string(),
    })?;
    tracing::debug!("no profile on disk, using command-line connection flags");
    Ok((
        "cli".into(),
        Profile {
            controller,
            username: None,
            password: None,
            password_env: None,
            domain: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        },
    ))
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(controller) = &global.controller {
        profile.controller.clone_from(controller);
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if global.domain.is_some() {
        profile.domain.clone_from(&global.domain);
    }
    if global.insecure {
        profile.insecure = Some(true);
        profile.ca_cert = None;
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    profile
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["fmcly"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn lab_config() -> Config {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "lab".to_owned(),
            Profile {
                controller: "https://fmc.lab".into(),
                username: Some("api".into()),
                password: None,
                password_env: None,
                domain: Some("Global/Lab".into()),
                ca_cert: Some("/etc/ca.pem".into()),
                insecure: None,
                timeout: None,
            },
        );
        Config {
            default_profile: Some("lab".into()),
            profiles,
            ..Config::default()
        }
    }

    #[test]
    fn flags_override_profile_fields() {
        let cfg = lab_config();
        let opts = global(&["--domain", "Global/Other", "-k", "--timeout", "5"]);
        let (name, profile) = select_profile(&cfg, &opts).unwrap();
        let profile = apply_overrides(profile, &opts);

        assert_eq!(name, "lab");
        assert_eq!(profile.domain.as_deref(), Some("Global/Other"));
        assert_eq!(profile.username.as_deref(), Some("api"));
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.ca_cert, None);
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn unknown_named_profile_is_an_error() {
        let cfg = lab_config();
        let err = select_profile(&cfg, &global(&["--profile", "prod"])).unwrap_err();
        assert!(matches!(
            err,
            CliError::ProfileNotFound { ref available, .. } if available == "lab"
        ));
    }

    #[test]
    fn flags_alone_need_a_controller() {
        let cfg = Config::default();
        assert!(matches!(
            select_profile(&cfg, &global(&[])),
            Err(CliError::NoConfig { .. })
        ));

        let (name, profile) =
            select_profile(&cfg, &global(&["--controller", "https://fmc.example"])).unwrap();
        assert_eq!(name, "cli");
        assert_eq!(profile.controller, "https://fmc.example");
    }
}
