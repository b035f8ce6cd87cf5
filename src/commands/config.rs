use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;

/// Configuration keys settable from the command line
enum ConfigKey {
    Refresh,
    Timeout,
}

impl ConfigKey {
    fn name(&self) -> &'static str {
        match self {
            ConfigKey::Refresh => "Refresh rate",
            ConfigKey::Timeout => "Round timeout",
        }
    }

    fn set(&self, config: &mut Config, millis: u64) -> Result<()> {
        match self {
            ConfigKey::Refresh => config.set_refresh_ms(millis),
            ConfigKey::Timeout => {
                // Zero clears the deadline
                config.timeout_ms = (millis > 0).then_some(millis);
                Ok(())
            }
        }
    }

    fn get(&self, config: &Config) -> Option<u64> {
        match self {
            ConfigKey::Refresh => Some(config.refresh_ms),
            ConfigKey::Timeout => config.timeout_ms,
        }
    }
}

pub fn handle_set(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("refresh", sub_matches)) => set_millis_for_key(sub_matches, ConfigKey::Refresh),
        Some(("timeout", sub_matches)) => set_millis_for_key(sub_matches, ConfigKey::Timeout),
        _ => {
            println!("Use 'grofer set --help' for more information.");
            Ok(())
        }
    }
}

fn set_millis_for_key(matches: &clap::ArgMatches, key: ConfigKey) -> Result<()> {
    let millis = matches
        .get_one::<u64>("millis")
        .copied()
        .context("Milliseconds argument is required")?;

    let mut config = Config::load()?;
    key.set(&mut config, millis)?;
    config.save()?;

    match key.get(&config) {
        Some(value) => println!(
            "{} {} ms",
            format!("✓ {} set to:", key.name()).green(),
            value
        ),
        None => println!("{}", format!("✓ {} cleared", key.name()).green()),
    }

    Ok(())
}

pub fn handle_get(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("refresh", _)) => get_millis_for_key(ConfigKey::Refresh),
        Some(("timeout", _)) => get_millis_for_key(ConfigKey::Timeout),
        _ => {
            println!("Use 'grofer get --help' for more information.");
            Ok(())
        }
    }
}

fn get_millis_for_key(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;

    match key.get(&config) {
        Some(value) => {
            println!("{}", format!("{}:", key.name()).white());
            println!("{}", format!("{} ms", value).cyan().bold());
        }
        None => {
            println!("{}", format!("{} is not set", key.name()).yellow());
        }
    }

    Ok(())
}
