//! # Config Command
//!
//! Shows and changes the CLI configuration.
//!
//! ## Usage
//!
//! ```bash
//! # Show current configuration
//! rips config show
//!
//! # Point the CLI at an on-premise server
//! rips config set --base-url https://rips.example.com/api --username alice
//!
//! # Keep the session cookie between invocations
//! rips config set --cookie-file ~/.cache/rips/cookies.json
//!
//! # Refuse cookies scoped to public suffixes such as `com`
//! rips config set --public-suffix-list /usr/share/publicsuffix/public_suffix_list.dat
//! ```

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::config::{Config, config_path};
use crate::exit_codes::*;

/// Arguments for the config set command
#[derive(Debug, Clone, Default)]
pub struct ConfigSetArgs {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub cookie_file: Option<PathBuf>,
    pub ca_certificate: Option<PathBuf>,
    pub public_suffix_list: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl ConfigSetArgs {
    fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.username.is_none()
            && self.cookie_file.is_none()
            && self.ca_certificate.is_none()
            && self.public_suffix_list.is_none()
            && self.timeout_secs.is_none()
    }

    /// Copy every given setting into `config`.
    fn apply(self, config: &mut Config) {
        if let Some(base_url) = self.base_url {
            config.set_base_url(base_url);
        }
        if let Some(username) = self.username {
            config.username = Some(username);
        }
        if let Some(path) = self.cookie_file {
            config.cookie_file = Some(path);
        }
        if let Some(path) = self.ca_certificate {
            config.ca_certificate = Some(path);
        }
        if let Some(path) = self.public_suffix_list {
            config.public_suffix_list = Some(path);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = Some(secs);
        }
    }
}

/// Execute the config show command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - Configuration displayed successfully
/// * `Ok(EXIT_CONFIG_ERROR)` - Configuration file is invalid
pub fn execute_show() -> Result<i32> {
    let exists = Config::exists();
    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    println!();
    println!("{}", "RIPS Configuration".bold().underline());
    println!();

    if let Ok(path) = config_path() {
        let state = if exists {
            "".normal()
        } else {
            "(not created yet)".dimmed()
        };
        println!("  {} {} {}", "File:".dimmed(), path.display(), state);
    }

    println!("  {} {}", "Base URL:".dimmed(), config.base_url());
    if config.base_url() != config.stored_base_url() {
        println!(
            "  {} {} {}",
            "Stored URL:".dimmed(),
            config.stored_base_url(),
            "(overridden by RIPS_BASE_URL)".yellow()
        );
    }
    println!("  {} {}", "Username:".dimmed(), or_unset(config.username.as_deref()));
    println!(
        "  {} {}",
        "Cookie file:".dimmed(),
        or_unset(config.cookie_file.as_ref().map(|p| p.display().to_string()).as_deref())
    );
    println!(
        "  {} {}",
        "CA certificate:".dimmed(),
        or_unset(config.ca_certificate.as_ref().map(|p| p.display().to_string()).as_deref())
    );
    println!(
        "  {} {}",
        "Public suffix list:".dimmed(),
        or_unset(config.public_suffix_list.as_ref().map(|p| p.display().to_string()).as_deref())
    );
    match config.timeout_secs {
        Some(secs) => println!("  {} {}s", "Timeout:".dimmed(), secs),
        None => println!("  {} {}", "Timeout:".dimmed(), "default".dimmed()),
    }
    println!();

    Ok(EXIT_SUCCESS)
}

/// Execute the config set command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - Configuration saved
/// * `Ok(EXIT_INVALID_INPUT)` - Nothing to set
/// * `Ok(EXIT_CONFIG_ERROR)` - Existing configuration file is invalid
pub fn execute_set(args: ConfigSetArgs) -> Result<i32> {
    if args.is_empty() {
        eprintln!(
            "{} Nothing to set. Run `rips config set --help` for the available settings.",
            "Error:".red().bold()
        );
        return Ok(EXIT_INVALID_INPUT);
    }

    let mut config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    args.apply(&mut config);
    config.save()?;

    println!("{} Configuration saved.", "✓".green().bold());
    Ok(EXIT_SUCCESS)
}

fn or_unset(value: Option<&str>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "not set".dimmed().to_string(),
    }
}
