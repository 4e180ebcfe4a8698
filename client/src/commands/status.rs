//! # Status Command
//!
//! Checks the configuration, API connectivity and, when a password is
//! available, the login of the configured user.
//!
//! ## Usage
//!
//! ```bash
//! rips status
//! RIPS_PASSWORD=secret rips status --username alice
//! ```

use anyhow::Result;
use colored::Colorize;
use log::debug;
use serde_json::Value;

use crate::api::{ApiError, Credentials};
use crate::commands::LoginArgs;
use crate::config::Config;
use crate::errors::exit_code_for;
use crate::exit_codes::*;

/// Execute the status command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - Server reachable (and login accepted, if attempted)
/// * `Ok(EXIT_CONFIG_ERROR)` - Configuration file is invalid
/// * `Ok(EXIT_NETWORK_ERROR)` - Cannot reach the API
/// * `Ok(EXIT_AUTH_ERROR)` - Username or password rejected
pub async fn execute(args: LoginArgs) -> Result<i32> {
    println!("{}", "RIPS CLI Status".bold());
    println!("{}", "─".repeat(40).dimmed());
    println!();

    let config = if Config::exists() {
        match Config::load() {
            Ok(config) => {
                println!(
                    "{} Configuration: {}",
                    "✓".bright_green().bold(),
                    "Found".green()
                );
                config
            }
            Err(e) => {
                println!("{} Configuration: {}", "✗".red().bold(), "Invalid".red());
                println!("  {} {}", "Error:".dimmed(), format!("{:#}", e).dimmed());
                return Ok(EXIT_CONFIG_ERROR);
            }
        }
    } else {
        println!(
            "{} Configuration: {}",
            "ℹ".blue(),
            "Not found, using defaults".dimmed()
        );
        Config::default()
    };

    let api_url = config.base_url();
    println!();
    println!("{} API Endpoint: {}", "ℹ".blue(), api_url.cyan());

    let mut client = match config.client_builder().build() {
        Ok(client) => client,
        Err(e) => {
            println!("{} Client: {}", "✗".red().bold(), e.to_string().red());
            return Ok(exit_code_for(&e));
        }
    };

    match client.get_version().await {
        Ok(version) => {
            println!(
                "{} API Status: {} {}",
                "✓".bright_green().bold(),
                "Reachable".green(),
                describe(&version).dimmed()
            );
        }
        Err(e) => {
            println!("{} API Status: {}", "✗".red().bold(), "Unreachable".red());
            println!("  {} {}", "Error:".dimmed(), e.to_string().dimmed());
            println!();
            println!("{}", "Possible causes:".yellow());
            println!("  • No internet connection");
            println!("  • API server address is wrong");
            println!("  • TLS certificate of the server is not trusted");
            return Ok(exit_code_for(&e));
        }
    }

    let username = args.username.or_else(|| config.username.clone());
    println!();
    let (Some(username), Some(password)) = (username, args.password) else {
        println!(
            "{} Authentication: {}",
            "ℹ".blue(),
            "Skipped (no username or password)".dimmed()
        );
        return Ok(EXIT_SUCCESS);
    };

    if let Err(e) = client.login(Credentials::new(username.clone(), password)).await {
        print_login_failure(&username, &e);
        return Ok(exit_code_for(&e));
    }
    println!(
        "{} Authentication: {} as {}",
        "✓".bright_green().bold(),
        "Logged in".green(),
        username.cyan()
    );

    match client.get_status().await {
        Ok(status) => println!("  {} {}", "Status:".dimmed(), describe(&status)),
        Err(e) => println!("  {} {}", "Status:".dimmed(), e.to_string().yellow()),
    }

    if let Err(e) = client.logout().await {
        debug!("Ignoring logout failure: {}", e);
    }

    Ok(EXIT_SUCCESS)
}

fn print_login_failure(username: &str, error: &ApiError) {
    println!(
        "{} Authentication: {} as {}",
        "✗".red().bold(),
        "Failed".red(),
        username
    );
    println!("  {} {}", "Error:".dimmed(), error.to_string().dimmed());
}

/// Single-line rendering of a JSON payload.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
