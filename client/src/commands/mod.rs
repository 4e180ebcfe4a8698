//! # CLI Command Implementations
//!
//! ## Available Commands
//!
//! - [`scan`] - Upload an archive, wait for the scan and print its issues
//! - [`status`] - Check server connectivity and the session
//! - [`report`] - Download the PDF report of a project
//! - [`config`] - Show and change CLI configuration

pub mod config;
pub mod report;
pub mod scan;
pub mod status;

use log::debug;

use crate::api::{ApiClient, Credentials};
use crate::config::Config;
use crate::errors::{display_config_error, display_info, report_api_error};
use crate::exit_codes::*;

/// Login options shared by the commands that need a session.
#[derive(Debug, Clone, Default)]
pub struct LoginArgs {
    /// Username; falls back to the configured one
    pub username: Option<String>,
    /// Password, from `--password` or `RIPS_PASSWORD`
    pub password: Option<String>,
}

/// Build a client from the configuration and log in.
///
/// On failure the diagnostic has already been printed and the exit code is
/// returned as the error.
pub(crate) async fn connect(args: &LoginArgs) -> Result<ApiClient, i32> {
    let config = Config::load_or_default().map_err(|e| {
        display_config_error(&format!("{:#}", e));
        EXIT_CONFIG_ERROR
    })?;

    let Some(username) = args.username.clone().or_else(|| config.username.clone()) else {
        display_config_error("No username given; pass --username or run `rips config set --username`");
        return Err(EXIT_CONFIG_ERROR);
    };
    let Some(password) = args.password.clone() else {
        display_config_error("No password given; pass --password or set RIPS_PASSWORD");
        return Err(EXIT_CONFIG_ERROR);
    };

    let mut client = config
        .client_builder()
        .build()
        .map_err(|e| report_api_error(&e))?;

    debug!("Connecting to {}", client.base_url);
    client
        .login(Credentials::new(username, password))
        .await
        .map_err(|e| report_api_error(&e))?;

    display_info(&format!("Logged in to {}", client.base_url));
    Ok(client)
}
