//! # Error Handling
//!
//! User-friendly error display for the `rips` CLI, and the mapping from
//! [`ApiError`] to exit codes.

use colored::Colorize;

use crate::api::ApiError;
use crate::exit_codes::*;

/// Display a network error with helpful suggestions
pub fn display_network_error(message: &str) {
    eprintln!("{} Could not connect: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • No internet connection");
    eprintln!("  • API server address is wrong");
    eprintln!("  • TLS certificate of the server is not trusted");
    eprintln!();
    eprintln!(
        "{} Check `rips config show` and try again.",
        "Tip:".cyan().bold()
    );
}

/// Display an authentication error with helpful suggestions
pub fn display_auth_error(message: &str) {
    eprintln!("{} Invalid login: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!("{}", "Possible causes:".yellow());
    eprintln!("  • Wrong username or password");
    eprintln!("  • Session has expired");
    eprintln!();
    eprintln!(
        "{} Pass --password or set RIPS_PASSWORD.",
        "Tip:".cyan().bold()
    );
}

/// Display a configuration error with helpful suggestions
pub fn display_config_error(message: &str) {
    eprintln!("{} Configuration error: {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!(
        "{} Run `rips config set --help` to see available settings.",
        "Tip:".cyan().bold()
    );
}

/// Display a scan timeout
pub fn display_timeout_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
    eprintln!();
    eprintln!(
        "{} The scan keeps running on the server; run the command again later or raise --max-wait.",
        "Tip:".cyan().bold()
    );
}

/// Display a generic error
pub fn display_error(message: &str) {
    eprintln!("{} Error: {}", "✗".red().bold(), message);
}

/// Display a warning
pub fn display_warning(message: &str) {
    eprintln!("{} Warning: {}", "⚠".yellow().bold(), message);
}

/// Display a success message
pub fn display_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Display an info message
pub fn display_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Exit code for an API error.
pub fn exit_code_for(error: &ApiError) -> i32 {
    match error {
        ApiError::NotAuthorized { .. } => EXIT_AUTH_ERROR,
        ApiError::Transport { .. } => EXIT_NETWORK_ERROR,
        ApiError::NotFound { .. } => EXIT_NOT_FOUND,
        ApiError::BadRequest { .. } | ApiError::Upload { .. } => EXIT_INVALID_INPUT,
        ApiError::Server { .. } | ApiError::UnexpectedStatus { .. } => EXIT_SERVICE_UNAVAILABLE,
        ApiError::Configuration { .. } => EXIT_CONFIG_ERROR,
        ApiError::Timeout { .. } => EXIT_SCAN_TIMEOUT,
        ApiError::Cancelled { .. } => EXIT_CANCELLED,
        ApiError::Decode { .. } => EXIT_ERROR,
    }
}

/// Display an API error and return the matching exit code.
pub fn report_api_error(error: &ApiError) -> i32 {
    match error {
        ApiError::NotAuthorized { .. } => display_auth_error(&error.to_string()),
        ApiError::Transport { message } => display_network_error(message),
        ApiError::Configuration { message } => display_config_error(message),
        ApiError::Timeout { .. } => display_timeout_error(&error.to_string()),
        ApiError::Cancelled { .. } => display_warning(&error.to_string()),
        _ => display_error(&error.to_string()),
    }
    exit_code_for(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_display_functions_do_not_panic() {
        display_network_error("Connection refused");
        display_auth_error("Wrong password");
        display_config_error("Config file not found");
        display_timeout_error("Scan did not finish in time");
        display_error("Something went wrong");
        display_warning("This might cause issues");
        display_success("Operation completed");
        display_info("Uploading project");
    }

    #[test]
    fn test_exit_codes_for_login_and_connection_failures() {
        let auth = ApiError::NotAuthorized {
            message: String::new(),
        };
        let network = ApiError::Transport {
            message: "dns error".to_string(),
        };
        assert_eq!(exit_code_for(&auth), EXIT_AUTH_ERROR);
        assert_eq!(exit_code_for(&network), EXIT_NETWORK_ERROR);
        assert_ne!(report_api_error(&auth), EXIT_SUCCESS);
    }

    #[test]
    fn test_exit_code_for_timeout() {
        let timeout = ApiError::Timeout {
            project_id: 3,
            max_wait: Duration::from_secs(5),
        };
        assert_eq!(exit_code_for(&timeout), EXIT_SCAN_TIMEOUT);
    }
}
