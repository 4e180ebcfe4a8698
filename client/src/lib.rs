//! # RIPS API Client Library
//!
//! Asynchronous client for the RIPS static analysis REST API, plus the
//! command implementations behind the `rips` CLI.
//!
//! ## Modules
//!
//! - [`api`] - HTTP client, session handling and resource endpoints
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration management
//! - [`errors`] - Error display and exit code mapping
//! - [`exit_codes`] - Standard exit codes
//!
//! ## Example
//!
//! ```rust,no_run
//! use rips_api::api::{ApiClient, Credentials, Params, PollOptions};
//!
//! # async fn run() -> Result<(), rips_api::ApiError> {
//! let mut client = ApiClient::new("https://api-1.ripstech.com")?;
//! client.login(Credentials::new("alice", "secret")).await?;
//!
//! let project = client
//!     .add_project(Params::new().with("name", "shop").with("source", "shop.zip"))
//!     .await?;
//! let project_id = project["projectId"].as_u64().unwrap_or_default();
//! client.block_until_finished(project_id, &PollOptions::new()).await?;
//! let issues = client.get_project_issues(project_id, None).await?;
//! # let _ = issues;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod errors;
pub mod exit_codes;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, Credentials, Params};
pub use config::Config;
