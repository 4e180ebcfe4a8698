//! # Report Command
//!
//! Downloads the PDF report of a project.
//!
//! ## Usage
//!
//! ```bash
//! rips report 42 --output shop.pdf
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;

use crate::commands::{LoginArgs, connect};
use crate::errors::{display_success, report_api_error};
use crate::exit_codes::*;

/// Arguments for the report command
#[derive(Debug, Clone)]
pub struct ReportArgs {
    pub login: LoginArgs,
    pub project_id: u64,
    /// Where to write the PDF
    pub output: PathBuf,
}

/// Execute the report command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - Report written to `output`
/// * `Ok(EXIT_NOT_FOUND)` - No such project
/// * `Err(_)` - Report could not be written
pub async fn execute(args: ReportArgs) -> Result<i32> {
    let mut client = match connect(&args.login).await {
        Ok(client) => client,
        Err(exit_code) => return Ok(exit_code),
    };

    let result = client.get_project_report(args.project_id).await;

    if let Err(e) = client.logout().await {
        debug!("Ignoring logout failure: {}", e);
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => return Ok(report_api_error(&e)),
    };

    fs::write(&args.output, &report)
        .with_context(|| format!("Failed to write report: {}", args.output.display()))?;
    display_success(&format!(
        "Report of project {} written to {} ({} bytes)",
        args.project_id,
        args.output.display(),
        report.len()
    ));

    Ok(EXIT_SUCCESS)
}
