//! # Scan Command
//!
//! Uploads a source archive (unless a project with the archive's name already
//! exists), waits for the scan to finish and prints the issues as JSON with
//! their issue type and file resolved.
//!
//! ## Usage
//!
//! ```bash
//! rips scan --username alice shop.zip
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use crate::api::{ApiClient, ApiError, Issue, Params, PollOptions, Project, record, records};
use crate::commands::{LoginArgs, connect};
use crate::errors::{display_error, display_info, display_success, report_api_error};
use crate::exit_codes::*;

/// Arguments for the scan command
#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub login: LoginArgs,
    /// Source code archive to upload
    pub archive: PathBuf,
    /// Give up waiting after this many seconds
    pub max_wait: Option<u64>,
    /// Seconds between status polls
    pub interval: u64,
}

/// Execute the scan command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - Scan finished and issues were printed
/// * `Ok(EXIT_AUTH_ERROR)` / `Ok(EXIT_NETWORK_ERROR)` - Login failed
/// * `Ok(EXIT_SCAN_TIMEOUT)` - Scan did not finish within `--max-wait`
/// * `Err(_)` - Issues could not be printed
pub async fn execute(args: ScanArgs) -> Result<i32> {
    if !args.archive.is_file() {
        display_error(&format!("Archive not found: {}", args.archive.display()));
        return Ok(EXIT_INVALID_INPUT);
    }
    let Some(name) = project_name(&args.archive) else {
        display_error(&format!(
            "Cannot derive a project name from {}",
            args.archive.display()
        ));
        return Ok(EXIT_INVALID_INPUT);
    };

    let mut client = match connect(&args.login).await {
        Ok(client) => client,
        Err(exit_code) => return Ok(exit_code),
    };

    let exit_code = match run_scan(&client, &args, &name).await {
        Ok(issues) => {
            let output =
                serde_json::to_string_pretty(&issues).context("Failed to serialize issues")?;
            println!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => report_api_error(&e),
    };

    if let Err(e) = client.logout().await {
        debug!("Ignoring logout failure: {}", e);
    }

    Ok(exit_code)
}

async fn run_scan(client: &ApiClient, args: &ScanArgs, name: &str) -> Result<Vec<Value>, ApiError> {
    let project = match find_project_by_name(client, name).await? {
        Some(project) => {
            display_info("Project already existing");
            project
        }
        None => {
            display_info("Uploading project");
            let data = Params::new()
                .with("name", name)
                .with_file("source", &args.archive);
            let project: Project = record(client.add_project(data).await?)?;
            display_success("Upload complete");
            project
        }
    };

    display_info(&format!(
        "Waiting for the scan of project {} to finish",
        project.project_id
    ));
    client
        .block_until_finished_or_cancelled(project.project_id, &poll_options(args), ctrl_c())
        .await?;
    display_success("Scan finished");

    let issues: Vec<Issue> = records(client.get_project_issues(project.project_id, None).await?)?;
    dereference_issues(client, project.project_id, issues).await
}

/// Resolves once the user presses Ctrl+C.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: never cancel.
        std::future::pending::<()>().await;
    }
}

fn project_name(archive: &Path) -> Option<String> {
    archive
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

fn poll_options(args: &ScanArgs) -> PollOptions {
    let options = PollOptions::new().interval(Duration::from_secs(args.interval));
    match args.max_wait {
        Some(secs) => options.max_wait(Duration::from_secs(secs)),
        None => options,
    }
}

/// First project of the current user named `name`.
pub(crate) async fn find_project_by_name(
    client: &ApiClient,
    name: &str,
) -> Result<Option<Project>, ApiError> {
    let projects: Vec<Project> = records(client.get_projects(None).await?)?;
    Ok(projects
        .into_iter()
        .find(|project| project.name.as_deref() == Some(name)))
}

/// Replace the numeric type and file references of each issue by the
/// referenced records (`type` and `file` keys).
pub(crate) async fn dereference_issues(
    client: &ApiClient,
    project_id: u64,
    issues: Vec<Issue>,
) -> Result<Vec<Value>, ApiError> {
    let mut types: HashMap<u64, Value> = HashMap::new();
    let mut files: HashMap<u64, Value> = HashMap::new();
    let mut resolved = Vec::with_capacity(issues.len());

    for mut issue in issues {
        if let Some(type_id) = issue.type_id {
            let issue_type = match types.get(&type_id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = client.get_issue_type(type_id).await?;
                    types.insert(type_id, fetched.clone());
                    fetched
                }
            };
            issue.extra.insert("type".to_string(), issue_type);
        }

        if let Some(file_id) = issue.file_id {
            let file = match files.get(&file_id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = client.get_project_filename(project_id, file_id).await?;
                    files.insert(file_id, fetched.clone());
                    fetched
                }
            };
            issue.extra.insert("file".to_string(), file);
        }

        resolved.push(serde_json::to_value(&issue).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })?);
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scan_args(max_wait: Option<u64>) -> ScanArgs {
        ScanArgs {
            login: LoginArgs::default(),
            archive: PathBuf::from("shop.zip"),
            max_wait,
            interval: 5,
        }
    }

    #[test]
    fn test_project_name_from_archive() {
        assert_eq!(project_name(Path::new("/tmp/shop.zip")).as_deref(), Some("shop"));
        assert_eq!(project_name(Path::new("release-1.2.tar")).as_deref(), Some("release-1.2"));
        assert_eq!(project_name(Path::new("/")), None);
    }

    #[test]
    fn test_poll_options_from_args() {
        let options = poll_options(&scan_args(None));
        assert_eq!(options.interval, Duration::from_secs(5));
        assert!(options.max_wait.is_none());

        let options = poll_options(&scan_args(Some(600)));
        assert_eq!(options.max_wait, Some(Duration::from_secs(600)));
    }

    #[tokio::test]
    async fn test_find_project_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"projectId": 1, "name": "blog"},
                {"projectId": 2, "name": "shop"}
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let project = find_project_by_name(&client, "shop").await.unwrap().unwrap();
        assert_eq!(project.project_id, 2);
        assert!(find_project_by_name(&client, "wiki").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dereference_issues_fetches_each_type_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/type/12/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 12, "name": "XSS"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/project/2/filename/5/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "index.php"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let issues: Vec<Issue> = records(json!([
            {"id": 1, "typeId": 12, "fileId": 5},
            {"id": 2, "typeId": 12, "fileId": 5}
        ]))
        .unwrap();

        let resolved = dereference_issues(&client, 2, issues).await.unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0]["type"]["name"], "XSS");
        assert_eq!(resolved[1]["file"]["name"], "index.php");
        assert_eq!(resolved[1]["typeId"], 12);
    }
}
