//! # Issues API
//!
//! Issues found in a project scan and the global issue type catalogue.

use serde_json::Value;

use crate::api::client::{ApiClient, ApiError};
use crate::api::params::Params;

impl ApiClient {
    pub async fn get_project_issues(
        &self,
        project_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issues/"), filters)
            .await
    }

    pub async fn delete_project_issues(
        &self,
        project_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.delete(&format!("/project/{project_id}/issues/"), filters)
            .await
    }

    pub async fn get_project_issue(&self, project_id: u64, issue_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issue/{issue_id}/"), None)
            .await
    }

    pub async fn update_project_issue(
        &self,
        project_id: u64,
        issue_id: u64,
        data: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.post(&format!("/project/{project_id}/issue/{issue_id}/"), data)
            .await
    }

    pub async fn delete_project_issue(
        &self,
        project_id: u64,
        issue_id: u64,
    ) -> Result<Value, ApiError> {
        self.delete(&format!("/project/{project_id}/issue/{issue_id}/"), None)
            .await
    }

    // Per-issue details

    pub async fn get_project_issue_comments(
        &self,
        project_id: u64,
        issue_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/project/{project_id}/issue/{issue_id}/comments/"),
            filters,
        )
        .await
    }

    pub async fn get_project_issue_lines(
        &self,
        project_id: u64,
        issue_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issue/{issue_id}/lines/"), filters)
            .await
    }

    pub async fn get_project_issue_strings(
        &self,
        project_id: u64,
        issue_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/project/{project_id}/issue/{issue_id}/strings/"),
            filters,
        )
        .await
    }

    // Details across all issues of a project

    pub async fn get_project_issues_comments(
        &self,
        project_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issues/comments/"), filters)
            .await
    }

    pub async fn get_project_issues_comment(
        &self,
        project_id: u64,
        comment_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/project/{project_id}/issues/comment/{comment_id}/"),
            None,
        )
        .await
    }

    pub async fn get_project_issues_lines(
        &self,
        project_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issues/lines/"), filters)
            .await
    }

    pub async fn get_project_issues_line(
        &self,
        project_id: u64,
        line_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issues/line/{line_id}/"), None)
            .await
    }

    pub async fn get_project_issues_strings(
        &self,
        project_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issues/strings/"), filters)
            .await
    }

    pub async fn get_project_issues_string(
        &self,
        project_id: u64,
        string_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/project/{project_id}/issues/string/{string_id}/"),
            None,
        )
        .await
    }

    // Groupings

    /// Issues of a project grouped by issue type id.
    pub async fn get_project_issues_by_types(&self, project_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issues/by/types/"), None)
            .await
    }

    pub async fn get_project_issues_by_type(
        &self,
        project_id: u64,
        type_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/project/{project_id}/issues/by/type/{type_id}/"),
            None,
        )
        .await
    }

    /// Issues of a project grouped by filename id.
    pub async fn get_project_issues_by_filenames(
        &self,
        project_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/issues/by/filenames/"), None)
            .await
    }

    pub async fn get_project_issues_by_filename(
        &self,
        project_id: u64,
        filename_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/project/{project_id}/issues/by/filename/{filename_id}/"),
            None,
        )
        .await
    }

    // Issue types

    pub async fn get_issue_types(&self) -> Result<Value, ApiError> {
        self.get("/issues/types/", None).await
    }

    pub async fn get_issue_type(&self, type_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/issues/type/{type_id}/"), None).await
    }
}
