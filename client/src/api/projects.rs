//! # Projects API
//!
//! Projects, their scan status, files, functions and the PDF report.
//!
//! ## Endpoints
//!
//! - `GET|DELETE /projects/`, `GET /projects/by/status/`
//! - `POST /project/` - create a project, optionally uploading a source archive
//! - `GET|POST|DELETE /project/{id}/`
//! - `GET /project/{id}/status/`, `/trend/`, `/report/`
//! - `GET /project/{id}/filenames/`, `/filename/{fid}/`
//! - `GET /project/{id}/functions/`, `/function/{fid}/`

use serde_json::Value;

use crate::api::client::{ApiClient, ApiError};
use crate::api::params::Params;
use crate::api::types::ScanStatus;

impl ApiClient {
    /// Projects of the current user.
    pub async fn get_projects(&self, filters: Option<&Params>) -> Result<Value, ApiError> {
        self.get("/projects/", filters).await
    }

    /// Projects of the current user grouped by status.
    pub async fn get_projects_by_status(&self) -> Result<Value, ApiError> {
        self.get("/projects/by/status/", None).await
    }

    /// Delete all projects matching `filters`.
    pub async fn delete_projects(&self, filters: Option<&Params>) -> Result<Value, ApiError> {
        self.delete("/projects/", filters).await
    }

    /// Create a project.
    ///
    /// A `source` entry given as a text path is uploaded as the source archive.
    ///
    /// ```rust,no_run
    /// # use rips_api::api::{ApiClient, Params};
    /// # async fn example(client: &ApiClient) -> Result<(), rips_api::api::ApiError> {
    /// let data = Params::new().with("name", "shop").with("source", "shop.zip");
    /// let project = client.add_project(data).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn add_project(&self, mut data: Params) -> Result<Value, ApiError> {
        data.mark_file("source");
        self.post("/project/", Some(&data)).await
    }

    pub async fn get_project(&self, project_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/"), None).await
    }

    pub async fn update_project(
        &self,
        project_id: u64,
        data: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.post(&format!("/project/{project_id}/"), data).await
    }

    pub async fn delete_project(&self, project_id: u64) -> Result<Value, ApiError> {
        self.delete(&format!("/project/{project_id}/"), None).await
    }

    /// Scan progress of a project.
    pub async fn get_project_status(&self, project_id: u64) -> Result<ScanStatus, ApiError> {
        self.get_typed(&format!("/project/{project_id}/status/")).await
    }

    /// Issue trend across the scans of a project.
    pub async fn get_project_trend(&self, project_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/trend/"), None).await
    }

    /// PDF report of a project, as raw bytes.
    pub async fn get_project_report(&self, project_id: u64) -> Result<Vec<u8>, ApiError> {
        self.get_raw(&format!("/project/{project_id}/report/")).await
    }

    pub async fn get_project_filenames(
        &self,
        project_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/filenames/"), filters)
            .await
    }

    pub async fn get_project_filename(
        &self,
        project_id: u64,
        filename_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/filename/{filename_id}/"), None)
            .await
    }

    pub async fn get_project_functions(
        &self,
        project_id: u64,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/functions/"), filters)
            .await
    }

    pub async fn get_project_function(
        &self,
        project_id: u64,
        function_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(&format!("/project/{project_id}/function/{function_id}/"), None)
            .await
    }
}
