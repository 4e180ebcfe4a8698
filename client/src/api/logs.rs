//! # Logs & Statistics API
//!
//! Error, info and scan logs plus global statistics. Log collections accept
//! the usual filters for both reading and deleting.

use serde_json::Value;

use crate::api::client::{ApiClient, ApiError};
use crate::api::params::Params;

/// Log collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Errors,
    Infos,
    Scans,
}

impl LogKind {
    fn path(&self) -> &'static str {
        match self {
            LogKind::Errors => "/logs/errors/",
            LogKind::Infos => "/logs/infos/",
            LogKind::Scans => "/logs/scans/",
        }
    }
}

impl ApiClient {
    pub async fn get_logs(&self, kind: LogKind, filters: Option<&Params>) -> Result<Value, ApiError> {
        self.get(kind.path(), filters).await
    }

    pub async fn delete_logs(
        &self,
        kind: LogKind,
        filters: Option<&Params>,
    ) -> Result<Value, ApiError> {
        self.delete(kind.path(), filters).await
    }

    pub async fn get_error_logs(&self, filters: Option<&Params>) -> Result<Value, ApiError> {
        self.get_logs(LogKind::Errors, filters).await
    }

    pub async fn get_info_logs(&self, filters: Option<&Params>) -> Result<Value, ApiError> {
        self.get_logs(LogKind::Infos, filters).await
    }

    pub async fn get_scan_logs(&self, filters: Option<&Params>) -> Result<Value, ApiError> {
        self.get_logs(LogKind::Scans, filters).await
    }

    pub async fn get_stats(&self) -> Result<Value, ApiError> {
        self.get("/stats/", None).await
    }
}
