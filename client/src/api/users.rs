//! # Users API

use serde_json::Value;

use crate::api::client::{ApiClient, ApiError};
use crate::api::params::Params;

impl ApiClient {
    pub async fn get_users(&self, filters: Option<&Params>) -> Result<Value, ApiError> {
        self.get("/users/", filters).await
    }

    pub async fn add_user(&self, data: &Params) -> Result<Value, ApiError> {
        self.post("/user/", Some(data)).await
    }

    pub async fn get_user(&self, user_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/user/{user_id}/"), None).await
    }

    pub async fn update_user(&self, user_id: u64, data: Option<&Params>) -> Result<Value, ApiError> {
        self.post(&format!("/user/{user_id}/"), data).await
    }

    pub async fn delete_user(&self, user_id: u64) -> Result<Value, ApiError> {
        self.delete(&format!("/user/{user_id}/"), None).await
    }

    /// Ask the server to send a user one of its e-mails (e.g. `activation`).
    pub async fn send_user_email(&self, user_id: u64, email_type: &str) -> Result<Value, ApiError> {
        let email_type = urlencoding::encode(email_type);
        self.post(&format!("/user/{user_id}/email/{email_type}/"), None)
            .await
    }
}
