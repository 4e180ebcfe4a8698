//! # API Client Core
//!
//! This module contains the `ApiClient` structure and the request pipeline that
//! every resource accessor goes through: parameter encoding, cookie persistence,
//! response decoding and mapping of HTTP status codes to [`ApiError`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Certificate, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::api::cookies::CookieJar;
use crate::api::params::Params;
use crate::api::session::{Credentials, SessionState};

/// Default API server
pub const DEFAULT_BASE_URL: &str = "https://api-1.ripstech.com";

/// Version of the crate, used in the User-Agent header
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for API operations.
///
/// The first five variants mirror what the server can tell us: a transport
/// failure or one of the four HTTP statuses the API documents. The rest are
/// raised on the client side.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request parameters (400)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Value of the `message` field of the response body, or empty
        message: String,
    },

    /// No valid session cookie, or wrong credentials on login (401)
    #[error("Not authorized: {message}")]
    NotAuthorized {
        /// Value of the `message` field of the response body, or empty
        message: String,
    },

    /// The addressed resource does not exist (404)
    #[error("Not found: {message}")]
    NotFound {
        /// Value of the `message` field of the response body, or empty
        message: String,
    },

    /// The server failed to process the request (500)
    #[error("Server error: {message}")]
    Server {
        /// Value of the `message` field of the response body, or empty
        message: String,
    },

    /// Network error (connection refused, DNS, TLS, transport timeout)
    #[error("Network error: {message}")]
    Transport {
        /// Message of the underlying HTTP stack
        message: String,
    },

    /// Any status the API does not document
    #[error("Unexpected HTTP status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Value of the `message` field of the response body, or empty
        message: String,
    },

    /// A 200 response whose body is not valid JSON
    #[error("Failed to parse response: {message}")]
    Decode {
        /// Human-readable error message
        message: String,
    },

    /// A file referenced by an upload parameter could not be read
    #[error("Failed to read upload {}: {message}", .path.display())]
    Upload {
        /// Local path of the file
        path: PathBuf,
        /// Human-readable error message
        message: String,
    },

    /// The scan did not finish before the caller's deadline
    #[error("Scan of project {project_id} did not finish in time (waited {max_wait:?})")]
    Timeout {
        /// Project being polled
        project_id: u64,
        /// Deadline that was exceeded
        max_wait: Duration,
    },

    /// Waiting for a scan was cancelled by the caller
    #[error("Waiting for project {project_id} was cancelled")]
    Cancelled {
        /// Project being polled
        project_id: u64,
    },

    /// Client misconfiguration (missing credentials, unreadable CA file, ...)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message
        message: String,
    },
}

impl ApiError {
    /// Check if this is an authentication error (401).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::NotAuthorized { .. })
    }

    /// Check if this is a network error.
    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }

    /// HTTP status that produced this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest { .. } => Some(400),
            ApiError::NotAuthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { .. } => Some(500),
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message carried by the error.
    ///
    /// For HTTP errors this is exactly the `message` field of the response body,
    /// which may be empty.
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message }
            | ApiError::NotAuthorized { message }
            | ApiError::NotFound { message }
            | ApiError::Server { message }
            | ApiError::Transport { message }
            | ApiError::UnexpectedStatus { message, .. }
            | ApiError::Decode { message }
            | ApiError::Upload { message, .. }
            | ApiError::Configuration { message } => message,
            ApiError::Timeout { .. } | ApiError::Cancelled { .. } => "",
        }
    }
}

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// JSON document (an empty body decodes to `null`)
    Json(Value),
    /// Untouched bytes, e.g. a PDF report
    Raw(Vec<u8>),
}

/// A successful response together with its HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Get the JSON document, decoding raw bytes if needed.
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self.body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Raw(bytes) => decode_json(&bytes),
        }
    }

    /// Get the body as bytes, serializing a JSON document if needed.
    pub fn into_bytes(self) -> Vec<u8> {
        match self.body {
            ResponseBody::Raw(bytes) => bytes,
            ResponseBody::Json(value) => serde_json::to_vec(&value).unwrap_or_default(),
        }
    }
}

/// Transport settings applied to the underlying HTTP client.
///
/// TLS certificate verification is always enabled; `ca_certificate` only adds
/// a trusted root on top of the system store.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Total request timeout (none by default, scans can be large uploads)
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Option<Duration>,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Additional PEM root certificate, for self-hosted servers
    pub ca_certificate: Option<PathBuf>,
    /// Maximum number of redirects followed
    pub max_redirects: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Some(Duration::from_secs(30)),
            user_agent: format!("rips-api/{VERSION}"),
            ca_certificate: None,
            max_redirects: 10,
        }
    }
}

/// Builder for [`ApiClient`].
///
/// # Example
///
/// ```rust,no_run
/// use rips_api::api::ApiClient;
///
/// let client = ApiClient::builder()
///     .base_url("https://rips.example.com/api")
///     .cookie_file("/tmp/rips-cookies.json")
///     .build()
///     .expect("client");
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    options: ClientOptions,
    cookie_jar: Option<Arc<CookieJar>>,
    cookie_file: Option<PathBuf>,
    public_suffix_list: Option<PathBuf>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            options: ClientOptions::default(),
            cookie_jar: None,
            cookie_file: None,
            public_suffix_list: None,
        }
    }
}

impl ApiClientBuilder {
    /// Set the API server address.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace all transport options.
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Trust an additional PEM root certificate.
    pub fn ca_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.ca_certificate = Some(path.into());
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = user_agent.into();
        self
    }

    /// Use a caller-owned cookie jar, e.g. to share a session with other code.
    ///
    /// Takes precedence over [`cookie_file`](Self::cookie_file).
    pub fn cookie_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Back the cookie jar with a JSON file that survives the client.
    pub fn cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    /// Refuse cookies for public suffixes listed in this file
    /// (`public_suffix_list.dat` format). Ignored with [`cookie_jar`](Self::cookie_jar).
    pub fn public_suffix_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_suffix_list = Some(path.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let cookies = match self.cookie_jar {
            Some(jar) => jar,
            None => {
                let mut jar = match self.cookie_file {
                    Some(path) => CookieJar::open(path)?,
                    None => CookieJar::new(),
                };
                if let Some(ref path) = self.public_suffix_list {
                    jar = jar.with_public_suffix_list(CookieJar::load_public_suffix_list(path)?);
                }
                Arc::new(jar)
            }
        };

        let client = build_http_client(&self.options, cookies.clone())?;

        Ok(ApiClient {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            client,
            cookies,
            credentials: None,
            state: SessionState::LoggedOut,
        })
    }
}

fn build_http_client(options: &ClientOptions, cookies: Arc<CookieJar>) -> Result<Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&options.user_agent).map_err(|e| ApiError::Configuration {
            message: format!("Invalid User-Agent '{}': {}", options.user_agent, e),
        })?,
    );

    let mut builder = Client::builder()
        .default_headers(headers)
        .cookie_provider(cookies)
        .redirect(Policy::limited(options.max_redirects));

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = options.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(ref path) = options.ca_certificate {
        let pem = std::fs::read(path).map_err(|e| ApiError::Configuration {
            message: format!("Failed to read CA certificate {}: {}", path.display(), e),
        })?;
        let certificate = Certificate::from_pem(&pem).map_err(|e| ApiError::Configuration {
            message: format!("Invalid CA certificate {}: {}", path.display(), e),
        })?;
        builder = builder.add_root_certificate(certificate);
    }

    builder.build().map_err(|e| ApiError::Configuration {
        message: format!("Failed to build HTTP client: {}", e),
    })
}

/// HTTP client for the RIPS API
///
/// One client is one session: it owns the stored login credentials and sends
/// every request through the same cookie jar, so the session cookie obtained by
/// [`login`](ApiClient::login) is attached to all later calls.
///
/// # Example
///
/// ```rust,no_run
/// use rips_api::api::{ApiClient, Credentials};
///
/// # async fn example() -> Result<(), rips_api::api::ApiError> {
/// let mut client = ApiClient::new("https://api-1.ripstech.com")?;
/// client.login(Credentials::new("alice", "secret")).await?;
/// let projects = client.get_projects(None).await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    /// Base URL for the API, without trailing slash
    pub base_url: String,
    /// Underlying HTTP client
    pub client: Client,
    cookies: Arc<CookieJar>,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) state: SessionState,
}

impl ApiClient {
    /// Create a client for `base_url` with default options and an in-memory
    /// cookie jar.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().base_url(base_url).build()
    }

    /// Start building a client; the server defaults to [`DEFAULT_BASE_URL`].
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The cookie jar shared with the HTTP stack.
    pub fn cookie_jar(&self) -> &Arc<CookieJar> {
        &self.cookies
    }

    /// Absolute URL of an API path such as `/projects/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a single request.
    ///
    /// For GET and DELETE, non-empty `params` are appended as a query string.
    /// For POST they are sent as a multipart form so files can be embedded.
    /// With `raw` set, a 200 body is returned as bytes instead of being decoded
    /// as JSON.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        params: Option<&Params>,
        raw: bool,
    ) -> Result<ApiResponse, ApiError> {
        let params = params.filter(|p| !p.is_empty());

        let request = match method {
            Method::Get | Method::Delete => {
                let url = match params {
                    Some(params) => append_query(url, &params.to_query_string()),
                    None => url.to_string(),
                };
                debug!("[API] {} {}", method, url);
                if method == Method::Get {
                    self.client.get(&url)
                } else {
                    self.client.delete(&url)
                }
            }
            Method::Post => {
                debug!("[API] POST {}", url);
                let request = self.client.post(url);
                match params {
                    Some(params) => request.multipart(params.to_multipart().await?),
                    None => request.body(""),
                }
            }
        };

        let response = request.send().await.map_err(to_network_error)?;

        let status = response.status();
        debug!(
            "[API] Response status: {} ({})",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        );

        let body = response.bytes().await.map_err(to_network_error)?;
        decode_response(status, &body, raw)
    }

    pub(crate) async fn get(&self, path: &str, params: Option<&Params>) -> Result<Value, ApiError> {
        self.send(Method::Get, &self.url(path), params, false)
            .await?
            .into_json()
    }

    pub(crate) async fn post(&self, path: &str, params: Option<&Params>) -> Result<Value, ApiError> {
        self.send(Method::Post, &self.url(path), params, false)
            .await?
            .into_json()
    }

    pub(crate) async fn delete(&self, path: &str, params: Option<&Params>) -> Result<Value, ApiError> {
        self.send(Method::Delete, &self.url(path), params, false)
            .await?
            .into_json()
    }

    pub(crate) async fn get_raw(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self
            .send(Method::Get, &self.url(path), None, true)
            .await?
            .into_bytes())
    }

    pub(crate) async fn get_typed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.get(path, None).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            message: format!("Unexpected response shape for {}: {}", path, e),
        })
    }
}

fn append_query(url: &str, query: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

/// Convert a reqwest error to an ApiError.
fn to_network_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport {
        message: err.to_string(),
    }
}

/// Map a response to the pipeline result.
fn decode_response(status: StatusCode, body: &[u8], raw: bool) -> Result<ApiResponse, ApiError> {
    if status != StatusCode::OK {
        debug!("[API] Error response body: {}", String::from_utf8_lossy(body));
        return Err(to_http_error(status, body));
    }

    let body = if raw {
        ResponseBody::Raw(body.to_vec())
    } else {
        ResponseBody::Json(decode_json(body)?)
    };

    Ok(ApiResponse {
        status: status.as_u16(),
        body,
    })
}

fn decode_json(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// Convert an HTTP response with error status to an ApiError.
fn to_http_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = extract_message(body);

    match status.as_u16() {
        400 => ApiError::BadRequest { message },
        401 => ApiError::NotAuthorized { message },
        404 => ApiError::NotFound { message },
        500 => ApiError::Server { message },
        other => ApiError::UnexpectedStatus {
            status: other,
            message,
        },
    }
}

/// The `message` field of an error body; empty if missing or not JSON.
fn extract_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_client_new_trims_trailing_slash() {
        let client = ApiClient::new("https://api.example.com/").unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
        assert_eq!(client.url("/projects/"), "https://api.example.com/projects/");
    }

    #[test]
    fn test_builder_defaults_to_public_server() {
        let client = ApiClient::builder().build().unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.state, SessionState::LoggedOut);
    }

    #[test]
    fn test_builder_rejects_missing_ca_certificate() {
        let result = ApiClient::builder()
            .ca_certificate("/nonexistent/ca.crt")
            .build();
        assert!(matches!(result, Err(ApiError::Configuration { .. })));
    }

    #[test]
    fn test_builder_rejects_missing_public_suffix_list() {
        let result = ApiClient::builder()
            .public_suffix_list("/nonexistent/public_suffix_list.dat")
            .build();
        assert!(matches!(result, Err(ApiError::Configuration { .. })));
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("http://h/p/", "a=1"), "http://h/p/?a=1");
        assert_eq!(append_query("http://h/p/?x=2", "a=1"), "http://h/p/?x=2&a=1");
    }

    #[test]
    fn test_status_mapping_with_message() {
        let body = br#"{"message":"Invalid input"}"#;
        let cases = [
            (StatusCode::BAD_REQUEST, 400),
            (StatusCode::UNAUTHORIZED, 401),
            (StatusCode::NOT_FOUND, 404),
            (StatusCode::INTERNAL_SERVER_ERROR, 500),
        ];

        for (status, code) in cases {
            let err = decode_response(status, body, false).unwrap_err();
            assert_eq!(err.status(), Some(code));
            assert_eq!(err.message(), "Invalid input");
        }
    }

    #[test]
    fn test_status_mapping_variants() {
        assert!(matches!(
            to_http_error(StatusCode::BAD_REQUEST, b"{}"),
            ApiError::BadRequest { .. }
        ));
        assert!(matches!(
            to_http_error(StatusCode::UNAUTHORIZED, b"{}"),
            ApiError::NotAuthorized { .. }
        ));
        assert!(matches!(
            to_http_error(StatusCode::NOT_FOUND, b"{}"),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            to_http_error(StatusCode::INTERNAL_SERVER_ERROR, b"{}"),
            ApiError::Server { .. }
        ));
    }

    #[test]
    fn test_error_message_empty_when_absent_or_invalid() {
        assert_eq!(extract_message(br#"{"error":"x"}"#), "");
        assert_eq!(extract_message(b"<html>oops</html>"), "");
        assert_eq!(extract_message(b""), "");
        assert_eq!(extract_message(br#"{"message":42}"#), "");
    }

    #[test]
    fn test_undocumented_status_is_unexpected() {
        let err = decode_response(StatusCode::SERVICE_UNAVAILABLE, br#"{"message":"down"}"#, false)
            .unwrap_err();
        match err {
            ApiError::UnexpectedStatus { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "down");
            }
            other => panic!("Expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_ok_decodes_json() {
        let document = json!({"projects": [{"id": 1, "name": "shop"}], "total": 1});
        let body = serde_json::to_vec(&document).unwrap();
        let response = decode_response(StatusCode::OK, &body, false).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, ResponseBody::Json(document));
    }

    #[test]
    fn test_ok_empty_body_is_null() {
        let response = decode_response(StatusCode::OK, b"", false).unwrap();
        assert_eq!(response.into_json().unwrap(), Value::Null);
    }

    #[test]
    fn test_ok_invalid_json_is_decode_error() {
        let err = decode_response(StatusCode::OK, b"not json", false).unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn test_ok_raw_keeps_bytes() {
        let body = [0x25, 0x50, 0x44, 0x46, 0x00, 0xff];
        let response = decode_response(StatusCode::OK, &body, true).unwrap();
        assert_eq!(response.into_bytes(), body.to_vec());
    }

    #[test]
    fn test_raw_error_still_extracts_message() {
        let err = decode_response(StatusCode::NOT_FOUND, br#"{"message":"No report"}"#, true)
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { ref message } if message == "No report"));
    }

    #[test]
    fn test_error_predicates() {
        let auth = ApiError::NotAuthorized {
            message: String::new(),
        };
        assert!(auth.is_auth_error());
        assert!(!auth.is_network_error());

        let network = ApiError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(network.is_network_error());
        assert_eq!(network.status(), None);

        let server = ApiError::Server {
            message: String::new(),
        };
        assert!(server.is_server_error());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
