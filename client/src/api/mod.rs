//! Client for the RIPS API.
//!
//! - `client` - `ApiClient`, the request pipeline and `ApiError`
//! - `cookies` - session cookie jar, optionally file-backed
//! - `params` - request parameters, query and multipart encoding
//! - `session` - login, relogin, logout
//! - `poll` - waiting for scans to finish
//! - `projects`, `issues`, `users`, `logs` - resource accessors
//! - `types` - typed records for known response shapes

pub mod client;
pub mod cookies;
pub mod issues;
pub mod logs;
pub mod params;
pub mod poll;
pub mod projects;
pub mod session;
pub mod types;
pub mod users;

pub use client::{
    ApiClient, ApiClientBuilder, ApiError, ApiResponse, ClientOptions, DEFAULT_BASE_URL, Method,
    ResponseBody,
};
pub use cookies::CookieJar;
pub use logs::LogKind;
pub use params::{ParamValue, Params};
pub use poll::{DEFAULT_POLL_INTERVAL, PollOptions};
pub use session::{Credentials, SessionState};
pub use types::{Filename, Issue, IssueType, LogEntry, Project, ScanStatus, User, record, records};
