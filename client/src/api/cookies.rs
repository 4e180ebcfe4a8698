//! # Cookie Jar
//!
//! The session token of the API is a cookie. [`CookieJar`] is installed as the
//! cookie provider of the HTTP client, so every response can rotate cookies and
//! every request carries the current ones.
//!
//! Storage and matching (domain, path, `Secure`, `HttpOnly`, expiry) are done
//! by [`cookie_store`]. A jar lives in memory by default. Opened with
//! [`CookieJar::open`] it is backed by a JSON file which is rewritten whenever
//! the server sets cookies, so a later process can resume the session.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cookie_store::CookieStore;
use log::{debug, warn};
use publicsuffix::List;
use reqwest::Url;
use reqwest::header::HeaderValue;

use crate::api::client::ApiError;

/// Thread-safe cookie store shared between an `ApiClient` and its HTTP stack.
#[derive(Default)]
pub struct CookieJar {
    store: RwLock<CookieStore>,
    path: Option<PathBuf>,
}

impl fmt::Debug for CookieJar {
    // Cookie values are session tokens and stay out of debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieJar")
            .field("cookies", &self.len())
            .field("path", &self.path)
            .finish()
    }
}

impl CookieJar {
    /// Create an empty in-memory jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file-backed jar.
    ///
    /// Loads the cookies stored at `path` if the file exists. The file is
    /// created on the first cookie update and is never removed by the jar.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let path = path.into();
        let store = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| ApiError::Configuration {
                message: format!("Failed to read cookie file {}: {}", path.display(), e),
            })?;
            if contents.trim().is_empty() {
                CookieStore::default()
            } else {
                cookie_store::serde::json::load(contents.as_bytes()).map_err(|e| {
                    ApiError::Configuration {
                        message: format!("Failed to parse cookie file {}: {}", path.display(), e),
                    }
                })?
            }
        } else {
            CookieStore::default()
        };

        debug!(
            "Opened cookie jar {} with {} cookie(s)",
            path.display(),
            store.iter_unexpired().count()
        );
        Ok(Self {
            store: RwLock::new(store),
            path: Some(path),
        })
    }

    /// Reject cookies whose `Domain` attribute is a public suffix of `list`
    /// (for example `Domain=com`).
    pub fn with_public_suffix_list(self, list: List) -> Self {
        let store = self
            .store
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .with_suffix_list(list);
        Self {
            store: RwLock::new(store),
            path: self.path,
        }
    }

    /// Read a public suffix list in the `public_suffix_list.dat` format.
    pub fn load_public_suffix_list(path: &Path) -> Result<List, ApiError> {
        let bytes = fs::read(path).map_err(|e| ApiError::Configuration {
            message: format!("Failed to read public suffix list {}: {}", path.display(), e),
        })?;
        List::from_bytes(&bytes).map_err(|e| ApiError::Configuration {
            message: format!("Invalid public suffix list {}: {}", path.display(), e),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of unexpired cookies.
    pub fn len(&self) -> usize {
        self.read().iter_unexpired().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of cookie `name` as it would be sent to `url`.
    pub fn get(&self, url: &Url, name: &str) -> Option<String> {
        self.read()
            .get_request_values(url)
            .find(|(cookie_name, _)| *cookie_name == name)
            .map(|(_, value)| value.to_string())
    }

    /// Drop all cookies.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Apply one `Set-Cookie` header received from `url`.
    ///
    /// Returns `false` when the header is malformed or the cookie is refused
    /// (foreign domain, public suffix, already expired).
    pub fn store_set_cookie(&self, header: &str, url: &Url) -> bool {
        match self.write().parse(header, url) {
            Ok(action) => {
                debug!("Cookie update from {}: {:?}", url.host_str().unwrap_or(""), action);
                true
            }
            Err(e) => {
                debug!("Ignoring Set-Cookie from {}: {}", url.host_str().unwrap_or(""), e);
                false
            }
        }
    }

    /// `Cookie` header value for a request to `url`.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .read()
            .get_request_values(url)
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// Write the jar to its backing file. A no-op for in-memory jars.
    ///
    /// Session cookies are written too, they carry the API session.
    pub fn save(&self) -> Result<(), ApiError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ApiError::Configuration {
                    message: format!("Failed to create directory {}: {}", parent.display(), e),
                })?;
            }
        }

        let mut contents = Vec::new();
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(&self.read(), &mut contents)
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to serialize cookies: {}", e),
            })?;
        fs::write(path, contents).map_err(|e| ApiError::Configuration {
            message: format!("Failed to write cookie file {}: {}", path.display(), e),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, CookieStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CookieStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let mut changed = false;
        for header in cookie_headers {
            if let Ok(header) = header.to_str() {
                changed |= self.store_set_cookie(header, url);
            }
        }

        if changed {
            if let Err(e) = self.save() {
                warn!("Failed to persist cookie jar: {}", e);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self.header_for(url)?;
        HeaderValue::from_str(&header).ok()
    }
}
