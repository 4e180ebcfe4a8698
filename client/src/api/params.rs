//! # Request Parameters
//!
//! [`Params`] is the parameter set accepted by every accessor. GET and DELETE
//! requests carry it as a query string, POST requests as a multipart form in
//! which [`ParamValue::File`] entries become file parts.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};

use crate::api::client::ApiError;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Scalar, already rendered as text
    Text(String),
    /// Local file to upload
    File(PathBuf),
}

impl ParamValue {
    /// Mark a local file for upload.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ParamValue::File(path.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Text(if value { "1" } else { "0" }.to_string())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f64);

/// Ordered parameter set; inserting an existing key replaces its value.
///
/// # Example
///
/// ```rust
/// use rips_api::api::Params;
///
/// let filters = Params::new().with("limit", 10).with("name", "my shop");
/// assert_eq!(filters.to_query_string(), "limit=10&name=my%20shop");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style file upload entry.
    pub fn with_file(self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.with(key, ParamValue::file(path))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Turn a text entry holding a path into a file upload entry.
    ///
    /// Returns `true` if `key` now refers to a file.
    pub fn mark_file(&mut self, key: &str) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, value)) => {
                if let ParamValue::Text(path) = value {
                    *value = ParamValue::File(PathBuf::from(std::mem::take(path)));
                }
                true
            }
            None => false,
        }
    }

    /// Percent-encoded `key=value` pairs joined by `&`.
    ///
    /// Spaces become `%20`. File entries contribute their path as text.
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    ParamValue::Text(text) => urlencoding::encode(text).into_owned(),
                    ParamValue::File(path) => {
                        urlencoding::encode(&path.to_string_lossy()).into_owned()
                    }
                };
                format!("{}={}", urlencoding::encode(key), value)
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build the multipart form, reading every file entry from disk.
    pub async fn to_multipart(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (key, value) in &self.entries {
            form = match value {
                ParamValue::Text(text) => form.text(key.clone(), text.clone()),
                ParamValue::File(path) => form.part(key.clone(), file_part(path).await?),
            };
        }
        Ok(form)
    }
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let data = tokio::fs::read(path).await.map_err(|e| ApiError::Upload {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(Part::bytes(data).file_name(file_name))
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
