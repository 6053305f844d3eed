//! Server-side settings for request classification.

use crate::constants::{DEFAULT_ENTRY_POINT, DEFAULT_SCHEME};
use crate::error::MethodError;
use crate::request::{RestconfRequest, classify_with};

/// Where the RESTCONF API is rooted and how bare request targets are read.
///
/// With the `serde` feature the config deserializes from any format the
/// host program uses; missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use restconf_uri::{ApiCategory, RestconfConfig};
///
/// let config = RestconfConfig::new().with_entry_point("/top/restconf/");
/// assert_eq!(config.entry_point(), "top/restconf");
///
/// let request = config.classify("/top/restconf/data/m:a", "GET").unwrap();
/// assert!(request.is_valid());
/// assert_eq!(request.category(), Some(ApiCategory::Datastore));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RestconfConfig {
    entry_point: String,
    default_scheme: String,
}

impl RestconfConfig {
    /// Creates a config rooted at `/restconf` with scheme `http`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry point. Leading and trailing `/` are dropped.
    #[must_use]
    pub fn with_entry_point(mut self, entry_point: &str) -> Self {
        self.entry_point = normalize_entry_point(entry_point);
        self
    }

    /// Sets the scheme assumed when a request target carries none.
    #[must_use]
    pub fn with_default_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.default_scheme = scheme.into().to_ascii_lowercase();
        self
    }

    /// Returns the entry point without surrounding slashes.
    #[must_use]
    pub fn entry_point(&self) -> &str {
        self.entry_point.trim_matches('/')
    }

    /// Returns the scheme assumed for scheme-less targets.
    #[must_use]
    pub fn default_scheme(&self) -> &str {
        &self.default_scheme
    }

    /// Returns the request path of the API root, e.g. `/restconf`.
    #[must_use]
    pub fn root_path(&self) -> String {
        format!("/{}", self.entry_point())
    }

    /// Classifies a request against this config.
    ///
    /// # Errors
    ///
    /// Returns `MethodError` if `method` is not a RESTCONF method. Every other
    /// failure is recorded on the returned request.
    pub fn classify(&self, url: &str, method: &str) -> Result<RestconfRequest, MethodError> {
        classify_with(self, url, method)
    }
}

impl Default for RestconfConfig {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            default_scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

pub(crate) fn normalize_entry_point(entry_point: &str) -> String {
    entry_point.trim_matches('/').to_string()
}
