//! Classification of inbound RESTCONF request URIs.

use std::fmt;

use tracing::debug;

use crate::category::ApiCategory;
use crate::config::RestconfConfig;
use crate::constants::ALLOWED_SCHEMES;
use crate::error::{MethodError, RequestError};
use crate::method::Method;
use crate::query::QueryParams;
use crate::resource::ResourceAddress;

/// Classifies a request URI under the given entry point.
///
/// `url` may be an absolute URL (`https://host/restconf/data`), a target
/// with a host but no scheme (`host/restconf/data`), or an origin-form path
/// (`/restconf/data`). The fragment is ignored.
///
/// # Errors
///
/// Returns `MethodError` if `method` is not a RESTCONF method. Every other
/// failure is recorded on the returned request; see
/// [`RestconfRequest::error`].
///
/// # Examples
///
/// ```
/// use restconf_uri::{ApiCategory, classify};
///
/// let request = classify("/restconf/operations/foo", "POST", "restconf").unwrap();
/// assert!(request.is_valid());
/// assert_eq!(request.category(), Some(ApiCategory::Operations));
/// assert_eq!(request.resource(), "/foo");
///
/// let request = classify("/restconf/bogus", "GET", "restconf").unwrap();
/// assert!(!request.is_valid());
///
/// assert!(classify("/restconf", "FETCH", "restconf").is_err());
/// ```
pub fn classify(
    url: &str,
    method: &str,
    entry_point: &str,
) -> Result<RestconfRequest, MethodError> {
    let config = RestconfConfig::new().with_entry_point(entry_point);
    classify_with(&config, url, method)
}

pub(crate) fn classify_with(
    config: &RestconfConfig,
    url: &str,
    method: &str,
) -> Result<RestconfRequest, MethodError> {
    let method = method.parse::<Method>().inspect_err(|e| {
        debug!(url, method = %e.method, "rejected request method");
    })?;

    let mut request = RestconfRequest {
        method,
        scheme: config.default_scheme().to_string(),
        host: None,
        entry_point: config.entry_point().to_string(),
        path: String::new(),
        resource: String::new(),
        category: None,
        address: ResourceAddress::root(),
        query: QueryParams::new(),
        error: None,
    };

    if let Err(error) = request.fill(url) {
        debug!(url, %method, error = %error, "request URI is invalid");
        request.error = Some(error);
    } else {
        debug!(
            url,
            %method,
            category = request.category.map_or("none", ApiCategory::as_str),
            resource = %request.resource,
            "classified request"
        );
    }

    Ok(request)
}

/// A classified RESTCONF request.
///
/// Built once per inbound request by [`classify`] and immutable afterwards.
/// A URI that fails to classify still yields a request: check
/// [`is_valid`](Self::is_valid) and [`error`](Self::error). The components
/// up to the point of failure stay populated.
#[derive(Debug, Clone, PartialEq)]
pub struct RestconfRequest {
    method: Method,
    scheme: String,
    host: Option<String>,
    entry_point: String,
    path: String,
    resource: String,
    category: Option<ApiCategory>,
    address: ResourceAddress,
    query: QueryParams,
    error: Option<RequestError>,
}

impl RestconfRequest {
    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Returns the scheme, lower-cased; the configured default if absent.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the authority (`host[:port]`), if the URI named one.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the entry point the request was classified under.
    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Returns the full request path, without query or fragment.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the path below the API resource, e.g. `/m:a` for
    /// `/restconf/data/m:a`.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the API category, if the path reached one.
    #[must_use]
    pub const fn category(&self) -> Option<ApiCategory> {
        self.category
    }

    /// Returns the parsed target resource.
    #[must_use]
    pub const fn address(&self) -> &ResourceAddress {
        &self.address
    }

    /// Returns the decoded query parameters.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Returns true if every part of the URI was accepted.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the first error found, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    /// Returns the human-readable error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Returns the methods the addressed resource supports.
    #[must_use]
    pub fn allowed_methods(&self) -> &'static [Method] {
        match self.category {
            Some(category) => category.allowed_methods(!self.address.is_root()),
            None => &[],
        }
    }

    /// Returns true if the request method is supported by the addressed resource.
    ///
    /// Always false for an invalid request.
    #[must_use]
    pub fn method_allowed(&self) -> bool {
        self.is_valid() && self.allowed_methods().contains(&self.method)
    }

    /// Returns the `Location` header path of the addressed datastore resource.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        (self.is_valid() && self.category == Some(ApiCategory::Datastore))
            .then(|| self.address.location(&self.entry_point))
    }

    fn fill(&mut self, url: &str) -> Result<(), RequestError> {
        if url.is_empty() {
            return Err(RequestError::Empty);
        }

        let url = url.split_once('#').map_or(url, |(before, _)| before);
        let (target, query) = url.split_once('?').unwrap_or((url, ""));

        let (scheme, rest) = split_scheme(target);
        if let Some(scheme) = scheme {
            self.scheme = scheme.to_ascii_lowercase();
        }
        if !ALLOWED_SCHEMES.contains(&self.scheme.as_str()) {
            return Err(RequestError::InvalidScheme {
                scheme: self.scheme.clone(),
            });
        }

        let (host, path) = split_authority(rest, scheme.is_some());
        self.host = host.map(str::to_string);
        self.path = path.to_string();

        let remainder = strip_entry_point(path, &self.entry_point).ok_or_else(|| {
            RequestError::EntryPointMismatch {
                path: path.to_string(),
                entry_point: self.entry_point.clone(),
            }
        })?;

        self.resolve_resource(remainder)?;

        self.query = QueryParams::parse(query).map_err(RequestError::InvalidQuery)?;
        self.query
            .check_duplicates()
            .map_err(RequestError::InvalidQuery)
    }

    fn resolve_resource(&mut self, remainder: &str) -> Result<(), RequestError> {
        if remainder.is_empty() || remainder == "/" {
            self.category = Some(ApiCategory::Root);
            self.resource = remainder.to_string();
            return Ok(());
        }

        let below = remainder
            .strip_prefix('/')
            .ok_or_else(|| RequestError::UnknownResourceApi {
                path: self.path.clone(),
            })?;
        let (name, sub) = below
            .find('/')
            .map_or((below, ""), |idx| below.split_at(idx));

        let category = ApiCategory::from_resource_api(name).ok_or_else(|| {
            RequestError::UnknownResourceApi {
                path: self.path.clone(),
            }
        })?;

        self.category = Some(category);
        self.resource = sub.to_string();
        self.address = match category {
            ApiCategory::Operations => ResourceAddress::parse_operation(sub),
            _ => ResourceAddress::parse(sub),
        };

        match self.address.error() {
            Some(error) => Err(RequestError::InvalidPath(error.clone())),
            None => Ok(()),
        }
    }
}

impl fmt::Display for RestconfRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

/// Splits off a URI scheme, if the target starts with one.
///
/// `host:8080/...` is read as an authority, not a scheme.
fn split_scheme(target: &str) -> (Option<&str>, &str) {
    let Some((candidate, rest)) = target.split_once(':') else {
        return (None, target);
    };

    let is_scheme_token = candidate.starts_with(|c: char| c.is_ascii_alphabetic())
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    let looks_like_port = !rest.starts_with("//") && rest.starts_with(|c: char| c.is_ascii_digit());
    if !is_scheme_token || looks_like_port {
        return (None, target);
    }

    (Some(candidate), rest)
}

/// Splits a scheme-less target into its authority and path.
fn split_authority(rest: &str, had_scheme: bool) -> (Option<&str>, &str) {
    let with_authority = match rest.strip_prefix("//") {
        Some(after) => after,
        None if !had_scheme && !rest.starts_with('/') => rest,
        None => return (None, rest),
    };

    let (host, path) = with_authority
        .find('/')
        .map_or((with_authority, ""), |idx| with_authority.split_at(idx));

    ((!host.is_empty()).then_some(host), path)
}

/// Returns the path below the entry point, or `None` if the path is not under it.
fn strip_entry_point<'a>(path: &'a str, entry_point: &str) -> Option<&'a str> {
    if entry_point.is_empty() {
        return Some(path);
    }
    let remainder = path.strip_prefix('/')?.strip_prefix(entry_point)?;
    (remainder.is_empty() || remainder.starts_with('/')).then_some(remainder)
}
