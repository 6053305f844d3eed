//! HTTP methods accepted by a RESTCONF server.

use std::fmt;
use std::str::FromStr;

use crate::error::MethodError;

/// An HTTP method RESTCONF defines an operation for.
///
/// # Examples
///
/// ```
/// use restconf_uri::Method;
///
/// let method: Method = "patch".parse().unwrap();
/// assert_eq!(method, Method::Patch);
/// assert!(method.allows_body());
///
/// let err = "TRACE".parse::<Method>().unwrap_err();
/// assert_eq!(err.to_string(), "[TRACE] is not a valid RESTCONF operation/method");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// Retrieve data or metadata
    Get,
    /// Create a child resource or invoke an operation
    Post,
    /// Create or replace a resource
    Put,
    /// Merge into a resource
    Patch,
    /// Delete a resource
    Delete,
    /// Discover the methods a resource supports
    Options,
    /// Like GET, without a body
    Head,
}

impl Method {
    /// Every RESTCONF method.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
        Self::Head,
    ];

    /// Returns the method token in upper case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }

    /// Returns true if requests with this method carry a message body.
    #[must_use]
    pub const fn allows_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns true if the method does not change server state.
    #[must_use]
    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = MethodError;

    /// Parses a method token, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or(MethodError { method: upper })
    }
}

impl TryFrom<&str> for Method {
    type Error = MethodError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Method {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Method {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
