//! RESTCONF API resource categories.

use std::fmt;

use crate::constants::{DATA_RESOURCE_API, LIBRARY_RESOURCE_API, OPERATIONS_RESOURCE_API};
use crate::method::Method;

/// Which top-level RESTCONF resource a request addresses.
///
/// Chosen from the first path segment below the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiCategory {
    /// The API root itself (`/restconf`)
    Root,
    /// The unified datastore (`/restconf/data`)
    Datastore,
    /// RPC and action invocation (`/restconf/operations`)
    Operations,
    /// The YANG library version leaf (`/restconf/yang-library-version`)
    SchemaLibrary,
}

impl ApiCategory {
    /// Returns the category for a resource name below the entry point.
    ///
    /// `Root` has no resource name and is never returned.
    #[must_use]
    pub fn from_resource_api(name: &str) -> Option<Self> {
        match name {
            DATA_RESOURCE_API => Some(Self::Datastore),
            OPERATIONS_RESOURCE_API => Some(Self::Operations),
            LIBRARY_RESOURCE_API => Some(Self::SchemaLibrary),
            _ => None,
        }
    }

    /// Returns the resource name below the entry point, or `None` for the root.
    #[must_use]
    pub const fn resource_api(self) -> Option<&'static str> {
        match self {
            Self::Root => None,
            Self::Datastore => Some(DATA_RESOURCE_API),
            Self::Operations => Some(OPERATIONS_RESOURCE_API),
            Self::SchemaLibrary => Some(LIBRARY_RESOURCE_API),
        }
    }

    /// Returns the methods this category supports.
    ///
    /// `has_target` is true when the path below the resource names a node or
    /// operation. It only matters for `Operations`: the bare operations
    /// resource accepts no method, while a named operation accepts POST.
    ///
    /// # Examples
    ///
    /// ```
    /// use restconf_uri::{ApiCategory, Method};
    ///
    /// assert!(ApiCategory::Operations.allowed_methods(false).is_empty());
    /// assert_eq!(
    ///     ApiCategory::Operations.allowed_methods(true),
    ///     &[Method::Post, Method::Options]
    /// );
    /// assert!(ApiCategory::Datastore.allowed_methods(false).contains(&Method::Delete));
    /// ```
    #[must_use]
    pub const fn allowed_methods(self, has_target: bool) -> &'static [Method] {
        const READ_ONLY: &[Method] = &[Method::Get, Method::Head, Method::Options];
        match (self, has_target) {
            (Self::Root | Self::SchemaLibrary, _) => READ_ONLY,
            (Self::Datastore, _) => &Method::ALL,
            (Self::Operations, false) => &[],
            (Self::Operations, true) => &[Method::Post, Method::Options],
        }
    }

    /// Returns the name used in logs and serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Datastore => "datastore",
            Self::Operations => "operations",
            Self::SchemaLibrary => "schema-library",
        }
    }
}

impl fmt::Display for ApiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ApiCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_names() {
        assert_eq!(ApiCategory::from_resource_api("data"), Some(ApiCategory::Datastore));
        assert_eq!(
            ApiCategory::from_resource_api("yang-library-version"),
            Some(ApiCategory::SchemaLibrary)
        );
        assert_eq!(ApiCategory::from_resource_api("bogus"), None);
        assert_eq!(ApiCategory::from_resource_api(""), None);
        assert_eq!(ApiCategory::Root.resource_api(), None);
        assert_eq!(ApiCategory::Operations.resource_api(), Some("operations"));
    }

    #[test]
    fn read_only_categories() {
        for category in [ApiCategory::Root, ApiCategory::SchemaLibrary] {
            let methods = category.allowed_methods(true);
            assert_eq!(methods, &[Method::Get, Method::Head, Method::Options]);
        }
    }

    #[test]
    fn datastore_allows_every_method() {
        assert_eq!(ApiCategory::Datastore.allowed_methods(false), &Method::ALL);
        assert_eq!(ApiCategory::Datastore.allowed_methods(true), &Method::ALL);
    }
}
