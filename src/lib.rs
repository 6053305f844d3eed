//! Parser and classifier for RESTCONF request URIs.
//!
//! This crate turns a raw HTTP request target into a structured, validated
//! RESTCONF target resource: an ordered sequence of module-qualified
//! identifiers and list instances with typed key values, the API category
//! the request addresses, and its decoded query parameters.
//!
//! # Overview
//!
//! RESTCONF request URIs have the structure:
//!
//! ```text
//! [scheme://host]/<entry-point>/<api-resource>[/<api-path>][?query]
//! ```
//!
//! where `<api-resource>` is `data`, `operations` or `yang-library-version`.
//!
//! # Quick Start
//!
//! ```rust
//! use restconf_uri::{ApiCategory, KeyValue, classify};
//!
//! let request = classify(
//!     "/restconf/data/example-jukebox:jukebox/library/artist=Foo%20Fighters?depth=2",
//!     "GET",
//!     "restconf",
//! ).unwrap();
//!
//! assert!(request.is_valid());
//! assert_eq!(request.category(), Some(ApiCategory::Datastore));
//!
//! let artist = request.address().target().unwrap().as_list_instance().unwrap();
//! assert_eq!(artist.keys()[0].value(), &KeyValue::String("Foo Fighters".into()));
//! assert_eq!(request.query().get("depth"), Some("2"));
//! ```
//!
//! # Resource Paths
//!
//! Paths can be parsed on their own. A module prefix carries to the
//! following segments until another one appears:
//!
//! ```rust
//! use restconf_uri::parse_path;
//!
//! let address = parse_path("/abcd:efgh/ijkl");
//! assert!(address.is_valid());
//! assert_eq!(address.segments()[1].module().unwrap().as_str(), "abcd");
//!
//! let address = parse_path("/abcd/");
//! assert!(!address.is_valid());
//! ```
//!
//! # Failure Handling
//!
//! Parsed addresses and classified requests record the first failure instead
//! of returning it, so a server can still answer with an error payload built
//! from [`RequestError::status_code`] and [`RequestError::error_tag`]. The only
//! failure returned directly is an unsupported HTTP method.
//!
//! # Grammar Specification
//!
//! The accepted syntax is written out in `grammar.abnf` at the crate root,
//! following RFC 5234 (ABNF) and the api-path rules of RFC 8040.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod category;
mod config;
mod constants;
mod error;
mod identifier;
mod list_instance;
mod method;
mod path_segment;
mod percent;
pub mod prelude;
mod query;
mod request;
mod resource;
mod revision;
mod schema;

pub use builder::{Empty, LocationBuilder, Rooted};
pub use category::ApiCategory;
pub use config::RestconfConfig;
pub use constants::{
    ALLOWED_SCHEMES, DATA_RESOURCE_API, DEFAULT_ENTRY_POINT, DEFAULT_SCHEME, LIBRARY_RESOURCE_API,
    MAX_DEPTH, OPERATIONS_RESOURCE_API,
};
pub use error::{
    IdentifierError, ListInstanceError, MethodError, PathError, PathErrorKind, QueryError,
    RequestError, RevisionError, SchemaError,
};
pub use identifier::{Identifier, valid_identifier};
pub use list_instance::{KeyValue, ListInstance, ListKey, parse_list_instance};
pub use method::Method;
pub use path_segment::{ApiIdentifier, PathSegment};
pub use query::{Content, Depth, Insert, QueryParameter, QueryParams, WithDefaults};
pub use request::{RestconfRequest, classify};
pub use resource::{ResourceAddress, parse_path};
pub use revision::{DatastoreRevision, EntityTag, NodeId, RevisionTree, SharedRevisionTree};
pub use schema::{SchemaDescriptor, SchemaRegistry};
