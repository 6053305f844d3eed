//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use restconf_uri::prelude::*;
//!
//! let request = classify("/restconf/data/m:top", "GET", DEFAULT_ENTRY_POINT).unwrap();
//! assert_eq!(request.category(), Some(ApiCategory::Datastore));
//! ```
//!
//! Builder state markers (`Empty`, `Rooted`) are left out.

pub use crate::{
    // Parsing entry points
    classify, parse_list_instance, parse_path, valid_identifier,
    // Core types
    ApiCategory, ApiIdentifier, Identifier, KeyValue, ListInstance, ListKey, Method, PathSegment,
    QueryParameter, QueryParams, ResourceAddress, RestconfConfig, RestconfRequest,
    // Query values
    Content, Depth, Insert, WithDefaults,
    // Builder
    LocationBuilder,
    // Server state
    DatastoreRevision, EntityTag, NodeId, RevisionTree, SchemaDescriptor, SchemaRegistry,
    SharedRevisionTree,
    // Errors
    IdentifierError, ListInstanceError, MethodError, PathError, PathErrorKind, QueryError,
    RequestError, RevisionError, SchemaError,
    // Constants
    DEFAULT_ENTRY_POINT, DEFAULT_SCHEME,
};
