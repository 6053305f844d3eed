//! Constants for RESTCONF request URI parsing.

/// Default RESTCONF entry point (API root).
pub const DEFAULT_ENTRY_POINT: &str = "restconf";

/// Scheme assumed when the request URI carries none.
pub const DEFAULT_SCHEME: &str = "http";

/// Schemes a RESTCONF server can be reached over.
pub const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Path segment selecting the datastore resource.
pub const DATA_RESOURCE_API: &str = "data";

/// Path segment selecting the operations resource.
pub const OPERATIONS_RESOURCE_API: &str = "operations";

/// Path segment selecting the YANG library version resource.
pub const LIBRARY_RESOURCE_API: &str = "yang-library-version";

/// Largest bounded value of the `depth` query parameter.
pub const MAX_DEPTH: u16 = u16::MAX;
