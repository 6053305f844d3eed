//! Error types for RESTCONF request URI parsing.

use thiserror::Error;

/// Errors for YANG identifier validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier is empty
    #[error("identifier cannot be empty")]
    Empty,
    /// First character is not a letter or underscore
    #[error("identifier must start with a letter or underscore, found '{found}'")]
    InvalidStart {
        /// The character found
        found: char,
    },
    /// Character outside the identifier alphabet
    #[error(
        "invalid character '{char}' at position {position}; only letters, digits, '_', '-' and '.' allowed"
    )]
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position in the input
        position: usize,
    },
}

/// Errors for list-instance segment decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListInstanceError {
    /// Segment has no `=` between the list name and its keys
    #[error("missing '=' between list name and key values")]
    MissingSeparator,
    /// The list name is not a valid identifier
    #[error("invalid list name '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The offending list name
        identifier: String,
        /// Reason for invalidity
        reason: IdentifierError,
    },
    /// Nothing follows the `=`
    #[error("no key values given; missing key values are not allowed")]
    NoKeys,
    /// A quoted key value never closes
    #[error("unterminated {quote} quote starting at position {position}")]
    UnterminatedQuote {
        /// The opening quote character
        quote: char,
        /// Position of the opening quote in the key list
        position: usize,
    },
    /// Characters follow a closing quote before the next separator
    #[error("unexpected character '{char}' after closing quote at position {position}")]
    TrailingAfterQuote {
        /// The unexpected character
        char: char,
        /// Position in the key list
        position: usize,
    },
    /// A boolean literal with unsupported casing
    #[error("invalid boolean '{value}'; use 'true', 'True', 'false' or 'False'")]
    InvalidBoolean {
        /// The rejected value
        value: String,
    },
    /// Invalid percent encoding in a key value
    #[error("invalid percent encoding in '{value}'")]
    InvalidPercentEncoding {
        /// The raw key list
        value: String,
    },
}

/// Errors that can occur when parsing a target resource path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid resource path '{input}': {kind}")]
pub struct PathError {
    /// The resource string that failed to parse
    pub input: String,
    /// The specific error that occurred
    pub kind: PathErrorKind,
}

/// Specific resource path error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathErrorKind {
    /// A non-empty path must begin with `/`
    #[error("path must begin with '/'")]
    MissingLeadingSlash,
    /// Two slashes in a row, or a trailing slash
    #[error("empty segment at index {index}; trailing or doubled '/' is not allowed")]
    EmptySegment {
        /// Index of the segment
        index: usize,
    },
    /// The module prefix is not a valid identifier
    #[error("invalid module '{module}': {reason}")]
    InvalidModule {
        /// The offending module name
        module: String,
        /// Reason for invalidity
        reason: IdentifierError,
    },
    /// More than one `:` in an api-identifier
    #[error("invalid module/identifier token '{token}'")]
    InvalidToken {
        /// The offending token
        token: String,
    },
    /// The node name is not a valid identifier
    #[error("invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The offending identifier
        identifier: String,
        /// Reason for invalidity
        reason: IdentifierError,
    },
    /// A list-instance segment failed to decode
    #[error("invalid list-instance '{segment}': {reason}")]
    InvalidListInstance {
        /// The offending segment
        segment: String,
        /// Reason for invalidity
        reason: ListInstanceError,
    },
    /// Resource type allows fewer segments than were given
    #[error("{resource} resource accepts at most {max} segment(s), found {actual}")]
    TooManySegments {
        /// The resource kind
        resource: &'static str,
        /// Maximum allowed segments
        max: usize,
        /// Actual segment count
        actual: usize,
    },
    /// Resource type does not address list entries
    #[error("{resource} resource cannot address list instance '{segment}'")]
    UnexpectedListInstance {
        /// The resource kind
        resource: &'static str,
        /// The offending segment
        segment: String,
    },
}

/// Errors for query string parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Invalid parameter name
    #[error("invalid parameter name '{name}': {reason}")]
    InvalidParamName {
        /// The invalid name
        name: String,
        /// Reason for invalidity
        reason: &'static str,
    },
    /// Invalid parameter value
    #[error("invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidParamValue {
        /// Parameter name
        name: String,
        /// The invalid value
        value: String,
        /// Reason for invalidity
        reason: &'static str,
    },
    /// Single-instance parameter given more than once
    #[error("duplicate parameter '{name}'; it must not appear more than once")]
    DuplicateParam {
        /// The duplicated name
        name: String,
    },
    /// Invalid percent encoding
    #[error("invalid percent encoding in '{value}'")]
    InvalidPercentEncoding {
        /// The invalid value
        value: String,
    },
}

/// The HTTP method is not one RESTCONF defines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{method}] is not a valid RESTCONF operation/method")]
pub struct MethodError {
    /// The rejected method token
    pub method: String,
}

/// Errors recorded on a classified RESTCONF request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Request URI is empty
    #[error("request URI is empty")]
    Empty,
    /// Scheme other than http or https
    #[error("scheme '{scheme}' not valid for RESTCONF")]
    InvalidScheme {
        /// The scheme that was found
        scheme: String,
    },
    /// Path does not begin with the configured entry point
    #[error("URL path '{path}' does not start RESTCONF API root '{entry_point}'")]
    EntryPointMismatch {
        /// The request path
        path: String,
        /// The configured entry point
        entry_point: String,
    },
    /// Path below the entry point names no known API resource
    #[error("URL path '{path}' does not start a valid RESTCONF API URI")]
    UnknownResourceApi {
        /// The request path
        path: String,
    },
    /// Target resource path failed to parse
    #[error(transparent)]
    InvalidPath(PathError),
    /// Query string failed to parse
    #[error("invalid query string: {0}")]
    InvalidQuery(QueryError),
}

impl RequestError {
    /// Returns the HTTP status a server should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::EntryPointMismatch { .. } | Self::UnknownResourceApi { .. } => 404,
            Self::Empty
            | Self::InvalidScheme { .. }
            | Self::InvalidPath(_)
            | Self::InvalidQuery(_) => 400,
        }
    }

    /// Returns the RESTCONF `error-tag` for the `errors` payload.
    #[must_use]
    pub const fn error_tag(&self) -> &'static str {
        match self {
            Self::Empty
            | Self::InvalidScheme { .. }
            | Self::InvalidQuery(QueryError::InvalidPercentEncoding { .. }) => "malformed-message",
            Self::EntryPointMismatch { .. }
            | Self::UnknownResourceApi { .. }
            | Self::InvalidPath(_)
            | Self::InvalidQuery(_) => "invalid-value",
        }
    }
}

impl MethodError {
    /// Returns the HTTP status a server should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        405
    }

    /// Returns the RESTCONF `error-tag` for the `errors` payload.
    #[must_use]
    pub const fn error_tag(&self) -> &'static str {
        "operation-not-supported"
    }
}

/// Errors for the schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No schema registered for the module
    #[error("module '{module}' not found in schema registry")]
    NotFound {
        /// The requested module
        module: String,
    },
    /// A schema for the module is already registered
    #[error("module '{module}' is already registered")]
    AlreadyRegistered {
        /// The duplicated module
        module: String,
    },
    /// The module name is not a valid identifier
    #[error("invalid module name '{module}': {reason}")]
    InvalidModuleName {
        /// The offending module name
        module: String,
        /// Reason for invalidity
        reason: IdentifierError,
    },
    /// The revision is not a `YYYY-MM-DD` date
    #[error("invalid revision '{revision}' for module '{module}'; expected YYYY-MM-DD")]
    InvalidRevision {
        /// The module being described
        module: String,
        /// The rejected revision
        revision: String,
    },
}

/// Errors for datastore revision tracking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevisionError {
    /// Node id does not belong to this tree
    #[error("node {id} does not exist in the revision tree")]
    UnknownNode {
        /// The requested node id
        id: usize,
    },
}
