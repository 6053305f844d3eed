//! Target resource addresses parsed from RESTCONF api-paths.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::constants::{DATA_RESOURCE_API, OPERATIONS_RESOURCE_API};
use crate::error::{PathError, PathErrorKind};
use crate::identifier::Identifier;
use crate::list_instance::{ListKey, parse_list_instance};
use crate::path_segment::{ApiIdentifier, PathSegment};

/// Parses a target resource path, recording failure on the result.
///
/// Equivalent to [`ResourceAddress::parse`].
///
/// # Examples
///
/// ```
/// use restconf_uri::parse_path;
///
/// let address = parse_path("/abcd:efgh/ijkl");
/// assert!(address.is_valid());
/// assert_eq!(address.segments()[1].module().unwrap().as_str(), "abcd");
///
/// let address = parse_path("/abcd/");
/// assert!(!address.is_valid());
/// assert!(address.error_message().is_some());
/// ```
#[must_use]
pub fn parse_path(resource: &str) -> ResourceAddress {
    ResourceAddress::parse(resource)
}

/// A parsed target resource: the ordered segments of an api-path.
///
/// ```text
/// api-path = "/" | ("/" api-identifier 0*("/" (api-identifier | list-instance)))
/// ```
///
/// An address is either fully parsed or rejected at the first bad token; an
/// invalid address has no segments and carries the error that stopped it.
/// An empty segment list is the datastore root.
///
/// The per-module grouping from [`modules`](Self::modules) is a diagnostic
/// view only; the segment list is authoritative.
///
/// # Examples
///
/// ```
/// use restconf_uri::ResourceAddress;
///
/// let address = ResourceAddress::parse("/example-jukebox:jukebox/library/artist=Foo%20Fighters");
/// assert!(address.is_valid());
/// assert_eq!(address.depth(), 3);
/// assert_eq!(address.target().unwrap().name().as_str(), "artist");
/// assert_eq!(
///     address.location("restconf"),
///     "/restconf/data/example-jukebox:jukebox/library/artist=Foo%20Fighters"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceAddress {
    input: String,
    segments: Vec<PathSegment>,
    modules: BTreeMap<String, Vec<String>>,
    error: Option<PathError>,
}

impl ResourceAddress {
    /// Returns the address of the datastore root.
    #[must_use]
    pub fn root() -> Self {
        Self::from_segments(Vec::new())
    }

    /// Parses a resource string, recording any failure on the result.
    ///
    /// Use [`is_valid`](Self::is_valid) and [`error`](Self::error) to check
    /// the outcome. An empty string and `/` both denote the root.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match Self::try_parse(input) {
            Ok(address) => address,
            Err(error) => Self {
                input: input.to_string(),
                segments: Vec::new(),
                modules: BTreeMap::new(),
                error: Some(error),
            },
        }
    }

    /// Parses a resource string.
    ///
    /// # Errors
    ///
    /// Returns `PathError` if:
    /// - A non-empty path does not begin with `/`
    /// - Any segment is empty, including a trailing `/`
    /// - A token has more than one `:` before any `=`
    /// - A module prefix or node name is not a valid identifier
    /// - A list-instance segment fails to decode
    pub fn try_parse(input: &str) -> Result<Self, PathError> {
        let result = Self::parse_inner(input).map_err(|kind| PathError {
            input: input.to_string(),
            kind,
        });

        match &result {
            Ok(address) => trace!(input, depth = address.depth(), "parsed resource path"),
            Err(e) => debug!(input, error = %e, "rejected resource path"),
        }

        result.map(|mut address| {
            address.input = input.to_string();
            address
        })
    }

    /// Parses the path below the `operations` resource, recording any failure.
    ///
    /// See [`try_parse_operation`](Self::try_parse_operation).
    #[must_use]
    pub fn parse_operation(input: &str) -> Self {
        match Self::try_parse_operation(input) {
            Ok(address) => address,
            Err(error) => Self {
                input: input.to_string(),
                segments: Vec::new(),
                modules: BTreeMap::new(),
                error: Some(error),
            },
        }
    }

    /// Parses the path below the `operations` resource.
    ///
    /// The path is empty (list all operations) or names a single operation;
    /// list instances are not allowed.
    ///
    /// # Errors
    ///
    /// Returns `PathError` for any failure [`try_parse`](Self::try_parse)
    /// reports, or if the path has more than one segment or a list instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use restconf_uri::ResourceAddress;
    ///
    /// let op = ResourceAddress::try_parse_operation("/example-ops:reboot").unwrap();
    /// assert_eq!(op.target().unwrap().name().as_str(), "reboot");
    /// assert!(ResourceAddress::try_parse_operation("/a:b/c").is_err());
    /// ```
    pub fn try_parse_operation(input: &str) -> Result<Self, PathError> {
        let address = Self::try_parse(input)?;

        let kind = if address.depth() > 1 {
            Some(PathErrorKind::TooManySegments {
                resource: OPERATIONS_RESOURCE_API,
                max: 1,
                actual: address.depth(),
            })
        } else {
            address
                .segments
                .iter()
                .find(|segment| segment.is_list_instance())
                .map(|segment| PathErrorKind::UnexpectedListInstance {
                    resource: OPERATIONS_RESOURCE_API,
                    segment: segment.to_string(),
                })
        };

        match kind {
            Some(kind) => {
                let error = PathError {
                    input: input.to_string(),
                    kind,
                };
                debug!(input, error = %error, "rejected operation path");
                Err(error)
            }
            None => Ok(address),
        }
    }

    /// Builds a valid address from segments, deriving the module grouping.
    #[must_use]
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        let mut modules: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for segment in &segments {
            let module = segment.module().map(Identifier::to_string).unwrap_or_default();
            modules.entry(module).or_default().push(segment.local_form());
        }

        let mut address = Self {
            input: String::new(),
            segments,
            modules,
            error: None,
        };
        address.input = address.to_string();
        address
    }

    /// Returns true if the path parsed successfully.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the parse error, if the path was rejected.
    #[must_use]
    pub const fn error(&self) -> Option<&PathError> {
        self.error.as_ref()
    }

    /// Returns the human-readable error message, if the path was rejected.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Returns the resource string this address was parsed from.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the path segments in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this is a valid address of the datastore root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_valid() && self.segments.is_empty()
    }

    /// Returns the last segment, the node the request targets.
    #[must_use]
    pub fn target(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns the module of the top-level node.
    #[must_use]
    pub fn top_module(&self) -> Option<&Identifier> {
        self.segments.first().and_then(PathSegment::module)
    }

    /// Returns the node names grouped by the module in scope when each was
    /// parsed. Nodes parsed before any module appears are grouped under `""`.
    #[must_use]
    pub const fn modules(&self) -> &BTreeMap<String, Vec<String>> {
        &self.modules
    }

    /// Returns the distinct modules named along the path, in order of appearance.
    #[must_use]
    pub fn module_names(&self) -> Vec<&Identifier> {
        let mut names: Vec<&Identifier> = Vec::new();
        for module in self.segments.iter().filter_map(PathSegment::module) {
            if !names.contains(&module) {
                names.push(module);
            }
        }
        names
    }

    /// Returns the address of the parent node, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self::from_segments(rest.to_vec()))
    }

    /// Returns true if every segment of `prefix` matches the start of this path.
    ///
    /// Segments compare by module, name and keys; whether a module prefix was
    /// written does not matter.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        if prefix.segments.len() > self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(prefix.segments.iter())
            .all(|(a, b)| {
                a.module() == b.module()
                    && a.name() == b.name()
                    && a.keys().iter().map(ListKey::value).eq(b.keys().iter().map(ListKey::value))
            })
    }

    /// Renders the path with a module prefix on every segment whose module
    /// differs from its parent's, and canonical key encoding.
    #[must_use]
    pub fn canonical(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        let mut parent: Option<&Identifier> = None;
        for segment in &self.segments {
            out.push('/');
            out.push_str(&segment.canonical_form(parent));
            parent = segment.module();
        }
        out
    }

    /// Returns the `Location` header path for this data resource.
    ///
    /// The entry point may be given with or without slashes.
    #[must_use]
    pub fn location(&self, entry_point: &str) -> String {
        let mut out = String::from("/");
        let entry = entry_point.trim_matches('/');
        if !entry.is_empty() {
            out.push_str(entry);
            out.push('/');
        }
        out.push_str(DATA_RESOURCE_API);
        if !self.segments.is_empty() {
            out.push_str(&self.canonical());
        }
        out
    }

    fn parse_inner(input: &str) -> Result<Self, PathErrorKind> {
        if input.is_empty() || input == "/" {
            return Ok(Self::root());
        }

        let body = input
            .strip_prefix('/')
            .ok_or(PathErrorKind::MissingLeadingSlash)?;

        let mut segments = Vec::new();
        let mut current_module: Option<Identifier> = None;

        for (index, token) in body.split('/').enumerate() {
            if token.is_empty() {
                return Err(PathErrorKind::EmptySegment { index });
            }
            let segment = Self::parse_segment(token, &mut current_module)?;
            segments.push(segment);
        }

        Ok(Self::from_segments(segments))
    }

    fn parse_segment(
        token: &str,
        current_module: &mut Option<Identifier>,
    ) -> Result<PathSegment, PathErrorKind> {
        // Colons after the first '=' belong to key values.
        let head = token.split_once('=').map_or(token, |(head, _)| head);

        let (rest, qualified) = match head.matches(':').count() {
            0 => (token, false),
            1 => {
                let (module, rest) = token
                    .split_once(':')
                    .ok_or_else(|| PathErrorKind::InvalidToken {
                        token: token.to_string(),
                    })?;
                let module =
                    Identifier::parse(module).map_err(|reason| PathErrorKind::InvalidModule {
                        module: module.to_string(),
                        reason,
                    })?;
                *current_module = Some(module);
                (rest, true)
            }
            _ => {
                return Err(PathErrorKind::InvalidToken {
                    token: token.to_string(),
                });
            }
        };

        if rest.contains('=') {
            let mut list = parse_list_instance(current_module.as_ref(), rest).map_err(|reason| {
                PathErrorKind::InvalidListInstance {
                    segment: token.to_string(),
                    reason,
                }
            })?;
            list.identifier.set_qualified(qualified);
            return Ok(PathSegment::ListInstance(list));
        }

        let name = Identifier::parse(rest).map_err(|reason| PathErrorKind::InvalidIdentifier {
            identifier: rest.to_string(),
            reason,
        })?;

        Ok(PathSegment::Identifier(ApiIdentifier::new(
            current_module.clone(),
            name,
            qualified,
        )))
    }
}

impl Default for ResourceAddress {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error.is_some() {
            return f.write_str(&self.input);
        }
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceAddress {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl TryFrom<&str> for ResourceAddress {
    type Error = PathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ResourceAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ResourceAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IdentifierError, ListInstanceError};
    use crate::list_instance::KeyValue;

    fn grouped(address: &ResourceAddress, module: &str) -> Vec<String> {
        address.modules().get(module).cloned().unwrap_or_default()
    }

    #[test]
    fn slash_is_root() {
        let address = parse_path("/");
        assert!(address.is_valid());
        assert!(address.error_message().is_none());
        assert!(address.segments().is_empty());
        assert!(address.modules().is_empty());
        assert!(address.is_root());
    }

    #[test]
    fn empty_is_root() {
        assert!(parse_path("").is_root());
    }

    #[test]
    fn single_unqualified_identifier() {
        let address = parse_path("/abcd");
        assert!(address.is_valid());
        assert_eq!(address.depth(), 1);
        let seg = &address.segments()[0];
        assert!(seg.module().is_none());
        assert_eq!(seg.name().as_str(), "abcd");
        assert_eq!(grouped(&address, ""), vec!["abcd"]);
    }

    #[test]
    fn unqualified_chain() {
        let address = parse_path("/abcd/efgh/ijkl");
        assert!(address.is_valid());
        assert_eq!(address.modules().len(), 1);
        assert_eq!(grouped(&address, ""), vec!["abcd", "efgh", "ijkl"]);
    }

    #[test]
    fn module_carries_to_following_segments() {
        let address = parse_path("/abcd:efgh/ijkl");
        assert!(address.is_valid());
        assert_eq!(address.segments()[0].module().unwrap().as_str(), "abcd");
        assert_eq!(address.segments()[1].module().unwrap().as_str(), "abcd");
        assert!(address.segments()[0].identifier().is_qualified());
        assert!(!address.segments()[1].identifier().is_qualified());
        assert_eq!(grouped(&address, "abcd"), vec!["efgh", "ijkl"]);
    }

    #[test]
    fn new_qualifier_switches_scope() {
        let address = parse_path("/abcd:efgh/ijkl:mnop/qrst");
        assert!(address.is_valid());
        let modules: Vec<_> = address
            .segments()
            .iter()
            .map(|s| s.module().unwrap().as_str())
            .collect();
        assert_eq!(modules, vec!["abcd", "ijkl", "ijkl"]);
        assert_eq!(grouped(&address, "abcd"), vec!["efgh"]);
        assert_eq!(grouped(&address, "ijkl"), vec!["mnop", "qrst"]);
    }

    #[test]
    fn trailing_slash_is_invalid() {
        let address = parse_path("/abcd/");
        assert!(!address.is_valid());
        assert!(address.error_message().unwrap().contains("/abcd/"));
        assert!(address.segments().is_empty());
        assert!(address.modules().is_empty());
        assert!(matches!(
            address.error().unwrap().kind,
            PathErrorKind::EmptySegment { index: 1 }
        ));
    }

    #[test]
    fn doubled_slash_is_invalid() {
        assert!(!parse_path("/a//b").is_valid());
    }

    #[test]
    fn missing_leading_slash_is_invalid() {
        let address = parse_path("abcd");
        assert!(matches!(
            address.error().unwrap().kind,
            PathErrorKind::MissingLeadingSlash
        ));
    }

    #[test]
    fn empty_module_or_name_is_invalid() {
        let address = parse_path("/:");
        assert!(matches!(
            address.error().unwrap().kind,
            PathErrorKind::InvalidModule {
                reason: IdentifierError::Empty,
                ..
            }
        ));

        let address = parse_path("/abcd:");
        assert!(matches!(
            address.error().unwrap().kind,
            PathErrorKind::InvalidIdentifier {
                reason: IdentifierError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn two_colons_is_invalid_token() {
        let address = parse_path("/a:b:c");
        assert!(matches!(
            &address.error().unwrap().kind,
            PathErrorKind::InvalidToken { token } if token == "a:b:c"
        ));
    }

    #[test]
    fn bad_module_is_named_in_message() {
        let address = parse_path("/ok/9bad:node");
        let msg = address.error_message().unwrap();
        assert!(msg.contains("9bad"));
        assert!(msg.contains("/ok/9bad:node"));
    }

    #[test]
    fn fails_fast_at_first_bad_token() {
        let address = parse_path("/a/b c/d e");
        assert!(matches!(
            &address.error().unwrap().kind,
            PathErrorKind::InvalidIdentifier { identifier, .. } if identifier == "b c"
        ));
    }

    #[test]
    fn list_instance_segments() {
        let address = parse_path("/example-top:top/list1=key1,key2,key3/list2=key4,key5/leaf");
        assert!(address.is_valid());
        assert_eq!(address.depth(), 4);
        let list1 = address.segments()[1].as_list_instance().unwrap();
        assert_eq!(list1.keys().len(), 3);
        assert_eq!(list1.identifier().module().unwrap().as_str(), "example-top");
        let list2 = address.segments()[2].as_list_instance().unwrap();
        assert_eq!(list2.keys()[1].value(), &KeyValue::String("key5".to_string()));
        assert_eq!(
            grouped(&address, "example-top"),
            vec!["top", "list1=key1,key2,key3", "list2=key4,key5", "leaf"]
        );
    }

    #[test]
    fn qualified_list_instance() {
        let address = parse_path("/m:list=1");
        let list = address.segments()[0].as_list_instance().unwrap();
        assert!(list.identifier().is_qualified());
        assert_eq!(address.to_string(), "/m:list=1");
    }

    #[test]
    fn colon_inside_key_value_is_not_a_module_separator() {
        let address = parse_path("/ifs/interface=eth0:1");
        assert!(address.is_valid());
        let list = address.segments()[1].as_list_instance().unwrap();
        assert_eq!(list.keys()[0].text(), "eth0:1");
    }

    #[test]
    fn bad_list_instance_reports_reason() {
        let address = parse_path("/m:list=TRUE");
        assert!(matches!(
            &address.error().unwrap().kind,
            PathErrorKind::InvalidListInstance {
                reason: ListInstanceError::InvalidBoolean { .. },
                ..
            }
        ));
    }

    #[test]
    fn leaf_list_entry() {
        let address = parse_path("/top-leaflist=fred/leaf");
        let entry = address.segments()[0].as_list_instance().unwrap();
        assert_eq!(entry.keys()[0].value(), &KeyValue::String("fred".to_string()));
    }

    #[test]
    fn display_reproduces_input() {
        for input in ["/", "/abcd:efgh/ijkl", "/a:b/c=1,,'x'/d:e"] {
            assert_eq!(parse_path(input).to_string(), input);
        }
    }

    #[test]
    fn canonical_qualifies_module_changes() {
        let address = parse_path("/abcd:efgh/ijkl:mnop/qrst");
        assert_eq!(address.canonical(), "/abcd:efgh/ijkl:mnop/qrst");
        let address = parse_path("/abcd:efgh/abcd:ijkl");
        assert_eq!(address.canonical(), "/abcd:efgh/ijkl");
    }

    #[test]
    fn location_header() {
        let address = parse_path("/ietf-interfaces:interfaces/interface=eth0");
        assert_eq!(
            address.location("/restconf/"),
            "/restconf/data/ietf-interfaces:interfaces/interface=eth0"
        );
        assert_eq!(ResourceAddress::root().location("restconf"), "/restconf/data");
    }

    #[test]
    fn location_with_quote_led_key_classifies() {
        let address = parse_path("/m:a=\"'x\"");
        assert!(address.is_valid());

        let location = address.location("restconf");
        assert_eq!(location, "/restconf/data/m:a=\"'x\"");

        let request = crate::request::classify(&location, "GET", "restconf").unwrap();
        assert!(request.is_valid(), "{:?}", request.error());
        assert_eq!(request.address().canonical(), address.canonical());
        assert!(request.address().starts_with(&address));
    }

    #[test]
    fn parent_drops_last_segment() {
        let address = parse_path("/a:b/c=1/d");
        let parent = address.parent().unwrap();
        assert_eq!(parent.to_string(), "/a:b/c=1");
        assert_eq!(parent.parent().unwrap().parent().unwrap(), ResourceAddress::root());
        assert!(ResourceAddress::root().parent().is_none());
    }

    #[test]
    fn starts_with_ignores_written_qualifiers() {
        let path = parse_path("/a:b/c=1/d");
        assert!(path.starts_with(&parse_path("/a:b/a:c=1")));
        assert!(path.starts_with(&ResourceAddress::root()));
        assert!(!path.starts_with(&parse_path("/a:b/c=2")));
        assert!(!parse_path("/a:b").starts_with(&path));
    }

    #[test]
    fn module_names_in_order() {
        let address = parse_path("/x:a/b/y:c/x:d");
        let names: Vec<_> = address.module_names().iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(address.top_module().unwrap().as_str(), "x");
    }

    #[test]
    fn operation_path_allows_one_identifier() {
        assert!(ResourceAddress::parse_operation("").is_root());
        assert!(ResourceAddress::parse_operation("/m:rpc").is_valid());

        let nested = ResourceAddress::parse_operation("/m:rpc/input");
        assert!(matches!(
            nested.error().unwrap().kind,
            PathErrorKind::TooManySegments { max: 1, actual: 2, .. }
        ));

        let listed = ResourceAddress::parse_operation("/m:rpc=1");
        assert!(matches!(
            listed.error().unwrap().kind,
            PathErrorKind::UnexpectedListInstance { .. }
        ));
    }

    #[test]
    fn from_str_returns_error() {
        let result: Result<ResourceAddress, _> = "/bad/".parse();
        assert!(result.is_err());
        let ok: ResourceAddress = "/a".parse().unwrap();
        assert_eq!(ok.depth(), 1);
    }
}
