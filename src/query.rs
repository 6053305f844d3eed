//! RESTCONF query parameters.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::constants::MAX_DEPTH;
use crate::error::QueryError;
use crate::percent;

/// A query parameter defined by RESTCONF.
///
/// Each of these may appear at most once in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryParameter {
    /// `content`: select config, non-config or all descendant nodes
    Content,
    /// `depth`: limit the depth of the returned subtree
    Depth,
    /// `fields`: select a subset of descendant nodes
    Fields,
    /// `filter`: boolean `XPath` expression for stream notifications
    Filter,
    /// `insert`: where to insert a new user-ordered entry
    Insert,
    /// `point`: the entry an `insert=before|after` is relative to
    Point,
    /// `start-time`: replay start for stream notifications
    StartTime,
    /// `stop-time`: replay stop for stream notifications
    StopTime,
    /// `with-defaults`: how default leafs are reported
    WithDefaults,
}

impl QueryParameter {
    /// All recognized parameters.
    pub const ALL: [Self; 9] = [
        Self::Content,
        Self::Depth,
        Self::Fields,
        Self::Filter,
        Self::Insert,
        Self::Point,
        Self::StartTime,
        Self::StopTime,
        Self::WithDefaults,
    ];

    /// Returns the parameter name as it appears in the query string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Depth => "depth",
            Self::Fields => "fields",
            Self::Filter => "filter",
            Self::Insert => "insert",
            Self::Point => "point",
            Self::StartTime => "start-time",
            Self::StopTime => "stop-time",
            Self::WithDefaults => "with-defaults",
        }
    }

    /// Looks up a parameter by its exact name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for QueryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryParameter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| QueryError::InvalidParamName {
            name: s.to_string(),
            reason: "not a RESTCONF query parameter",
        })
    }
}

fn invalid_value(param: QueryParameter, value: &str, reason: &'static str) -> QueryError {
    QueryError::InvalidParamValue {
        name: param.as_str().to_string(),
        value: value.to_string(),
        reason,
    }
}

/// Value of the `content` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Content {
    /// Configuration descendants only
    Config,
    /// Non-configuration descendants only
    Nonconfig,
    /// All descendants
    All,
}

impl Content {
    /// Returns the query string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Nonconfig => "nonconfig",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Content {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "config" => Ok(Self::Config),
            "nonconfig" => Ok(Self::Nonconfig),
            "all" => Ok(Self::All),
            _ => Err(invalid_value(
                QueryParameter::Content,
                s,
                "expected 'config', 'nonconfig' or 'all'",
            )),
        }
    }
}

/// Value of the `depth` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    /// Descend at most this many levels, `1..=65535`
    Bounded(u16),
    /// No depth limit
    Unbounded,
}

impl Depth {
    /// Returns the level limit, or `None` when unbounded.
    #[must_use]
    pub const fn limit(self) -> Option<u16> {
        match self {
            Self::Bounded(n) => Some(n),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl FromStr for Depth {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "unbounded" {
            return Ok(Self::Unbounded);
        }
        match s.parse::<u16>() {
            Ok(n) if (1..=MAX_DEPTH).contains(&n) => Ok(Self::Bounded(n)),
            _ => Err(invalid_value(
                QueryParameter::Depth,
                s,
                "expected 'unbounded' or an integer from 1 to 65535",
            )),
        }
    }
}

/// Value of the `insert` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insert {
    /// Insert as the first entry
    First,
    /// Insert as the last entry
    Last,
    /// Insert before the entry named by `point`
    Before,
    /// Insert after the entry named by `point`
    After,
}

impl Insert {
    /// Returns the query string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Before => "before",
            Self::After => "after",
        }
    }

    /// Returns true if this insert position needs a `point` parameter.
    #[must_use]
    pub const fn needs_point(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Insert {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(invalid_value(
                QueryParameter::Insert,
                s,
                "expected 'first', 'last', 'before' or 'after'",
            )),
        }
    }
}

/// Value of the `with-defaults` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WithDefaults {
    /// Report every default leaf
    ReportAll,
    /// Omit leafs equal to their default
    Trim,
    /// Report leafs set explicitly, even to the default
    Explicit,
    /// Report all, tagging defaults
    ReportAllTagged,
}

impl WithDefaults {
    /// Returns the query string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReportAll => "report-all",
            Self::Trim => "trim",
            Self::Explicit => "explicit",
            Self::ReportAllTagged => "report-all-tagged",
        }
    }
}

impl fmt::Display for WithDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WithDefaults {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "report-all" => Ok(Self::ReportAll),
            "trim" => Ok(Self::Trim),
            "explicit" => Ok(Self::Explicit),
            "report-all-tagged" => Ok(Self::ReportAllTagged),
            _ => Err(invalid_value(
                QueryParameter::WithDefaults,
                s,
                "expected 'report-all', 'trim', 'explicit' or 'report-all-tagged'",
            )),
        }
    }
}

/// Decoded query parameters from a RESTCONF request URI.
///
/// Pairs keep their original order and repeats are preserved, so a consumer
/// can reject a repeated single-instance parameter with
/// [`check_duplicates`](Self::check_duplicates). Values are percent-decoded
/// but otherwise kept raw; the typed accessors parse them on demand.
///
/// # Examples
///
/// ```
/// use restconf_uri::{Depth, QueryParams};
///
/// let params = QueryParams::parse("depth=3&fields=a(b;c)&x-vendor=1").unwrap();
/// assert_eq!(params.depth().unwrap(), Some(Depth::Bounded(3)));
/// assert_eq!(params.fields(), Some("a(b;c)"));
/// assert_eq!(params.get("x-vendor"), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    params: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty query params instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses query parameters from a query string (without leading '?').
    ///
    /// Empty pairs are skipped; a name without `=` has an empty value.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if a name is empty or contains characters other
    /// than letters, digits, `-`, `_` and `.`, or a value has a malformed
    /// percent escape.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let result = Self::parse_inner(input);
        if let Err(e) = &result {
            debug!(input, error = %e, "rejected query string");
        }
        result
    }

    fn parse_inner(input: &str) -> Result<Self, QueryError> {
        let mut params = Vec::new();

        for pair in input.split('&').filter(|pair| !pair.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));

            Self::validate_param_name(name)?;

            let decoded = percent::decode(value).ok_or_else(|| QueryError::InvalidPercentEncoding {
                value: value.to_string(),
            })?;

            params.push((name.to_string(), decoded.into_owned()));
        }

        Ok(Self { params })
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// Returns the first value for a parameter, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value given for a parameter, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of a recognized parameter, if present.
    #[must_use]
    pub fn get_param(&self, param: QueryParameter) -> Option<&str> {
        self.get(param.as_str())
    }

    /// Returns true if the parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|(k, _)| k == name)
    }

    /// Returns true if the query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of parameters, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns an iterator over the parameters in query string order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the parameters RESTCONF does not define.
    pub fn unrecognized(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(name, _)| QueryParameter::from_name(name).is_none())
    }

    /// Returns the recognized parameters that appear more than once.
    #[must_use]
    pub fn duplicates(&self) -> Vec<QueryParameter> {
        QueryParameter::ALL
            .into_iter()
            .filter(|p| self.get_all(p.as_str()).nth(1).is_some())
            .collect()
    }

    /// Fails on the first recognized parameter that appears more than once.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::DuplicateParam` naming the repeated parameter.
    pub fn check_duplicates(&self) -> Result<(), QueryError> {
        match self.duplicates().first() {
            Some(param) => Err(QueryError::DuplicateParam {
                name: param.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the parsed `content` parameter.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidParamValue` for an unknown value.
    pub fn content(&self) -> Result<Option<Content>, QueryError> {
        self.typed(QueryParameter::Content)
    }

    /// Returns the parsed `depth` parameter.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidParamValue` unless the value is
    /// `unbounded` or an integer from 1 to 65535.
    pub fn depth(&self) -> Result<Option<Depth>, QueryError> {
        self.typed(QueryParameter::Depth)
    }

    /// Returns the parsed `insert` parameter.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidParamValue` for an unknown value.
    pub fn insert(&self) -> Result<Option<Insert>, QueryError> {
        self.typed(QueryParameter::Insert)
    }

    /// Returns the parsed `with-defaults` parameter.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidParamValue` for an unknown value.
    pub fn with_defaults(&self) -> Result<Option<WithDefaults>, QueryError> {
        self.typed(QueryParameter::WithDefaults)
    }

    /// Returns the raw `fields` expression.
    #[must_use]
    pub fn fields(&self) -> Option<&str> {
        self.get_param(QueryParameter::Fields)
    }

    /// Returns the raw `filter` expression.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.get_param(QueryParameter::Filter)
    }

    /// Returns the raw `point` instance identifier.
    #[must_use]
    pub fn point(&self) -> Option<&str> {
        self.get_param(QueryParameter::Point)
    }

    /// Returns the raw `start-time` value.
    #[must_use]
    pub fn start_time(&self) -> Option<&str> {
        self.get_param(QueryParameter::StartTime)
    }

    /// Returns the raw `stop-time` value.
    #[must_use]
    pub fn stop_time(&self) -> Option<&str> {
        self.get_param(QueryParameter::StopTime)
    }

    fn typed<T>(&self, param: QueryParameter) -> Result<Option<T>, QueryError>
    where
        T: FromStr<Err = QueryError>,
    {
        self.get_param(param).map(str::parse).transpose()
    }

    fn validate_param_name(name: &str) -> Result<(), QueryError> {
        if name.is_empty() {
            return Err(QueryError::InvalidParamName {
                name: name.to_string(),
                reason: "parameter name cannot be empty",
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(QueryError::InvalidParamName {
                name: name.to_string(),
                reason: "name must be alphanumeric, '-', '_' or '.'",
            });
        }

        Ok(())
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            if value.is_empty() {
                f.write_str(name)?;
            } else {
                write!(f, "{name}={}", percent::encode_query(value))?;
            }
        }
        Ok(())
    }
}

impl FromStr for QueryParams {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looked_up_value_outlives_name() {
        let query = QueryParams::parse("depth=3&depth=4").unwrap();
        let value = {
            let name = String::from("depth");
            query.get(&name)
        };
        assert_eq!(value, Some("3"));
        assert_eq!(query.get("fields"), None);
    }

    #[test]
    fn parse_empty() {
        let params = QueryParams::parse("").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn parse_multiple_params_in_order() {
        let params = QueryParams::parse("depth=2&content=config").unwrap();
        let items: Vec<_> = params.iter().collect();
        assert_eq!(items, vec![("depth", "2"), ("content", "config")]);
    }

    #[test]
    fn parse_param_without_value() {
        let params = QueryParams::parse("flag&&other=1").unwrap();
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = QueryParams::parse("point=%2Fex%3Ajukebox%2Fsong%3D5").unwrap();
        assert_eq!(params.point(), Some("/ex:jukebox/song=5"));
    }

    #[test]
    fn plus_is_literal() {
        let params = QueryParams::parse("start-time=2016-01-01T00:00:00+01:00").unwrap();
        assert_eq!(params.start_time(), Some("2016-01-01T00:00:00+01:00"));
    }

    #[test]
    fn duplicates_are_kept_and_reported() {
        let params = QueryParams::parse("depth=1&depth=2&x=1&x=2").unwrap();
        assert_eq!(params.get_all("depth").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(params.duplicates(), vec![QueryParameter::Depth]);
        assert!(matches!(
            params.check_duplicates(),
            Err(QueryError::DuplicateParam { name }) if name == "depth"
        ));
    }

    #[test]
    fn unrecognized_repeats_are_not_duplicates() {
        let params = QueryParams::parse("x=1&x=2").unwrap();
        assert!(params.check_duplicates().is_ok());
        assert_eq!(params.unrecognized().count(), 2);
    }

    #[test]
    fn parse_invalid_name_fails() {
        let result = QueryParams::parse("invalid@name=value");
        assert!(matches!(result, Err(QueryError::InvalidParamName { .. })));
        assert!(matches!(
            QueryParams::parse("=value"),
            Err(QueryError::InvalidParamName { .. })
        ));
    }

    #[test]
    fn parse_invalid_encoding_fails() {
        let result = QueryParams::parse("filter=%GG");
        assert!(matches!(result, Err(QueryError::InvalidPercentEncoding { .. })));
    }

    #[test]
    fn depth_values() {
        let depth = |q: &str| QueryParams::parse(q).unwrap().depth();
        assert_eq!(depth("depth=unbounded").unwrap(), Some(Depth::Unbounded));
        assert_eq!(depth("depth=65535").unwrap(), Some(Depth::Bounded(65535)));
        assert_eq!(depth("").unwrap(), None);
        assert!(depth("depth=0").is_err());
        assert!(depth("depth=65536").is_err());
        assert!(depth("depth=-1").is_err());
    }

    #[test]
    fn enumerated_values() {
        let params =
            QueryParams::parse("content=nonconfig&insert=before&with-defaults=report-all-tagged")
                .unwrap();
        assert_eq!(params.content().unwrap(), Some(Content::Nonconfig));
        assert_eq!(params.insert().unwrap(), Some(Insert::Before));
        assert!(params.insert().unwrap().unwrap().needs_point());
        assert_eq!(params.with_defaults().unwrap(), Some(WithDefaults::ReportAllTagged));

        let bad = QueryParams::parse("content=everything").unwrap();
        assert!(matches!(
            bad.content(),
            Err(QueryError::InvalidParamValue { name, .. }) if name == "content"
        ));
    }

    #[test]
    fn parameter_names() {
        for param in QueryParameter::ALL {
            assert_eq!(param.as_str().parse::<QueryParameter>().unwrap(), param);
        }
        assert!("Depth".parse::<QueryParameter>().is_err());
    }

    #[test]
    fn display_encodes_values() {
        let mut params = QueryParams::new();
        params.push("depth", "2");
        params.push("filter", "a = b");
        params.push("flag", "");
        assert_eq!(params.to_string(), "depth=2&filter=a%20%3D%20b&flag");
        assert_eq!(QueryParams::parse(&params.to_string()).unwrap(), params);
    }
}
