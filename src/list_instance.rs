//! List-instance segments and their typed key values.

use std::fmt;

use num_bigint::BigInt;
use tracing::debug;

use crate::error::ListInstanceError;
use crate::identifier::Identifier;
use crate::path_segment::ApiIdentifier;
use crate::percent;

/// A decoded list key value.
///
/// Tokens are coerced in order: boolean literal, base-10 integer, decimal
/// float, and finally an opaque string. Integers keep arbitrary precision.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    /// Anything that is not a boolean or a number
    String(String),
    /// `true`, `True`, `false` or `False`
    Boolean(bool),
    /// Optionally signed base-10 integer
    Integer(BigInt),
    /// Optionally signed decimal with a fractional part
    Float(f64),
}

impl KeyValue {
    /// Coerces a decoded, unquoted token into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `ListInstanceError::InvalidBoolean` for boolean literals in
    /// any casing other than `true`/`True`/`false`/`False`.
    ///
    /// # Examples
    ///
    /// ```
    /// use restconf_uri::KeyValue;
    ///
    /// assert_eq!(KeyValue::coerce("True").unwrap(), KeyValue::Boolean(true));
    /// assert_eq!(KeyValue::coerce("-42").unwrap(), KeyValue::Integer((-42).into()));
    /// assert_eq!(KeyValue::coerce(".5").unwrap(), KeyValue::Float(0.5));
    /// assert_eq!(KeyValue::coerce("eth0").unwrap(), KeyValue::String("eth0".into()));
    /// assert!(KeyValue::coerce("TRUE").is_err());
    /// ```
    pub fn coerce(token: &str) -> Result<Self, ListInstanceError> {
        match token {
            "true" | "True" => return Ok(Self::Boolean(true)),
            "false" | "False" => return Ok(Self::Boolean(false)),
            _ => {}
        }

        if token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("false") {
            return Err(ListInstanceError::InvalidBoolean {
                value: token.to_string(),
            });
        }

        if is_integer(token) {
            let digits = token.strip_prefix('+').unwrap_or(token);
            if let Ok(value) = digits.parse::<BigInt>() {
                return Ok(Self::Integer(value));
            }
        }

        if is_decimal(token) {
            if let Ok(value) = token.parse::<f64>() {
                return Ok(Self::Float(value));
            }
        }

        Ok(Self::String(token.to_string()))
    }

    /// Returns the string value, if this is a string key.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean key.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer key.
    #[must_use]
    pub const fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Self::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the float value, if this is a float key.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            // Positional notation with a fractional digit, so the text re-coerces to a float.
            Self::Float(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<BigInt> for KeyValue {
    fn from(value: BigInt) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<bool> for KeyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for KeyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One key of a list instance: the typed value plus how it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ListKey {
    value: KeyValue,
    /// Decoded text with quotes removed
    text: String,
    quote: Option<char>,
}

impl ListKey {
    /// Creates an unquoted key from a typed value.
    #[must_use]
    pub fn new(value: impl Into<KeyValue>) -> Self {
        let value = value.into();
        let text = value.to_string();
        Self {
            value,
            text,
            quote: None,
        }
    }

    /// Returns the typed value.
    #[must_use]
    pub const fn value(&self) -> &KeyValue {
        &self.value
    }

    /// Returns the decoded, unquoted text of the key.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the quote character the key was written with, if any.
    #[must_use]
    pub const fn quote(&self) -> Option<char> {
        self.quote
    }

    /// Returns true if the key was written in quotes.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }

    /// Renders the key in canonical, percent-encoded form.
    ///
    /// The key is written unquoted unless its text starts with a quote
    /// character, which would otherwise open a quoted key on re-parse.
    #[must_use]
    pub fn encoded(&self) -> String {
        if self.text.starts_with(is_quote) {
            quote_text(&self.text, '"')
        } else {
            percent::encode_key(&self.text).into_owned()
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, force_quote: bool) -> fmt::Result {
        let quote = self.quote.or_else(|| {
            let needs = force_quote || self.text.starts_with(is_quote);
            needs.then_some('"')
        });

        match quote {
            Some(q) => f.write_str(&quote_text(&self.text, q)),
            None => f.write_str(&percent::encode_key(&self.text)),
        }
    }
}

/// Wraps `text` in `q`, escaping `q` and `\` with a backslash.
fn quote_text(text: &str, q: char) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == q || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("{q}{}{q}", percent::encode_quoted_key(&escaped))
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// A list entry addressed by name and ordered key values.
///
/// ```text
/// list-instance = api-identifier "=" key-value ["," key-value]*
/// ```
///
/// # Examples
///
/// ```
/// use restconf_uri::{KeyValue, parse_list_instance};
///
/// let list = parse_list_instance(None, "interface=eth0,12").unwrap();
/// assert_eq!(list.name().as_str(), "interface");
/// assert_eq!(list.keys()[0].value(), &KeyValue::String("eth0".into()));
/// assert_eq!(list.keys()[1].value(), &KeyValue::Integer(12.into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListInstance {
    pub(crate) identifier: ApiIdentifier,
    keys: Vec<ListKey>,
}

impl ListInstance {
    /// Creates a list instance from an identifier and keys in YANG `key` order.
    #[must_use]
    pub const fn new(identifier: ApiIdentifier, keys: Vec<ListKey>) -> Self {
        Self { identifier, keys }
    }

    /// Returns the (possibly module-qualified) list name.
    #[must_use]
    pub const fn identifier(&self) -> &ApiIdentifier {
        &self.identifier
    }

    /// Returns the list name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        self.identifier.name()
    }

    /// Returns the keys in the order they were given.
    #[must_use]
    pub fn keys(&self) -> &[ListKey] {
        &self.keys
    }

    /// Returns the typed key values in order.
    pub fn values(&self) -> impl Iterator<Item = &KeyValue> {
        self.keys.iter().map(ListKey::value)
    }

    /// Renders `name=key,key` with canonical key encoding.
    #[must_use]
    pub fn encoded_keys(&self) -> String {
        if let [only] = self.keys.as_slice() {
            if only.text.is_empty() {
                return "\"\"".to_string();
            }
        }
        self.keys
            .iter()
            .map(ListKey::encoded)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn fmt_keys(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A lone empty key must stay visible, or `name=` would read as no keys.
        let lone_empty = matches!(self.keys.as_slice(), [only] if only.text.is_empty());
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            key.render(f, lone_empty)?;
        }
        Ok(())
    }
}

impl fmt::Display for ListInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.identifier)?;
        self.fmt_keys(f)
    }
}

/// Decodes a `name=key[,key]*` segment.
///
/// The segment must already have any `module:` prefix removed; `module` is
/// the module in scope for the list name. Only the first `=` separates the
/// name from the keys.
///
/// # Errors
///
/// Returns `ListInstanceError` if the name is not an identifier, no keys are
/// given, a quote is unterminated, a boolean literal has unsupported casing,
/// or percent encoding is malformed.
///
/// # Examples
///
/// ```
/// use restconf_uri::{KeyValue, parse_list_instance};
///
/// let list = parse_list_instance(None, "a=b,,\"d\"").unwrap();
/// let values: Vec<_> = list.values().cloned().collect();
/// assert_eq!(
///     values,
///     vec![
///         KeyValue::String("b".into()),
///         KeyValue::String(String::new()),
///         KeyValue::String("d".into()),
///     ]
/// );
/// assert_eq!(list.to_string(), "a=b,,\"d\"");
/// ```
pub fn parse_list_instance(
    module: Option<&Identifier>,
    segment: &str,
) -> Result<ListInstance, ListInstanceError> {
    let result = parse_inner(module, segment);
    if let Err(e) = &result {
        debug!(segment, error = %e, "rejected list-instance");
    }
    result
}

fn parse_inner(
    module: Option<&Identifier>,
    segment: &str,
) -> Result<ListInstance, ListInstanceError> {
    let (name, raw_keys) = segment
        .split_once('=')
        .ok_or(ListInstanceError::MissingSeparator)?;

    let name = Identifier::parse(name).map_err(|reason| ListInstanceError::InvalidIdentifier {
        identifier: name.to_string(),
        reason,
    })?;

    let keys = decode_keys(raw_keys)?;

    Ok(ListInstance {
        identifier: ApiIdentifier::new(module.cloned(), name, false),
        keys,
    })
}

/// Splits a raw key list on literal, unquoted commas and coerces each key.
fn decode_keys(raw: &str) -> Result<Vec<ListKey>, ListInstanceError> {
    if raw.is_empty() {
        return Err(ListInstanceError::NoKeys);
    }

    let chars =
        percent::decode_marked(raw).ok_or_else(|| ListInstanceError::InvalidPercentEncoding {
            value: raw.to_string(),
        })?;

    let mut keys = Vec::new();
    let mut pos = 0;

    loop {
        let (text, quote, next) = match chars.get(pos) {
            Some(&(q, _)) if is_quote(q) => read_quoted(&chars, pos, q)?,
            _ => read_unquoted(&chars, pos),
        };

        let value = KeyValue::coerce(&text)?;
        keys.push(ListKey { value, text, quote });

        match next {
            Some(after_comma) => pos = after_comma,
            None => break,
        }
    }

    Ok(keys)
}

/// Reads up to the next literal comma. Returns the text and the index after the comma.
fn read_unquoted(chars: &[(char, bool)], start: usize) -> (String, Option<char>, Option<usize>) {
    let mut text = String::new();
    for (i, &(c, escaped)) in chars.iter().enumerate().skip(start) {
        if c == ',' && !escaped {
            return (text, None, Some(i + 1));
        }
        text.push(c);
    }
    (text, None, None)
}

/// Reads a quoted key starting at `start`, honoring backslash escapes.
fn read_quoted(
    chars: &[(char, bool)],
    start: usize,
    quote: char,
) -> Result<(String, Option<char>, Option<usize>), ListInstanceError> {
    let mut text = String::new();
    let mut i = start + 1;

    while let Some(&(c, _)) = chars.get(i) {
        match c {
            '\\' => {
                let &(next, _) = chars.get(i + 1).ok_or(ListInstanceError::UnterminatedQuote {
                    quote,
                    position: start,
                })?;
                text.push(next);
                i += 2;
            }
            c if c == quote => {
                return match chars.get(i + 1) {
                    None => Ok((text, Some(quote), None)),
                    Some(&(',', false)) => Ok((text, Some(quote), Some(i + 2))),
                    Some(&(other, _)) => Err(ListInstanceError::TrailingAfterQuote {
                        char: other,
                        position: i + 1,
                    }),
                };
            }
            c => {
                text.push(c);
                i += 1;
            }
        }
    }

    Err(ListInstanceError::UnterminatedQuote {
        quote,
        position: start,
    })
}

const fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(token: &str) -> bool {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let Some((whole, frac)) = unsigned.split_once('.') else {
        return false;
    };
    whole.bytes().all(|b| b.is_ascii_digit())
        && !frac.is_empty()
        && frac.bytes().all(|b| b.is_ascii_digit())
}
