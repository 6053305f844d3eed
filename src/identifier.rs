//! YANG identifier type.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::IdentifierError;

/// Returns true if `input` is a syntactically legal YANG identifier.
///
/// ```text
/// identifier = (ALPHA / "_") *(ALPHA / DIGIT / "_" / "-" / ".")
/// ```
///
/// # Examples
///
/// ```
/// use restconf_uri::valid_identifier;
///
/// assert!(valid_identifier("ietf-interfaces"));
/// assert!(valid_identifier("_private.v2"));
/// assert!(!valid_identifier("2fast"));
/// assert!(!valid_identifier("has space"));
/// assert!(!valid_identifier(""));
/// ```
#[must_use]
pub fn valid_identifier(input: &str) -> bool {
    Identifier::check(input).is_ok()
}

/// A validated YANG identifier.
///
/// Identifiers name modules, containers, lists and leaves. The "must not
/// start with `xml`" rule from older YANG drafts is not enforced.
///
/// # Examples
///
/// ```
/// use restconf_uri::Identifier;
///
/// let id = Identifier::parse("interfaces").unwrap();
/// assert_eq!(id.as_str(), "interfaces");
///
/// assert!(Identifier::parse("-leading-dash").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Parses an identifier from a string.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError` if:
    /// - The identifier is empty
    /// - The first character is not a letter or underscore
    /// - Any character is outside `A-Z a-z 0-9 _ - .`
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        Self::check(input)?;
        Ok(Self(input.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the character may start an identifier.
    #[must_use]
    pub const fn is_valid_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    /// Returns true if the character may appear in an identifier.
    #[must_use]
    pub const fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
    }

    fn check(input: &str) -> Result<(), IdentifierError> {
        let mut chars = input.chars();
        let first = chars.next().ok_or(IdentifierError::Empty)?;

        if !Self::is_valid_char(first) {
            return Err(IdentifierError::InvalidChar {
                char: first,
                position: 0,
            });
        }
        if !Self::is_valid_start(first) {
            return Err(IdentifierError::InvalidStart { found: first });
        }

        for (i, c) in chars.enumerate() {
            if !Self::is_valid_char(c) {
                return Err(IdentifierError::InvalidChar {
                    char: c,
                    position: i + 1,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Identifier {
    type Error = IdentifierError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_START: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    const VALID_CHARS: &str =
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-.";

    #[test]
    fn every_good_start_is_valid_alone() {
        for c in GOOD_START.chars() {
            assert!(valid_identifier(&c.to_string()), "{c} should be valid");
        }
    }

    #[test]
    fn every_valid_char_may_follow_a_good_start() {
        for c in VALID_CHARS.chars() {
            assert!(valid_identifier(&format!("a{c}")), "a{c} should be valid");
        }
    }

    #[test]
    fn digits_dash_and_dot_cannot_start() {
        for c in "0123456789-.".chars() {
            let result = Identifier::parse(&format!("{c}abc"));
            assert!(matches!(result, Err(IdentifierError::InvalidStart { found }) if found == c));
        }
    }

    #[test]
    fn printable_invalid_chars_are_rejected_anywhere() {
        for c in " !\"#$%&'()*+,/:;<=>?@[\\]^`{|}~\t".chars() {
            assert!(!valid_identifier(&c.to_string()));
            assert!(!valid_identifier(&format!("a{c}b")));
            assert!(!valid_identifier(&format!("ab{c}")));
        }
    }

    #[test]
    fn parse_empty_fails() {
        assert!(matches!(Identifier::parse(""), Err(IdentifierError::Empty)));
        assert!(!valid_identifier(""));
    }

    #[test]
    fn invalid_char_reports_position() {
        let result = Identifier::parse("abc:def");
        assert!(matches!(
            result,
            Err(IdentifierError::InvalidChar { char: ':', position: 3 })
        ));
    }

    #[test]
    fn non_ascii_letters_are_rejected() {
        assert!(!valid_identifier("caf\u{e9}"));
        assert!(!valid_identifier("\u{e9}t\u{e9}"));
    }

    #[test]
    fn xml_prefix_is_allowed() {
        assert!(valid_identifier("xml-thing"));
        assert!(valid_identifier("XMLish"));
    }
}
