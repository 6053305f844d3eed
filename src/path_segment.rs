//! Path segment types for RESTCONF api-paths.

use std::fmt;

use crate::identifier::Identifier;
use crate::list_instance::{ListInstance, ListKey};

/// A node name with the module it resolves to.
///
/// ```text
/// api-identifier = [module-name ":"] identifier
/// ```
///
/// `module` is the resolved module: the explicit prefix when one was written,
/// otherwise the module carried from the previous segment. `is_qualified`
/// records whether the prefix appeared in the text.
///
/// # Examples
///
/// ```
/// use restconf_uri::{ApiIdentifier, Identifier};
///
/// let module = Identifier::parse("example-jukebox").unwrap();
/// let name = Identifier::parse("jukebox").unwrap();
/// let id = ApiIdentifier::new(Some(module), name, true);
/// assert_eq!(id.to_string(), "example-jukebox:jukebox");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiIdentifier {
    module: Option<Identifier>,
    name: Identifier,
    qualified: bool,
}

impl ApiIdentifier {
    /// Creates an api-identifier. `qualified` only takes effect with a module.
    #[must_use]
    pub fn new(module: Option<Identifier>, name: Identifier, qualified: bool) -> Self {
        let qualified = qualified && module.is_some();
        Self {
            module,
            name,
            qualified,
        }
    }

    /// Returns the resolved module, if any module is in scope.
    #[must_use]
    pub const fn module(&self) -> Option<&Identifier> {
        self.module.as_ref()
    }

    /// Returns the node name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        &self.name
    }

    /// Returns true if the module prefix was written explicitly.
    #[must_use]
    pub const fn is_qualified(&self) -> bool {
        self.qualified
    }

    pub(crate) fn set_qualified(&mut self, qualified: bool) {
        self.qualified = qualified && self.module.is_some();
    }
}

impl fmt::Display for ApiIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.module, self.qualified) {
            (Some(module), true) => write!(f, "{module}:{}", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// One segment of a target resource path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// A container, leaf, or other non-list node
    Identifier(ApiIdentifier),
    /// A list or leaf-list entry selected by key values
    ListInstance(ListInstance),
}

impl PathSegment {
    /// Returns the api-identifier of this segment.
    #[must_use]
    pub const fn identifier(&self) -> &ApiIdentifier {
        match self {
            Self::Identifier(id) => id,
            Self::ListInstance(list) => list.identifier(),
        }
    }

    /// Returns the node name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        self.identifier().name()
    }

    /// Returns the resolved module.
    #[must_use]
    pub const fn module(&self) -> Option<&Identifier> {
        self.identifier().module()
    }

    /// Returns the keys of a list-instance segment; empty otherwise.
    #[must_use]
    pub fn keys(&self) -> &[ListKey] {
        match self {
            Self::Identifier(_) => &[],
            Self::ListInstance(list) => list.keys(),
        }
    }

    /// Returns true if this segment selects a list entry.
    #[must_use]
    pub const fn is_list_instance(&self) -> bool {
        matches!(self, Self::ListInstance(_))
    }

    /// Returns the list instance, if this segment is one.
    #[must_use]
    pub const fn as_list_instance(&self) -> Option<&ListInstance> {
        match self {
            Self::Identifier(_) => None,
            Self::ListInstance(list) => Some(list),
        }
    }

    /// Renders the segment without any module prefix.
    #[must_use]
    pub fn local_form(&self) -> String {
        match self {
            Self::Identifier(id) => id.name().to_string(),
            Self::ListInstance(list) => format!("{}={}", list.name(), KeysDisplay(list)),
        }
    }

    /// Renders the segment with a module prefix when `module` differs from
    /// the parent's, using canonical key encoding.
    pub(crate) fn canonical_form(&self, parent: Option<&Identifier>) -> String {
        let id = self.identifier();
        let mut out = match id.module() {
            Some(module) if Some(module) != parent => format!("{module}:{}", id.name()),
            _ => id.name().to_string(),
        };
        if let Self::ListInstance(list) = self {
            out.push('=');
            out.push_str(&list.encoded_keys());
        }
        out
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(id) => write!(f, "{id}"),
            Self::ListInstance(list) => write!(f, "{list}"),
        }
    }
}

struct KeysDisplay<'a>(&'a ListInstance);

impl fmt::Display for KeysDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_keys(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_instance::parse_list_instance;

    fn ident(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    #[test]
    fn unqualified_display_hides_module() {
        let id = ApiIdentifier::new(Some(ident("abcd")), ident("ijkl"), false);
        assert_eq!(id.to_string(), "ijkl");
        assert_eq!(id.module(), Some(&ident("abcd")));
    }

    #[test]
    fn qualified_without_module_is_unqualified() {
        let id = ApiIdentifier::new(None, ident("abcd"), true);
        assert!(!id.is_qualified());
        assert_eq!(id.to_string(), "abcd");
    }

    #[test]
    fn list_segment_accessors() {
        let list = parse_list_instance(Some(&ident("m")), "entry=1,x").unwrap();
        let seg = PathSegment::ListInstance(list);
        assert!(seg.is_list_instance());
        assert_eq!(seg.name().as_str(), "entry");
        assert_eq!(seg.module(), Some(&ident("m")));
        assert_eq!(seg.keys().len(), 2);
        assert_eq!(seg.local_form(), "entry=1,x");
    }

    #[test]
    fn identifier_segment_has_no_keys() {
        let seg = PathSegment::Identifier(ApiIdentifier::new(None, ident("top"), false));
        assert!(seg.keys().is_empty());
        assert!(seg.as_list_instance().is_none());
    }

    #[test]
    fn canonical_form_adds_module_on_change() {
        let seg = PathSegment::Identifier(ApiIdentifier::new(Some(ident("b")), ident("x"), false));
        assert_eq!(seg.canonical_form(Some(&ident("a"))), "b:x");
        assert_eq!(seg.canonical_form(Some(&ident("b"))), "x");
        assert_eq!(seg.canonical_form(None), "b:x");
    }

    #[test]
    fn canonical_form_encodes_keys() {
        let list = parse_list_instance(Some(&ident("m")), "entry='a,b',2").unwrap();
        let seg = PathSegment::ListInstance(list);
        assert_eq!(seg.canonical_form(None), "m:entry=a%2Cb,2");
    }
}
