//! Typestate builder for constructing [`ResourceAddress`] values.
//!
//! The first node of a data resource path must name its module, so the
//! builder only offers child segments once a module-qualified top-level node
//! has been set.

use std::marker::PhantomData;

use crate::error::{IdentifierError, ListInstanceError};
use crate::identifier::Identifier;
use crate::list_instance::{KeyValue, ListInstance, ListKey};
use crate::path_segment::{ApiIdentifier, PathSegment};
use crate::query::QueryParams;
use crate::resource::ResourceAddress;

/// Marker: No segments set yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

/// Marker: The module-qualified top-level node has been set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rooted;

/// A typestate builder for [`ResourceAddress`] values and `Location` paths.
///
/// # Type State
///
/// - [`Empty`]: Initial state; only [`top`](LocationBuilder::top) is available
/// - [`Rooted`]: Top-level node set; children, list entries and `build()`
///   are available
///
/// # Examples
///
/// ```
/// use restconf_uri::LocationBuilder;
///
/// let address = LocationBuilder::new()
///     .try_top("example-jukebox", "jukebox")?
///     .try_child("library")?
///     .try_list("artist", ["Foo Fighters"])?
///     .build();
///
/// assert_eq!(address.to_string(), "/example-jukebox:jukebox/library/artist=Foo%20Fighters");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Compile-Time Safety
///
/// A child cannot be added before the top-level node:
///
/// ```compile_fail
/// use restconf_uri::LocationBuilder;
///
/// let builder = LocationBuilder::new().try_child("library");  // Compile error!
/// ```
#[derive(Debug, Clone)]
pub struct LocationBuilder<State = Empty> {
    segments: Vec<PathSegment>,
    module: Option<Identifier>,
    query: QueryParams,
    _state: PhantomData<State>,
}

impl LocationBuilder<Empty> {
    /// Creates a new builder in the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            module: None,
            query: QueryParams::new(),
            _state: PhantomData,
        }
    }

    /// Sets the top-level node and advances to the [`Rooted`] state.
    #[must_use]
    pub fn top(self, module: Identifier, name: Identifier) -> LocationBuilder<Rooted> {
        let id = ApiIdentifier::new(Some(module.clone()), name, true);
        LocationBuilder {
            segments: vec![PathSegment::Identifier(id)],
            module: Some(module),
            query: self.query,
            _state: PhantomData,
        }
    }

    /// Parses and sets the top-level node.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] if either name is not a valid identifier.
    pub fn try_top(
        self,
        module: &str,
        name: &str,
    ) -> Result<LocationBuilder<Rooted>, IdentifierError> {
        Ok(self.top(Identifier::parse(module)?, Identifier::parse(name)?))
    }
}

impl Default for LocationBuilder<Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationBuilder<Rooted> {
    /// Appends a child node in the current module.
    #[must_use]
    pub fn child(mut self, name: Identifier) -> Self {
        let id = ApiIdentifier::new(self.module.clone(), name, false);
        self.segments.push(PathSegment::Identifier(id));
        self
    }

    /// Appends a child node from another module (an augmentation).
    ///
    /// Later children belong to `module` unless switched again.
    #[must_use]
    pub fn child_in(mut self, module: Identifier, name: Identifier) -> Self {
        let qualified = self.module.as_ref() != Some(&module);
        let id = ApiIdentifier::new(Some(module.clone()), name, qualified);
        self.segments.push(PathSegment::Identifier(id));
        self.module = Some(module);
        self
    }

    /// Parses and appends a child node in the current module.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] if `name` is not a valid identifier.
    pub fn try_child(self, name: &str) -> Result<Self, IdentifierError> {
        Ok(self.child(Identifier::parse(name)?))
    }

    /// Appends a list entry selected by `keys`, in YANG `key` order.
    ///
    /// # Errors
    ///
    /// Returns `ListInstanceError::NoKeys` if `keys` is empty.
    pub fn list<I, K>(mut self, name: Identifier, keys: I) -> Result<Self, ListInstanceError>
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyValue>,
    {
        let keys: Vec<ListKey> = keys.into_iter().map(ListKey::new).collect();
        if keys.is_empty() {
            return Err(ListInstanceError::NoKeys);
        }
        let id = ApiIdentifier::new(self.module.clone(), name, false);
        self.segments
            .push(PathSegment::ListInstance(ListInstance::new(id, keys)));
        Ok(self)
    }

    /// Parses the list name and appends a list entry.
    ///
    /// # Errors
    ///
    /// Returns `ListInstanceError` if `name` is not a valid identifier or
    /// `keys` is empty.
    pub fn try_list<I, K>(self, name: &str, keys: I) -> Result<Self, ListInstanceError>
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyValue>,
    {
        let id = Identifier::parse(name).map_err(|reason| ListInstanceError::InvalidIdentifier {
            identifier: name.to_string(),
            reason,
        })?;
        self.list(id, keys)
    }

    /// Builds the address.
    #[must_use]
    pub fn build(self) -> ResourceAddress {
        ResourceAddress::from_segments(self.segments)
    }

    /// Builds the `Location` header path under `entry_point`, with the query
    /// string if one was set.
    ///
    /// # Examples
    ///
    /// ```
    /// use restconf_uri::{LocationBuilder, QueryParams};
    ///
    /// let location = LocationBuilder::new()
    ///     .try_top("ietf-interfaces", "interfaces")?
    ///     .try_list("interface", ["eth0"])?
    ///     .query(QueryParams::parse("depth=1")?)
    ///     .location("restconf");
    ///
    /// assert_eq!(location, "/restconf/data/ietf-interfaces:interfaces/interface=eth0?depth=1");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn location(self, entry_point: &str) -> String {
        let query = self.query.to_string();
        let mut location = self.build().location(entry_point);
        if !query.is_empty() {
            location.push('?');
            location.push_str(&query);
        }
        location
    }
}

/// Methods available in every state.
impl<State> LocationBuilder<State> {
    /// Sets the query parameters appended by `location()`.
    ///
    /// If called multiple times, the last value wins.
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Returns the number of segments set so far.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::parse_path;

    fn ident(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    #[test]
    fn builds_parseable_path() {
        let address = LocationBuilder::new()
            .top(ident("ex"), ident("top"))
            .list(ident("entry"), [KeyValue::from(7_i64), KeyValue::from("a,b")])
            .unwrap()
            .child(ident("leaf"))
            .build();

        let text = address.to_string();
        assert_eq!(text, "/ex:top/entry=7,a%2Cb/leaf");

        let reparsed = parse_path(&text);
        assert!(reparsed.is_valid());
        let list = reparsed.segments()[1].as_list_instance().unwrap();
        assert_eq!(list.keys()[0].value(), &KeyValue::Integer(7.into()));
        assert_eq!(list.keys()[1].value(), &KeyValue::String("a,b".into()));
    }

    #[test]
    fn child_in_other_module_is_qualified() {
        let address = LocationBuilder::new()
            .top(ident("a"), ident("x"))
            .child_in(ident("b"), ident("y"))
            .child(ident("z"))
            .build();

        assert_eq!(address.to_string(), "/a:x/b:y/z");
        assert_eq!(address.segments()[2].module().unwrap().as_str(), "b");
        assert_eq!(address.canonical(), "/a:x/b:y/z");
    }

    #[test]
    fn child_in_same_module_is_not_repeated() {
        let address = LocationBuilder::new()
            .top(ident("a"), ident("x"))
            .child_in(ident("a"), ident("y"))
            .build();
        assert_eq!(address.to_string(), "/a:x/y");
    }

    #[test]
    fn list_needs_keys() {
        let result = LocationBuilder::new()
            .top(ident("a"), ident("x"))
            .list(ident("entry"), Vec::<KeyValue>::new());
        assert!(matches!(result, Err(ListInstanceError::NoKeys)));
    }

    #[test]
    fn try_methods_validate_names() {
        assert!(LocationBuilder::new().try_top("9bad", "x").is_err());
        let rooted = LocationBuilder::new().try_top("a", "x").unwrap();
        assert!(rooted.clone().try_child("has space").is_err());
        assert!(matches!(
            rooted.try_list("-bad", [1_i64]),
            Err(ListInstanceError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn depth_counts_segments() {
        let builder = LocationBuilder::new();
        assert_eq!(builder.depth(), 0);
        let builder = builder.top(ident("a"), ident("x")).child(ident("y"));
        assert_eq!(builder.depth(), 2);
    }

    #[test]
    fn location_without_query() {
        let location = LocationBuilder::new()
            .top(ident("m"), ident("c"))
            .location("/restconf/");
        assert_eq!(location, "/restconf/data/m:c");
    }
}
