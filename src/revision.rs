//! Last-modified timestamps and entity tags for configuration data resources.
//!
//! A server keeps a revision for the `{+restconf}/data` resource and for each
//! configuration node below it. A change to a configuration node refreshes
//! its revision and the revision of every ancestor. Changes to non-configuration
//! data leave revisions untouched.

use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::trace;
use uuid::Uuid;

use crate::error::RevisionError;

/// Format of an HTTP `Last-Modified` header (IMF-fixdate).
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// An opaque entity tag, regenerated on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityTag(Uuid);

impl EntityTag {
    /// Generates a fresh random tag.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if an `If-Match`/`If-None-Match` header value names this tag.
    ///
    /// The header may list several tags separated by commas; any one of them
    /// matching is enough. Each may be quoted, bare or weak (`W/`), and `*`
    /// matches every tag.
    #[must_use]
    pub fn matches(&self, header: &str) -> bool {
        header.split(',').map(str::trim).any(|candidate| {
            if candidate == "*" {
                return true;
            }
            let bare = candidate
                .strip_prefix("W/")
                .unwrap_or(candidate)
                .trim_matches('"');
            Uuid::parse_str(bare).is_ok_and(|uuid| uuid == self.0)
        })
    }
}

impl Default for EntityTag {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the quoted form used in the `ETag` header.
impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// The revision state of one data resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatastoreRevision {
    last_modified: DateTime<Utc>,
    entity_tag: EntityTag,
}

impl DatastoreRevision {
    /// Creates a revision stamped at `at` with a fresh entity tag.
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            last_modified: at,
            entity_tag: EntityTag::new(),
        }
    }

    /// Creates a revision stamped now.
    #[must_use]
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Returns when the resource last changed.
    #[must_use]
    pub const fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Returns the current entity tag.
    #[must_use]
    pub const fn entity_tag(&self) -> &EntityTag {
        &self.entity_tag
    }

    /// Returns the `Last-Modified` header value.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use restconf_uri::DatastoreRevision;
    ///
    /// let at = Utc.with_ymd_and_hms(2016, 3, 8, 14, 5, 9).unwrap();
    /// let revision = DatastoreRevision::new(at);
    /// assert_eq!(revision.last_modified_header(), "Tue, 08 Mar 2016 14:05:09 GMT");
    /// ```
    #[must_use]
    pub fn last_modified_header(&self) -> String {
        self.last_modified.format(HTTP_DATE_FORMAT).to_string()
    }

    /// Returns the `ETag` header value.
    #[must_use]
    pub fn etag_header(&self) -> String {
        self.entity_tag.to_string()
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.last_modified = at;
        self.entity_tag = EntityTag::new();
    }
}

/// Index of a node in a [`RevisionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct RevisionNode {
    name: String,
    parent: Option<NodeId>,
    config: bool,
    revision: DatastoreRevision,
}

/// Revisions of the data resources a server exposes.
///
/// Nodes live in an arena owned by the tree; a node refers to its parent by
/// [`NodeId`] only, and the link is used only to propagate changes upward.
/// The root node is the `{+restconf}/data` resource.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use restconf_uri::RevisionTree;
///
/// let mut tree = RevisionTree::new("data");
/// let jukebox = tree.add_child(RevisionTree::ROOT, "jukebox", true)?;
/// let library = tree.add_child(jukebox, "library", true)?;
/// let before = *tree.revision(RevisionTree::ROOT)?.entity_tag();
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert!(tree.mark_modified(library, at)?);
///
/// let root = tree.revision(RevisionTree::ROOT)?;
/// assert_eq!(root.last_modified(), at);
/// assert_ne!(root.entity_tag(), &before);
/// # Ok::<(), restconf_uri::RevisionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RevisionTree {
    nodes: Vec<RevisionNode>,
}

/// A revision tree shared between request handlers.
pub type SharedRevisionTree = Arc<RwLock<RevisionTree>>;

impl RevisionTree {
    /// Id of the root node, the `{+restconf}/data` resource.
    pub const ROOT: NodeId = NodeId(0);

    /// Creates a tree whose root is a configuration resource stamped now.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self::with_time(root_name, Utc::now())
    }

    /// Creates a tree whose root is stamped at `at`.
    #[must_use]
    pub fn with_time(root_name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            nodes: vec![RevisionNode {
                name: root_name.into(),
                parent: None,
                config: true,
                revision: DatastoreRevision::new(at),
            }],
        }
    }

    /// Wraps the tree for sharing between handlers.
    #[must_use]
    pub fn into_shared(self) -> SharedRevisionTree {
        Arc::new(RwLock::new(self))
    }

    /// Returns the number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node below `parent`, starting from the parent's timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RevisionError::UnknownNode` if `parent` is not in this tree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        config: bool,
    ) -> Result<NodeId, RevisionError> {
        let at = self.node(parent)?.revision.last_modified;
        let id = NodeId(self.nodes.len());
        self.nodes.push(RevisionNode {
            name: name.into(),
            parent: Some(parent),
            config,
            revision: DatastoreRevision::new(at),
        });
        Ok(id)
    }

    /// Returns the revision of a node.
    ///
    /// # Errors
    ///
    /// Returns `RevisionError::UnknownNode` if `id` is not in this tree.
    pub fn revision(&self, id: NodeId) -> Result<&DatastoreRevision, RevisionError> {
        Ok(&self.node(id)?.revision)
    }

    /// Returns the revision of the `{+restconf}/data` resource.
    #[must_use]
    pub fn datastore_revision(&self) -> &DatastoreRevision {
        &self.nodes[Self::ROOT.0].revision
    }

    /// Returns the name of a node.
    ///
    /// # Errors
    ///
    /// Returns `RevisionError::UnknownNode` if `id` is not in this tree.
    pub fn name(&self, id: NodeId) -> Result<&str, RevisionError> {
        Ok(&self.node(id)?.name)
    }

    /// Returns the parent of a node, or `None` for the root.
    ///
    /// # Errors
    ///
    /// Returns `RevisionError::UnknownNode` if `id` is not in this tree.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, RevisionError> {
        Ok(self.node(id)?.parent)
    }

    /// Returns true if the node holds configuration data.
    ///
    /// # Errors
    ///
    /// Returns `RevisionError::UnknownNode` if `id` is not in this tree.
    pub fn is_config(&self, id: NodeId) -> Result<bool, RevisionError> {
        Ok(self.node(id)?.config)
    }

    /// Records a change to a node at `at`.
    ///
    /// A configuration node and all of its ancestors take the timestamp and a
    /// fresh entity tag. A non-configuration node is left unchanged. Returns
    /// whether anything was updated.
    ///
    /// # Errors
    ///
    /// Returns `RevisionError::UnknownNode` if `id` is not in this tree.
    pub fn mark_modified(&mut self, id: NodeId, at: DateTime<Utc>) -> Result<bool, RevisionError> {
        if !self.node(id)?.config {
            trace!(node = %id, "skipped revision update for non-config node");
            return Ok(false);
        }

        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node_mut(node_id)?;
            node.revision.touch(at);
            trace!(
                node = %node_id,
                name = %node.name,
                etag = %node.revision.entity_tag,
                "updated revision"
            );
            current = node.parent;
        }
        Ok(true)
    }

    /// Records a change to a node now.
    ///
    /// # Errors
    ///
    /// Returns `RevisionError::UnknownNode` if `id` is not in this tree.
    pub fn mark_modified_now(&mut self, id: NodeId) -> Result<bool, RevisionError> {
        self.mark_modified(id, Utc::now())
    }

    fn node(&self, id: NodeId) -> Result<&RevisionNode, RevisionError> {
        self.nodes
            .get(id.0)
            .ok_or(RevisionError::UnknownNode { id: id.0 })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut RevisionNode, RevisionError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(RevisionError::UnknownNode { id: id.0 })
    }
}
