//! Registry of the YANG modules a server implements.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::SchemaError;
use crate::identifier::Identifier;
use crate::resource::ResourceAddress;

/// Format of a YANG module revision date.
const REVISION_FORMAT: &str = "%Y-%m-%d";

/// What a server knows about one implemented YANG module.
///
/// # Examples
///
/// ```
/// use restconf_uri::SchemaDescriptor;
///
/// let module = SchemaDescriptor::new("example-jukebox", "http://example.com/ns/example-jukebox")?
///     .with_revision("2016-08-15")?
///     .with_feature("license");
/// assert_eq!(module.revision_str().as_deref(), Some("2016-08-15"));
/// # Ok::<(), restconf_uri::SchemaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaDescriptor {
    module: Identifier,
    #[cfg_attr(feature = "serde", serde(default))]
    revision: Option<NaiveDate>,
    namespace: String,
    #[cfg_attr(feature = "serde", serde(default))]
    features: Vec<String>,
}

impl SchemaDescriptor {
    /// Describes a module by name and XML namespace.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidModuleName` if `module` is not an identifier.
    pub fn new(module: &str, namespace: impl Into<String>) -> Result<Self, SchemaError> {
        let module = Identifier::parse(module).map_err(|reason| SchemaError::InvalidModuleName {
            module: module.to_string(),
            reason,
        })?;
        Ok(Self {
            module,
            revision: None,
            namespace: namespace.into(),
            features: Vec::new(),
        })
    }

    /// Sets the module revision from a `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidRevision` if the date does not parse.
    pub fn with_revision(mut self, revision: &str) -> Result<Self, SchemaError> {
        let date = NaiveDate::parse_from_str(revision, REVISION_FORMAT).map_err(|_| {
            SchemaError::InvalidRevision {
                module: self.module.to_string(),
                revision: revision.to_string(),
            }
        })?;
        self.revision = Some(date);
        Ok(self)
    }

    /// Adds a supported feature.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Returns the module name.
    #[must_use]
    pub const fn module(&self) -> &Identifier {
        &self.module
    }

    /// Returns the module revision date.
    #[must_use]
    pub const fn revision(&self) -> Option<NaiveDate> {
        self.revision
    }

    /// Returns the revision formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn revision_str(&self) -> Option<String> {
        self.revision
            .map(|date| date.format(REVISION_FORMAT).to_string())
    }

    /// Returns the XML namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the supported features.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Returns true if the module supports `feature`.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Module name to schema descriptor, populated once at startup.
///
/// # Examples
///
/// ```
/// use restconf_uri::{SchemaDescriptor, SchemaRegistry, parse_path};
///
/// let registry: SchemaRegistry = [
///     SchemaDescriptor::new("ietf-interfaces", "urn:ietf:params:xml:ns:yang:ietf-interfaces")?,
/// ]
/// .into_iter()
/// .collect();
///
/// let address = parse_path("/ietf-interfaces:interfaces/interface=eth0");
/// let modules = registry.resolve(&address)?;
/// assert_eq!(modules[0].module().as_str(), "ietf-interfaces");
///
/// assert!(registry.get("example-jukebox").is_err());
/// # Ok::<(), restconf_uri::SchemaError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    modules: BTreeMap<Identifier, SchemaDescriptor>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::AlreadyRegistered` if the module is present.
    pub fn register(&mut self, descriptor: SchemaDescriptor) -> Result<(), SchemaError> {
        if self.modules.contains_key(descriptor.module()) {
            return Err(SchemaError::AlreadyRegistered {
                module: descriptor.module().to_string(),
            });
        }
        debug!(module = %descriptor.module(), "registered schema");
        self.modules.insert(descriptor.module().clone(), descriptor);
        Ok(())
    }

    /// Looks up a module by name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if no such module is registered.
    pub fn get(&self, module: &str) -> Result<&SchemaDescriptor, SchemaError> {
        self.modules.get(module).ok_or_else(|| {
            debug!(module, "schema lookup failed");
            SchemaError::NotFound {
                module: module.to_string(),
            }
        })
    }

    /// Returns true if the module is registered.
    #[must_use]
    pub fn contains(&self, module: &str) -> bool {
        self.get(module).is_ok()
    }

    /// Returns the descriptors of every module `address` names, in order of
    /// appearance.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for the first module not registered.
    pub fn resolve(
        &self,
        address: &ResourceAddress,
    ) -> Result<Vec<&SchemaDescriptor>, SchemaError> {
        address
            .module_names()
            .into_iter()
            .map(|module| self.get(module.as_str()))
            .collect()
    }

    /// Returns the number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no modules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns the descriptors ordered by module name.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDescriptor> {
        self.modules.values()
    }
}

/// Keeps the first descriptor for each module.
impl FromIterator<SchemaDescriptor> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = SchemaDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for descriptor in iter {
            if let Err(e) = registry.register(descriptor) {
                debug!(error = %e, "ignored duplicate schema");
            }
        }
        registry
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SchemaRegistry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.modules.values())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SchemaRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let descriptors = Vec::<SchemaDescriptor>::deserialize(deserializer)?;
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry
                .register(descriptor)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::parse_path;

    fn descriptor(module: &str) -> SchemaDescriptor {
        SchemaDescriptor::new(module, format!("urn:example:{module}")).unwrap()
    }

    #[test]
    fn register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(descriptor("example-jukebox")).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("example-jukebox").unwrap().namespace(),
            "urn:example:example-jukebox"
        );
    }

    #[test]
    fn missing_module_is_not_found() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.get("nope"),
            Err(SchemaError::NotFound {
                module: "nope".to_string()
            })
        );
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = SchemaRegistry::new();
        registry.register(descriptor("a")).unwrap();
        assert!(matches!(
            registry.register(descriptor("a")),
            Err(SchemaError::AlreadyRegistered { .. })
        ));
    }

    #[test]
    fn from_iter_keeps_first() {
        let registry: SchemaRegistry = [descriptor("a").with_feature("first"), descriptor("a")]
            .into_iter()
            .collect();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("a").unwrap().has_feature("first"));
    }

    #[test]
    fn resolve_names_every_module() {
        let registry: SchemaRegistry = [descriptor("x"), descriptor("y")].into_iter().collect();
        let found = registry.resolve(&parse_path("/x:a/b/y:c")).unwrap();
        let names: Vec<_> = found.iter().map(|d| d.module().as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);

        assert!(matches!(
            registry.resolve(&parse_path("/x:a/z:b")),
            Err(SchemaError::NotFound { module }) if module == "z"
        ));
        assert!(registry.resolve(&parse_path("/")).unwrap().is_empty());
    }

    #[test]
    fn invalid_names_and_revisions() {
        assert!(matches!(
            SchemaDescriptor::new("1bad", "urn:x"),
            Err(SchemaError::InvalidModuleName { .. })
        ));
        assert!(matches!(
            descriptor("a").with_revision("2016-13-01"),
            Err(SchemaError::InvalidRevision { .. })
        ));
        let dated = descriptor("a").with_revision("2016-08-15").unwrap();
        assert_eq!(dated.revision(), NaiveDate::from_ymd_opt(2016, 8, 15));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_registry() {
        let json = r#"[
            {"module": "ietf-interfaces", "revision": "2018-02-20", "namespace": "urn:ietf:params:xml:ns:yang:ietf-interfaces"},
            {"module": "example-jukebox", "namespace": "http://example.com/ns/example-jukebox", "features": ["license"]}
        ]"#;
        let registry: SchemaRegistry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("example-jukebox").unwrap().has_feature("license"));

        let dup = r#"[{"module": "a", "namespace": "x"}, {"module": "a", "namespace": "y"}]"#;
        assert!(serde_json::from_str::<SchemaRegistry>(dup).is_err());
    }
}
