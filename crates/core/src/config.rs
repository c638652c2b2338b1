use crate::error::{MetadataError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_METADATA_PATH: &str =
    "classes/java/main/META-INF/spring-configuration-metadata.json";
pub const DEFAULT_NAMESPACE: &str = "org.apereo.cas";
pub const DEFAULT_REQUIRES_MODULE_MARKER: &str =
    "org.apereo.cas.configuration.support.RequiresModule";
pub const DEFAULT_REQUIRED_PROPERTY_MARKER: &str =
    "org.apereo.cas.configuration.support.RequiredProperty";

/// Simple type names that never trigger descent into a nested type.
pub const DEFAULT_EXCLUDED_TYPES: &[&str] = &[
    "String",
    "Integer",
    "int",
    "Long",
    "long",
    "Double",
    "double",
    "Float",
    "float",
    "Boolean",
    "boolean",
    "Character",
    "char",
    "Short",
    "short",
    "Byte",
    "byte",
    "Object",
    "Map",
    "List",
    "Set",
    "Collection",
    "Resource",
    // Enumerations declared outside the settings tree
    "CaseConversion",
    "QueryType",
    "LdapType",
    "CaseCanonicalizationMode",
    "PasswordPolicyHandlingOptions",
    "SearchEntryHandlerTypes",
];

/// Settings for one generator run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes. Unknown keys are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Location of the base document relative to the build directory.
    pub metadata_path: PathBuf,
    /// Package prefix whose collection element types are expanded.
    pub namespace: String,
    pub excluded_types: Vec<String>,
    pub requires_module_marker: String,
    pub required_property_marker: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            namespace: DEFAULT_NAMESPACE.to_string(),
            excluded_types: DEFAULT_EXCLUDED_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            requires_module_marker: DEFAULT_REQUIRES_MODULE_MARKER.to_string(),
            required_property_marker: DEFAULT_REQUIRED_PROPERTY_MARKER.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Reads a JSON config file layered over the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            MetadataError::Config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    pub fn is_excluded(&self, simple_name: &str) -> bool {
        self.excluded_types.iter().any(|t| t == simple_name)
    }

    /// Whether a fully-qualified name lives under [`Self::namespace`].
    pub fn in_namespace(&self, fqn: &str) -> bool {
        fqn.strip_prefix(self.namespace.as_str())
            .is_some_and(|rest| rest.starts_with('.'))
    }

    /// Matches `java.util.<Collection><ns.Type>` and captures the element type.
    pub fn collection_pattern(&self) -> Result<Regex> {
        let pattern = format!(r"^java\.util\.\w+<({}\..+)>$", regex::escape(&self.namespace));
        Regex::new(&pattern)
            .map_err(|e| MetadataError::Config(format!("invalid namespace pattern: {}", e)))
    }

    /// Simple name of a marker identifier, as it appears on an annotation.
    pub fn marker_simple_name(marker: &str) -> &str {
        marker.rsplit('.').next().unwrap_or(marker)
    }
}
