use confmeta_core::config::GeneratorConfig;
use confmeta_java::Generator;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A build directory holding a base metadata document, next to a project
/// whose sources live under `src/main/java`.
pub struct Fixture {
    _dir: TempDir,
    build_dir: PathBuf,
    source_root: PathBuf,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build");
        let source_root = dir.path().join("project");
        std::fs::create_dir_all(source_root.join("src/main/java")).unwrap();
        Self {
            _dir: dir,
            build_dir,
            source_root,
        }
    }

    /// Writes `content` to the file the type `fqn` is expected in.
    pub fn source(self, fqn: &str, content: &str) -> Self {
        self.source_bytes(fqn, content.as_bytes())
    }

    /// Like [`Self::source`], for content that need not be valid UTF-8.
    pub fn source_bytes(self, fqn: &str, content: &[u8]) -> Self {
        let path = self
            .source_root
            .join("src/main/java")
            .join(format!("{}.java", fqn.replace('.', "/")));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn document(self, document: Value) -> Self {
        let path = self.metadata_file();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
        self
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.build_dir
            .join(GeneratorConfig::default().metadata_path)
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn generator(&self) -> Generator {
        Generator::new(&self.build_dir, &self.source_root, GeneratorConfig::default())
    }

    pub fn text(&self) -> String {
        std::fs::read_to_string(self.metadata_file()).unwrap()
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text()).unwrap()
    }
}

/// Entry of `collection` (`properties`, `groups`, `hints`) named `name`.
#[allow(dead_code)]
pub fn entry<'a>(document: &'a Value, collection: &str, name: &str) -> Option<&'a Value> {
    document[collection]
        .as_array()?
        .iter()
        .find(|e| e["name"] == name)
}

#[allow(dead_code)]
pub fn names(document: &Value, collection: &str) -> Vec<String> {
    document[collection]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// A collection-typed property `name` whose element type is `element`.
#[allow(dead_code)]
pub fn collection_property(name: &str, element: &str) -> Value {
    serde_json::json!({
        "name": name,
        "type": format!("java.util.List<{}>", element),
        "sourceType": "org.apereo.cas.configuration.CasConfigurationProperties",
        "description": "Collection settings."
    })
}
