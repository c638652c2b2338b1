use crate::model::CompilationUnit;
use crate::queries::java_unit::{JAVA_UNIT_SCM, UnitIndices};
use confmeta_core::config::GeneratorConfig;
use confmeta_core::error::{MetadataError, Result};
use std::path::Path;
use std::sync::Arc;
use tree_sitter::{Query, StreamingIterator, Tree};

mod declarations;
mod fields;
mod javadoc;
pub mod utils;

pub use javadoc::{javadoc_description, short_description};

/// Annotation simple names recognised as markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerNames {
    pub requires_module: String,
    pub required_property: String,
}

impl MarkerNames {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            requires_module: GeneratorConfig::marker_simple_name(&config.requires_module_marker)
                .to_string(),
            required_property: GeneratorConfig::marker_simple_name(
                &config.required_property_marker,
            )
            .to_string(),
        }
    }
}

impl Default for MarkerNames {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

pub struct JavaParser {
    pub language: tree_sitter::Language,
    pub(crate) unit_query: Arc<Query>,
    pub(crate) indices: UnitIndices,
    pub(crate) markers: MarkerNames,
}

impl Clone for JavaParser {
    fn clone(&self) -> Self {
        Self {
            language: self.language.clone(),
            unit_query: Arc::clone(&self.unit_query),
            indices: self.indices.clone(),
            markers: self.markers.clone(),
        }
    }
}

impl JavaParser {
    pub fn new(markers: MarkerNames) -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
        let unit_query = utils::load_query(&language, JAVA_UNIT_SCM)?;
        let indices = UnitIndices::new(&unit_query)?;

        Ok(Self {
            language,
            unit_query: Arc::new(unit_query),
            indices,
            markers,
        })
    }

    pub fn parse_tree(&self, source: &str) -> Result<Tree> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| MetadataError::Parsing(format!("Cannot load Java grammar: {}", e)))?;
        parser
            .parse(source, None)
            .ok_or_else(|| MetadataError::Parsing("Java parser produced no tree".to_string()))
    }

    /// Parses one source file into its package, imports and declarations.
    pub fn parse_unit(&self, source: &str, path: &Path) -> Result<CompilationUnit> {
        let tree = self.parse_tree(source)?;
        let (package, imports) = self.extract_package_and_imports(&tree, source);
        let types = self.collect_declarations(&tree, source, package.as_deref(), &imports, path);

        Ok(CompilationUnit {
            path: path.to_path_buf(),
            package,
            imports,
            types,
        })
    }

    pub fn extract_package_and_imports(
        &self,
        tree: &Tree,
        source: &str,
    ) -> (Option<String>, Vec<String>) {
        let mut package = None;
        let mut imports = Vec::new();
        let mut cursor = tree_sitter::QueryCursor::new();
        let mut matches = cursor.matches(&self.unit_query, tree.root_node(), source.as_bytes());
        while let Some(mat) = matches.next() {
            for cap in mat.captures {
                let text = utils::node_text(cap.node, source);
                if cap.index == self.indices.package {
                    package = Some(text.to_string());
                } else if cap.index == self.indices.import {
                    if let Some(import) = normalize_import(text) {
                        imports.push(import);
                    }
                }
            }
        }
        (package, imports)
    }
}

/// `import a.b.C;` → `a.b.C`; static imports carry no types and are dropped.
fn normalize_import(text: &str) -> Option<String> {
    let body = text
        .trim()
        .strip_prefix("import")?
        .trim()
        .trim_end_matches(';')
        .trim();
    if body.starts_with("static ") || body.starts_with("static\t") {
        return None;
    }
    let name: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    (!name.is_empty()).then_some(name)
}
