//! Source index and type resolution.
//!
//! Every compilation unit under `<sourceRoot>/src/main/java/` is parsed once
//! into an arena of declarations. Bare type names resolve through a
//! simple-name index; when several declarations share a name, the
//! referencing declaration's scopes pick one or the lookup fails.

mod markers;
mod scopes;

use crate::model::{CompilationUnit, DeclId, TypeDeclaration};
use crate::parser::{JavaParser, MarkerNames};
use confmeta_core::config::GeneratorConfig;
use confmeta_core::error::{MetadataError, Result};
use confmeta_core::naming::strip_generics;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use scopes::ResolutionScope;

const SOURCE_EXTENSION: &str = "java";

pub struct SourceIndex {
    source_dir: PathBuf,
    config: GeneratorConfig,
    decls: Vec<TypeDeclaration>,
    by_simple_name: HashMap<String, Vec<DeclId>>,
    by_fqn: HashMap<String, DeclId>,
    /// Bare names with exactly one candidate, resolved at least once.
    cache: HashMap<String, DeclId>,
    marker_cache: HashMap<DeclId, confmeta_core::hints::TypeMarkers>,
}

impl SourceIndex {
    /// Parses every source file under `<source_root>/src/main/java/`.
    ///
    /// Files that are not valid UTF-8 are decoded lossily: only string
    /// literals and comments can carry the replaced bytes.
    pub fn build(source_root: &Path, config: &GeneratorConfig) -> Result<Self> {
        let source_dir = source_dir_for(source_root);
        if !source_dir.is_dir() {
            return Err(MetadataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source directory {} does not exist", source_dir.display()),
            )));
        }

        let parser = JavaParser::new(MarkerNames::from_config(config))?;
        let mut index = Self::empty(source_dir.clone(), config);

        let start = std::time::Instant::now();
        for entry in WalkDir::new(&source_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| MetadataError::Io(std::io::Error::other(e)))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION)
            {
                continue;
            }
            let source = match String::from_utf8(std::fs::read(path)?) {
                Ok(source) => source,
                Err(e) => {
                    warn!("{} is not valid UTF-8; decoding lossily", path.display());
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            let unit = parser.parse_unit(&source, path)?;
            index.add_unit(unit);
        }

        info!(
            "Indexed {} type declarations under {} in {:?}",
            index.decls.len(),
            source_dir.display(),
            start.elapsed()
        );
        Ok(index)
    }

    /// An index over already-parsed units.
    pub fn from_units(
        source_root: &Path,
        config: &GeneratorConfig,
        units: impl IntoIterator<Item = CompilationUnit>,
    ) -> Self {
        let mut index = Self::empty(source_dir_for(source_root), config);
        for unit in units {
            index.add_unit(unit);
        }
        index
    }

    fn empty(source_dir: PathBuf, config: &GeneratorConfig) -> Self {
        Self {
            source_dir,
            config: config.clone(),
            decls: Vec::new(),
            by_simple_name: HashMap::new(),
            by_fqn: HashMap::new(),
            cache: HashMap::new(),
            marker_cache: HashMap::new(),
        }
    }

    fn add_unit(&mut self, unit: CompilationUnit) {
        for decl in unit.types {
            let id = self.decls.len();
            self.by_simple_name
                .entry(decl.name.to_lowercase())
                .or_default()
                .push(id);
            self.decls.push(decl);
            self.register_fqn(id);
        }
    }

    /// Maps a declaration's FQN to it. When an FQN is declared twice, the
    /// declaration found at the FQN's composed source path wins, otherwise
    /// the first one.
    fn register_fqn(&mut self, id: DeclId) {
        let fqn = self.decls[id].fqn.clone();
        match self.by_fqn.get(&fqn).copied() {
            None => {
                self.by_fqn.insert(fqn, id);
            }
            Some(existing) => {
                let keep = if !self.is_at_source_path(existing) && self.is_at_source_path(id) {
                    self.by_fqn.insert(fqn.clone(), id);
                    id
                } else {
                    existing
                };
                warn!(
                    "{} is declared more than once; using {}",
                    fqn,
                    self.decls[keep].path.display()
                );
            }
        }
    }

    /// Whether a declaration lives in the file its outermost type's FQN
    /// composes to.
    fn is_at_source_path(&self, id: DeclId) -> bool {
        let decl = &self.decls[id];
        let nested = match &decl.package {
            Some(pkg) => decl.fqn.strip_prefix(pkg.as_str()).and_then(|r| r.strip_prefix('.')),
            None => Some(decl.fqn.as_str()),
        };
        let Some(outermost) = nested.and_then(|n| n.split('.').next()) else {
            return false;
        };
        let top_level = match &decl.package {
            Some(pkg) => format!("{}.{}", pkg, outermost),
            None => outermost.to_string(),
        };
        decl.path == self.source_path_for(&top_level)
    }

    pub fn get(&self, id: DeclId) -> &TypeDeclaration {
        &self.decls[id]
    }

    /// `<sourceRoot>/src/main/java/a/b/C.java` for `a.b.C`.
    pub fn source_path_for(&self, fqn: &str) -> PathBuf {
        let relative = strip_generics(fqn).replace(['.', '$'], std::path::MAIN_SEPARATOR_STR);
        self.source_dir
            .join(format!("{}.{}", relative, SOURCE_EXTENSION))
    }

    /// Resolves a type name as written at `context` (or globally without one).
    ///
    /// Qualified names resolve by FQN; bare names by simple name, with the
    /// context's scopes breaking ties. No candidate, or more than one after
    /// every scope, is an error.
    pub fn resolve(&mut self, type_name: &str, context: Option<DeclId>) -> Result<DeclId> {
        let name = strip_generics(type_name);
        if name.contains('.') || name.contains('$') {
            return self.resolve_qualified(name, context);
        }

        if let Some(&id) = self.cache.get(name) {
            debug!("Resolved [{}] from cache", name);
            return Ok(id);
        }

        let candidates: Vec<DeclId> = self
            .by_simple_name
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_default();

        match candidates.as_slice() {
            [] => Err(MetadataError::TypeNotFound {
                name: name.to_string(),
            }),
            [only] => {
                self.cache.insert(name.to_string(), *only);
                Ok(*only)
            }
            _ => self.disambiguate(name, &candidates, context),
        }
    }

    fn resolve_qualified(&mut self, name: &str, context: Option<DeclId>) -> Result<DeclId> {
        let normalized = name.replace('$', ".");
        if let Some(&id) = self.by_fqn.get(&normalized) {
            return Ok(id);
        }

        // `Outer.Inner` written relative to the referencing declaration.
        if let Some((head, rest)) = normalized.split_once('.') {
            if context.is_some() && head.chars().next().is_some_and(char::is_uppercase) {
                let outer = self.resolve(head, context)?;
                let fqn = format!("{}.{}", self.decls[outer].fqn, rest);
                if let Some(&id) = self.by_fqn.get(&fqn) {
                    return Ok(id);
                }
            }
        }

        debug!(
            "No declaration for [{}] (expected at {})",
            name,
            self.source_path_for(&normalized).display()
        );
        Err(MetadataError::TypeNotFound {
            name: name.to_string(),
        })
    }

    fn disambiguate(
        &self,
        name: &str,
        candidates: &[DeclId],
        context: Option<DeclId>,
    ) -> Result<DeclId> {
        let ambiguous = || MetadataError::AmbiguousType {
            name: name.to_string(),
            candidates: candidates
                .iter()
                .map(|&id| self.decls[id].fqn.clone())
                .collect(),
        };

        let Some(context) = context.map(|id| &self.decls[id]) else {
            return Err(ambiguous());
        };

        for scope in ResolutionScope::ORDER {
            let matching: Vec<DeclId> = candidates
                .iter()
                .copied()
                .filter(|&id| scope.admits(context, &self.decls[id]))
                .collect();
            match matching.as_slice() {
                [] => continue,
                [only] => {
                    debug!(
                        "Resolved ambiguous [{}] to {} via {:?} scope",
                        name, self.decls[*only].fqn, scope
                    );
                    return Ok(*only);
                }
                _ => return Err(ambiguous()),
            }
        }
        Err(ambiguous())
    }

    /// Whether `type_name`, as referenced from `context`, is imported from a
    /// package outside the configured namespace.
    pub fn is_external_reference(&self, type_name: &str, context: DeclId) -> bool {
        let decl = &self.decls[context];
        let head = type_name.split('.').next().unwrap_or(type_name);
        match decl.imported_fqn(head) {
            Some(fqn) => !self.config.in_namespace(fqn),
            None => {
                // Already fully qualified in source.
                type_name.contains('.')
                    && head.chars().next().is_some_and(char::is_lowercase)
                    && !self.config.in_namespace(type_name)
            }
        }
    }
}

fn source_dir_for(source_root: &Path) -> PathBuf {
    source_root.join("src").join("main").join(SOURCE_EXTENSION)
}
