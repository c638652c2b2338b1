use crate::resolver::SourceIndex;
use crate::synth::PropertySynthesizer;
use confmeta_core::config::GeneratorConfig;
use confmeta_core::error::Result;
use confmeta_core::hints::HintSynthesizer;
use confmeta_core::merge::merge_into;
use confmeta_core::model::{MetadataDocument, PropertyRecord};
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub collections_expanded: usize,
    pub properties_added: usize,
    pub groups_added: usize,
    pub hints: usize,
}

/// Augments the metadata document of a build directory from a source tree.
pub struct Generator {
    build_dir: PathBuf,
    source_root: PathBuf,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(
        build_dir: impl Into<PathBuf>,
        source_root: impl Into<PathBuf>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            build_dir: build_dir.into(),
            source_root: source_root.into(),
            config,
        }
    }

    /// Location of the base document, rewritten in place.
    pub fn metadata_file(&self) -> PathBuf {
        self.build_dir.join(&self.config.metadata_path)
    }

    /// Loads, augments and rewrites the document.
    ///
    /// The document is written once, after everything succeeded; any error
    /// leaves the file untouched.
    pub fn execute(&self) -> Result<GenerationReport> {
        let metadata_file = self.metadata_file();
        info!("Processing file {}", metadata_file.display());

        let mut document = MetadataDocument::load(&metadata_file)?;
        let mut index = SourceIndex::build(&self.source_root, &self.config)?;
        let report = self.augment(&mut document, &mut index)?;
        document.save(&metadata_file)?;

        info!(
            "Expanded {} collection properties: {} properties, {} groups added, {} hints",
            report.collections_expanded,
            report.properties_added,
            report.groups_added,
            report.hints
        );
        Ok(report)
    }

    /// Expands collection-of-settings properties into nested records, merges
    /// them, and replaces the document's hints.
    pub fn augment(
        &self,
        document: &mut MetadataDocument,
        index: &mut SourceIndex,
    ) -> Result<GenerationReport> {
        let pattern = self.config.collection_pattern()?;
        let collections: Vec<(PropertyRecord, String)> = document
            .properties
            .iter()
            .filter_map(|p| {
                let caps = pattern.captures(p.type_name.as_deref()?)?;
                Some((p.clone(), caps[1].to_string()))
            })
            .collect();

        let mut synth = PropertySynthesizer::new(index, &self.config);
        for (property, element_type) in &collections {
            synth.synthesize(property, element_type, true)?;
        }
        let stats = merge_into(document, synth.into_output());

        let hints = HintSynthesizer::new(index, &self.config)
            .build_hints(&document.properties, &document.groups)?;
        let report = GenerationReport {
            collections_expanded: collections.len(),
            properties_added: stats.properties_added,
            groups_added: stats.groups_added,
            hints: hints.len(),
        };
        document.hints = hints;
        Ok(report)
    }
}
