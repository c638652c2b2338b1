use anyhow::Context;
use confmeta_core::config::GeneratorConfig;
use confmeta_java::Generator;
use std::path::Path;
use tracing::info;

pub fn run(build_dir: &Path, source_root: &Path, config: GeneratorConfig) -> anyhow::Result<()> {
    let generator = Generator::new(build_dir, source_root, config);
    let metadata_file = generator.metadata_file();

    let report = generator
        .execute()
        .with_context(|| format!("while augmenting {}", metadata_file.display()))?;

    info!(
        "Wrote {} ({} new properties, {} new groups, {} hints)",
        metadata_file.display(),
        report.properties_added,
        report.groups_added,
        report.hints
    );
    Ok(())
}
