mod generate;

use anyhow::Context;
use clap::Parser;
use confmeta_core::config::GeneratorConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "confmeta",
    version,
    about = "Augments Spring configuration metadata with nested collection settings and hints",
    long_about = "Reads the configuration-metadata document generated in BUILD_DIR, expands \
                  properties whose type is a java.util collection of settings types by walking \
                  their declarations under SOURCE_ROOT, regenerates value hints, and rewrites \
                  the document in place."
)]
pub struct Cli {
    /// Build output directory holding the generated metadata document
    #[arg(value_name = "BUILD_DIR")]
    pub build_dir: PathBuf,

    /// Source root; declarations are read from <SOURCE_ROOT>/src/main/java/
    #[arg(value_name = "SOURCE_ROOT")]
    pub source_root: PathBuf,

    /// JSON file overriding the built-in generator settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Document location relative to BUILD_DIR
    #[arg(long, value_name = "PATH")]
    pub metadata_path: Option<PathBuf>,

    /// Package prefix whose collection element types are expanded
    #[arg(long, value_name = "NS")]
    pub namespace: Option<String>,

    /// Additional simple type name never descended into (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Also write daily-rolling log files into this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the `--config` file, then individual flags.
    pub fn generator_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(path) = &self.metadata_path {
            config.metadata_path = path.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        for name in &self.exclude {
            if !config.is_excluded(name) {
                config.excluded_types.push(name.clone());
            }
        }
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = confmeta_core::logging::init_logging("confmeta", cli.log_dir.as_deref());

    let config = cli.generator_config()?;
    generate::run(&cli.build_dir, &cli.source_root, config)?;
    Ok(())
}
