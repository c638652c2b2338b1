pub mod config;
pub mod error;
pub mod hints;
pub mod logging;
pub mod merge;
pub mod model;
pub mod naming;

pub use config::GeneratorConfig;
pub use error::{MetadataError, Result};
