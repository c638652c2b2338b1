//! Java source support for configuration-metadata generation.

pub mod classify;
pub mod generator;
pub mod model;
pub mod parser;
pub mod queries;
pub mod resolver;
pub mod synth;

pub use generator::{GenerationReport, Generator};
pub use resolver::SourceIndex;
