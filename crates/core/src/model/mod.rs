pub mod document;
pub mod record;

pub use document::MetadataDocument;
pub use record::*;
