use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Cannot locate type declaration for {name}")]
    TypeNotFound { name: String },
    #[error("Type name {name} is ambiguous, candidates: {}", candidates.join(", "))]
    AmbiguousType {
        name: String,
        candidates: Vec<String>,
    },
    #[error("Field {field} in {owner} has no documentation")]
    UndocumentedField { field: String, owner: String },
    #[error("Cyclic type reference: {type_name} at {path}")]
    CyclicType { path: String, type_name: String },
    #[error("Cannot locate group {group}")]
    MissingGroup { group: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MetadataError {
    /// Errors that only cost a single hint entry when raised during hint
    /// construction. Everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MetadataError::MissingGroup { .. }
                | MetadataError::TypeNotFound { .. }
                | MetadataError::AmbiguousType { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failures_are_recoverable() {
        assert!(MetadataError::MissingGroup { group: "cas".into() }.is_recoverable());
        assert!(MetadataError::TypeNotFound { name: "Props".into() }.is_recoverable());
        assert!(
            MetadataError::AmbiguousType {
                name: "Props".into(),
                candidates: vec!["a.Props".into(), "b.Props".into()],
            }
            .is_recoverable()
        );
        assert!(
            !MetadataError::UndocumentedField {
                field: "name".into(),
                owner: "a.Props".into(),
            }
            .is_recoverable()
        );
    }
}
