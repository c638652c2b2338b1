use super::record::{GroupRecord, HintRecord, PropertyRecord, RecordSet};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;

/// The configuration-metadata document: `groups`, `properties` and `hints`.
///
/// Top-level keys other than these three are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub groups: RecordSet<GroupRecord>,
    #[serde(default)]
    pub properties: RecordSet<PropertyRecord>,
    #[serde(default)]
    pub hints: RecordSet<HintRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Serializes fully in memory, then replaces `path` through a sibling
    /// temporary file so readers never observe a partial document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json()?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "metadata.json".to_string());
        let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));
        {
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
