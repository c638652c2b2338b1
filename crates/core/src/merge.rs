use crate::model::{GroupRecord, MetadataDocument, PropertyRecord, RecordSet};
use tracing::debug;

/// Records produced by one synthesis pass, ready to be folded into a document.
#[derive(Debug, Default, Clone)]
pub struct Synthesized {
    pub properties: RecordSet<PropertyRecord>,
    pub groups: RecordSet<GroupRecord>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub properties_added: usize,
    pub groups_added: usize,
}

/// Unions synthesized records into the document, keyed by identity.
///
/// Existing entries are never replaced: a synthesized record whose key is
/// already present is dropped.
pub fn merge_into(document: &mut MetadataDocument, synthesized: Synthesized) -> MergeStats {
    let mut stats = MergeStats::default();

    for property in synthesized.properties {
        let name = property.name.clone();
        if document.properties.insert(property) {
            stats.properties_added += 1;
        } else {
            debug!("Property [{}] already present; keeping existing entry", name);
        }
    }

    for group in synthesized.groups {
        let name = group.name.clone();
        if document.groups.insert(group) {
            stats.groups_added += 1;
        } else {
            debug!("Group [{}] already present; keeping existing entry", name);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_entries_win() {
        let mut document = MetadataDocument::default();
        let mut base = PropertyRecord::synthesized("cas.a");
        base.description = Some("base".into());
        document.properties.insert(base);

        let mut synthesized = Synthesized::default();
        let mut dup = PropertyRecord::synthesized("cas.a");
        dup.description = Some("synthesized".into());
        synthesized.properties.insert(dup);
        synthesized
            .properties
            .insert(PropertyRecord::synthesized("cas.b"));
        synthesized
            .groups
            .insert(GroupRecord::synthesized("cas", "Root"));

        let stats = merge_into(&mut document, synthesized);

        assert_eq!(
            stats,
            MergeStats {
                properties_added: 1,
                groups_added: 1
            }
        );
        assert_eq!(
            document.properties.get("cas.a").unwrap().description.as_deref(),
            Some("base")
        );
        assert_eq!(
            document.properties.keys().collect::<Vec<_>>(),
            vec!["cas.a", "cas.b"]
        );
    }
}
