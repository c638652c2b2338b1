use super::SourceIndex;
use crate::model::DeclId;
use confmeta_core::error::Result;
use confmeta_core::hints::{MarkerSource, TypeMarkers};
use std::collections::HashSet;
use tracing::debug;

impl SourceIndex {
    /// Marker facts for a declaration. Required fields are collected across
    /// its superclasses; ancestors that cannot be resolved are skipped.
    pub fn markers_of(&mut self, id: DeclId) -> TypeMarkers {
        if let Some(cached) = self.marker_cache.get(&id) {
            return cached.clone();
        }

        let markers = TypeMarkers {
            requires_module: self.decls[id].requires_module.clone(),
            required_fields: self.required_fields(id),
        };
        self.marker_cache.insert(id, markers.clone());
        markers
    }

    fn required_fields(&mut self, id: DeclId) -> HashSet<String> {
        let mut fields = HashSet::new();
        let mut seen = HashSet::new();
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            let decl = &self.decls[current];
            fields.extend(
                decl.fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name.clone()),
            );

            let supers = decl.superclasses.clone();
            for parent in supers {
                if self.is_external_reference(&parent, current) {
                    continue;
                }
                match self.resolve(&parent, Some(current)) {
                    Ok(parent_id) => pending.push(parent_id),
                    Err(e) => debug!(
                        "Skipping ancestor [{}] of {}: {}",
                        parent, self.decls[current].fqn, e
                    ),
                }
            }
        }
        fields
    }
}

impl MarkerSource for SourceIndex {
    fn markers(&mut self, type_name: &str) -> Result<TypeMarkers> {
        let id = self.resolve(type_name, None)?;
        Ok(self.markers_of(id))
    }
}
