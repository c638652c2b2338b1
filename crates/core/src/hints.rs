//! Hint synthesis.
//!
//! Every property is traced back to the type that declares its group. Two
//! facts about that type produce value hints: a module-requirement marker on
//! the type itself, and a required-property marker on the field the property
//! binds to.

use crate::config::GeneratorConfig;
use crate::error::{MetadataError, Result};
use crate::model::{GroupRecord, HintRecord, PropertyRecord, RecordSet, ValueHint};
use crate::naming::{RelaxedNames, strip_generics};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

/// Declaration-level fact: the optional module a settings type needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequirement {
    pub name: String,
    pub automated: bool,
}

/// Marker facts of one declaring type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMarkers {
    pub requires_module: Option<ModuleRequirement>,
    /// Field names carrying the required-property marker, inherited ones included.
    pub required_fields: HashSet<String>,
}

/// Looks up marker facts for a declaring type by its (possibly qualified) name.
pub trait MarkerSource {
    fn markers(&mut self, type_name: &str) -> Result<TypeMarkers>;
}

pub struct HintSynthesizer<'a, S: MarkerSource> {
    source: &'a mut S,
    requires_module_marker: &'a str,
    required_property_marker: &'a str,
}

impl<'a, S: MarkerSource> HintSynthesizer<'a, S> {
    pub fn new(source: &'a mut S, config: &'a GeneratorConfig) -> Self {
        Self {
            source,
            requires_module_marker: &config.requires_module_marker,
            required_property_marker: &config.required_property_marker,
        }
    }

    /// Builds the full `hints` collection.
    ///
    /// Missing groups and declaring types that cannot be resolved, or resolve
    /// ambiguously, only drop the affected property's hint; any other error
    /// aborts.
    pub fn build_hints(
        &mut self,
        properties: &RecordSet<PropertyRecord>,
        groups: &RecordSet<GroupRecord>,
    ) -> Result<RecordSet<HintRecord>> {
        let mut groups_by_name: HashMap<String, &GroupRecord> = HashMap::new();
        for group in groups.iter() {
            groups_by_name
                .entry(group.name.to_lowercase())
                .or_insert(group);
        }

        let mut hints = RecordSet::new();
        let mut skipped = 0usize;
        for property in properties.iter() {
            match self.hint_for(property, &groups_by_name) {
                Ok(Some(hint)) => {
                    hints.insert(hint);
                }
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    error!("No hint for property [{}]: {}", property.name, e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "Built {} hints from {} properties ({} skipped)",
            hints.len(),
            properties.len(),
            skipped
        );
        Ok(hints)
    }

    fn hint_for(
        &mut self,
        property: &PropertyRecord,
        groups_by_name: &HashMap<String, &GroupRecord>,
    ) -> Result<Option<HintRecord>> {
        let (group_name, leaf_name) = property
            .split_path()
            .ok_or_else(|| MetadataError::MissingGroup {
                group: property.name.clone(),
            })?;

        let group = groups_by_name
            .get(&group_name.to_lowercase())
            .ok_or_else(|| MetadataError::MissingGroup {
                group: group_name.to_string(),
            })?;

        let declaring_type = group
            .type_name
            .as_deref()
            .map(strip_generics)
            .ok_or_else(|| MetadataError::TypeNotFound {
                name: format!("<untyped group {}>", group.name),
            })?;

        let markers = self.source.markers(declaring_type)?;

        let mut hint = HintRecord::new(property.name.clone());
        if let Some(module) = &markers.requires_module {
            hint.values.push(ValueHint::requires_module(
                self.requires_module_marker,
                &module.name,
                module.automated,
            ));
        }

        let required = RelaxedNames::new(leaf_name)
            .iter()
            .any(|variant| markers.required_fields.contains(variant));
        if required {
            hint.values
                .push(ValueHint::required_property(self.required_property_marker));
        }

        Ok((!hint.values.is_empty()).then_some(hint))
    }
}
