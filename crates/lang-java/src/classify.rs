//! Per-field classification: skip, fail, or emit a property (and possibly
//! request descent into the field's type).

use crate::model::{DeclId, FieldDeclarationView};
use crate::parser::short_description;
use crate::resolver::SourceIndex;
use confmeta_core::config::GeneratorConfig;
use confmeta_core::error::{MetadataError, Result};
use confmeta_core::model::{GroupRecord, PropertyRecord};
use confmeta_core::naming::RelaxedNames;
use tracing::{debug, warn};

/// Where the fields being classified land in the document.
#[derive(Debug, Clone, Copy)]
pub struct GroupSite<'p> {
    /// Path of the owning group, without index brackets.
    pub parent_path: &'p str,
    /// Whether the group is one element of a collection (`path[]`).
    pub indexed: bool,
    /// Declaring type recorded on the group.
    pub group_type: &'p str,
}

impl GroupSite<'_> {
    pub fn group_path(&self) -> String {
        if self.indexed {
            format!("{}[]", self.parent_path)
        } else {
            self.parent_path.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub property: PropertyRecord,
    pub group: GroupRecord,
    /// Structured declaration to descend into at the property's path.
    pub recurse_into: Option<DeclId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldDisposition {
    Skip,
    Emit(Emission),
}

pub struct FieldClassifier<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> FieldClassifier<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Classifies one field declared by `owner`.
    ///
    /// A field without a doc comment is an error: its documentation becomes
    /// the property description.
    pub fn classify(
        &self,
        index: &mut SourceIndex,
        owner: DeclId,
        field: &FieldDeclarationView,
        site: &GroupSite,
    ) -> Result<FieldDisposition> {
        if field.is_static() {
            debug!(
                "Skipping static field [{}] of {}",
                field.name,
                index.get(owner).fqn
            );
            return Ok(FieldDisposition::Skip);
        }

        let Some(description) = field.javadoc.as_deref() else {
            return Err(MetadataError::UndocumentedField {
                field: field.name.clone(),
                owner: index.get(owner).fqn.clone(),
            });
        };

        let group_path = site.group_path();
        let key = RelaxedNames::for_camel_case(&field.name);
        let mut property = PropertyRecord::synthesized(format!("{}.{}", group_path, key.canonical()));
        property.type_name = Some(qualified_type_name(&field.declared_type));
        property.description = Some(description.to_string());
        property.short_description = Some(short_description(description));
        property.default_value = field.initializer.as_ref().map(|l| l.to_default_value());

        let group = GroupRecord::synthesized(group_path, site.group_type);
        let recurse_into = self.nested_target(index, owner, field)?;

        Ok(FieldDisposition::Emit(Emission {
            property,
            group,
            recurse_into,
        }))
    }

    /// The declaration a field's settings nest under, if it is worth descending into.
    fn nested_target(
        &self,
        index: &mut SourceIndex,
        owner: DeclId,
        field: &FieldDeclarationView,
    ) -> Result<Option<DeclId>> {
        if field.is_primitive || self.config.is_excluded(&field.type_base) {
            return Ok(None);
        }
        if index.get(owner).has_member_type(field.reference_head()) {
            return Ok(None);
        }
        if index.is_external_reference(&field.type_reference, owner) {
            warn!(
                "Field [{}] of {} has external type {}; not descending",
                field.name,
                index.get(owner).fqn,
                field.type_reference
            );
            return Ok(None);
        }

        let target = index.resolve(&field.type_reference, Some(owner))?;
        let decl = index.get(target);
        if decl.kind.is_structured() && !decl.is_member() {
            Ok(Some(target))
        } else {
            debug!(
                "Not descending into {} ({:?}) for field [{}]",
                decl.fqn, decl.kind, field.name
            );
            Ok(None)
        }
    }
}

/// `java.lang.<Boxed>` for string and numeric element types, the declared
/// text otherwise.
pub fn qualified_type_name(declared_type: &str) -> String {
    let boxed = match declared_type {
        "String" => "String",
        "int" | "Integer" => "Integer",
        "long" | "Long" => "Long",
        "double" | "Double" => "Double",
        "float" | "Float" => "Float",
        other => return other.to_string(),
    };
    format!("java.lang.{}", boxed)
}
