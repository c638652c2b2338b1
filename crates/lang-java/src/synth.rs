use crate::classify::{FieldClassifier, FieldDisposition, GroupSite};
use crate::model::DeclId;
use crate::resolver::SourceIndex;
use confmeta_core::config::GeneratorConfig;
use confmeta_core::error::{MetadataError, Result};
use confmeta_core::merge::Synthesized;
use confmeta_core::model::PropertyRecord;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Flattens structured settings types into property and group records.
///
/// Fields of a type land under the path of the property that references it;
/// fields inherited from superclasses land at the same path, recorded against
/// the requested type's group. Records accumulate across calls.
pub struct PropertySynthesizer<'a> {
    index: &'a mut SourceIndex,
    classifier: FieldClassifier<'a>,
    output: Synthesized,
    /// `(group path, declaration)` pairs already walked.
    visited: HashSet<(String, DeclId)>,
    /// Types on the current nested descent chain.
    active: Vec<DeclId>,
}

impl<'a> PropertySynthesizer<'a> {
    pub fn new(index: &'a mut SourceIndex, config: &'a GeneratorConfig) -> Self {
        Self {
            index,
            classifier: FieldClassifier::new(config),
            output: Synthesized::default(),
            visited: HashSet::new(),
            active: Vec::new(),
        }
    }

    /// Synthesizes the settings of `type_name` beneath `root`.
    ///
    /// `indexed` marks `root` as a collection: only this first level gets the
    /// `[]` suffix, nested levels never do.
    pub fn synthesize(&mut self, root: &PropertyRecord, type_name: &str, indexed: bool) -> Result<()> {
        let id = self.index.resolve(type_name, None)?;
        debug!(
            "Synthesizing {} at [{}]{}",
            self.index.get(id).fqn,
            root.name,
            if indexed { " (indexed)" } else { "" }
        );
        self.descend(&root.name, id, indexed)
    }

    pub fn into_output(self) -> Synthesized {
        self.output
    }

    fn descend(&mut self, path: &str, id: DeclId, indexed: bool) -> Result<()> {
        if self.active.contains(&id) {
            return Err(self.cycle(path, id));
        }
        let group_type = self.index.get(id).fqn.clone();

        self.active.push(id);
        let result = self.walk(path, id, &group_type, indexed);
        self.active.pop();
        result
    }

    /// Emits the fields of `id`, then of each of its ancestors, at one group.
    fn walk(&mut self, path: &str, id: DeclId, group_type: &str, indexed: bool) -> Result<()> {
        let site = GroupSite {
            parent_path: path,
            indexed,
            group_type,
        };
        if !self.visited.insert((site.group_path(), id)) {
            return Err(self.cycle(path, id));
        }

        let fields = self.index.get(id).fields.clone();
        for field in &fields {
            let FieldDisposition::Emit(emission) =
                self.classifier.classify(self.index, id, field, &site)?
            else {
                continue;
            };

            let property_path = emission.property.name.clone();
            self.output.groups.insert(emission.group);
            // A subtype field hides the ancestor field of the same name.
            if !self.output.properties.insert(emission.property) {
                debug!(
                    "[{}] of {} is hidden by a subtype field, skipping",
                    property_path,
                    self.index.get(id).fqn
                );
                continue;
            }
            trace!("Emitting [{}]", property_path);

            if let Some(nested) = emission.recurse_into {
                self.descend(&property_path, nested, false)?;
            }
        }

        let supers = self.index.get(id).superclasses.clone();
        for parent in supers {
            if self.index.is_external_reference(&parent, id) {
                debug!(
                    "Not walking external superclass {} of {}",
                    parent,
                    self.index.get(id).fqn
                );
                continue;
            }
            let parent_id = self.index.resolve(&parent, Some(id))?;
            self.walk(path, parent_id, group_type, indexed)?;
        }
        Ok(())
    }

    fn cycle(&self, path: &str, id: DeclId) -> MetadataError {
        MetadataError::CyclicType {
            path: path.to_string(),
            type_name: self.index.get(id).fqn.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{JavaParser, MarkerNames};
    use std::path::Path;

    fn index_of(sources: &[&str]) -> SourceIndex {
        let parser = JavaParser::new(MarkerNames::default()).unwrap();
        let units = sources
            .iter()
            .enumerate()
            .map(|(i, src)| parser.parse_unit(src, Path::new(&format!("T{i}.java"))).unwrap())
            .collect::<Vec<_>>();
        SourceIndex::from_units(Path::new("/src"), &GeneratorConfig::default(), units)
    }

    fn names(output: &Synthesized) -> Vec<&str> {
        output.properties.keys().collect()
    }

    #[test]
    fn test_inherited_fields_share_the_subtype_group() {
        let mut index = index_of(&[
            "package org.apereo.cas; public class A { /** X. */ private String x; }",
            "package org.apereo.cas; public class B extends A { /** Y. */ private String y; }",
        ]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        synth
            .synthesize(&PropertyRecord::synthesized("g"), "org.apereo.cas.B", true)
            .unwrap();
        let output = synth.into_output();

        assert_eq!(names(&output), vec!["g[].y", "g[].x"]);
        assert_eq!(output.groups.len(), 1);
        let group = output.groups.get("g[]").unwrap();
        assert_eq!(group.type_name.as_deref(), Some("org.apereo.cas.B"));
    }

    #[test]
    fn test_nested_levels_are_not_indexed() {
        let mut index = index_of(&[
            r#"package org.apereo.cas;
               public class Outer {
                   /** Pool. */ private Pool pool = new Pool();
               }"#,
            "package org.apereo.cas; public class Pool { /** Max size. */ private int maxSize = 8; }",
        ]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        synth
            .synthesize(&PropertyRecord::synthesized("cas.things"), "org.apereo.cas.Outer", true)
            .unwrap();
        let output = synth.into_output();

        assert_eq!(
            names(&output),
            vec!["cas.things[].pool", "cas.things[].pool.max-size"]
        );
        let nested = output.groups.get("cas.things[].pool").unwrap();
        assert_eq!(nested.type_name.as_deref(), Some("org.apereo.cas.Pool"));
    }

    #[test]
    fn test_same_type_at_two_paths() {
        let mut index = index_of(&[
            "package org.apereo.cas; public class Pool { /** Max size. */ private int maxSize; }",
        ]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        synth
            .synthesize(&PropertyRecord::synthesized("a"), "org.apereo.cas.Pool", true)
            .unwrap();
        synth
            .synthesize(&PropertyRecord::synthesized("b"), "org.apereo.cas.Pool", true)
            .unwrap();

        assert_eq!(names(&synth.into_output()), vec!["a[].max-size", "b[].max-size"]);
    }

    #[test]
    fn test_nested_cycle_is_rejected() {
        let mut index = index_of(&[
            "package org.apereo.cas; public class Ping { /** Pong. */ private Pong pong; }",
            "package org.apereo.cas; public class Pong { /** Ping. */ private Ping ping; }",
        ]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        let err = synth
            .synthesize(&PropertyRecord::synthesized("cas.ping"), "org.apereo.cas.Ping", false)
            .unwrap_err();

        match err {
            MetadataError::CyclicType { path, type_name } => {
                assert_eq!(path, "cas.ping.pong.ping");
                assert_eq!(type_name, "org.apereo.cas.Ping");
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_ancestor_cycle_is_rejected() {
        let mut index = index_of(&[
            "package org.apereo.cas; public class A extends B { /** X. */ private String x; }",
            "package org.apereo.cas; public class B extends A { /** Y. */ private String y; }",
        ]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        let err = synth
            .synthesize(&PropertyRecord::synthesized("g"), "org.apereo.cas.A", false)
            .unwrap_err();

        assert!(matches!(err, MetadataError::CyclicType { .. }));
    }

    #[test]
    fn test_external_superclass_is_not_walked() {
        let mut index = index_of(&[r#"
            package org.apereo.cas;
            import org.springframework.Base;
            public class Child extends Base { /** Own. */ private String own; }
        "#]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        synth
            .synthesize(&PropertyRecord::synthesized("g"), "org.apereo.cas.Child", false)
            .unwrap();

        assert_eq!(names(&synth.into_output()), vec!["g.own"]);
    }

    #[test]
    fn test_hidden_structured_field_is_walked_once() {
        let mut index = index_of(&[
            "package org.apereo.cas; public class Base { /** Base pool. */ private Pool pool; }",
            "package org.apereo.cas; public class Child extends Base { /** Child pool. */ private Pool pool; }",
            "package org.apereo.cas; public class Pool { /** Max size. */ private int maxSize; }",
        ]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        synth
            .synthesize(&PropertyRecord::synthesized("cas.things"), "org.apereo.cas.Child", true)
            .unwrap();
        let output = synth.into_output();

        assert_eq!(
            names(&output),
            vec!["cas.things[].pool", "cas.things[].pool.max-size"]
        );
        let pool = output.properties.get("cas.things[].pool").unwrap();
        assert_eq!(pool.description.as_deref(), Some("Child pool."));
    }

    #[test]
    fn test_each_declarator_is_a_property() {
        let mut index = index_of(&[
            "package org.apereo.cas; public class Range { /** Bound. */ private int low, high = 9; }",
        ]);
        let config = GeneratorConfig::default();
        let mut synth = PropertySynthesizer::new(&mut index, &config);
        synth
            .synthesize(&PropertyRecord::synthesized("r"), "org.apereo.cas.Range", false)
            .unwrap();
        let output = synth.into_output();

        assert_eq!(names(&output), vec!["r.low", "r.high"]);
        assert_eq!(output.properties.get("r.low").unwrap().default_value, None);
        assert_eq!(
            output.properties.get("r.high").unwrap().default_value,
            Some(serde_json::json!("9"))
        );
    }
}
