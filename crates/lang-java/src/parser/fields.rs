use super::JavaParser;
use super::javadoc::{doc_comment_for, javadoc_description};
use super::utils::{child_of_kind, node_text};
use crate::model::{FieldDeclarationView, Literal};
use confmeta_core::naming::strip_generics;
use tree_sitter::Node;

/// An annotation as written on a declaration.
#[derive(Debug, Clone)]
pub(crate) struct AnnotationView {
    pub name: String,
    /// `key = value` pairs; a lone element value is stored under `value`.
    pub arguments: Vec<(String, String)>,
}

impl AnnotationView {
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl JavaParser {
    /// One view per variable declared by a `field_declaration` node.
    pub(super) fn extract_fields(&self, node: Node, source: &str) -> Vec<FieldDeclarationView> {
        let Some(type_node) = node.child_by_field_name("type") else {
            return Vec::new();
        };
        let (element_node, is_primitive) = element_type(type_node);
        let declared_type = node_text(element_node, source).to_string();
        let type_reference: String = strip_generics(&declared_type)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let type_base = type_reference
            .rsplit('.')
            .next()
            .unwrap_or(&type_reference)
            .to_string();

        let modifiers = self.modifier_keywords(node, source);
        let required = self
            .annotations(node, source)
            .iter()
            .any(|a| a.simple_name() == self.markers.required_property);
        let javadoc = doc_comment_for(node, source).map(javadoc_description);

        let mut views = Vec::new();
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let initializer = declarator
                .child_by_field_name("value")
                .and_then(|v| literal_value(v, source));

            views.push(FieldDeclarationView {
                name: node_text(name_node, source).to_string(),
                declared_type: declared_type.clone(),
                type_base: type_base.clone(),
                type_reference: type_reference.clone(),
                is_primitive,
                modifiers: modifiers.clone(),
                javadoc: javadoc.clone(),
                initializer,
                required,
            });
        }
        views
    }

    /// Keyword modifiers (`private`, `static`, ...), annotations excluded.
    fn modifier_keywords(&self, node: Node, source: &str) -> Vec<String> {
        let Some(modifiers) = child_of_kind(node, "modifiers") else {
            return Vec::new();
        };
        let mut keywords = Vec::new();
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            let kind = child.kind();
            if kind.contains("annotation") || kind.contains("comment") {
                continue;
            }
            let m = node_text(child, source).to_string();
            if !keywords.contains(&m) {
                keywords.push(m);
            }
        }
        keywords
    }

    pub(crate) fn annotations(&self, node: Node, source: &str) -> Vec<AnnotationView> {
        let Some(modifiers) = child_of_kind(node, "modifiers") else {
            return Vec::new();
        };
        let mut annotations = Vec::new();
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            if !matches!(child.kind(), "annotation" | "marker_annotation") {
                continue;
            }
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let arguments = child
                .child_by_field_name("arguments")
                .map(|args| annotation_arguments(args, source))
                .unwrap_or_default();
            annotations.push(AnnotationView {
                name: node_text(name_node, source).to_string(),
                arguments,
            });
        }
        annotations
    }
}

/// The element type node and whether it is a primitive.
fn element_type(type_node: Node) -> (Node, bool) {
    let element = if type_node.kind() == "array_type" {
        type_node.child_by_field_name("element").unwrap_or(type_node)
    } else {
        type_node
    };
    let is_primitive = matches!(
        element.kind(),
        "integral_type" | "floating_point_type" | "boolean_type"
    );
    (element, is_primitive)
}

fn annotation_arguments(args: Node, source: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut cursor = args.walk();
    for child in args.named_children(&mut cursor) {
        if child.kind() == "element_value_pair" {
            if let (Some(key), Some(value)) = (
                child.child_by_field_name("key"),
                child.child_by_field_name("value"),
            ) {
                out.push((
                    node_text(key, source).to_string(),
                    node_text(value, source).to_string(),
                ));
            }
        } else if !child.kind().contains("comment") {
            out.push(("value".to_string(), node_text(child, source).to_string()));
        }
    }
    out
}

/// Literal initializers only; any other expression yields `None`.
fn literal_value(node: Node, source: &str) -> Option<Literal> {
    let text = node_text(node, source);
    match node.kind() {
        "string_literal" => {
            let inner = if text.starts_with("\"\"\"") {
                text.trim_start_matches("\"\"\"").trim_end_matches("\"\"\"")
            } else {
                text.strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(text)
            };
            Some(Literal::String(inner.to_string()))
        }
        "character_literal" => Some(Literal::String(
            text.trim_start_matches('\'').trim_end_matches('\'').to_string(),
        )),
        "decimal_integer_literal"
        | "hex_integer_literal"
        | "octal_integer_literal"
        | "binary_integer_literal"
        | "decimal_floating_point_literal"
        | "hex_floating_point_literal" => Some(Literal::Number(text.to_string())),
        "true" => Some(Literal::Boolean(true)),
        "false" => Some(Literal::Boolean(false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::MarkerNames;
    use super::*;
    use std::path::Path;

    fn fields(body: &str) -> Vec<FieldDeclarationView> {
        let source = format!("package p; class T {{ {} }}", body);
        let parser = JavaParser::new(MarkerNames::default()).unwrap();
        let unit = parser.parse_unit(&source, Path::new("T.java")).unwrap();
        unit.types.into_iter().next().unwrap().fields
    }

    #[test]
    fn test_literal_defaults() {
        let views = fields(
            r#"
            /** Timeout. */ private int timeout = 30;
            /** Handler. */ private Handler handler = SomeFactory.create();
            /** Name. */ private String name = "cas";
            /** Flag. */ private boolean enabled = true;
            /** Negative. */ private long offset = -1;
            /** Separator. */ private char sep = '|';
        "#,
        );
        let defaults: Vec<_> = views.iter().map(|f| f.initializer.clone()).collect();
        assert_eq!(
            defaults,
            vec![
                Some(Literal::Number("30".into())),
                None,
                Some(Literal::String("cas".into())),
                Some(Literal::Boolean(true)),
                None,
                Some(Literal::String("|".into())),
            ]
        );
    }

    #[test]
    fn test_type_shapes() {
        let views = fields(
            r#"
            /** a */ private List<LdapProperties> ldap = new ArrayList<>();
            /** b */ private AbstractStringAuditTrailManager.AuditFormats format;
            /** c */ private String[] names;
            /** d */ private double ratio;
        "#,
        );
        assert_eq!(views[0].declared_type, "List<LdapProperties>");
        assert_eq!(views[0].type_base, "List");
        assert_eq!(
            views[1].type_reference,
            "AbstractStringAuditTrailManager.AuditFormats"
        );
        assert_eq!(views[1].type_base, "AuditFormats");
        assert_eq!(views[1].reference_head(), "AbstractStringAuditTrailManager");
        assert_eq!(views[2].declared_type, "String");
        assert!(!views[2].is_primitive);
        assert!(views[3].is_primitive);
    }

    #[test]
    fn test_modifiers_markers_and_docs() {
        let views = fields(
            r#"
            private static final long serialVersionUID = 1L;

            /**
             * The base dn.
             * @see Other
             */
            @RequiredProperty
            private String baseDn;

            private String undocumented;

            /** First. */
            private int a, b = 2;
        "#,
        );
        assert!(views[0].is_static());
        assert_eq!(views[0].javadoc, None);

        assert!(views[1].required);
        assert_eq!(views[1].modifiers, vec!["private"]);
        assert_eq!(views[1].javadoc.as_deref(), Some("The base dn."));

        assert_eq!(views[2].javadoc, None);

        assert_eq!(views[3].name, "a");
        assert_eq!(views[4].name, "b");
        assert_eq!(views[4].javadoc.as_deref(), Some("First."));
        assert_eq!(views[4].initializer, Some(Literal::Number("2".into())));
    }
}
