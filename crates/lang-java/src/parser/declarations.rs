use super::JavaParser;
use super::utils::{child_of_kind, node_text};
use crate::model::{TypeDeclaration, TypeKind};
use confmeta_core::hints::ModuleRequirement;
use confmeta_core::naming::strip_generics;
use std::path::Path;
use tree_sitter::{Node, Tree};

/// Where a declaration sits: its package and enclosing type, if any.
struct Scope<'s> {
    package: Option<&'s str>,
    imports: &'s [String],
    enclosing: Option<String>,
}

impl JavaParser {
    pub(super) fn collect_declarations(
        &self,
        tree: &Tree,
        source: &str,
        package: Option<&str>,
        imports: &[String],
        path: &Path,
    ) -> Vec<TypeDeclaration> {
        let mut out = Vec::new();
        let scope = Scope {
            package,
            imports,
            enclosing: None,
        };
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if TypeKind::from_ts_kind(child.kind()).is_some() {
                self.collect_type(child, source, &scope, path, &mut out);
            }
        }
        out
    }

    fn collect_type(
        &self,
        node: Node,
        source: &str,
        scope: &Scope,
        path: &Path,
        out: &mut Vec<TypeDeclaration>,
    ) {
        let Some(kind) = TypeKind::from_ts_kind(node.kind()) else {
            return;
        };
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = node_text(name_node, source).to_string();
        let fqn = match (&scope.enclosing, scope.package) {
            (Some(outer), _) => format!("{}.{}", outer, name),
            (None, Some(pkg)) => format!("{}.{}", pkg, name),
            (None, None) => name.clone(),
        };

        let body = node.child_by_field_name("body");
        let members = body.map(|b| self.member_nodes(b)).unwrap_or_default();

        let mut fields = Vec::new();
        let mut nested_nodes = Vec::new();
        for member in members {
            match member.kind() {
                // Interface constants are constant_declaration nodes and
                // implicitly static, so they never surface here.
                "field_declaration" => fields.extend(self.extract_fields(member, source)),
                k if TypeKind::from_ts_kind(k).is_some() => nested_nodes.push(member),
                _ => {}
            }
        }

        let nested = nested_nodes
            .iter()
            .filter_map(|n| n.child_by_field_name("name"))
            .map(|n| node_text(n, source).to_string())
            .collect();

        let declaration = TypeDeclaration {
            name,
            fqn: fqn.clone(),
            kind,
            package: scope.package.map(str::to_string),
            imports: scope.imports.to_vec(),
            enclosing: scope.enclosing.clone(),
            superclasses: self.extract_supertypes(node, source),
            fields,
            nested,
            requires_module: self.extract_module_requirement(node, source),
            path: path.to_path_buf(),
        };
        out.push(declaration);

        let inner_scope = Scope {
            package: scope.package,
            imports: scope.imports,
            enclosing: Some(fqn),
        };
        for nested_node in nested_nodes {
            self.collect_type(nested_node, source, &inner_scope, path, out);
        }
    }

    /// Direct members of a type body; enum bodies keep theirs one level down.
    fn member_nodes<'t>(&self, body: Node<'t>) -> Vec<Node<'t>> {
        let mut members = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if child.kind() == "enum_body_declarations" {
                let mut inner = child.walk();
                members.extend(child.named_children(&mut inner));
            } else {
                members.push(child);
            }
        }
        members
    }

    fn extract_supertypes(&self, node: Node, source: &str) -> Vec<String> {
        let mut supertypes = Vec::new();
        if let Some(superclass) = node.child_by_field_name("superclass") {
            let mut cursor = superclass.walk();
            for child in superclass.named_children(&mut cursor) {
                supertypes.push(strip_generics(node_text(child, source)).to_string());
            }
        }
        if let Some(extends) = child_of_kind(node, "extends_interfaces") {
            if let Some(list) = child_of_kind(extends, "type_list") {
                let mut cursor = list.walk();
                for child in list.named_children(&mut cursor) {
                    supertypes.push(strip_generics(node_text(child, source)).to_string());
                }
            }
        }
        supertypes
    }

    fn extract_module_requirement(&self, node: Node, source: &str) -> Option<ModuleRequirement> {
        let annotation = self
            .annotations(node, source)
            .into_iter()
            .find(|a| a.simple_name() == self.markers.requires_module)?;

        let name = annotation
            .argument("name")
            .or_else(|| annotation.argument("value"))
            .map(unquote)
            .unwrap_or_default();
        let automated = annotation
            .argument("automated")
            .is_some_and(|v| v.trim() == "true");
        Some(ModuleRequirement { name, automated })
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
