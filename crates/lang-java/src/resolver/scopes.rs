use crate::model::TypeDeclaration;

/// Scopes consulted, in order, when a simple name matches several
/// declarations. The first scope admitting exactly one candidate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionScope {
    /// Member types of the referencing declaration or of its enclosing types.
    Member,
    /// `import a.b.Name;`
    SingleImport,
    /// Top-level types of the referencing declaration's package.
    Package,
    /// `import a.b.*;`
    WildcardImport,
}

impl ResolutionScope {
    pub const ORDER: [ResolutionScope; 4] = [
        ResolutionScope::Member,
        ResolutionScope::SingleImport,
        ResolutionScope::Package,
        ResolutionScope::WildcardImport,
    ];

    pub fn admits(self, context: &TypeDeclaration, candidate: &TypeDeclaration) -> bool {
        match self {
            ResolutionScope::Member => candidate.enclosing.as_deref().is_some_and(|outer| {
                context.fqn == outer || context.fqn.starts_with(&format!("{outer}."))
            }),
            ResolutionScope::SingleImport => {
                context.imported_fqn(&candidate.name) == Some(candidate.fqn.as_str())
            }
            ResolutionScope::Package => {
                !candidate.is_member() && candidate.package == context.package
            }
            ResolutionScope::WildcardImport => context.wildcard_imports().any(|pkg| {
                if candidate.is_member() {
                    candidate.enclosing.as_deref() == Some(pkg)
                } else {
                    candidate.package.as_deref() == Some(pkg)
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeKind;
    use std::path::PathBuf;

    fn decl(package: &str, name: &str, enclosing: Option<&str>, imports: &[&str]) -> TypeDeclaration {
        let fqn = match enclosing {
            Some(outer) => format!("{outer}.{name}"),
            None => format!("{package}.{name}"),
        };
        TypeDeclaration {
            name: name.to_string(),
            fqn,
            kind: TypeKind::Class,
            package: Some(package.to_string()),
            imports: imports.iter().map(|s| s.to_string()).collect(),
            enclosing: enclosing.map(str::to_string),
            superclasses: Vec::new(),
            fields: Vec::new(),
            nested: Vec::new(),
            requires_module: None,
            path: PathBuf::new(),
        }
    }

    #[test]
    fn test_member_scope_covers_enclosing_chain() {
        let context = decl("a", "Inner", Some("a.Outer"), &[]);
        let sibling = decl("a", "Retry", Some("a.Outer"), &[]);
        let elsewhere = decl("b", "Retry", Some("b.Other"), &[]);

        assert!(ResolutionScope::Member.admits(&context, &sibling));
        assert!(!ResolutionScope::Member.admits(&context, &elsewhere));
    }

    #[test]
    fn test_import_and_package_scopes() {
        let context = decl("a", "Props", None, &["b.Retry", "c.*"]);
        let imported = decl("b", "Retry", None, &[]);
        let same_package = decl("a", "Retry", None, &[]);
        let wildcard = decl("c", "Retry", None, &[]);

        assert!(ResolutionScope::SingleImport.admits(&context, &imported));
        assert!(!ResolutionScope::SingleImport.admits(&context, &same_package));
        assert!(ResolutionScope::Package.admits(&context, &same_package));
        assert!(!ResolutionScope::Package.admits(&context, &wildcard));
        assert!(ResolutionScope::WildcardImport.admits(&context, &wildcard));
    }
}
