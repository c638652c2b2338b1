use confmeta_core::hints::ModuleRequirement;
use std::path::PathBuf;

/// Index of a declaration inside the source index arena.
pub type DeclId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub(crate) fn from_ts_kind(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(TypeKind::Class),
            "interface_declaration" => Some(TypeKind::Interface),
            "enum_declaration" => Some(TypeKind::Enum),
            "record_declaration" => Some(TypeKind::Record),
            "annotation_type_declaration" => Some(TypeKind::Annotation),
            _ => None,
        }
    }

    /// Only classes hold nested settings worth descending into.
    pub fn is_structured(self) -> bool {
        matches!(self, TypeKind::Class)
    }
}

/// A literal field initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// String or character literal content, quotes removed, escapes kept.
    String(String),
    /// Numeric literal source text, suffixes included.
    Number(String),
    Boolean(bool),
}

impl Literal {
    pub fn to_default_value(&self) -> serde_json::Value {
        match self {
            Literal::String(s) | Literal::Number(s) => serde_json::Value::String(s.clone()),
            Literal::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }
}

/// Syntactic view of one declared variable of a field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclarationView {
    pub name: String,
    /// Declared element type as written, array dimensions removed.
    pub declared_type: String,
    /// Simple name of the outermost type: `Map` for `java.util.Map<K, V>`.
    pub type_base: String,
    /// Type as referenced in source with generics removed: `Outer.Inner`.
    pub type_reference: String,
    pub is_primitive: bool,
    pub modifiers: Vec<String>,
    /// Description text of the field's doc comment, if it has one.
    pub javadoc: Option<String>,
    pub initializer: Option<Literal>,
    /// Carries the required-property marker.
    pub required: bool,
}

impl FieldDeclarationView {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }

    /// First segment of a scoped reference (`Outer` in `Outer.Inner`).
    pub fn reference_head(&self) -> &str {
        self.type_reference
            .split('.')
            .next()
            .unwrap_or(&self.type_reference)
    }
}

#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub name: String,
    /// Dotted name; member types append to their enclosing type's name.
    pub fqn: String,
    pub kind: TypeKind,
    pub package: Option<String>,
    pub imports: Vec<String>,
    /// FQN of the enclosing declaration for member types.
    pub enclosing: Option<String>,
    /// `extends` clause as written, generics removed.
    pub superclasses: Vec<String>,
    /// Direct fields only; fields of member types live on those declarations.
    pub fields: Vec<FieldDeclarationView>,
    /// Simple names of direct member types.
    pub nested: Vec<String>,
    pub requires_module: Option<ModuleRequirement>,
    pub path: PathBuf,
}

impl TypeDeclaration {
    pub fn is_member(&self) -> bool {
        self.enclosing.is_some()
    }

    pub fn has_member_type(&self, simple_name: &str) -> bool {
        self.nested.iter().any(|n| n == simple_name)
    }

    /// Single-type import whose last segment is `simple_name`.
    pub fn imported_fqn(&self, simple_name: &str) -> Option<&str> {
        self.imports
            .iter()
            .map(String::as_str)
            .filter(|i| !i.ends_with(".*"))
            .find(|i| i.rsplit('.').next() == Some(simple_name))
    }

    /// Packages imported on demand (`import a.b.*;`).
    pub fn wildcard_imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().filter_map(|i| i.strip_suffix(".*"))
    }
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub path: PathBuf,
    pub package: Option<String>,
    pub imports: Vec<String>,
    /// Every declaration in the file, outer types before their members.
    pub types: Vec<TypeDeclaration>,
}
