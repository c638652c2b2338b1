crate::decl_indices!(UnitIndices, {
    package => "package",
    import => "import",
});

pub const JAVA_UNIT_SCM: &str = include_str!("java_unit.scm");
