//! Relaxed-name handling for configuration keys.
//!
//! Field identifiers are written in camel case in source, while configuration
//! keys use the lower-kebab form. Matching a key back to a field therefore
//! needs every spelling the binder would accept; [`RelaxedNames`] produces
//! that closure in a stable order.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CAMEL_CASE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^A-Z-])([A-Z])").expect("valid camel-case pattern"));

const SEPARATORS: [char; 3] = ['_', '-', '.'];

/// Converts a camel-case identifier into its kebab-case key segment.
///
/// Every upper-case letter that does not start the name and does not follow a
/// hyphen becomes `-` plus its lower-case form: `myField` → `my-field`,
/// `myURL` → `my-u-r-l`.
pub fn camel_to_kebab(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() && !result.is_empty() && !result.ends_with('-') {
            result.push('-');
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Drops a generic suffix: `Outer<Inner>` → `Outer`.
pub fn strip_generics(type_name: &str) -> &str {
    match type_name.find('<') {
        Some(pos) => type_name[..pos].trim(),
        None => type_name.trim(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Manipulation {
    None,
    HyphenToUnderscore,
    UnderscoreToPeriod,
    PeriodToUnderscore,
    CamelCaseToUnderscore,
    CamelCaseToHyphen,
    SeparatedToCamelCase,
    CaseInsensitiveSeparatedToCamelCase,
}

impl Manipulation {
    const ALL: [Manipulation; 8] = [
        Manipulation::None,
        Manipulation::HyphenToUnderscore,
        Manipulation::UnderscoreToPeriod,
        Manipulation::PeriodToUnderscore,
        Manipulation::CamelCaseToUnderscore,
        Manipulation::CamelCaseToHyphen,
        Manipulation::SeparatedToCamelCase,
        Manipulation::CaseInsensitiveSeparatedToCamelCase,
    ];

    fn apply(self, value: &str) -> String {
        match self {
            Manipulation::None => value.to_string(),
            Manipulation::HyphenToUnderscore => value.replace('-', "_"),
            Manipulation::UnderscoreToPeriod => value.replace('_', "."),
            Manipulation::PeriodToUnderscore => value.replace('.', "_"),
            Manipulation::CamelCaseToUnderscore => split_camel_case(value, '_'),
            Manipulation::CamelCaseToHyphen => split_camel_case(value, '-'),
            Manipulation::SeparatedToCamelCase => separated_to_camel_case(value, false),
            Manipulation::CaseInsensitiveSeparatedToCamelCase => {
                separated_to_camel_case(value, true)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Variation {
    None,
    Lowercase,
    Uppercase,
}

impl Variation {
    const ALL: [Variation; 3] = [Variation::None, Variation::Lowercase, Variation::Uppercase];

    fn apply(self, value: String) -> String {
        match self {
            Variation::None => value,
            Variation::Lowercase => value.to_lowercase(),
            Variation::Uppercase => value.to_uppercase(),
        }
    }
}

fn split_camel_case(value: &str, separator: char) -> String {
    CAMEL_CASE_PATTERN
        .replace_all(value, |caps: &Captures| {
            format!("{}{}{}", &caps[1], separator, caps[2].to_lowercase())
        })
        .into_owned()
}

fn separated_to_camel_case(value: &str, case_insensitive: bool) -> String {
    if value.is_empty() {
        return String::new();
    }
    let mut fields: Vec<&str> = value.split(SEPARATORS).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }

    let mut builder = String::with_capacity(value.len());
    for field in fields {
        let field = if case_insensitive {
            field.to_lowercase()
        } else {
            field.to_string()
        };
        if builder.is_empty() {
            builder.push_str(&field);
        } else {
            builder.push_str(&capitalize(&field));
        }
    }
    if let Some(last) = value.chars().last() {
        if SEPARATORS.contains(&last) {
            builder.push(last);
        }
    }
    builder
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Every relaxed spelling of a name (each manipulation under each case
/// variation), deduplicated in discovery order.
#[derive(Debug, Clone)]
pub struct RelaxedNames {
    values: IndexSet<String>,
}

impl RelaxedNames {
    pub fn new(name: &str) -> Self {
        let mut values = IndexSet::new();
        for variation in Variation::ALL {
            for manipulation in Manipulation::ALL {
                values.insert(variation.apply(manipulation.apply(name)));
            }
        }
        Self { values }
    }

    /// Relaxed names for a camel-case identifier; the first variant is its
    /// kebab-case form.
    pub fn for_camel_case(name: &str) -> Self {
        Self::new(&camel_to_kebab(name))
    }

    /// The canonical spelling: first variant, or the empty string.
    pub fn canonical(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_kebab() {
        assert_eq!(camel_to_kebab("retryCount"), "retry-count");
        assert_eq!(camel_to_kebab("name"), "name");
        assert_eq!(camel_to_kebab("myURL"), "my-u-r-l");
        assert_eq!(camel_to_kebab("Already-Split"), "Already-Split");
    }

    #[test]
    fn test_canonical_is_kebab() {
        assert_eq!(RelaxedNames::for_camel_case("retryCount").canonical(), "retry-count");
    }

    #[test]
    fn test_kebab_name_reaches_camel_field() {
        let names = RelaxedNames::new("retry-count");
        assert!(names.contains("retryCount"));
        assert!(names.contains("retry_count"));
        assert!(names.contains("RETRY_COUNT"));
        assert!(names.contains("retrycount"));
    }

    #[test]
    fn test_separated_to_camel_case_keeps_trailing_separator() {
        assert_eq!(separated_to_camel_case("foo-bar-", false), "fooBar-");
        assert_eq!(separated_to_camel_case("FOO_BAR", true), "fooBar");
    }

    #[test]
    fn test_strip_generics() {
        assert_eq!(strip_generics("Outer<Inner>"), "Outer");
        assert_eq!(strip_generics("a.b.Plain"), "a.b.Plain");
        assert_eq!(strip_generics("java.util.List<org.Foo>"), "java.util.List");
    }
}
