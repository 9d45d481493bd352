//! Host class metadata extracted from class source files.

use smol_str::SmolStr;

use crate::base::{FileUri, Span, TextRange};

/// Return type keywords that never name a class
pub const PRIMITIVE_TYPES: &[&str] = &[
    "string", "int", "float", "bool", "array", "void", "mixed", "null", "callable", "iterable",
    "object", "never", "false", "true",
];

/// Return types that refer to the declaring class hierarchy; left unresolved
pub const SELF_REFERENCES: &[&str] = &["self", "parent", "static"];

/// Resolved return type of a host method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// Missing annotation, `self`, `parent` or `static`
    Unresolved,
    /// One of [`PRIMITIVE_TYPES`]
    Primitive(SmolStr),
    /// Fully qualified class name, without a leading backslash
    ClassRef(SmolStr),
}

impl ReturnType {
    /// Whether following this type can reach another class
    pub fn is_class(&self) -> bool {
        matches!(self, ReturnType::ClassRef(_))
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            ReturnType::ClassRef(fqcn) => Some(fqcn),
            _ => None,
        }
    }
}

/// One declared method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_hint: Option<SmolStr>,
    /// `...$rest`
    pub spread: bool,
    /// Name without the `$` sigil
    pub name: SmolStr,
    /// Source text of the default value
    pub default: Option<String>,
}

impl Parameter {
    pub fn is_optional(&self) -> bool {
        self.default.is_some() || self.spread
    }
}

/// A public method of a host class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMethod {
    pub name: SmolStr,
    /// Name with a leading `get` stripped, see [`normalize_alias`]
    pub alias: SmolStr,
    pub is_static: bool,
    pub parameters: Vec<Parameter>,
    pub return_type: ReturnType,
    /// Free-text lines of the preceding doc block
    pub description: String,
    /// Description attached to an explicit `@return` tag
    pub return_description: Option<String>,
    /// Byte range of the signature in the declaring file
    pub range: TextRange,
    pub span: Span,
}

impl HostMethod {
    /// True iff `identifier` is the method name or its normalized alias
    pub fn matches(&self, identifier: &str) -> bool {
        self.name == identifier || self.alias == identifier
    }

    /// Whether the last parameter takes any number of arguments
    pub fn is_variadic(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.spread)
    }
}

/// Strip a leading `get` and lower-case the following character.
///
/// `getFoo` becomes `foo`; `get` alone stays `get`.
pub fn normalize_alias(name: &str) -> SmolStr {
    let Some(rest) = name.strip_prefix("get") else {
        return SmolStr::new(name);
    };
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => {
            let mut alias = String::with_capacity(rest.len());
            alias.extend(first.to_lowercase());
            alias.push_str(chars.as_str());
            SmolStr::new(alias)
        }
        None => SmolStr::new(name),
    }
}

/// A host class as seen by the reflection cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostClass {
    /// Fully qualified name, without a leading backslash
    pub fqcn: SmolStr,
    /// Name of the namespace root this class was found under
    pub namespace: SmolStr,
    pub methods: Vec<HostMethod>,
    pub uri: FileUri,
    /// Range of the `class Name` declaration
    pub range: TextRange,
    pub span: Span,
}

impl HostClass {
    /// Unqualified class name
    pub fn class_name(&self) -> &str {
        self.fqcn.rsplit('\\').next().unwrap_or(&self.fqcn)
    }

    /// First method in declaration order matching `identifier`
    pub fn method_matching(&self, identifier: &str) -> Option<(usize, &HostMethod)> {
        self.methods
            .iter()
            .enumerate()
            .find(|(_, method)| method.matches(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("getFoo", "foo")]
    #[case("get", "get")]
    #[case("getURL", "uRL")]
    #[case("translate", "translate")]
    #[case("getter", "ter")]
    fn test_normalize_alias(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(normalize_alias(name), expected);
    }

    #[test]
    fn test_method_matches_name_and_alias() {
        let method = HostMethod {
            name: "getLabel".into(),
            alias: normalize_alias("getLabel"),
            is_static: false,
            parameters: Vec::new(),
            return_type: ReturnType::Unresolved,
            description: String::new(),
            return_description: None,
            range: TextRange::default(),
            span: Span::default(),
        };
        assert!(method.matches("getLabel"));
        assert!(method.matches("label"));
        assert!(!method.matches("Label"));
    }
}
