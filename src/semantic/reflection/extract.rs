//! Pattern-based extraction of class structure from host source text.
//!
//! No grammar is involved: a handful of regular expressions pick out the
//! namespace, class declaration, imports and public method signatures.
//! Unexpected text shapes degrade to partial results.

use std::sync::LazyLock;

use regex::Regex;
use smol_str::SmolStr;
use tracing::warn;

use super::docblock::preceding_doc_block;
use super::host_class::{
    HostClass, HostMethod, PRIMITIVE_TYPES, Parameter, ReturnType, SELF_REFERENCES,
    normalize_alias,
};
use super::LookupMiss;
use crate::base::{FileUri, LineIndex, TextRange, TextSize};

/// Upper bound on method signatures read from one file
pub const MAX_METHODS: usize = 1000;
/// Upper bound on import statements read from one file
pub const MAX_IMPORTS: usize = 1000;

static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*namespace\s+([^;{\s]+)\s*;").expect("namespace pattern is valid")
});

static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclass\s+(\w+)").expect("class pattern is valid"));

static USE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*use\s+(?:function\s+|const\s+)?([^;{]+);").expect("use pattern is valid")
});

static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<pre>static\s+)?public\s+(?P<post>static\s+)?function\s+&?(?P<name>\w+)\s*\((?P<params>(?:[^()]|\([^()]*\))*)\)\s*(?::\s*(?P<ret>\??[\\\w|]+))?",
    )
    .expect("method pattern is valid")
});

static PARAMETER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(?:(?:public|protected|private|readonly)\s+)*(?:(?P<type>[?\\\w|]+(?:&[?\\\w|]+)*)\s+)?&?(?P<spread>\.\.\.)?\s*\$(?P<name>\w+)(?:\s*=\s*(?P<default>.+))?$",
    )
    .expect("parameter pattern is valid")
});

/// An import statement, `use A\B\C as D;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub fqcn: SmolStr,
    /// Name the import is visible under
    pub alias: SmolStr,
}

/// Build a [`HostClass`] from the text of the file expected to declare it
pub fn extract_class(
    fqcn: &str,
    expected_namespace: &str,
    root_name: &str,
    source: &str,
    uri: FileUri,
) -> Result<HostClass, LookupMiss> {
    let class_name = fqcn.rsplit('\\').next().unwrap_or(fqcn);

    let declared = NAMESPACE_RE
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim());
    if declared != Some(expected_namespace) {
        return Err(LookupMiss::NamespaceMismatch {
            expected: expected_namespace.into(),
            found: declared.map(SmolStr::new),
        });
    }

    let Some(class_match) = CLASS_RE
        .captures_iter(source)
        .find(|caps| caps.get(1).is_some_and(|m| m.as_str() == class_name))
        .and_then(|caps| caps.get(0))
    else {
        return Err(LookupMiss::ClassMismatch(class_name.into()));
    };

    let line_index = LineIndex::new(source);
    let range = text_range(class_match.start(), class_match.end());
    let imports = parse_imports(source, &uri);
    let methods = parse_methods(source, expected_namespace, &imports, &line_index, &uri);

    Ok(HostClass {
        fqcn: fqcn.into(),
        namespace: root_name.into(),
        methods,
        span: line_index.span(source, range),
        range,
        uri,
    })
}

fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32))
}

/// Import statements in source order
pub fn parse_imports(source: &str, uri: &FileUri) -> Vec<Import> {
    let mut imports = Vec::new();
    for (count, caps) in USE_RE.captures_iter(source).enumerate() {
        if count >= MAX_IMPORTS {
            warn!("import scan of {uri} stopped after {MAX_IMPORTS} statements");
            break;
        }
        let Some(body) = caps.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        let (path, alias) = match body.split_once(" as ") {
            Some((path, alias)) => (path.trim(), alias.trim()),
            None => (body, body.rsplit('\\').next().unwrap_or(body)),
        };
        let path = path.trim_start_matches('\\');
        if path.is_empty() || alias.is_empty() {
            continue;
        }
        imports.push(Import {
            fqcn: path.into(),
            alias: alias.into(),
        });
    }
    imports
}

fn parse_methods(
    source: &str,
    namespace: &str,
    imports: &[Import],
    line_index: &LineIndex,
    uri: &FileUri,
) -> Vec<HostMethod> {
    let mut methods = Vec::new();
    for (count, caps) in METHOD_RE.captures_iter(source).enumerate() {
        if count >= MAX_METHODS {
            warn!("method scan of {uri} stopped after {MAX_METHODS} signatures");
            break;
        }
        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            continue;
        };
        let is_static = caps.name("pre").is_some() || caps.name("post").is_some();
        let parameters = caps
            .name("params")
            .map(|m| parse_parameters(m.as_str()))
            .unwrap_or_default();
        let mut return_type = caps
            .name("ret")
            .map(|m| resolve_type(m.as_str(), namespace, imports))
            .unwrap_or(ReturnType::Unresolved);

        let doc = preceding_doc_block(source, whole.start()).unwrap_or_default();
        let mut return_description = None;
        if let Some((ty, text)) = doc.return_tag {
            return_type = resolve_type(&ty, namespace, imports);
            return_description = text;
        }

        let range = text_range(whole.start(), whole.end());
        methods.push(HostMethod {
            alias: normalize_alias(name.as_str()),
            name: name.as_str().into(),
            is_static,
            parameters,
            return_type,
            description: doc.description,
            return_description,
            span: line_index.span(source, range),
            range,
        });
    }
    methods
}

/// Parse a raw parameter list; unparseable entries are skipped
pub fn parse_parameters(raw: &str) -> Vec<Parameter> {
    split_top_level(raw)
        .into_iter()
        .filter_map(|part| {
            let part = strip_attributes(part.trim());
            let caps = PARAMETER_RE.captures(part)?;
            Some(Parameter {
                type_hint: caps.name("type").map(|m| SmolStr::new(m.as_str())),
                spread: caps.name("spread").is_some(),
                name: caps.name("name")?.as_str().into(),
                default: caps.name("default").map(|m| m.as_str().trim().to_string()),
            })
        })
        .collect()
}

/// Split on commas outside brackets and string literals
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (index, c) in raw.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&raw[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts.retain(|part| !part.trim().is_empty());
    parts
}

fn strip_attributes(mut part: &str) -> &str {
    while let Some(rest) = part.strip_prefix("#[") {
        match rest.find(']') {
            Some(end) => part = rest[end + 1..].trim_start(),
            None => break,
        }
    }
    part
}

/// Resolve a raw type annotation against the declaring namespace and imports
pub fn resolve_type(raw: &str, namespace: &str, imports: &[Import]) -> ReturnType {
    let raw = raw.trim().trim_start_matches('?');
    let Some(name) = raw
        .split('|')
        .map(str::trim)
        .find(|member| !member.is_empty() && !member.eq_ignore_ascii_case("null"))
    else {
        return if raw.eq_ignore_ascii_case("null") {
            ReturnType::Primitive("null".into())
        } else {
            ReturnType::Unresolved
        };
    };

    if name.ends_with("[]") {
        return ReturnType::Primitive("array".into());
    }
    let name = name.split('<').next().unwrap_or(name);
    let lower = name.to_ascii_lowercase();
    if PRIMITIVE_TYPES.contains(&lower.as_str()) {
        return ReturnType::Primitive(lower.into());
    }
    if SELF_REFERENCES.contains(&lower.as_str()) {
        return ReturnType::Unresolved;
    }

    if let Some(qualified) = name.strip_prefix('\\') {
        return ReturnType::ClassRef(qualified.into());
    }
    if name.contains('\\') {
        return ReturnType::ClassRef(format!("{namespace}\\{name}").into());
    }

    let suffix = format!("\\{name}");
    let imported = imports
        .iter()
        .find(|import| import.alias == name)
        .or_else(|| imports.iter().find(|import| import.fqcn.ends_with(&suffix)));
    match imported {
        Some(import) => ReturnType::ClassRef(import.fqcn.clone()),
        None => ReturnType::ClassRef(format!("{namespace}\\{name}").into()),
    }
}
