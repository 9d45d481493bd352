//! Doc block reading for method signatures.

use smol_str::SmolStr;

/// Parsed `/** ... */` block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub description: String,
    /// `@return <type> [description]`
    pub return_tag: Option<(SmolStr, Option<String>)>,
}

/// Modifiers that may sit between a doc block and the `public` keyword
const LEADING_MODIFIERS: &[&str] = &["final", "abstract", "static"];

/// Doc block ending right before `offset`, if any.
///
/// Only whitespace, attributes on their own line, and method modifiers may
/// separate the block from the signature.
pub fn preceding_doc_block(source: &str, offset: usize) -> Option<DocBlock> {
    let mut before = source.get(..offset)?.trim_end();
    loop {
        let stripped = LEADING_MODIFIERS
            .iter()
            .find_map(|modifier| before.strip_suffix(modifier))
            .filter(|rest| rest.is_empty() || rest.ends_with(char::is_whitespace));
        match stripped {
            Some(rest) => before = rest.trim_end(),
            None => break,
        }
    }
    while let Some(line_start) = attribute_line_start(before) {
        before = before[..line_start].trim_end();
    }

    let body_end = before.strip_suffix("*/")?;
    let start = body_end.rfind("/**")?;
    Some(parse_doc_block(&body_end[start + 3..]))
}

/// Start of a trailing `#[...]` attribute line
fn attribute_line_start(text: &str) -> Option<usize> {
    if !text.ends_with(']') {
        return None;
    }
    let line_start = text.rfind('\n').map(|i| i + 1).unwrap_or(0);
    text[line_start..]
        .trim_start()
        .starts_with("#[")
        .then_some(line_start)
}

fn parse_doc_block(body: &str) -> DocBlock {
    let mut description = Vec::new();
    let mut return_tag = None;

    for line in body.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if line.is_empty() {
            continue;
        }
        if let Some(tag) = line.strip_prefix("@return") {
            let mut parts = tag.trim().splitn(2, char::is_whitespace);
            if let Some(ty) = parts.next().filter(|ty| !ty.is_empty()) {
                let text = parts
                    .next()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(String::from);
                return_tag = Some((SmolStr::new(ty), text));
            }
        } else if !line.starts_with('@') {
            description.push(line);
        }
    }

    DocBlock {
        description: description.join("\n"),
        return_tag,
    }
}
