//! Identifier-specific annotations layered on top of resolved steps.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::helper_chain::ResolutionStep;
use crate::base::{TextRange, TextSize};
use crate::semantic::index::{FqcnNode, IndexedNode, SourceFile, TranslationShortHandNode};
use crate::semantic::reflection::ClassRegistry;
use crate::syntax::{NodeId, NodeKind, NodeTag, SyntaxTree};

/// Helpers whose `translate` takes a translation id
pub const TRANSLATION_HELPERS: &[&str] = &["I18n", "Translation"];
pub const TRANSLATE_METHOD: &str = "translate";

/// Helpers whose `instanceOf` takes a class name
pub const TYPE_CHECK_HELPERS: &[&str] = &["PropTypes"];
/// Compared case-insensitively
pub const INSTANCEOF_METHOD: &str = "instanceof";

/// Meta properties holding a class name, e.g. `@class = 'Acme\\Impl'`
pub const META_CLASS_KEYS: &[&str] = &["class", "exceptionHandler"];

/// Filter expressions inside strings, e.g. `'[instanceof \\Acme\\Impl]'`
static INSTANCEOF_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[instanceof\s+([^\]\s]+)\s*\]").expect("instanceof filter pattern is valid")
});

/// Collapse doubled backslashes and drop a leading one
pub fn collapse_class_name(raw: &str) -> String {
    raw.replace("\\\\", "\\").trim_start_matches('\\').to_string()
}

/// Content range of a quoted literal
fn content_range(range: TextRange) -> TextRange {
    if range.len() < TextSize::new(2) {
        return range;
    }
    TextRange::new(
        range.start() + TextSize::new(1),
        range.end() - TextSize::new(1),
    )
}

/// The sole argument of a call segment, if it is a string literal
fn single_string_argument(tree: &SyntaxTree, segment: NodeId) -> Option<(NodeId, &str)> {
    let Some(NodeKind::ObjectFunctionPathNode { args, .. }) = tree.kind(segment) else {
        return None;
    };
    let [argument] = args.as_slice() else {
        return None;
    };
    match tree.kind(*argument)? {
        NodeKind::LiteralString { value } => Some((*argument, value)),
        _ => None,
    }
}

/// Attach the translation or class annotation a step calls for.
///
/// Returns whether a node was attached.
pub(super) fn annotate_step(
    file: &mut SourceFile,
    step: &ResolutionStep,
    registry: &ClassRegistry,
) -> bool {
    let tree = file.tree();
    let Some(segment_value) = tree.kind(step.segment).and_then(NodeKind::chain_value) else {
        return false;
    };
    let helper = step.helper_identifier.as_str();

    let annotation = if TRANSLATION_HELPERS.contains(&helper) && segment_value == TRANSLATE_METHOD
    {
        single_string_argument(tree, step.segment).map(|(literal, value)| {
            let node = IndexedNode::TranslationShortHand(TranslationShortHandNode {
                value: value.to_string(),
                literal,
            });
            (node, NodeTag::TranslationShortHand, tree.range(literal))
        })
    } else if TYPE_CHECK_HELPERS.contains(&helper)
        && segment_value.eq_ignore_ascii_case(INSTANCEOF_METHOD)
    {
        single_string_argument(tree, step.segment).and_then(|(literal, value)| {
            let fqcn = collapse_class_name(value);
            let class = registry.lookup(&fqcn)?;
            let node = IndexedNode::Fqcn(FqcnNode {
                identifier: fqcn.into(),
                class,
                literal,
            });
            Some((node, NodeTag::Fqcn, tree.range(literal)))
        })
    } else {
        None
    };

    let Some((node, tag, range)) = annotation else {
        return false;
    };
    trace!("{}: attached {tag:?} for {helper}", file.uri());
    file.add_node(node, tag, content_range(range));
    true
}

/// Attach class annotations for `@class` style meta assignments.
///
/// The meta segment is the first path segment, or the second one when the
/// path starts with `prototype(...)`. Returns the number of attached nodes.
pub(super) fn annotate_meta_classes(file: &mut SourceFile, registry: &ClassRegistry) -> usize {
    let tree = file.tree();
    let mut annotations = Vec::new();

    for (_, node) in tree.iter() {
        let NodeKind::ObjectStatement {
            path,
            operation: Some(operation),
            ..
        } = &node.kind
        else {
            continue;
        };
        let Some(NodeKind::ObjectPath { segments }) = tree.kind(*path) else {
            continue;
        };
        let meta = match segments.as_slice() {
            [first, second, ..]
                if matches!(tree.kind(*first), Some(NodeKind::PrototypePathSegment { .. })) =>
            {
                *second
            }
            [first, ..] => *first,
            [] => continue,
        };
        let Some(NodeKind::MetaPathSegment { identifier }) = tree.kind(meta) else {
            continue;
        };
        if !META_CLASS_KEYS.contains(&identifier.as_str()) {
            continue;
        }
        let Some(NodeKind::ValueAssignment { value }) = tree.kind(*operation) else {
            continue;
        };
        let Some(NodeKind::StringValue { value: raw }) = tree.kind(*value) else {
            continue;
        };

        let fqcn = collapse_class_name(raw);
        let Some(class) = registry.lookup(&fqcn) else {
            continue;
        };
        annotations.push((
            FqcnNode {
                identifier: fqcn.into(),
                class,
                literal: *value,
            },
            content_range(tree.range(*value)),
        ));
    }

    let count = annotations.len();
    for (node, range) in annotations {
        trace!("{}: attached class annotation {}", file.uri(), node.identifier);
        file.add_node(IndexedNode::Fqcn(node), NodeTag::Fqcn, range);
    }
    count
}

/// Attach class annotations for `[instanceof \\Vendor\\Class]` filters in
/// string values and literals.
///
/// Only backslash-prefixed names are classes; other operands name
/// components and are left alone. Returns the number of attached nodes.
pub(super) fn annotate_instanceof_filters(file: &mut SourceFile, registry: &ClassRegistry) -> usize {
    let tree = file.tree();
    let mut annotations = Vec::new();

    for (id, node) in tree.iter() {
        let raw = match &node.kind {
            NodeKind::StringValue { value } | NodeKind::LiteralString { value } => value,
            _ => continue,
        };
        if !raw.trim_start().starts_with("[instanceof") {
            continue;
        }
        let content = content_range(node.range);
        for caps in INSTANCEOF_FILTER_RE.captures_iter(raw) {
            let Some(name) = caps.get(1).filter(|name| name.as_str().starts_with('\\')) else {
                continue;
            };
            let fqcn = collapse_class_name(name.as_str());
            let Some(class) = registry.lookup(&fqcn) else {
                continue;
            };
            let start = content.start() + TextSize::new(name.start() as u32);
            let range = TextRange::at(start, TextSize::of(name.as_str()));
            annotations.push((
                FqcnNode {
                    identifier: fqcn.into(),
                    class,
                    literal: id,
                },
                range,
            ));
        }
    }

    let count = annotations.len();
    for (node, range) in annotations {
        trace!("{}: attached instanceof annotation {}", file.uri(), node.identifier);
        file.add_node(IndexedNode::Fqcn(node), NodeTag::Fqcn, range);
    }
    count
}
