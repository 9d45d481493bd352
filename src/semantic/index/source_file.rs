use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use super::categorize::categorize;
use super::node::{
    HelperMethodNode, HelperNode, IndexId, IndexedNode, PositionedNode, SyntheticNode,
};
use crate::base::{FileUri, LineIndex, TextRange, TextSize};
use crate::parser::{Parse, SyntaxError};
use crate::semantic::resolver::ResolutionStep;
use crate::syntax::{NodeId, NodeKind, NodeTag, SyntaxTree};

/// Position-indexed model of one template file.
///
/// Holds every parser node plus the synthetic nodes attached by resolution,
/// keyed by [`NodeTag`] in insertion order. A file is never patched after a
/// text change; the workspace builds a new one and swaps the snapshot.
#[derive(Debug, Clone)]
pub struct SourceFile {
    uri: FileUri,
    text: Arc<str>,
    line_index: LineIndex,
    tree: SyntaxTree,
    parse_errors: Vec<SyntaxError>,
    entries: Vec<PositionedNode>,
    by_tag: IndexMap<NodeTag, Vec<IndexId>>,
    creations: Vec<IndexId>,
    overwrites: Vec<IndexId>,
    extends: Vec<IndexId>,
}

impl SourceFile {
    /// Index a parse result.
    ///
    /// Syntax nodes are inserted in arena order, so the entry of `NodeId(n)`
    /// is `IndexId(n)`.
    pub fn new(uri: FileUri, text: impl Into<Arc<str>>, parse: Parse) -> Self {
        let text = text.into();
        let Parse { tree, errors } = parse;
        let mut file = Self {
            uri,
            line_index: LineIndex::new(&text),
            text,
            tree: SyntaxTree::new(),
            parse_errors: errors,
            entries: Vec::with_capacity(tree.len()),
            by_tag: IndexMap::new(),
            creations: Vec::new(),
            overwrites: Vec::new(),
            extends: Vec::new(),
        };

        for (id, node) in tree.iter() {
            file.add_node(IndexedNode::Syntax(id), node.kind.tag(), node.range);
        }
        let lists = categorize(&tree);
        file.creations = lists.creations.into_iter().map(Self::entry_of).collect();
        file.overwrites = lists.overwrites.into_iter().map(Self::entry_of).collect();
        file.extends = lists.extends.into_iter().map(Self::entry_of).collect();
        file.tree = tree;
        file
    }

    fn entry_of(id: NodeId) -> IndexId {
        IndexId(id.index() as u32)
    }

    /// Insert a node, computing its line/column span.
    ///
    /// Ranges are clamped to the text.
    pub fn add_node(&mut self, node: IndexedNode, tag: NodeTag, range: TextRange) -> IndexId {
        let len = TextSize::of(&*self.text);
        let start = range.start().min(len);
        let range = TextRange::new(start, range.end().clamp(start, len));

        let id = IndexId(self.entries.len() as u32);
        let span = self.line_index.span(&self.text, range);
        self.entries.push(PositionedNode {
            id,
            tag,
            node,
            range,
            span,
        });
        self.by_tag.entry(tag).or_default().push(id);
        id
    }

    /// Attach the helper/method node pair of one resolution step.
    ///
    /// Both back-references are fixed here: the helper points at the method
    /// node and the method node at its owning helper.
    pub fn attach_step(&mut self, step: &ResolutionStep) -> (IndexId, IndexId) {
        let helper_id = IndexId(self.entries.len() as u32);
        let method_id = IndexId(helper_id.0 + 1);

        let helper = HelperNode {
            identifier: step.helper_identifier.clone(),
            class: Arc::clone(&step.helper_class),
            object_node: step.object_node,
            method: method_id,
        };
        let method = HelperMethodNode {
            identifier: step.method.name.clone(),
            class: Arc::clone(&step.method_class),
            method: step.method.clone(),
            segment: step.segment,
            owner: helper_id,
        };

        self.add_node(IndexedNode::Helper(helper), NodeTag::Helper, step.helper_range);
        self.add_node(
            IndexedNode::HelperMethod(method),
            NodeTag::HelperMethod,
            step.method_range,
        );
        trace!(
            "{}: attached {} -> {}::{}",
            self.uri, step.helper_identifier, step.method_class.fqcn, step.method.name
        );
        (helper_id, method_id)
    }

    pub fn uri(&self) -> &FileUri {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_arc(&self) -> &Arc<str> {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn parse_errors(&self) -> &[SyntaxError] {
        &self.parse_errors
    }

    pub fn get(&self, id: IndexId) -> Option<&PositionedNode> {
        self.entries.get(id.index())
    }

    /// Entry of a syntax node
    pub fn syntax_entry(&self, id: NodeId) -> Option<&PositionedNode> {
        self.entries
            .get(id.index())
            .filter(|entry| entry.syntax_id() == Some(id))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.tree.kind(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &PositionedNode> {
        self.entries.iter()
    }

    /// All nodes carrying `tag`, in insertion order
    pub fn nodes_by_type(&self, tag: NodeTag) -> impl Iterator<Item = &PositionedNode> {
        self.by_tag
            .get(&tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.entries.get(id.index()))
    }

    /// Synthetic nodes of one type, in insertion order
    pub fn nodes_of<T: SyntheticNode>(&self) -> impl Iterator<Item = (&PositionedNode, &T)> {
        self.nodes_by_type(T::TAG)
            .filter_map(|entry| T::from_indexed(&entry.node).map(|node| (entry, node)))
    }

    /// Most specific node containing the 0-based position.
    ///
    /// The smallest range wins; on equal ranges the later insertion wins.
    /// A position directly after a node's last character still hits it.
    pub fn node_at(&self, line: usize, column: usize) -> Option<&PositionedNode> {
        let offset = self.line_index.offset(&self.text, line, column)?;
        self.entries
            .iter()
            .filter(|entry| entry.range.contains_inclusive(offset))
            .fold(None, |best: Option<&PositionedNode>, entry| match best {
                Some(best) if best.range.len() < entry.range.len() => Some(best),
                _ => Some(entry),
            })
    }

    /// Named component definitions introduced by copying another one
    pub fn component_creations(&self) -> impl Iterator<Item = &PositionedNode> {
        self.resolve_ids(&self.creations)
    }

    /// Named component definitions modified in place
    pub fn component_overwrites(&self) -> impl Iterator<Item = &PositionedNode> {
        self.resolve_ids(&self.overwrites)
    }

    /// Named components used as the source of a copy
    pub fn component_extends(&self) -> impl Iterator<Item = &PositionedNode> {
        self.resolve_ids(&self.extends)
    }

    fn resolve_ids<'a>(&'a self, ids: &'a [IndexId]) -> impl Iterator<Item = &'a PositionedNode> {
        ids.iter().filter_map(|id| self.entries.get(id.index()))
    }

    /// Source text covered by an entry
    pub fn text_of(&self, entry: &PositionedNode) -> &str {
        &self.text[entry.range]
    }

    /// Whether any synthetic node refers to a class declared in `uri`
    pub fn references_file(&self, uri: &FileUri) -> bool {
        self.entries.iter().any(|entry| match &entry.node {
            IndexedNode::Helper(node) => &node.class.uri == uri,
            IndexedNode::HelperMethod(node) => &node.class.uri == uri,
            IndexedNode::Fqcn(node) => &node.class.uri == uri,
            IndexedNode::Syntax(_) | IndexedNode::TranslationShortHand(_) => false,
        })
    }
}
