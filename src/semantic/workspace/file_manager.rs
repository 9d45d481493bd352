use std::sync::Arc;

use tracing::debug;

use crate::base::FileUri;
use crate::parser::{Parse, TemplateParser};
use crate::semantic::index::SourceFile;
use crate::semantic::workspace::{Diagnostic, Workspace};

impl<P: TemplateParser> Workspace<P> {
    /// Adds or replaces a file, building its index from `text`
    pub fn open_file(&mut self, uri: FileUri, text: &str) -> Arc<SourceFile> {
        let helpers = self.bound_helpers();
        let file = self.build_file(uri, text, &helpers);
        debug!("indexed {} ({} nodes)", file.uri(), file.len());
        let file = self.install(file);
        self.restart_batch();
        file
    }

    /// Adds or replaces a file from an existing parse of `text`
    pub fn open_parsed(&mut self, uri: FileUri, text: &str, parse: Parse) -> Arc<SourceFile> {
        let helpers = self.bound_helpers();
        let file = self.index_parsed(uri, text, parse, &helpers);
        let file = self.install(file);
        self.restart_batch();
        file
    }

    /// Rebuilds a tracked file from new content (for LSP document sync).
    ///
    /// Returns `None` when the file is not tracked.
    pub fn update_file(&mut self, uri: &FileUri, text: &str) -> Option<Arc<SourceFile>> {
        if !self.files.contains_key(uri) {
            return None;
        }
        Some(self.open_file(uri.clone(), text))
    }

    /// Rebuilds a tracked file from its current text against the current
    /// caches and configuration
    pub fn reresolve_file(&mut self, uri: &FileUri) -> Option<Arc<SourceFile>> {
        let text = Arc::clone(self.files.get(uri)?.text_arc());
        let helpers = self.bound_helpers();
        let file = self.build_file(uri.clone(), &text, &helpers);
        Some(self.install(file))
    }

    /// Removes a file together with its diagnostics
    pub fn remove_file(&mut self, uri: &FileUri) -> bool {
        self.diagnostics.remove(uri);
        self.files.remove(uri).is_some()
    }

    /// Current snapshot of a file
    pub fn snapshot(&self, uri: &FileUri) -> Option<Arc<SourceFile>> {
        self.files.get(uri).cloned()
    }

    pub fn contains_file(&self, uri: &FileUri) -> bool {
        self.files.contains_key(uri)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Uris of all tracked files, sorted
    pub fn file_uris(&self) -> Vec<FileUri> {
        let mut uris: Vec<FileUri> = self.files.keys().cloned().collect();
        uris.sort();
        uris
    }

    pub fn files(&self) -> impl Iterator<Item = &Arc<SourceFile>> {
        self.files.values()
    }

    /// Last computed diagnostics of a file
    pub fn diagnostics(&self, uri: &FileUri) -> &[Diagnostic] {
        self.diagnostics
            .get(uri)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
