//! File change handling: cache purges, rebuilds and re-diagnosis.

use std::fs;

use tracing::{debug, warn};

use crate::base::FileUri;
use crate::parser::TemplateParser;
use crate::semantic::workspace::{InvalidationPolicy, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileChangeKind {
    Created,
    Changed,
    Deleted,
}

/// A file watcher notification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileChangeEvent {
    pub uri: FileUri,
    pub kind: FileChangeKind,
}

impl FileChangeEvent {
    pub fn new(uri: FileUri, kind: FileChangeKind) -> Self {
        Self { uri, kind }
    }

    pub fn changed(uri: FileUri) -> Self {
        Self::new(uri, FileChangeKind::Changed)
    }
}

/// What handling one event did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationOutcome {
    /// A class cache entry was dropped
    pub purged: bool,
    /// Template files rebuilt
    pub rebuilt: Vec<FileUri>,
    /// Template files dropped
    pub removed: Vec<FileUri>,
    /// Files in the re-diagnosis batch scheduled by this event
    pub scheduled: usize,
}

impl<P: TemplateParser> Workspace<P> {
    /// React to a watcher notification
    pub fn handle_file_event(&mut self, event: &FileChangeEvent) -> InvalidationOutcome {
        if event.uri.has_extension(&self.settings.host_extension) {
            self.handle_host_event(event)
        } else if event.uri.has_extension(&self.settings.template_extension) {
            self.handle_template_event(event)
        } else {
            InvalidationOutcome::default()
        }
    }

    fn handle_host_event(&mut self, event: &FileChangeEvent) -> InvalidationOutcome {
        let mut outcome = InvalidationOutcome::default();
        if event.kind == FileChangeKind::Created {
            return outcome;
        }

        outcome.purged = self.registry.purge_file(&event.uri);
        if !outcome.purged {
            return outcome;
        }
        debug!("host file {} changed, caches purged", event.uri);

        if self.settings.policy == InvalidationPolicy::Reresolve {
            let affected: Vec<FileUri> = self
                .file_uris()
                .into_iter()
                .filter(|uri| {
                    self.files
                        .get(uri)
                        .is_some_and(|file| file.references_file(&event.uri))
                })
                .collect();
            for uri in affected {
                if self.reresolve_file(&uri).is_some() {
                    outcome.rebuilt.push(uri);
                }
            }
        }

        outcome.scheduled = self.schedule_rediagnosis();
        outcome
    }

    fn handle_template_event(&mut self, event: &FileChangeEvent) -> InvalidationOutcome {
        let mut outcome = InvalidationOutcome::default();
        let uri = &event.uri;

        match event.kind {
            FileChangeKind::Deleted => {
                if self.remove_file(uri) {
                    outcome.removed.push(uri.clone());
                }
            }
            FileChangeKind::Changed if !self.contains_file(uri) => {}
            FileChangeKind::Created | FileChangeKind::Changed => {
                let Some(path) = uri.to_path() else {
                    return outcome;
                };
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        self.open_file(uri.clone(), &text);
                        outcome.rebuilt.push(uri.clone());
                    }
                    Err(err) => warn!("cannot read {}: {err}", path.display()),
                }
            }
        }
        outcome
    }
}
