use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::base::FileUri;
use crate::parser::TemplateParser;
use crate::semantic::workspace::{Workspace, diagnose_file};

/// Files waiting to be diagnosed again.
///
/// The batch is idempotent, so a superseding event may cancel it at any
/// point and schedule a new one.
#[derive(Debug)]
pub struct DiagnosisBatch {
    pending: Vec<FileUri>,
    token: CancellationToken,
}

impl DiagnosisBatch {
    pub fn new(pending: Vec<FileUri>) -> Self {
        Self {
            pending,
            token: CancellationToken::new(),
        }
    }

    pub fn pending(&self) -> &[FileUri] {
        &self.pending
    }

    /// Token that cancels this batch
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Result of running the scheduled batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing was scheduled
    Idle,
    Completed { diagnosed: usize },
    /// Stopped before `remaining` files were diagnosed
    Cancelled { diagnosed: usize, remaining: usize },
}

impl<P: TemplateParser> Workspace<P> {
    /// Schedule every tracked file for re-diagnosis, superseding any
    /// batch in flight
    pub fn schedule_rediagnosis(&mut self) -> usize {
        let mut pending: Vec<FileUri> = self.files.keys().cloned().collect();
        pending.sort();
        self.replace_batch(DiagnosisBatch::new(pending))
    }

    /// Cancel the batch in flight and start over with the same files
    pub(super) fn restart_batch(&mut self) {
        let Some(pending) = self.batch.as_ref().map(|batch| batch.pending.clone()) else {
            return;
        };
        self.replace_batch(DiagnosisBatch::new(pending));
    }

    fn replace_batch(&mut self, batch: DiagnosisBatch) -> usize {
        if let Some(previous) = self.batch.take() {
            debug!(
                "superseding diagnosis batch with {} pending files",
                previous.pending.len()
            );
            previous.token.cancel();
        }
        let scheduled = batch.pending.len();
        self.batch = Some(batch);
        scheduled
    }

    pub fn scheduled_batch(&self) -> Option<&DiagnosisBatch> {
        self.batch.as_ref()
    }

    /// Diagnose the scheduled files until done or cancelled.
    ///
    /// A cancelled batch is dropped; its remaining files are covered by
    /// whichever batch superseded it.
    pub fn run_scheduled_diagnostics(&mut self) -> BatchOutcome {
        let Some(batch) = self.batch.take() else {
            return BatchOutcome::Idle;
        };

        let total = batch.pending.len();
        for (diagnosed, uri) in batch.pending.iter().enumerate() {
            if batch.token.is_cancelled() {
                debug!("diagnosis batch cancelled after {diagnosed} of {total} files");
                return BatchOutcome::Cancelled {
                    diagnosed,
                    remaining: total - diagnosed,
                };
            }
            // files removed since scheduling are skipped
            if let Some(file) = self.files.get(uri) {
                let diagnostics = diagnose_file(file);
                self.diagnostics.insert(uri.clone(), diagnostics);
            }
        }
        BatchOutcome::Completed { diagnosed: total }
    }
}
