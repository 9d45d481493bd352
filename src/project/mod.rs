//! Loading template projects from disk.

pub mod file_loader;
pub mod workspace_loader;

pub use workspace_loader::{LoadReport, WorkspaceLoader};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while loading a project
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("directory not found: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
