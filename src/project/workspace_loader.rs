use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::ProjectError;
use super::file_loader::{collect_file_paths, is_settings_file};
use crate::base::FileUri;
use crate::config::LayeredConfiguration;
use crate::parser::TemplateParser;
use crate::semantic::Workspace;

/// Summary of a directory load
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<FileUri>,
    /// Files that could not be read
    pub failed: Vec<(PathBuf, String)>,
}

/// Loads template files and settings layers from project directories
#[derive(Debug, Default)]
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Loads every template file below `path` into the workspace.
    ///
    /// Files are read and parsed in parallel; indexing and resolution run
    /// on the calling thread. Unreadable files are reported, not fatal.
    pub fn load_directory<P: TemplateParser>(
        &self,
        path: impl AsRef<Path>,
        workspace: &mut Workspace<P>,
    ) -> Result<LoadReport, ProjectError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ProjectError::NotADirectory(path.to_path_buf()));
        }

        let extension = workspace.settings().template_extension.clone();
        let paths = collect_file_paths(path, &[extension.as_str()])?;
        debug!("loading {} template files from {}", paths.len(), path.display());

        let parser = workspace.parser();
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| match fs::read_to_string(path) {
                Ok(text) => {
                    let parse = parser.parse(&text);
                    Ok((path.clone(), text, parse))
                }
                Err(err) => Err((path.clone(), err.to_string())),
            })
            .collect();

        let mut report = LoadReport::default();
        for result in results {
            match result {
                Ok((path, text, parse)) => {
                    let uri = FileUri::from_path(&path);
                    workspace.open_parsed(uri.clone(), &text, parse);
                    report.loaded.push(uri);
                }
                Err((path, message)) => {
                    warn!("cannot read {}: {message}", path.display());
                    report.failed.push((path, message));
                }
            }
        }
        Ok(report)
    }

    /// Loads a single template file
    pub fn load_file<P: TemplateParser>(
        &self,
        path: impl AsRef<Path>,
        workspace: &mut Workspace<P>,
    ) -> Result<FileUri, ProjectError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let uri = FileUri::from_path(path);
        workspace.open_file(uri.clone(), &text);
        Ok(uri)
    }

    /// Collects `Settings*.yaml` files below `path` as configuration layers,
    /// in path order
    pub fn load_settings(&self, path: impl AsRef<Path>) -> Result<LayeredConfiguration, ProjectError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ProjectError::NotADirectory(path.to_path_buf()));
        }

        let mut config = LayeredConfiguration::new();
        for file in collect_file_paths(path, &["yaml", "yml"])? {
            if !is_settings_file(&file) {
                continue;
            }
            let text = fs::read_to_string(&file).map_err(|source| ProjectError::Io {
                path: file.clone(),
                source,
            })?;
            config.push_yaml(FileUri::from_path(&file), &text)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::config::ConfigurationSource;
    use crate::semantic::WorkspaceSettings;

    #[test]
    fn test_load_directory_indexes_template_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Private/Fusion/Components")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("Private/Fusion/Root.fusion"), "a = 1\n").unwrap();
        fs::write(
            dir.path().join("Private/Fusion/Components/Button.fusion"),
            "prototype(Acme:Button) < prototype(Neos.Fusion:Component)\n",
        )
        .unwrap();
        fs::write(dir.path().join("Private/Fusion/notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join(".git/Hidden.fusion"), "x = 1\n").unwrap();

        let mut workspace = Workspace::default();
        let report = WorkspaceLoader::new()
            .load_directory(dir.path(), &mut workspace)
            .unwrap();

        assert_eq!(report.loaded.len(), 2);
        assert!(report.failed.is_empty());
        assert_eq!(workspace.file_count(), 2);
        let button = FileUri::from_path(&dir.path().join("Private/Fusion/Components/Button.fusion"));
        let file = workspace.snapshot(&button).unwrap();
        assert_eq!(file.component_creations().count(), 1);
    }

    #[test]
    fn test_load_directory_rejects_missing_directory() {
        let mut workspace = Workspace::default();
        let err = WorkspaceLoader::new().load_directory("/definitely/not/here", &mut workspace);
        assert!(matches!(err, Err(ProjectError::NotADirectory(_))));
    }

    #[test]
    fn test_load_settings_merges_layers() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("A/Configuration")).unwrap();
        fs::create_dir_all(dir.path().join("B/Configuration")).unwrap();
        fs::write(
            dir.path().join("A/Configuration/Settings.yaml"),
            "Neos:\n  Fusion:\n    defaultContext:\n      String: 'Neos\\Eel\\Helper\\StringHelper'\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("B/Configuration/Settings.Fusion.yaml"),
            "Neos:\n  Fusion:\n    defaultContext:\n      Array: 'Neos\\Eel\\Helper\\ArrayHelper'\n",
        )
        .unwrap();
        fs::write(dir.path().join("B/Configuration/Policy.yaml"), "roles: []\n").unwrap();

        let config = WorkspaceLoader::new().load_settings(dir.path()).unwrap();
        assert_eq!(config.layers().len(), 2);
        let context = config.get_merged("Neos.Fusion.defaultContext").unwrap();
        assert_eq!(context.as_mapping().map(|m| m.len()), Some(2));

        let workspace = Workspace::new(WorkspaceSettings::default(), Arc::new(config));
        assert_eq!(workspace.bound_helpers().len(), 2);
    }

    #[test]
    fn test_invalid_settings_layer_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Settings.yaml"), "- not\n- a mapping\n").unwrap();
        let err = WorkspaceLoader::new().load_settings(dir.path());
        assert!(matches!(err, Err(ProjectError::Config(_))));
    }
}
