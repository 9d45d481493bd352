//! A package laid out on disk: host classes, templates and settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fusion_lens::FileUri;
use fusion_lens::Workspace;
use fusion_lens::WorkspaceSettings;
use fusion_lens::config::LayeredConfiguration;
use fusion_lens::project::WorkspaceLoader;
use fusion_lens::semantic::InvalidationPolicy;
use tempfile::TempDir;

use super::source_fixtures::*;

pub struct PackageFixture {
    dir: TempDir,
}

impl PackageFixture {
    /// The default package: translation helper, chain classes and settings
    pub fn new() -> Self {
        let fixture = Self::empty();
        fixture.write("Classes/TranslationHelper.php", TRANSLATION_HELPER);
        fixture.write("Classes/Chain/Foo.php", FOO_SERVICE);
        fixture.write("Classes/Chain/Bar.php", BAR_SERVICE);
        fixture.write("Configuration/Settings.yaml", SETTINGS);
        fixture
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn uri(&self, relative: &str) -> FileUri {
        FileUri::from_path(&self.path(relative))
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn settings(&self, policy: InvalidationPolicy) -> WorkspaceSettings {
        WorkspaceSettings::default()
            .with_namespace_root("Acme\\Service", self.path("Classes"))
            .with_policy(policy)
    }

    pub fn config(&self) -> LayeredConfiguration {
        WorkspaceLoader::new()
            .load_settings(self.path("Configuration"))
            .unwrap()
    }

    pub fn workspace(&self, policy: InvalidationPolicy) -> Workspace {
        Workspace::new(self.settings(policy), Arc::new(self.config()))
    }

    /// Workspace with every template below `Resources/` loaded
    pub fn loaded_workspace(&self, policy: InvalidationPolicy) -> Workspace {
        let mut workspace = self.workspace(policy);
        WorkspaceLoader::new()
            .load_directory(self.path("Resources"), &mut workspace)
            .unwrap();
        workspace
    }
}
