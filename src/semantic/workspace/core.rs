use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::FileUri;
use crate::config::{ConfigurationSource, LayeredConfiguration};
use crate::parser::{FusionParser, Parse, TemplateParser};
use crate::semantic::index::SourceFile;
use crate::semantic::reflection::{ClassRegistry, HOST_EXTENSION, NamespaceRoot};
use crate::semantic::resolver::{BoundHelpers, CrossReferenceResolver};
use crate::semantic::workspace::{DiagnosisBatch, Diagnostic, diagnose_file};

/// Default extension of template files
pub const TEMPLATE_EXTENSION: &str = "fusion";

/// What a host file change does to already resolved files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidationPolicy {
    /// Purge caches and re-run diagnostics only. Resolved nodes keep the
    /// method snapshot taken when they were built until their file is
    /// rebuilt for another reason.
    #[default]
    Rediagnose,
    /// Purge caches, rebuild every file referring to a purged class, then
    /// re-run diagnostics.
    Reresolve,
}

/// Static configuration of a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSettings {
    /// Namespace prefix and class directory pairs
    pub namespace_roots: Vec<(SmolStr, PathBuf)>,
    pub host_extension: SmolStr,
    pub template_extension: SmolStr,
    pub policy: InvalidationPolicy,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            namespace_roots: Vec::new(),
            host_extension: HOST_EXTENSION.into(),
            template_extension: TEMPLATE_EXTENSION.into(),
            policy: InvalidationPolicy::default(),
        }
    }
}

impl WorkspaceSettings {
    pub fn with_namespace_root(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.namespace_roots.push((name.into(), path.into()));
        self
    }

    pub fn with_policy(mut self, policy: InvalidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn registry(&self) -> ClassRegistry {
        ClassRegistry::with_roots(self.namespace_roots.iter().map(|(name, path)| {
            NamespaceRoot::new(name, path.clone()).with_extension(&self.host_extension)
        }))
    }
}

/// Template files of one project with the state they are resolved against
pub struct Workspace<P: TemplateParser = FusionParser> {
    pub(super) parser: P,
    pub(super) settings: WorkspaceSettings,
    pub(super) registry: ClassRegistry,
    pub(super) config: Arc<dyn ConfigurationSource>,
    pub(super) files: FxHashMap<FileUri, Arc<SourceFile>>,
    pub(super) diagnostics: FxHashMap<FileUri, Vec<Diagnostic>>,
    pub(super) batch: Option<DiagnosisBatch>,
}

impl Workspace<FusionParser> {
    /// Creates a workspace using the built-in parser
    pub fn new(settings: WorkspaceSettings, config: Arc<dyn ConfigurationSource>) -> Self {
        Self::with_parser(FusionParser, settings, config)
    }
}

impl Default for Workspace<FusionParser> {
    fn default() -> Self {
        Self::new(
            WorkspaceSettings::default(),
            Arc::new(LayeredConfiguration::new()),
        )
    }
}

impl<P: TemplateParser> Workspace<P> {
    pub fn with_parser(
        parser: P,
        settings: WorkspaceSettings,
        config: Arc<dyn ConfigurationSource>,
    ) -> Self {
        Self {
            parser,
            registry: settings.registry(),
            settings,
            config,
            files: FxHashMap::default(),
            diagnostics: FxHashMap::default(),
            batch: None,
        }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn config(&self) -> &dyn ConfigurationSource {
        &*self.config
    }

    /// Replace the configuration; files are re-resolved on their next rebuild
    pub fn set_config(&mut self, config: Arc<dyn ConfigurationSource>) {
        self.config = config;
    }

    /// Helper bindings as currently configured
    pub fn bound_helpers(&self) -> BoundHelpers {
        BoundHelpers::from_config(&*self.config)
    }

    /// Parse, index and resolve a file without tracking it
    pub fn build_file(&self, uri: FileUri, text: &str, helpers: &BoundHelpers) -> SourceFile {
        let parse = self.parser.parse(text);
        self.index_parsed(uri, text, parse, helpers)
    }

    pub(crate) fn index_parsed(
        &self,
        uri: FileUri,
        text: &str,
        parse: Parse,
        helpers: &BoundHelpers,
    ) -> SourceFile {
        let mut file = SourceFile::new(uri, text, parse);
        CrossReferenceResolver::new(helpers, &self.registry).resolve_file(&mut file);
        file
    }

    /// Swap in a freshly built snapshot and recompute its diagnostics
    pub(super) fn install(&mut self, file: SourceFile) -> Arc<SourceFile> {
        let file = Arc::new(file);
        self.diagnostics
            .insert(file.uri().clone(), diagnose_file(&file));
        self.files.insert(file.uri().clone(), Arc::clone(&file));
        file
    }
}
