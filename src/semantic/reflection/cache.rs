//! Per-namespace class caches and the registry routing lookups to them.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use super::LookupMiss;
use super::extract::extract_class;
use super::host_class::HostClass;
use crate::base::FileUri;

/// Default extension of host class files
pub const HOST_EXTENSION: &str = "php";

/// A namespace prefix mapped to the directory holding its classes.
///
/// Owns the cache of every class looked up under it; the cache lives and
/// dies with the root.
#[derive(Debug)]
pub struct NamespaceRoot {
    name: SmolStr,
    path: PathBuf,
    extension: SmolStr,
    classes: RwLock<FxHashMap<SmolStr, Arc<HostClass>>>,
}

impl NamespaceRoot {
    /// `name` is a namespace such as `Acme\Service`; surrounding backslashes are ignored
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.trim_matches('\\').into(),
            path: path.into(),
            extension: HOST_EXTENSION.into(),
            classes: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `fqcn` lies below this namespace
    pub fn owns(&self, fqcn: &str) -> bool {
        let fqcn = fqcn.trim_start_matches('\\');
        fqcn.strip_prefix(self.name.as_str())
            .is_some_and(|rest| rest.starts_with('\\') && rest.len() > 1)
    }

    /// File expected to declare `fqcn`, with the namespace it must declare
    pub fn candidate_path(&self, fqcn: &str) -> Result<(PathBuf, String), LookupMiss> {
        let fqcn = fqcn.trim_start_matches('\\');
        let rest = fqcn
            .strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix('\\'))
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| LookupMiss::OutsideNamespace(fqcn.into()))?;

        let mut segments: Vec<&str> = rest.split('\\').collect();
        let class_name = segments.pop().unwrap_or(rest);

        let mut path = self.path.clone();
        path.extend(&segments);
        path.push(format!("{class_name}.{}", self.extension));

        let namespace = if segments.is_empty() {
            self.name.to_string()
        } else {
            format!("{}\\{}", self.name, segments.join("\\"))
        };
        Ok((path, namespace))
    }

    /// Cached class for `fqcn`, reading its file on first use
    pub fn lookup(&self, fqcn: &str) -> Option<Arc<HostClass>> {
        match self.try_lookup(fqcn) {
            Ok(class) => Some(class),
            Err(miss) => {
                debug!("class lookup miss in {}: {miss}", self.name);
                None
            }
        }
    }

    pub fn try_lookup(&self, fqcn: &str) -> Result<Arc<HostClass>, LookupMiss> {
        let fqcn = fqcn.trim_start_matches('\\');
        if let Some(class) = self.classes.read().get(fqcn) {
            return Ok(Arc::clone(class));
        }

        let (path, namespace) = self.candidate_path(fqcn)?;
        if !path.is_file() {
            return Err(LookupMiss::FileMissing(path));
        }
        let source = fs::read_to_string(&path).map_err(|err| LookupMiss::Unreadable {
            path: path.clone(),
            message: err.to_string(),
        })?;
        let class = extract_class(
            fqcn,
            &namespace,
            &self.name,
            &source,
            FileUri::from_path(&path),
        )?;

        let mut classes = self.classes.write();
        let entry = classes
            .entry(SmolStr::new(fqcn))
            .or_insert_with(|| Arc::new(class));
        Ok(Arc::clone(entry))
    }

    /// Drop every cached class declared in `uri`; true if any was removed
    pub fn purge_file(&self, uri: &FileUri) -> bool {
        let mut classes = self.classes.write();
        let before = classes.len();
        classes.retain(|fqcn, class| {
            let keep = &class.uri != uri;
            if !keep {
                debug!("removed cached class {fqcn} declared in {uri}");
            }
            keep
        });
        before != classes.len()
    }

    pub fn is_cached(&self, fqcn: &str) -> bool {
        self.classes
            .read()
            .contains_key(fqcn.trim_start_matches('\\'))
    }

    pub fn cached_count(&self) -> usize {
        self.classes.read().len()
    }

    /// Cached classes declared in `uri`
    pub fn cached_in_file(&self, uri: &FileUri) -> Vec<SmolStr> {
        self.classes
            .read()
            .iter()
            .filter(|(_, class)| &class.uri == uri)
            .map(|(fqcn, _)| fqcn.clone())
            .collect()
    }
}

/// All namespace roots of a workspace
#[derive(Debug, Default)]
pub struct ClassRegistry {
    roots: Vec<NamespaceRoot>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roots(roots: impl IntoIterator<Item = NamespaceRoot>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    pub fn add_root(&mut self, root: NamespaceRoot) {
        self.roots.push(root);
    }

    pub fn roots(&self) -> &[NamespaceRoot] {
        &self.roots
    }

    /// Root with the longest namespace owning `fqcn`
    pub fn root_for(&self, fqcn: &str) -> Option<&NamespaceRoot> {
        self.roots
            .iter()
            .filter(|root| root.owns(fqcn))
            .max_by_key(|root| root.name().len())
    }

    pub fn lookup(&self, fqcn: &str) -> Option<Arc<HostClass>> {
        match self.root_for(fqcn) {
            Some(root) => root.lookup(fqcn),
            None => {
                debug!("class lookup miss: {}", LookupMiss::NoNamespace(fqcn.into()));
                None
            }
        }
    }

    /// Purge `uri` from every root; true if any root dropped an entry
    pub fn purge_file(&self, uri: &FileUri) -> bool {
        self.roots
            .iter()
            .fold(false, |purged, root| root.purge_file(uri) || purged)
    }

    /// Fully qualified names of every cached class declared in `uri`
    pub fn cached_in_file(&self, uri: &FileUri) -> Vec<SmolStr> {
        self.roots
            .iter()
            .flat_map(|root| root.cached_in_file(uri))
            .collect()
    }
}
