//! Configuration aggregator seam.
//!
//! The analysis core reads merged settings through [`ConfigurationSource`].
//! [`LayeredConfiguration`] is the in-crate implementation: YAML layers
//! merged in load order, each remembering the file it came from.

mod layered;

pub use layered::{ConfigLayer, LayeredConfiguration};

use crate::base::FileUri;
use thiserror::Error;

/// A configuration value. Settings are YAML documents.
pub type ConfigValue = serde_yaml::Value;

/// One hit of a [`ConfigurationSource::search`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMatch {
    pub value: ConfigValue,
    pub source: FileUri,
}

/// Read access to merged configuration
pub trait ConfigurationSource: Send + Sync {
    /// Value at a dot-separated path after merging all layers
    fn get_merged(&self, path: &str) -> Option<ConfigValue>;

    /// Per-layer values found at a dot-separated path, in layer order
    fn search(&self, path_prefix: &str) -> Vec<ConfigMatch>;
}

/// Errors raised while loading configuration layers
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layer is not valid YAML.
    #[error("invalid YAML in {source_uri}: {message}")]
    Yaml { source_uri: FileUri, message: String },

    /// The layer parsed, but its top level is not a mapping.
    #[error("configuration root of {0} must be a mapping")]
    NotAMapping(FileUri),
}

/// Walk a dot-separated path through nested mappings
pub(crate) fn lookup_path<'a>(value: &'a ConfigValue, path: &str) -> Option<&'a ConfigValue> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, key| match current {
        ConfigValue::Mapping(mapping) => mapping.get(key),
        _ => None,
    })
}
