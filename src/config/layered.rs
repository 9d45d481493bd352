use serde_yaml::Mapping;
use tracing::debug;

use super::{ConfigError, ConfigMatch, ConfigValue, ConfigurationSource, lookup_path};
use crate::base::FileUri;

/// One configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayer {
    pub source: FileUri,
    pub value: ConfigValue,
}

impl ConfigLayer {
    /// Parse a YAML document. An empty document is an empty mapping.
    pub fn from_yaml_str(source: FileUri, text: &str) -> Result<Self, ConfigError> {
        let value: ConfigValue = serde_yaml::from_str(text).map_err(|e| ConfigError::Yaml {
            source_uri: source.clone(),
            message: e.to_string(),
        })?;
        let value = match value {
            ConfigValue::Null => ConfigValue::Mapping(Mapping::new()),
            ConfigValue::Mapping(_) => value,
            _ => return Err(ConfigError::NotAMapping(source)),
        };
        Ok(Self { source, value })
    }
}

/// Ordered YAML layers; later layers override earlier ones
#[derive(Debug, Clone, Default)]
pub struct LayeredConfiguration {
    layers: Vec<ConfigLayer>,
}

impl LayeredConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_layer(&mut self, layer: ConfigLayer) {
        debug!("configuration layer added: {}", layer.source);
        self.layers.push(layer);
    }

    /// Parse and append a YAML layer
    pub fn push_yaml(&mut self, source: FileUri, text: &str) -> Result<(), ConfigError> {
        self.push_layer(ConfigLayer::from_yaml_str(source, text)?);
        Ok(())
    }

    /// Drop every layer loaded from `source`; returns whether one existed
    pub fn remove_source(&mut self, source: &FileUri) -> bool {
        let before = self.layers.len();
        self.layers.retain(|layer| &layer.source != source);
        before != self.layers.len()
    }

    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }
}

/// Merge `overlay` into `base`: mappings merge key by key, anything else replaces
fn merge_into(base: &mut ConfigValue, overlay: &ConfigValue) {
    match (base, overlay) {
        (ConfigValue::Mapping(base), ConfigValue::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

impl ConfigurationSource for LayeredConfiguration {
    fn get_merged(&self, path: &str) -> Option<ConfigValue> {
        let mut merged: Option<ConfigValue> = None;
        for layer in &self.layers {
            let Some(value) = lookup_path(&layer.value, path) else {
                continue;
            };
            match merged.as_mut() {
                Some(existing) => merge_into(existing, value),
                None => merged = Some(value.clone()),
            }
        }
        merged
    }

    fn search(&self, path_prefix: &str) -> Vec<ConfigMatch> {
        self.layers
            .iter()
            .filter_map(|layer| {
                lookup_path(&layer.value, path_prefix).map(|value| ConfigMatch {
                    value: value.clone(),
                    source: layer.source.clone(),
                })
            })
            .collect()
    }
}
