use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::warn;

use crate::config::{ConfigValue, ConfigurationSource};

/// Configuration path of the helper bindings
pub const DEFAULT_CONTEXT_PATH: &str = "Neos.Fusion.defaultContext";

/// What a helper identifier is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperBinding {
    /// A class name, the only resolvable form
    Class(SmolStr),
    /// `Class::method`; not followed
    StaticCall(SmolStr),
    /// Anything that is not a string
    Other,
}

impl HelperBinding {
    fn from_value(value: &ConfigValue) -> Self {
        match value.as_str() {
            Some(text) if text.contains("::") => HelperBinding::StaticCall(text.into()),
            Some(text) => HelperBinding::Class(text.trim().trim_start_matches('\\').into()),
            None => HelperBinding::Other,
        }
    }
}

/// Helper identifiers available in expressions, e.g. `I18n` or `Neos.Node`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundHelpers {
    bindings: FxHashMap<SmolStr, HelperBinding>,
    /// Most dot-separated parts of any identifier
    max_parts: usize,
}

impl BoundHelpers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the merged helper bindings
    pub fn from_config(config: &dyn ConfigurationSource) -> Self {
        let mut helpers = Self::new();
        let Some(context) = config.get_merged(DEFAULT_CONTEXT_PATH) else {
            return helpers;
        };
        let Some(mapping) = context.as_mapping() else {
            warn!("{DEFAULT_CONTEXT_PATH} must be a mapping");
            return helpers;
        };
        for (key, value) in mapping {
            if let Some(identifier) = key.as_str() {
                helpers.insert(identifier, HelperBinding::from_value(value));
            }
        }
        helpers
    }

    /// Bind `identifier` to a class name
    pub fn bind(&mut self, identifier: &str, fqcn: &str) {
        self.insert(
            identifier,
            HelperBinding::from_value(&ConfigValue::String(fqcn.to_string())),
        );
    }

    pub fn insert(&mut self, identifier: &str, binding: HelperBinding) {
        self.max_parts = self.max_parts.max(identifier.split('.').count());
        self.bindings.insert(identifier.into(), binding);
    }

    pub fn get(&self, identifier: &str) -> Option<&HelperBinding> {
        self.bindings.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Longest bound identifier formed by leading `parts`.
    ///
    /// Returns the number of parts consumed with the identifier and binding.
    pub fn longest_match(&self, parts: &[&str]) -> Option<(usize, SmolStr, &HelperBinding)> {
        let longest = parts.len().min(self.max_parts);
        (1..=longest).rev().find_map(|count| {
            let identifier = parts[..count].join(".");
            self.bindings
                .get_key_value(identifier.as_str())
                .map(|(key, binding)| (count, key.clone(), binding))
        })
    }
}
