use indexmap::IndexMap;

use super::capabilities::{ModelCapabilities, ThinkingConfigType};
use super::config::ModelConfig;

/// Ordered set of model configs keyed by id.
///
/// Doubles as the redirect graph: every record is a node and its
/// `redirect_to` is an optional, non-owning edge that may point at an id
/// the registry does not hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelConfig>,
}

impl ModelRegistry {
    pub fn with_defaults() -> Self {
        Self {
            models: default_models(),
        }
    }

    /// Later records replace earlier ones with the same id.
    pub fn from_configs(configs: impl IntoIterator<Item = ModelConfig>) -> Self {
        let mut registry = Self::default();
        for config in configs {
            registry.upsert(config);
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&ModelConfig> {
        self.models.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn list(&self) -> impl Iterator<Item = &ModelConfig> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Outgoing redirect edge of `id`, if the node exists and has one.
    pub fn redirect_target(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(ModelConfig::redirect_target)
    }

    /// Ids of every record whose redirect points at `id`.
    pub fn redirected_from(&self, id: &str) -> Vec<String> {
        self.models
            .values()
            .filter(|model| model.redirect_target() == Some(id))
            .map(|model| model.id.clone())
            .collect()
    }

    /// Inserts or replaces in place, returning the previous record.
    pub fn upsert(&mut self, config: ModelConfig) -> Option<ModelConfig> {
        self.models.insert(config.id.clone(), config)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ModelConfig> {
        self.models.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<ModelConfig> {
        self.models.shift_remove(id)
    }
}

fn default_models() -> IndexMap<String, ModelConfig> {
    let mut map = IndexMap::new();

    let mut insert = |id: &str,
                      name: &str,
                      redirect_to: Option<&str>,
                      capabilities: Option<ModelCapabilities>| {
        map.insert(
            id.to_string(),
            ModelConfig {
                id: id.to_string(),
                name: Some(name.to_string()),
                redirect_to: redirect_to.map(str::to_string),
                capabilities,
                advanced_config: None,
            },
        );
    };

    insert("gemini-3-pro-preview", "Gemini 3 Pro", None, None);
    insert("gemini-3-flash-preview", "Gemini 3 Flash", None, None);
    insert("gemini-2.5-pro", "Gemini 2.5 Pro", None, None);
    insert("gemini-2.5-flash", "Gemini 2.5 Flash", None, None);
    insert(
        "gemini-2.5-flash-lite",
        "Gemini 2.5 Flash Lite",
        None,
        Some(ModelCapabilities {
            thinking_config_type: ThinkingConfigType::Budget,
            ..ModelCapabilities::default()
        }),
    );
    insert("gemini-2.5-flash-image", "Gemini 2.5 Flash Image", None, None);
    insert(
        "gemini-3-pro-image-preview",
        "Gemini 3 Pro Image",
        None,
        None,
    );
    insert("imagen-4.0-ultra", "Imagen 4 Ultra", None, None);
    insert(
        "gemini-pro-latest",
        "Gemini Pro (latest)",
        Some("gemini-3-pro-preview"),
        None,
    );
    insert(
        "gemini-flash-latest",
        "Gemini Flash (latest)",
        Some("gemini-2.5-flash"),
        None,
    );
    insert(
        "nano-banana",
        "Nano Banana",
        Some("gemini-2.5-flash-image"),
        None,
    );
    insert(
        "nano-banana-pro",
        "Nano Banana Pro",
        Some("gemini-3-pro-image-preview"),
        None,
    );

    map
}
