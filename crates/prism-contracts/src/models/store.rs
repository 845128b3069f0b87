use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::config::ModelConfig;
use super::registry::ModelRegistry;

pub const REGISTRY_SCHEMA_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryDocument {
    #[serde(default = "default_schema_version")]
    schema_version: u64,
    #[serde(default)]
    models: Vec<ModelConfig>,
}

fn default_schema_version() -> u64 {
    REGISTRY_SCHEMA_VERSION
}

/// JSON file holding the persisted model registry.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the registry; a missing file is an empty registry.
    pub fn load(&self) -> anyhow::Result<ModelRegistry> {
        if !self.exists() {
            return Ok(ModelRegistry::default());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let document: RegistryDocument = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;

        let mut registry = ModelRegistry::default();
        for model in document.models {
            let id = model.id.clone();
            if registry.upsert(model).is_some() {
                tracing::warn!(model = %id, path = %self.path.display(), "duplicate model id; keeping last record");
            }
        }
        Ok(registry)
    }

    pub fn save(&self, registry: &ModelRegistry) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, render_registry(registry)?)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Pretty JSON exactly as `RegistryStore::save` writes it.
pub fn render_registry(registry: &ModelRegistry) -> anyhow::Result<String> {
    let document = RegistryDocument {
        schema_version: REGISTRY_SCHEMA_VERSION,
        models: registry.list().cloned().collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// sha256 hex of the compact serialized registry.
pub fn fingerprint(registry: &ModelRegistry) -> anyhow::Result<String> {
    let models: Vec<&ModelConfig> = registry.list().collect();
    let bytes = serde_json::to_vec(&models).context("failed to serialize registry")?;
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Ok(hex::encode(hasher.finalize()))
}
