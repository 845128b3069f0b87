mod config;
pub mod swatch;

use anyhow::{bail, Result};
use prism_contracts::events::{EditorEvent, EventLog};
use prism_contracts::models::{
    fingerprint, render_registry, resolve_effective_capabilities, resolve_redirect_chain,
    validate_redirect, ModelCapabilities, ModelConfig, ModelRegistry, RedirectChain,
    RedirectError, RegistryStore,
};
use similar::TextDiff;
use uuid::Uuid;

pub use config::{EditorConfig, EVENTS_ENV, REGISTRY_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub created: bool,
    pub effective: ModelCapabilities,
    /// Advanced-config fields dropped because the model cannot use them.
    pub cleared: Vec<&'static str>,
}

/// Editing session over one registry snapshot.
///
/// Every write goes through redirect validation and advanced-config
/// sanitizing; reads go through the permissive resolver.
pub struct ModelEditor {
    store: RegistryStore,
    registry: ModelRegistry,
    persisted: String,
    events: EventLog,
}

impl ModelEditor {
    pub fn open(config: &EditorConfig) -> Result<Self> {
        let store = RegistryStore::new(&config.registry_path);
        let existed = store.exists();
        let persisted_registry = store.load()?;
        let persisted = render_registry(&persisted_registry)?;
        let registry = if !existed && config.seed_defaults {
            ModelRegistry::with_defaults()
        } else {
            persisted_registry
        };

        let session_id = Uuid::new_v4().to_string();
        let events = EventLog::new(&config.events_path, session_id);
        events.record(&EditorEvent::EditorOpened {
            registry: store.path().display().to_string(),
            models: registry.len(),
            seeded: !existed && config.seed_defaults,
        })?;
        tracing::info!(
            registry = %store.path().display(),
            models = registry.len(),
            "model editor opened"
        );

        Ok(Self {
            store,
            registry,
            persisted,
            events,
        })
    }

    pub fn session_id(&self) -> &str {
        self.events.session_id()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn effective_capabilities(&self, model_id: &str) -> ModelCapabilities {
        resolve_effective_capabilities(model_id, &self.registry)
    }

    pub fn redirect_chain(&self, model_id: &str) -> RedirectChain {
        resolve_redirect_chain(model_id, &self.registry)
    }

    /// Points `model_id` at `target`, or clears its redirect for `None`.
    ///
    /// A rejected redirect is recorded as `redirect_rejected` and returned
    /// as an error wrapping [`RedirectError`].
    pub fn set_redirect(&mut self, model_id: &str, target: Option<&str>) -> Result<SaveReport> {
        let Some(existing) = self.registry.get(model_id) else {
            bail!("unknown model '{model_id}'");
        };
        let target = target.map(str::trim).filter(|value| !value.is_empty());
        let previous = existing.redirect_to.clone();

        let mut updated = existing.clone();
        updated.redirect_to = target.map(str::to_string);
        let report = self.commit(updated)?;

        self.events.record(&EditorEvent::RedirectSet {
            model: model_id.to_string(),
            target: target.map(str::to_string),
            previous,
            resolved: self.redirect_chain(model_id).resolved,
            capabilities: report.effective.labels(),
            cleared: report.cleared.clone(),
        })?;
        Ok(report)
    }

    /// Inserts or replaces a record, validating its redirect and dropping
    /// advanced settings its effective capabilities do not support.
    pub fn save_model(&mut self, config: ModelConfig) -> Result<SaveReport> {
        if config.id.trim().is_empty() {
            bail!("model id must not be empty");
        }
        let model_id = config.id.clone();
        let report = self.commit(config)?;
        self.events.record(&EditorEvent::ModelSaved {
            model: model_id,
            created: report.created,
            capabilities: report.effective.labels(),
            cleared: report.cleared.clone(),
        })?;
        Ok(report)
    }

    /// Removes a record and returns the ids whose redirects now dangle.
    pub fn remove_model(&mut self, model_id: &str) -> Result<Vec<String>> {
        if self.registry.remove(model_id).is_none() {
            bail!("unknown model '{model_id}'");
        }
        let dangling = self.registry.redirected_from(model_id);
        if !dangling.is_empty() {
            tracing::warn!(model = model_id, dangling = ?dangling, "removed model is still a redirect target");
        }
        self.events.record(&EditorEvent::ModelRemoved {
            model: model_id.to_string(),
            dangling_from: dangling.clone(),
        })?;
        Ok(dangling)
    }

    pub fn is_dirty(&self) -> Result<bool> {
        Ok(render_registry(&self.registry)? != self.persisted)
    }

    /// Unified diff from the last persisted registry to the current one.
    pub fn pending_diff(&self) -> Result<Option<String>> {
        let current = render_registry(&self.registry)?;
        if current == self.persisted {
            return Ok(None);
        }
        let diff = TextDiff::from_lines(self.persisted.as_str(), current.as_str());
        Ok(Some(
            diff.unified_diff().header("saved", "pending").to_string(),
        ))
    }

    /// Persists the snapshot and returns its fingerprint.
    pub fn save(&mut self) -> Result<String> {
        self.store.save(&self.registry)?;
        self.persisted = render_registry(&self.registry)?;
        let digest = fingerprint(&self.registry)?;
        self.events.record(&EditorEvent::RegistrySaved {
            registry: self.store.path().display().to_string(),
            models: self.registry.len(),
            fingerprint: digest.clone(),
        })?;
        tracing::info!(
            registry = %self.store.path().display(),
            fingerprint = %digest,
            "model registry saved"
        );
        Ok(digest)
    }

    fn commit(&mut self, mut config: ModelConfig) -> Result<SaveReport> {
        if let Some(target) = config.redirect_target().map(str::to_string) {
            if let Err(err) = validate_redirect(&config.id, &target, &self.registry) {
                self.reject(&config.id, &target, &err)?;
                return Err(err.into());
            }
        }
        config.redirect_to = config.redirect_target().map(str::to_string);

        let model_id = config.id.clone();
        let advanced = config.advanced_config.take();
        let created = self.registry.upsert(config).is_none();

        let effective = self.effective_capabilities(&model_id);
        let mut cleared = Vec::new();
        if let Some(advanced) = advanced {
            let outcome = advanced.sanitize(&effective);
            cleared = outcome.cleared;
            if let Some(model) = self.registry.get_mut(&model_id) {
                model.advanced_config = outcome.config;
            }
        }

        Ok(SaveReport {
            created,
            effective,
            cleared,
        })
    }

    fn reject(&self, model_id: &str, target: &str, err: &RedirectError) -> Result<()> {
        tracing::debug!(model = model_id, to = target, reason = err.tag(), "redirect rejected");
        self.events.record(&EditorEvent::rejected(model_id, target, err))
    }
}
