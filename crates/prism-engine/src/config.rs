use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};

pub const REGISTRY_ENV: &str = "PRISM_REGISTRY";
pub const EVENTS_ENV: &str = "PRISM_EVENTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub registry_path: PathBuf,
    pub events_path: PathBuf,
    /// Seed the built-in models when the registry file does not exist yet.
    pub seed_defaults: bool,
}

impl EditorConfig {
    /// Events land next to the registry file unless configured otherwise.
    pub fn new(registry_path: impl Into<PathBuf>) -> Self {
        let registry_path = registry_path.into();
        let events_path = sibling_events_path(&registry_path);
        Self {
            registry_path,
            events_path,
            seed_defaults: false,
        }
    }

    pub fn with_seed_defaults(mut self, seed_defaults: bool) -> Self {
        self.seed_defaults = seed_defaults;
        self
    }

    /// Explicit paths win, then `PRISM_REGISTRY` / `PRISM_EVENTS`, then
    /// `$HOME/.prism/models.json`.
    pub fn resolve(registry: Option<PathBuf>, events: Option<PathBuf>) -> Result<Self> {
        let registry_path = match registry
            .or_else(|| non_empty_env(REGISTRY_ENV).map(PathBuf::from))
            .or_else(default_registry_path)
        {
            Some(path) => path,
            None => bail!("no registry path given and HOME is not set; pass --registry or set {REGISTRY_ENV}"),
        };
        let mut config = Self::new(registry_path);
        if let Some(events_path) = events.or_else(|| non_empty_env(EVENTS_ENV).map(PathBuf::from)) {
            config.events_path = events_path;
        }
        Ok(config)
    }
}

fn sibling_events_path(registry_path: &std::path::Path) -> PathBuf {
    registry_path
        .parent()
        .map(|parent| parent.join("events.jsonl"))
        .unwrap_or_else(|| PathBuf::from("events.jsonl"))
}

fn default_registry_path() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".prism").join("models.json"))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
