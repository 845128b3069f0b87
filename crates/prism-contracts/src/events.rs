use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::models::RedirectError;

/// Audit record for one registry edit. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    EditorOpened {
        registry: String,
        models: usize,
        seeded: bool,
    },
    RedirectSet {
        model: String,
        target: Option<String>,
        previous: Option<String>,
        resolved: String,
        capabilities: Vec<&'static str>,
        cleared: Vec<&'static str>,
    },
    RedirectRejected {
        model: String,
        target: String,
        reason: &'static str,
        detail: String,
    },
    ModelSaved {
        model: String,
        created: bool,
        capabilities: Vec<&'static str>,
        cleared: Vec<&'static str>,
    },
    ModelRemoved {
        model: String,
        dangling_from: Vec<String>,
    },
    RegistrySaved {
        registry: String,
        models: usize,
        fingerprint: String,
    },
}

impl EditorEvent {
    pub fn rejected(model: &str, target: &str, err: &RedirectError) -> Self {
        Self::RedirectRejected {
            model: model.to_string(),
            target: target.to_string(),
            reason: err.tag(),
            detail: err.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::EditorOpened { .. } => "editor_opened",
            Self::RedirectSet { .. } => "redirect_set",
            Self::RedirectRejected { .. } => "redirect_rejected",
            Self::ModelSaved { .. } => "model_saved",
            Self::ModelRemoved { .. } => "model_removed",
            Self::RegistrySaved { .. } => "registry_saved",
        }
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    #[serde(flatten)]
    event: &'a EditorEvent,
    session_id: &'a str,
    ts: String,
}

/// Append-only `events.jsonl` for one editing session.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
    session_id: String,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>, session_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn record(&self, event: &EditorEvent) -> anyhow::Result<()> {
        let line = serde_json::to_string(&EventLine {
            event,
            session_id: &self.session_id,
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{line}")?;
        tracing::trace!(kind = event.kind(), session = %self.session_id, "editor event recorded");
        Ok(())
    }
}
