use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use super::capabilities::{detect_capabilities, ModelCapabilities};
use super::registry::ModelRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStop {
    /// The terminal record has no redirect.
    End,
    /// The next target was already visited.
    Cycle,
    /// The next target is not in the registry.
    MissingTarget,
    /// The starting id is not in the registry.
    UnknownModel,
}

impl ChainStop {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::End => "end",
            Self::Cycle => "cycle",
            Self::MissingTarget => "missing_target",
            Self::UnknownModel => "unknown_model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectChain {
    /// Ids walked, starting with the requested id and ending at `resolved`.
    pub hops: Vec<String>,
    pub resolved: String,
    pub stop: ChainStop,
    /// Target that ended the walk for `Cycle` and `MissingTarget`.
    pub blocked_target: Option<String>,
}

/// Follows `redirect_to` edges from `model_id` without ever failing.
///
/// Every advance visits a new id, so the walk is bounded by the registry
/// size even when stored data already contains a cycle.
pub fn resolve_redirect_chain(model_id: &str, registry: &ModelRegistry) -> RedirectChain {
    let Some(mut current) = registry.get(model_id) else {
        return RedirectChain {
            hops: vec![model_id.to_string()],
            resolved: model_id.to_string(),
            stop: ChainStop::UnknownModel,
            blocked_target: None,
        };
    };

    let mut hops = vec![current.id.clone()];
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stop = ChainStop::End;
    let mut blocked_target = None;

    while let Some(target) = current.redirect_target() {
        if !visited.insert(target) {
            tracing::debug!(model = model_id, at = %current.id, to = target, "redirect cycle detected");
            stop = ChainStop::Cycle;
            blocked_target = Some(target.to_string());
            break;
        }
        let Some(next) = registry.get(target) else {
            tracing::debug!(model = model_id, at = %current.id, to = target, "dangling redirect");
            stop = ChainStop::MissingTarget;
            blocked_target = Some(target.to_string());
            break;
        };
        current = next;
        hops.push(current.id.clone());
    }

    RedirectChain {
        hops,
        resolved: current.id.clone(),
        stop,
        blocked_target,
    }
}

pub fn resolve_effective_capabilities(
    model_id: &str,
    registry: &ModelRegistry,
) -> ModelCapabilities {
    resolve_effective_capabilities_with(model_id, registry, detect_capabilities)
}

/// Resolves capabilities with a caller-supplied fallback detector.
pub fn resolve_effective_capabilities_with<F>(
    model_id: &str,
    registry: &ModelRegistry,
    detect: F,
) -> ModelCapabilities
where
    F: Fn(&str) -> ModelCapabilities,
{
    let chain = resolve_redirect_chain(model_id, registry);
    registry
        .get(&chain.resolved)
        .and_then(|model| model.capabilities)
        .unwrap_or_else(|| detect(&chain.resolved))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectError {
    #[error("model '{0}' cannot redirect to itself")]
    SelfRedirect(String),
    #[error("redirect would create a cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
}

impl RedirectError {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SelfRedirect(_) => "self-redirect",
            Self::Cycle { .. } => "cycle",
        }
    }
}

/// Edit-time check for a proposed `model_id -> proposed_target` edge.
///
/// Rejects self-redirects and any edge whose target chain leads back to
/// `model_id`. Clearing a redirect and pointing at an unknown id are allowed.
pub fn validate_redirect(
    model_id: &str,
    proposed_target: &str,
    registry: &ModelRegistry,
) -> Result<(), RedirectError> {
    let proposed_target = proposed_target.trim();
    if proposed_target.is_empty() {
        return Ok(());
    }
    if proposed_target == model_id {
        return Err(RedirectError::SelfRedirect(model_id.to_string()));
    }

    let mut path = vec![model_id.to_string()];
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(proposed_target);
    while let Some(id) = current {
        path.push(id.to_string());
        if id == model_id {
            return Err(RedirectError::Cycle { path });
        }
        if !visited.insert(id) {
            break;
        }
        current = registry.redirect_target(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        resolve_effective_capabilities, resolve_effective_capabilities_with,
        resolve_redirect_chain, validate_redirect, ChainStop, RedirectError,
    };
    use crate::models::capabilities::{detect_capabilities, ModelCapabilities, ThinkingConfigType};
    use crate::models::config::ModelConfig;
    use crate::models::registry::ModelRegistry;

    fn image_caps() -> ModelCapabilities {
        ModelCapabilities {
            supports_image_generation: true,
            ..ModelCapabilities::default()
        }
    }

    fn ring(ids: &[&str]) -> ModelRegistry {
        ModelRegistry::from_configs(
            ids.iter()
                .enumerate()
                .map(|(idx, id)| ModelConfig::new(*id).redirecting_to(ids[(idx + 1) % ids.len()])),
        )
    }

    #[test]
    fn resolves_through_redirect_to_explicit_capabilities() {
        let registry = ModelRegistry::from_configs(vec![
            ModelConfig::new("a").redirecting_to("b"),
            ModelConfig::new("b").with_capabilities(image_caps()),
        ]);
        assert_eq!(resolve_effective_capabilities("a", &registry), image_caps());
    }

    #[test]
    fn plain_model_falls_back_to_detection() {
        let registry = ModelRegistry::from_configs(vec![ModelConfig::new("gemini-2.5-pro")]);
        assert_eq!(
            resolve_effective_capabilities("gemini-2.5-pro", &registry),
            detect_capabilities("gemini-2.5-pro")
        );
    }

    #[test]
    fn unknown_model_uses_detection_on_requested_id() {
        let registry = ModelRegistry::default();
        let chain = resolve_redirect_chain("gemini-3-pro-preview", &registry);
        assert_eq!(chain.stop, ChainStop::UnknownModel);
        assert_eq!(
            resolve_effective_capabilities("gemini-3-pro-preview", &registry).thinking_config_type,
            ThinkingConfigType::Level
        );
    }

    #[test]
    fn dangling_redirect_uses_source_model() {
        let registry = ModelRegistry::from_configs(vec![
            ModelConfig::new("y").redirecting_to("nonexistent").with_capabilities(image_caps()),
        ]);
        let chain = resolve_redirect_chain("y", &registry);
        assert_eq!(chain.resolved, "y");
        assert_eq!(chain.stop, ChainStop::MissingTarget);
        assert_eq!(chain.blocked_target.as_deref(), Some("nonexistent"));
        assert_eq!(resolve_effective_capabilities("y", &registry), image_caps());
    }

    #[test]
    fn cyclic_registry_terminates_within_bound() {
        for size in 1..=6 {
            let ids: Vec<String> = (0..size).map(|idx| format!("m{idx}")).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let registry = ring(&refs);
            for id in &refs {
                let chain = resolve_redirect_chain(id, &registry);
                assert_eq!(chain.stop, ChainStop::Cycle);
                assert!(chain.hops.len() <= registry.len() + 1);
                assert_eq!(
                    resolve_effective_capabilities_with(id, &registry, |_| image_caps()),
                    image_caps()
                );
            }
        }
    }

    #[test]
    fn cycle_stops_on_current_record() {
        let registry = ModelRegistry::from_configs(vec![
            ModelConfig::new("a").redirecting_to("b"),
            ModelConfig::new("b")
                .redirecting_to("a")
                .with_capabilities(image_caps()),
        ]);
        let chain = resolve_redirect_chain("a", &registry);
        assert_eq!(chain.hops, vec!["a", "b", "a"]);
        assert_eq!(chain.resolved, "a");
        assert_eq!(chain.blocked_target.as_deref(), Some("b"));
        assert_eq!(
            resolve_effective_capabilities_with("a", &registry, |id| {
                assert_eq!(id, "a");
                ModelCapabilities::default()
            }),
            ModelCapabilities::default()
        );
    }

    #[test]
    fn self_loop_in_stored_data_is_tolerated() {
        let registry = ModelRegistry::from_configs(vec![ModelConfig::new("solo")
            .redirecting_to("solo")
            .with_capabilities(image_caps())]);
        let chain = resolve_redirect_chain("solo", &registry);
        assert_eq!(chain.stop, ChainStop::Cycle);
        assert_eq!(resolve_effective_capabilities("solo", &registry), image_caps());
    }

    #[test]
    fn validate_rejects_self_redirect() {
        for registry in [ModelRegistry::default(), ModelRegistry::with_defaults()] {
            let err = validate_redirect("a", "a", &registry).err();
            assert_eq!(err, Some(RedirectError::SelfRedirect("a".to_string())));
            assert_eq!(err.map(|err| err.tag()), Some("self-redirect"));
        }
    }

    #[test]
    fn validate_rejects_cycle() {
        let registry = ring(&["a", "b", "c"]);
        let err = validate_redirect("a", "b", &registry).err();
        assert_eq!(
            err,
            Some(RedirectError::Cycle {
                path: vec![
                    "a".to_string(),
                    "b".to_string(),
                    "c".to_string(),
                    "a".to_string()
                ]
            })
        );
        assert_eq!(err.map(|err| err.tag()), Some("cycle"));
    }

    #[test]
    fn validate_accepts_chains_that_do_not_return() {
        let registry = ModelRegistry::from_configs(vec![
            ModelConfig::new("a"),
            ModelConfig::new("b").redirecting_to("c"),
            ModelConfig::new("c"),
            ModelConfig::new("x").redirecting_to("y"),
            ModelConfig::new("y").redirecting_to("x"),
        ]);
        assert_eq!(validate_redirect("a", "b", &registry), Ok(()));
        assert_eq!(validate_redirect("a", "missing", &registry), Ok(()));
        assert_eq!(validate_redirect("a", "", &registry), Ok(()));
        // Pre-existing cycle that never reaches "a".
        assert_eq!(validate_redirect("a", "x", &registry), Ok(()));
        assert_eq!(registry.redirect_target("a"), None);
    }

    #[test]
    fn redirect_error_messages() {
        let cycle = RedirectError::Cycle {
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(
            cycle.to_string(),
            "redirect would create a cycle: a -> b -> a"
        );
        assert_eq!(
            RedirectError::SelfRedirect("a".to_string()).to_string(),
            "model 'a' cannot redirect to itself"
        );
    }
}
