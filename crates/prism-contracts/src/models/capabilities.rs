use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingConfigType {
    #[default]
    None,
    Budget,
    Level,
}

impl ThinkingConfigType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Budget => "budget",
            Self::Level => "level",
        }
    }
}

/// Feature flags the model editor and input toolbar gate their controls on.
///
/// Flags missing from stored JSON deserialize as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelCapabilities {
    pub thinking_config_type: ThinkingConfigType,
    pub supports_image_generation: bool,
    pub supports_image_size: bool,
    pub supports_media_resolution: bool,
    pub supports_thought_summary: bool,
}

impl ModelCapabilities {
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        match self.thinking_config_type {
            ThinkingConfigType::None => {}
            ThinkingConfigType::Budget => labels.push("thinking_budget"),
            ThinkingConfigType::Level => labels.push("thinking_level"),
        }
        if self.supports_thought_summary {
            labels.push("thought_summary");
        }
        if self.supports_media_resolution {
            labels.push("media_resolution");
        }
        if self.supports_image_generation {
            labels.push("image_generation");
        }
        if self.supports_image_size {
            labels.push("image_size");
        }
        labels
    }
}

/// Guesses capabilities from a model id's naming conventions.
///
/// Used whenever a resolved model carries no explicit capability set.
pub fn detect_capabilities(model_id: &str) -> ModelCapabilities {
    let lowered = model_id.trim().to_ascii_lowercase();
    let id = lowered.strip_prefix("models/").unwrap_or(&lowered);

    let is_gemini_3 = id.starts_with("gemini-3");
    let is_gemini_25 = id.starts_with("gemini-2.5");
    let is_imagen = id.starts_with("imagen");
    let generates_images = is_imagen || id.contains("image");

    let thinking_config_type = if generates_images {
        if id.starts_with("gemini-3-pro-image") {
            ThinkingConfigType::Level
        } else {
            ThinkingConfigType::None
        }
    } else if is_gemini_3 {
        ThinkingConfigType::Level
    } else if is_gemini_25 {
        ThinkingConfigType::Budget
    } else {
        ThinkingConfigType::None
    };

    ModelCapabilities {
        thinking_config_type,
        supports_image_generation: generates_images,
        supports_image_size: generates_images && (is_gemini_3 || id.starts_with("imagen-4")),
        supports_media_resolution: is_gemini_3,
        supports_thought_summary: thinking_config_type != ThinkingConfigType::None,
    }
}
