use serde::{Deserialize, Serialize};

use super::capabilities::{ModelCapabilities, ThinkingConfigType};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<ModelCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_config: Option<AdvancedConfig>,
}

impl ModelConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn redirecting_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = Some(target.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: ModelCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Redirect target, treating empty or blank values as no redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect_to
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingLevel {
    Minimal,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaResolution {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "5:4")]
    Landscape5x4,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "21:9")]
    Ultrawide21x9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

impl ImageConfig {
    pub fn is_empty(&self) -> bool {
        self.aspect_ratio.is_none() && self.image_size.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_level: Option<ThinkingLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_thoughts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_resolution: Option<MediaResolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOutcome {
    pub config: Option<AdvancedConfig>,
    pub cleared: Vec<&'static str>,
}

impl AdvancedConfig {
    pub fn is_empty(&self) -> bool {
        self.thinking_level.is_none()
            && self.thinking_budget.is_none()
            && self.include_thoughts.is_none()
            && self.media_resolution.is_none()
            && self.image_config.map_or(true, |image| image.is_empty())
    }

    /// Drops every field the given capabilities cannot honor.
    pub fn sanitize(&self, capabilities: &ModelCapabilities) -> SanitizeOutcome {
        let mut config = *self;
        let mut cleared = Vec::new();

        if capabilities.thinking_config_type != ThinkingConfigType::Level
            && config.thinking_level.take().is_some()
        {
            cleared.push("thinkingLevel");
        }
        if capabilities.thinking_config_type != ThinkingConfigType::Budget
            && config.thinking_budget.take().is_some()
        {
            cleared.push("thinkingBudget");
        }
        if !capabilities.supports_thought_summary && config.include_thoughts.take().is_some() {
            cleared.push("includeThoughts");
        }
        if !capabilities.supports_media_resolution && config.media_resolution.take().is_some() {
            cleared.push("mediaResolution");
        }
        if !capabilities.supports_image_generation {
            if config.image_config.take().is_some() {
                cleared.push("imageConfig");
            }
        } else if let Some(image) = config.image_config.as_mut() {
            if !capabilities.supports_image_size && image.image_size.take().is_some() {
                cleared.push("imageConfig.imageSize");
            }
            if image.is_empty() {
                config.image_config = None;
            }
        }

        SanitizeOutcome {
            config: (!config.is_empty()).then_some(config),
            cleared,
        }
    }
}
