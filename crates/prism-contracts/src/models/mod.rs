mod capabilities;
mod config;
mod registry;
mod resolver;
mod store;

pub use capabilities::{detect_capabilities, ModelCapabilities, ThinkingConfigType};
pub use config::{
    AdvancedConfig, AspectRatio, ImageConfig, ImageSize, MediaResolution, ModelConfig,
    SanitizeOutcome, ThinkingLevel,
};
pub use registry::ModelRegistry;
pub use resolver::{
    resolve_effective_capabilities, resolve_effective_capabilities_with, resolve_redirect_chain,
    validate_redirect, ChainStop, RedirectChain, RedirectError,
};
pub use store::{fingerprint, render_registry, RegistryStore, REGISTRY_SCHEMA_VERSION};
