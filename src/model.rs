//! Model name resolution and provider detection.

/// Supported API providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Google Gemini API (chat and image understanding).
    Gemini,
    /// `OctoAI` image generation API.
    OctoAi,
}

/// Short name aliases for the models the assistant uses.
const ALIASES: &[(&str, &str)] = &[
    ("pro", "gemini-pro"),
    ("flash", "gemini-1.5-flash-latest"),
    ("pro-1.5", "gemini-1.5-pro-latest"),
    ("sdxl", "sdxl"),
    ("ssd", "ssd"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|&&(alias, _)| alias == name)
        .map_or_else(|| name.to_string(), |&(_, full)| full.to_string())
}

/// Detect the provider from a resolved model name.
///
/// # Errors
///
/// Returns an error if the model name doesn't match a known provider.
pub fn detect_provider(model: &str) -> Result<Provider, String> {
    if model.starts_with("gemini") {
        Ok(Provider::Gemini)
    } else if model == "sdxl" || model == "ssd" || model.starts_with("sdxl-") {
        Ok(Provider::OctoAi)
    } else {
        Err(format!("Unknown provider for model '{model}'. Expected 'gemini-*', 'sdxl' or 'ssd'."))
    }
}

/// Resolve a model and check that it belongs to the provider a task needs.
///
/// # Errors
///
/// Returns an error if the provider is unknown or does not serve `task`.
pub fn resolve_for(name: &str, expected: Provider, task: &str) -> Result<String, String> {
    let resolved = resolve_model(name);
    let provider = detect_provider(&resolved)?;
    if provider == expected {
        Ok(resolved)
    } else {
        Err(format!("Model '{resolved}' ({provider:?}) cannot be used for {task}"))
    }
}
