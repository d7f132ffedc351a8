use std::path::Path;

use warehouse_seed_core::GeneratorConfig;

use crate::CliError;

/// Load the generator configuration, starting from the built-in catalog.
///
/// Fields missing from the TOML file keep their default values.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, CliError> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    let config: GeneratorConfig = toml::from_str(&content)?;
    tracing::info!(event = "config_loaded", path = %path.display());
    Ok(config)
}
