use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{AggregationConfig, AnalysisPreset};
use crate::ConfigError;

/// A user-declared aggregation preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPreset {
    pub name: String,
    #[serde(flatten)]
    pub config: AggregationConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct PresetsFile {
    #[serde(default)]
    pub presets: Vec<NamedPreset>,
}

impl PresetsFile {
    /// Resolve a preset by name, checking the built-in presets first.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<AggregationConfig> {
        if let Ok(builtin) = name.parse::<AnalysisPreset>() {
            return Some(builtin.config());
        }
        self.presets
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.config.clone())
    }

    /// Names of every resolvable preset, built-ins first.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        AnalysisPreset::ALL
            .iter()
            .map(|p| p.name().to_string())
            .chain(self.presets.iter().map(|p| p.name.clone()))
            .collect()
    }
}

/// Load and validate custom aggregation presets from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_presets(path: &Path) -> Result<PresetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PresetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_presets(&content)
}

/// Parse and validate presets from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_presets(content: &str) -> Result<PresetsFile, ConfigError> {
    let presets_file: PresetsFile =
        serde_yaml::from_str(content).map_err(ConfigError::PresetsFileParse)?;

    validate_presets(&presets_file)?;

    Ok(presets_file)
}

fn validate_presets(presets_file: &PresetsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for preset in &presets_file.presets {
        let name = preset.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "preset name must be non-empty".to_string(),
            ));
        }

        if name.parse::<AnalysisPreset>().is_ok() {
            return Err(ConfigError::Validation(format!(
                "preset '{name}' shadows a built-in preset"
            )));
        }

        if preset.config.window_size == Some(0) {
            return Err(ConfigError::Validation(format!(
                "preset '{name}' has window_size 0; omit it to consider every post"
            )));
        }

        if preset.config.interaction_fields.is_empty() {
            return Err(ConfigError::Validation(format!(
                "preset '{name}' must count at least one interaction field"
            )));
        }

        if !seen_names.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate preset name: '{name}'"
            )));
        }
    }

    Ok(())
}
