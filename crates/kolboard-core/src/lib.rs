pub mod analysis;
pub mod app_config;
pub mod config;
pub mod presets;
pub mod profile;

pub use analysis::{
    AggregationConfig, AnalysisPreset, InteractionField, MergePolicy, TierTable, UntieredPolicy,
};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use presets::{load_presets, parse_presets, NamedPreset, PresetsFile};
pub use profile::{CanonicalProfileRecord, ContactInfo, EngagementMetrics, Platform, Tier};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read presets file {path}: {source}")]
    PresetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse presets file: {0}")]
    PresetsFileParse(#[from] serde_yaml::Error),

    #[error("presets validation failed: {0}")]
    Validation(String),
}
