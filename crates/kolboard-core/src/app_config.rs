use std::path::PathBuf;

use crate::analysis::{MergePolicy, TierTable, UntieredPolicy};

/// Process-level defaults for pipeline callers. Every value can still be
/// overridden per invocation; the pipeline itself never reads this.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub presets_path: PathBuf,
    pub max_concurrent_profiles: usize,
    pub tier_table: TierTable,
    pub untiered_policy: UntieredPolicy,
    pub merge_policy: MergePolicy,
}
