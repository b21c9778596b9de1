//! Caller-selected knobs for the metrics pipeline.
//!
//! Different dashboard call sites compute engagement differently (recent-5
//! vs recent-12 posts, likes+comments vs all four interaction counters, two
//! tier tables). Each variant is a named value here so callers pick one
//! explicitly per invocation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A per-post interaction counter that can contribute to engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionField {
    Likes,
    Comments,
    Shares,
    Collects,
}

impl InteractionField {
    pub const ALL: [InteractionField; 4] = [
        InteractionField::Likes,
        InteractionField::Comments,
        InteractionField::Shares,
        InteractionField::Collects,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            InteractionField::Likes => "likes",
            InteractionField::Comments => "comments",
            InteractionField::Shares => "shares",
            InteractionField::Collects => "collects",
        }
    }
}

impl std::fmt::Display for InteractionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a profile's posts are windowed and which counters are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Maximum number of posts considered; `None` considers every post.
    #[serde(default)]
    pub window_size: Option<usize>,
    /// Sort posts newest-first before truncating to `window_size`.
    #[serde(default)]
    pub sort_before_window: bool,
    pub interaction_fields: Vec<InteractionField>,
}

impl AggregationConfig {
    /// Returns `true` if `field` is part of the interaction sum.
    #[must_use]
    pub fn counts(&self, field: InteractionField) -> bool {
        self.interaction_fields.contains(&field)
    }
}

/// Built-in aggregation presets, one per dashboard call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisPreset {
    /// Scraper already returns the 5 latest posts; likes + comments only.
    QuickScan,
    /// Latest 12 posts by creation time; likes + comments + shares.
    ProfileAnalysis,
    /// Every scraped post; all four interaction counters.
    CampaignReanalysis,
}

impl AnalysisPreset {
    pub const ALL: [AnalysisPreset; 3] = [
        AnalysisPreset::QuickScan,
        AnalysisPreset::ProfileAnalysis,
        AnalysisPreset::CampaignReanalysis,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AnalysisPreset::QuickScan => "quick-scan",
            AnalysisPreset::ProfileAnalysis => "profile-analysis",
            AnalysisPreset::CampaignReanalysis => "campaign-reanalysis",
        }
    }

    #[must_use]
    pub fn config(self) -> AggregationConfig {
        use InteractionField::{Collects, Comments, Likes, Shares};

        match self {
            AnalysisPreset::QuickScan => AggregationConfig {
                window_size: Some(5),
                sort_before_window: false,
                interaction_fields: vec![Likes, Comments],
            },
            AnalysisPreset::ProfileAnalysis => AggregationConfig {
                window_size: Some(12),
                sort_before_window: true,
                interaction_fields: vec![Likes, Comments, Shares],
            },
            AnalysisPreset::CampaignReanalysis => AggregationConfig {
                window_size: None,
                sort_before_window: false,
                interaction_fields: vec![Likes, Comments, Shares, Collects],
            },
        }
    }
}

impl std::fmt::Display for AnalysisPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalysisPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| format!("unknown analysis preset '{s}'"))
    }
}

/// Named follower-threshold table used by the tier classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierTable {
    /// Nano ≥ 2k, Micro ≥ 10k, Mid/Macro ≥ 100k, Mega ≥ 1M.
    #[default]
    Standard,
    /// Micro ≥ 1k, Mid ≥ 10k, Macro ≥ 100k, Mega ≥ 1M.
    Extended,
}

impl std::fmt::Display for TierTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierTable::Standard => write!(f, "standard"),
            TierTable::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for TierTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(TierTable::Standard),
            "extended" => Ok(TierTable::Extended),
            other => Err(format!(
                "unknown tier table '{other}'; expected standard or extended"
            )),
        }
    }
}

/// What to do with a profile whose follower count is below the table floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UntieredPolicy {
    /// Drop the profile from the results.
    Exclude,
    /// Keep the profile and label it Nano.
    #[default]
    ShowAsNano,
}

impl std::fmt::Display for UntieredPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UntieredPolicy::Exclude => write!(f, "exclude"),
            UntieredPolicy::ShowAsNano => write!(f, "show-as-nano"),
        }
    }
}

impl FromStr for UntieredPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclude" => Ok(UntieredPolicy::Exclude),
            "show-as-nano" => Ok(UntieredPolicy::ShowAsNano),
            other => Err(format!(
                "unknown untiered policy '{other}'; expected exclude or show-as-nano"
            )),
        }
    }
}

/// How a freshly computed record is merged into an already-known profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Discard new data for known profiles.
    #[default]
    Skip,
    /// Overwrite engagement metrics of known profiles; identity fields stay.
    UpdateMetrics,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergePolicy::Skip => write!(f, "skip"),
            MergePolicy::UpdateMetrics => write!(f, "update-metrics"),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(MergePolicy::Skip),
            "update-metrics" => Ok(MergePolicy::UpdateMetrics),
            other => Err(format!(
                "unknown merge policy '{other}'; expected skip or update-metrics"
            )),
        }
    }
}
