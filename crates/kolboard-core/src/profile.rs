use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Social platform a creator profile was scraped from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    TikTok,
    Instagram,
}

impl Platform {
    /// Public profile URL for a canonical username on this platform.
    #[must_use]
    pub fn profile_url(self, username: &str) -> String {
        match self {
            Platform::TikTok => format!("https://www.tiktok.com/@{username}"),
            Platform::Instagram => format!("https://www.instagram.com/{username}"),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::TikTok => write!(f, "tiktok"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiktok" => Ok(Platform::TikTok),
            "instagram" => Ok(Platform::Instagram),
            other => Err(format!(
                "unknown platform '{other}'; expected tiktok or instagram"
            )),
        }
    }
}

/// Audience-size tier. Which labels are reachable depends on the tier table
/// used to classify; variants are declared in ascending audience order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Nano,
    Micro,
    Mid,
    #[serde(rename = "Mid/Macro")]
    MidMacro,
    Macro,
    Mega,
}

impl Tier {
    /// Display label as stored alongside candidate records.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tier::Nano => "Nano",
            Tier::Micro => "Micro",
            Tier::Mid => "Mid",
            Tier::MidMacro => "Mid/Macro",
            Tier::Macro => "Macro",
            Tier::Mega => "Mega",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Contact details recovered from a profile biography.
///
/// Both fields are best-effort: an empty string means "not found by the
/// current strategies", not "definitely absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Lower-cased email address, or empty.
    pub email: String,
    /// Digits-only phone number including country code (e.g. `"6281234567890"`),
    /// or empty.
    pub phone: String,
}

impl ContactInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.phone.is_empty()
    }

    /// Returns `true` when both email and phone are known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.phone.is_empty()
    }
}

/// Engagement figures derived from a profile's recent posts.
///
/// Zero is the explicit "no data" value; it is distinguishable from a
/// legitimately small value only through `videos_considered == 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub videos_considered: usize,
    pub total_views: u64,
    /// Sum of the configured interaction counters over the considered posts.
    pub total_interactions: u64,
    /// `total_views / videos_considered`, rounded half-up.
    pub avg_views: u64,
    /// `total_interactions / total_views × 100`, rounded half-up to 2 dp.
    pub engagement_rate_percent: Decimal,
    /// Average interactions per post relative to followers, as a percentage
    /// rounded half-up to 2 dp. `None` when the follower count is unknown.
    pub engagement_rate_by_followers_percent: Option<Decimal>,
}

impl EngagementMetrics {
    /// Returns `true` when at least one post contributed to the figures.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.videos_considered > 0
    }
}

/// The unit handed to the persistence collaborator after one
/// scrape-and-aggregate cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalProfileRecord {
    /// Trimmed, lower-cased username.
    pub username: String,
    pub platform: Platform,
    pub display_name: String,
    pub avatar_url: String,
    pub bio: String,
    pub is_verified: bool,
    pub followers: u64,
    pub profile_url: String,
    pub tier: Tier,
    pub metrics: EngagementMetrics,
    pub contact: ContactInfo,
}
