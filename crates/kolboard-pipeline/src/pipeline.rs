//! Per-profile record assembly.
//!
//! [`build_record`] touches a single [`ProfileGroup`] and nothing else, so
//! callers can fan it out across profiles and only join before
//! [`crate::merge::reconcile`].

use std::collections::BTreeMap;

use kolboard_core::{
    AggregationConfig, AnalysisPreset, CanonicalProfileRecord, Platform, TierTable,
    UntieredPolicy,
};

use crate::contact::extract_contact;
use crate::metrics::aggregate;
use crate::normalize::{canonical_username, group_items, ProfileGroup};
use crate::tier::resolve_tier;
use crate::types::RawScrapedItem;

/// Everything a caller chooses per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub aggregation: AggregationConfig,
    pub tier_table: TierTable,
    pub untiered_policy: UntieredPolicy,
    pub platform: Platform,
}

impl PipelineOptions {
    #[must_use]
    pub fn new(aggregation: AggregationConfig) -> Self {
        Self {
            aggregation,
            tier_table: TierTable::default(),
            untiered_policy: UntieredPolicy::default(),
            platform: Platform::default(),
        }
    }

    #[must_use]
    pub fn from_preset(preset: AnalysisPreset) -> Self {
        Self::new(preset.config())
    }

    #[must_use]
    pub fn with_tier_table(mut self, tier_table: TierTable) -> Self {
        self.tier_table = tier_table;
        self
    }

    #[must_use]
    pub fn with_untiered_policy(mut self, policy: UntieredPolicy) -> Self {
        self.untiered_policy = policy;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

/// Builds the canonical record for one profile.
///
/// Returns `None` when the profile is below the tier floor and the untiered
/// policy excludes it.
#[must_use]
pub fn build_record(
    group: &ProfileGroup,
    options: &PipelineOptions,
) -> Option<CanonicalProfileRecord> {
    let Some(tier) = resolve_tier(options.tier_table, options.untiered_policy, group.followers)
    else {
        tracing::debug!(
            username = %group.username,
            followers = group.followers,
            "excluding untiered profile"
        );
        return None;
    };

    let metrics = aggregate(group, &options.aggregation);
    let contact = extract_contact(&group.bio);
    let display_name = if group.display_name.is_empty() {
        group.username.clone()
    } else {
        group.display_name.clone()
    };

    if group.is_empty() {
        tracing::debug!(username = %group.username, "no posts attributed to profile");
    }
    tracing::debug!(
        username = %group.username,
        videos = metrics.videos_considered,
        has_data = metrics.has_data(),
        engagement_rate = %metrics.engagement_rate_percent,
        has_contact = !contact.is_empty(),
        tier = %tier,
        "profile analysed"
    );

    Some(CanonicalProfileRecord {
        profile_url: options.platform.profile_url(&group.username),
        username: group.username.clone(),
        platform: options.platform,
        display_name,
        avatar_url: group.avatar_url.clone(),
        bio: group.bio.clone(),
        is_verified: group.is_verified,
        followers: group.followers,
        tier,
        metrics,
        contact,
    })
}

/// Orders groups for output: requested usernames first, in request order,
/// then any other profiles found in the data, sorted by username.
#[must_use]
pub fn into_requested_order<S: AsRef<str>>(
    mut groups: BTreeMap<String, ProfileGroup>,
    requested: &[S],
) -> Vec<ProfileGroup> {
    let mut ordered: Vec<ProfileGroup> = requested
        .iter()
        .filter_map(|username| groups.remove(&canonical_username(username.as_ref())))
        .collect();
    ordered.extend(groups.into_values());
    ordered
}

/// Sequential end-to-end run: group, then build one record per profile.
#[must_use]
pub fn analyze<S: AsRef<str>>(
    items: &[RawScrapedItem],
    requested: &[S],
    options: &PipelineOptions,
) -> Vec<CanonicalProfileRecord> {
    into_requested_order(group_items(items, requested), requested)
        .iter()
        .filter_map(|group| build_record(group, options))
        .collect()
}
