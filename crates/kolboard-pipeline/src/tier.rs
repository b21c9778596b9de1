//! Follower-count tier classification.

use kolboard_core::{Tier, TierTable, UntieredPolicy};

/// `(inclusive lower bound, tier)`, highest band first.
type Bands = &'static [(u64, Tier)];

const STANDARD_BANDS: Bands = &[
    (1_000_000, Tier::Mega),
    (100_000, Tier::MidMacro),
    (10_000, Tier::Micro),
    (2_000, Tier::Nano),
];

const EXTENDED_BANDS: Bands = &[
    (1_000_000, Tier::Mega),
    (100_000, Tier::Macro),
    (10_000, Tier::Mid),
    (1_000, Tier::Micro),
];

fn bands(table: TierTable) -> Bands {
    match table {
        TierTable::Standard => STANDARD_BANDS,
        TierTable::Extended => EXTENDED_BANDS,
    }
}

/// Tier for `followers` under `table`, or `None` below the table's floor.
#[must_use]
pub fn classify_tier(table: TierTable, followers: u64) -> Option<Tier> {
    bands(table)
        .iter()
        .find(|(lower_bound, _)| followers >= *lower_bound)
        .map(|(_, tier)| *tier)
}

/// Lowest follower count that receives a tier under `table`.
#[must_use]
pub fn tier_floor(table: TierTable) -> u64 {
    bands(table).last().map_or(0, |(lower_bound, _)| *lower_bound)
}

/// Applies the untiered policy on top of [`classify_tier`].
///
/// Returns `None` only when the profile is untiered and the policy excludes
/// it from results.
#[must_use]
pub fn resolve_tier(table: TierTable, policy: UntieredPolicy, followers: u64) -> Option<Tier> {
    match (classify_tier(table, followers), policy) {
        (Some(tier), _) => Some(tier),
        (None, UntieredPolicy::ShowAsNano) => Some(Tier::Nano),
        (None, UntieredPolicy::Exclude) => None,
    }
}
