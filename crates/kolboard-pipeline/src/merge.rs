//! Reconciliation of freshly computed profiles against the persisted store.
//!
//! The reconciler only plans. Applying a [`MergePlan`] (inserting rows,
//! patching metrics) is left to the persistence layer.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use kolboard_core::{CanonicalProfileRecord, EngagementMetrics, MergePolicy, Platform};
use serde::{Deserialize, Serialize};

use crate::normalize::canonical_username;

/// A row already present in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingProfile {
    /// Store primary key; `None` for rows known only by username.
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub platform: Platform,
}

/// Which existing rows a batch is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeScope {
    /// Every row in the store.
    Global,
    /// Only rows attached to this campaign.
    Campaign(String),
}

impl MergeScope {
    #[must_use]
    pub fn contains(&self, row: &ExistingProfile) -> bool {
        match self {
            MergeScope::Global => true,
            MergeScope::Campaign(id) => row.campaign_id.as_deref() == Some(id.as_str()),
        }
    }

    fn campaign_id(&self) -> Option<&str> {
        match self {
            MergeScope::Global => None,
            MergeScope::Campaign(id) => Some(id),
        }
    }
}

impl std::fmt::Display for MergeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeScope::Global => write!(f, "global"),
            MergeScope::Campaign(id) => write!(f, "campaign:{id}"),
        }
    }
}

/// Where the earlier copy of a skipped record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSource {
    /// An earlier record in the same batch.
    Batch,
    /// A row already in the store.
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MergeDecision {
    Insert,
    SkipDuplicate {
        source: DuplicateSource,
    },
    /// Overwrite the engagement metrics of `existing_id`; identity and
    /// display fields are left untouched.
    UpdateExisting {
        existing_id: Option<String>,
    },
}

/// One batch record with the decision taken for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMerge {
    pub record: CanonicalProfileRecord,
    #[serde(flatten)]
    pub decision: MergeDecision,
}

impl PlannedMerge {
    /// The metrics to write for an update decision.
    #[must_use]
    pub fn metrics_patch(&self) -> Option<&EngagementMetrics> {
        match self.decision {
            MergeDecision::UpdateExisting { .. } => Some(&self.record.metrics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub inserts: usize,
    pub updates: usize,
    pub skipped_in_batch: usize,
    pub skipped_in_store: usize,
}

/// Decisions for a whole batch, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    pub entries: Vec<PlannedMerge>,
}

impl MergePlan {
    #[must_use]
    pub fn summary(&self) -> MergeSummary {
        self.entries
            .iter()
            .fold(MergeSummary::default(), |mut acc, entry| {
                match entry.decision {
                    MergeDecision::Insert => acc.inserts += 1,
                    MergeDecision::UpdateExisting { .. } => acc.updates += 1,
                    MergeDecision::SkipDuplicate {
                        source: DuplicateSource::Batch,
                    } => acc.skipped_in_batch += 1,
                    MergeDecision::SkipDuplicate {
                        source: DuplicateSource::Store,
                    } => acc.skipped_in_store += 1,
                }
                acc
            })
    }

    pub fn inserts(&self) -> impl Iterator<Item = &CanonicalProfileRecord> {
        self.entries
            .iter()
            .filter(|e| e.decision == MergeDecision::Insert)
            .map(|e| &e.record)
    }

    /// Store rows the inserts of this plan would create under `scope`.
    #[must_use]
    pub fn as_new_rows(&self, scope: &MergeScope) -> Vec<ExistingProfile> {
        self.inserts()
            .map(|record| ExistingProfile {
                id: None,
                username: record.username.clone(),
                campaign_id: scope.campaign_id().map(str::to_owned),
                platform: record.platform,
            })
            .collect()
    }
}

type ProfileKey = (Platform, String);

fn key_of(platform: Platform, username: &str) -> ProfileKey {
    (platform, canonical_username(username))
}

/// Plans how `batch` merges into `store`.
///
/// Records are matched by platform and canonical username. Repeats within
/// the batch are skipped before the store is consulted, so the first
/// occurrence is the one compared. Only store rows inside `scope` count as
/// matches.
pub fn reconcile<I>(
    batch: I,
    store: &[ExistingProfile],
    scope: &MergeScope,
    policy: MergePolicy,
) -> MergePlan
where
    I: IntoIterator<Item = CanonicalProfileRecord>,
{
    let mut existing: HashMap<ProfileKey, Option<&str>> = HashMap::new();
    for row in store.iter().filter(|row| scope.contains(row)) {
        existing
            .entry(key_of(row.platform, &row.username))
            .or_insert(row.id.as_deref());
    }

    let mut seen: HashSet<ProfileKey> = HashSet::new();
    let entries: Vec<PlannedMerge> = batch
        .into_iter()
        .map(|record| {
            let key = key_of(record.platform, &record.username);
            let first_in_batch = seen.insert(key.clone());
            let decision = match existing.get(&key) {
                _ if !first_in_batch => MergeDecision::SkipDuplicate {
                    source: DuplicateSource::Batch,
                },
                None => MergeDecision::Insert,
                Some(_) if policy == MergePolicy::Skip => MergeDecision::SkipDuplicate {
                    source: DuplicateSource::Store,
                },
                Some(&existing_id) => MergeDecision::UpdateExisting {
                    existing_id: existing_id.map(str::to_owned),
                },
            };
            PlannedMerge { record, decision }
        })
        .collect();

    let plan = MergePlan { entries };
    let summary = plan.summary();
    tracing::info!(
        scope = %scope,
        policy = %policy,
        inserts = summary.inserts,
        updates = summary.updates,
        skipped_in_batch = summary.skipped_in_batch,
        skipped_in_store = summary.skipped_in_store,
        "merge plan ready"
    );
    plan
}

/// How rows are compared when sweeping the store for duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateMode {
    /// Same username within the same campaign.
    #[default]
    PerCampaign,
    /// Same username anywhere in the store.
    Global,
}

impl std::fmt::Display for DuplicateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateMode::PerCampaign => write!(f, "per-campaign"),
            DuplicateMode::Global => write!(f, "global"),
        }
    }
}

impl FromStr for DuplicateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-campaign" => Ok(DuplicateMode::PerCampaign),
            "global" => Ok(DuplicateMode::Global),
            other => Err(format!(
                "unknown duplicate mode '{other}'; expected per-campaign or global"
            )),
        }
    }
}

/// Rows that repeat an earlier row, in store order. The first row of each
/// key is kept and never reported.
#[must_use]
pub fn find_store_duplicates(
    rows: &[ExistingProfile],
    mode: DuplicateMode,
) -> Vec<&ExistingProfile> {
    let mut seen: HashSet<(Platform, Option<&str>, String)> = HashSet::new();
    rows.iter()
        .filter(|row| {
            let campaign = match mode {
                DuplicateMode::PerCampaign => row.campaign_id.as_deref(),
                DuplicateMode::Global => None,
            };
            !seen.insert((row.platform, campaign, canonical_username(&row.username)))
        })
        .collect()
}
