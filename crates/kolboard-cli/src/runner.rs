//! Bounded per-profile fan-out.
//!
//! Record assembly is CPU-only, so each profile runs on the blocking pool;
//! at most `max_concurrent` are in flight at once. Results are re-sorted into
//! input order before they are returned, because reconciliation keeps the
//! first occurrence of a username.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use kolboard_core::CanonicalProfileRecord;
use kolboard_pipeline::{build_record, tier_floor, PipelineOptions, ProfileGroup};

pub(crate) async fn build_records(
    groups: Vec<ProfileGroup>,
    options: PipelineOptions,
    max_concurrent: usize,
) -> anyhow::Result<Vec<CanonicalProfileRecord>> {
    let options = Arc::new(options);
    let profile_count = groups.len();

    let results: Vec<(usize, Result<Option<CanonicalProfileRecord>, tokio::task::JoinError>)> =
        stream::iter(groups.into_iter().enumerate())
            .map(|(index, group)| {
                let options = Arc::clone(&options);
                async move {
                    let outcome =
                        tokio::task::spawn_blocking(move || build_record(&group, &options)).await;
                    (index, outcome)
                }
            })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

    let mut records: Vec<(usize, CanonicalProfileRecord)> = Vec::with_capacity(results.len());
    for (index, outcome) in results {
        let maybe_record =
            outcome.map_err(|e| anyhow::anyhow!("profile worker {index} failed: {e}"))?;
        if let Some(record) = maybe_record {
            records.push((index, record));
        }
    }
    records.sort_by_key(|(index, _)| *index);

    let excluded = profile_count - records.len();
    if excluded > 0 {
        tracing::info!(
            excluded,
            tier_table = %options.tier_table,
            tier_floor = tier_floor(options.tier_table),
            "excluded profiles below the tier floor"
        );
    }
    tracing::info!(
        profiles = profile_count,
        records = records.len(),
        "built profile records"
    );

    Ok(records.into_iter().map(|(_, record)| record).collect())
}
