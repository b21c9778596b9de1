//! Store snapshot input and the duplicate sweep.

use std::path::Path;

use kolboard_pipeline::{find_store_duplicates, DuplicateMode, ExistingProfile};
use serde::Serialize;

/// Reads a store snapshot: a JSON array of existing profile rows.
pub(crate) async fn read_store(path: &Path) -> anyhow::Result<Vec<ExistingProfile>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read store snapshot {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid store snapshot {}: {e}", path.display()))
}

#[derive(Debug, Serialize)]
struct DuplicateReport<'a> {
    mode: String,
    total_rows: usize,
    duplicates: Vec<&'a ExistingProfile>,
}

pub(crate) async fn run_dedupe_store(path: &Path, mode: DuplicateMode) -> anyhow::Result<()> {
    let rows = read_store(path).await?;
    let duplicates = find_store_duplicates(&rows, mode);

    if duplicates.iter().any(|row| row.id.is_none()) {
        tracing::warn!("some duplicate rows have no id and cannot be deleted by id");
    }
    tracing::info!(
        %mode,
        total_rows = rows.len(),
        duplicates = duplicates.len(),
        "store duplicate sweep complete"
    );

    let report = DuplicateReport {
        mode: mode.to_string(),
        total_rows: rows.len(),
        duplicates,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
