//! `analyze`, `reconcile` and `presets` command handlers.
//!
//! Flags override the env-derived defaults in [`AppConfig`]; nothing here
//! changes pipeline semantics.

use std::path::Path;

use kolboard_core::{
    AppConfig, CanonicalProfileRecord, EngagementMetrics, InteractionField, MergePolicy,
    PresetsFile,
};
use kolboard_pipeline::{
    decode_items, group_items, into_requested_order, reconcile, ExistingProfile, MergeDecision,
    MergePlan, MergeScope, MergeSummary, PipelineOptions,
};
use serde::Serialize;

use crate::{runner, store, AnalyzeArgs};

/// Loads the presets file if it exists; a missing file means built-ins only.
fn load_configured_presets(config: &AppConfig) -> anyhow::Result<PresetsFile> {
    if !config.presets_path.exists() {
        tracing::debug!(
            path = %config.presets_path.display(),
            "no presets file; using built-in presets only"
        );
        return Ok(PresetsFile::default());
    }
    Ok(kolboard_core::load_presets(&config.presets_path)?)
}

fn resolve_options(
    config: &AppConfig,
    args: &AnalyzeArgs,
    presets: &PresetsFile,
) -> anyhow::Result<PipelineOptions> {
    let aggregation = presets.resolve(&args.preset).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown preset '{}'; available: {}",
            args.preset,
            presets.names().join(", ")
        )
    })?;

    Ok(PipelineOptions::new(aggregation)
        .with_tier_table(args.tier_table.unwrap_or(config.tier_table))
        .with_untiered_policy(args.untiered.unwrap_or(config.untiered_policy))
        .with_platform(args.platform))
}

async fn build_from_args(
    config: &AppConfig,
    args: &AnalyzeArgs,
) -> anyhow::Result<Vec<CanonicalProfileRecord>> {
    let presets = load_configured_presets(config)?;
    let options = resolve_options(config, args, &presets)?;

    let content = tokio::fs::read_to_string(&args.items).await.map_err(|e| {
        anyhow::anyhow!("failed to read dataset {}: {e}", args.items.display())
    })?;
    let items = decode_items(&content)?;
    let groups = into_requested_order(group_items(&items, &args.usernames), &args.usernames);

    tracing::info!(
        items = items.len(),
        profiles = groups.len(),
        preset = %args.preset,
        tier_table = %options.tier_table,
        untiered = %options.untiered_policy,
        "dataset grouped"
    );

    runner::build_records(groups, options, config.max_concurrent_profiles).await
}

pub(crate) async fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let records = build_from_args(config, args).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Metrics to write onto an existing store row.
#[derive(Debug, Serialize)]
struct MetricsPatch {
    existing_id: Option<String>,
    username: String,
    metrics: EngagementMetrics,
}

#[derive(Debug, Serialize)]
struct ReconcileReport {
    scope: String,
    policy: MergePolicy,
    summary: MergeSummary,
    /// Rows the inserts create, ready to append to the store snapshot.
    new_rows: Vec<ExistingProfile>,
    patches: Vec<MetricsPatch>,
    plan: MergePlan,
}

fn reconcile_report(
    records: Vec<CanonicalProfileRecord>,
    existing: &[ExistingProfile],
    scope: &MergeScope,
    policy: MergePolicy,
) -> ReconcileReport {
    let plan = reconcile(records, existing, scope, policy);
    let patches = plan
        .entries
        .iter()
        .filter_map(|entry| {
            let MergeDecision::UpdateExisting { existing_id } = &entry.decision else {
                return None;
            };
            entry.metrics_patch().map(|metrics| MetricsPatch {
                existing_id: existing_id.clone(),
                username: entry.record.username.clone(),
                metrics: metrics.clone(),
            })
        })
        .collect();

    ReconcileReport {
        scope: scope.to_string(),
        policy,
        summary: plan.summary(),
        new_rows: plan.as_new_rows(scope),
        patches,
        plan,
    }
}

pub(crate) async fn run_reconcile(
    config: &AppConfig,
    args: &AnalyzeArgs,
    store_path: &Path,
    campaign: Option<String>,
    policy: Option<MergePolicy>,
) -> anyhow::Result<()> {
    let records = build_from_args(config, args).await?;
    let existing = store::read_store(store_path).await?;

    let scope = campaign.map_or(MergeScope::Global, MergeScope::Campaign);
    let policy = policy.unwrap_or(config.merge_policy);
    let report = reconcile_report(records, &existing, &scope, policy);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_list_presets(config: &AppConfig) -> anyhow::Result<()> {
    let presets = load_configured_presets(config)?;

    println!("{:<22}{:<8}{:<6}FIELDS", "NAME", "WINDOW", "SORT");
    for name in presets.names() {
        let Some(aggregation) = presets.resolve(&name) else {
            continue;
        };
        let window = aggregation
            .window_size
            .map_or_else(|| "all".to_string(), |n| n.to_string());
        let fields: Vec<&str> = aggregation
            .interaction_fields
            .iter()
            .copied()
            .map(InteractionField::name)
            .collect();
        println!(
            "{:<22}{:<8}{:<6}{}",
            name,
            window,
            if aggregation.sort_before_window { "yes" } else { "no" },
            fields.join(",")
        );
    }
    Ok(())
}
