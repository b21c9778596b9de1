//! End-to-end runs over scraper-shaped JSON: decode, group, build records,
//! reconcile against a store snapshot.
//!
//! Fixtures mix the two dataset shapes the scraper emits (profile items with
//! nested `videos`, and one-item-per-post exports) and include the usual
//! noise: numeric strings, nulls, case-varying usernames, junk entries.

use rust_decimal::Decimal;
use serde_json::{json, Value};

use kolboard_core::{AnalysisPreset, MergePolicy, Tier, TierTable, UntieredPolicy};
use kolboard_pipeline::{
    analyze, decode_items, reconcile, DuplicateSource, ExistingProfile, MergeDecision, MergeScope,
    PipelineOptions,
};

fn post(author: &str, iso: &str, views: Value, likes: u64, comments: u64) -> Value {
    json!({
        "createTimeISO": iso,
        "playCount": views,
        "diggCount": likes,
        "commentCount": comments,
        "shareCount": 1,
        "collectCount": 0,
        "authorMeta": {
            "name": author,
            "nickName": "Jane ✨",
            "fans": "15000",
            "verified": false,
            "signature": "📩 jane@example.com | WA 0812-3456-7890"
        }
    })
}

fn post_shaped_dataset() -> String {
    json!([
        post("Jane", "2024-05-01T10:00:00Z", json!(100), 1, 0),
        post("jane", "2024-05-03T10:00:00Z", json!("200"), 2, 1),
        post("JANE", "2024-05-02T10:00:00Z", json!(300), 3, 2),
        "junk entry",
        {"playCount": 999},
        {
            "name": "bob_cooks",
            "nickName": "Bob",
            "fans": 500,
            "signature": "recipes daily",
            "videos": [
                {"playCount": 50, "diggCount": 5, "commentCount": 0, "createTime": 1_714_521_600}
            ]
        }
    ])
    .to_string()
}

#[test]
fn quick_scan_end_to_end() {
    let items = decode_items(&post_shaped_dataset()).unwrap();
    let records = analyze(
        &items,
        &["@Jane", "ghost"],
        &PipelineOptions::from_preset(AnalysisPreset::QuickScan),
    );

    let names: Vec<&str> = records.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, vec!["jane", "ghost", "bob_cooks"]);

    let jane = &records[0];
    assert_eq!(jane.followers, 15_000);
    assert_eq!(jane.tier, Tier::Micro);
    assert_eq!(jane.display_name, "Jane ✨");
    assert_eq!(jane.metrics.videos_considered, 3);
    assert_eq!(jane.metrics.total_views, 600);
    assert_eq!(jane.metrics.total_interactions, 9);
    assert_eq!(jane.metrics.avg_views, 200);
    assert_eq!(jane.metrics.engagement_rate_percent, Decimal::new(150, 2));
    assert_eq!(jane.contact.email, "jane@example.com");
    assert_eq!(jane.contact.phone, "6281234567890");

    let ghost = &records[1];
    assert!(!ghost.metrics.has_data());
    assert_eq!(ghost.tier, Tier::Nano);
    assert!(ghost.contact.is_empty());
}

#[test]
fn all_interaction_fields_change_the_rate() {
    let items = decode_items(&post_shaped_dataset()).unwrap();
    let records = analyze(
        &items,
        &["jane"],
        &PipelineOptions::from_preset(AnalysisPreset::CampaignReanalysis),
    );
    assert_eq!(records[0].metrics.total_interactions, 12);
    assert_eq!(records[0].metrics.engagement_rate_percent, Decimal::new(200, 2));
}

#[test]
fn exclude_policy_drops_small_profiles() {
    let items = decode_items(&post_shaped_dataset()).unwrap();
    let options = PipelineOptions::from_preset(AnalysisPreset::QuickScan)
        .with_untiered_policy(UntieredPolicy::Exclude);
    let records = analyze(&items, &["jane", "bob_cooks", "ghost"], &options);
    let names: Vec<&str> = records.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, vec!["jane"]);
}

#[test]
fn extended_table_relabels_tiers() {
    let items = decode_items(&post_shaped_dataset()).unwrap();
    let options = PipelineOptions::from_preset(AnalysisPreset::QuickScan)
        .with_tier_table(TierTable::Extended);
    let records = analyze(&items, &["jane"], &options);
    assert_eq!(records[0].tier, Tier::Mid);
}

#[test]
fn profile_analysis_windows_latest_twelve_of_profile_videos() {
    let videos: Vec<Value> = (0..20)
        .map(|day| {
            // Only the 12 newest (days 9..=20) carry likes.
            let likes = if day >= 8 { 10 } else { 0 };
            json!({
                "createTimeISO": format!("2024-04-{:02}T08:00:00Z", day + 1),
                "playCount": 100,
                "diggCount": likes,
                "commentCount": 0,
                "shareCount": 0
            })
        })
        .collect();
    let dataset = json!({"items": [{"uniqueId": "Creator", "fans": 250_000, "videos": videos}]});

    let items = decode_items(&dataset.to_string()).unwrap();
    let records = analyze(
        &items,
        &["creator"],
        &PipelineOptions::from_preset(AnalysisPreset::ProfileAnalysis),
    );
    let metrics = &records[0].metrics;
    assert_eq!(records[0].tier, Tier::MidMacro);
    assert_eq!(metrics.videos_considered, 12);
    assert_eq!(metrics.total_views, 1_200);
    assert_eq!(metrics.total_interactions, 120);
    assert_eq!(metrics.engagement_rate_percent, Decimal::new(1000, 2));
}

#[test]
fn reconcile_after_analysis_is_idempotent() {
    let items = decode_items(&post_shaped_dataset()).unwrap();
    let records = analyze(
        &items,
        &["jane", "bob_cooks"],
        &PipelineOptions::from_preset(AnalysisPreset::QuickScan),
    );

    let scope = MergeScope::Campaign("ramadan-2024".to_owned());
    let mut store: Vec<ExistingProfile> = serde_json::from_value(json!([
        {"id": "11", "username": "Bob_Cooks", "campaign_id": "ramadan-2024"},
        {"id": "12", "username": "jane", "campaign_id": "other"}
    ]))
    .unwrap();

    let first = reconcile(records.clone(), &store, &scope, MergePolicy::Skip);
    assert_eq!(first.entries[0].decision, MergeDecision::Insert);
    assert_eq!(
        first.entries[1].decision,
        MergeDecision::SkipDuplicate {
            source: DuplicateSource::Store
        }
    );

    store.extend(first.as_new_rows(&scope));
    let second = reconcile(records.clone(), &store, &scope, MergePolicy::Skip);
    assert_eq!(second.summary().inserts, 0);

    let update = reconcile(records, &store, &scope, MergePolicy::UpdateMetrics);
    assert_eq!(
        update.entries[1].decision,
        MergeDecision::UpdateExisting {
            existing_id: Some("11".to_owned())
        }
    );
    assert_eq!(update.summary().updates, 2);
}
