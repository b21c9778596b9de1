//! Engagement metrics over a profile's posts.

use std::cmp::Ordering;

use kolboard_core::{AggregationConfig, EngagementMetrics, InteractionField};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::normalize::{PostRecord, ProfileGroup};

/// Computes engagement metrics for one profile.
///
/// Deterministic: the same group and config always produce the same output.
/// A group with no retained posts yields all-zero metrics.
#[must_use]
pub fn aggregate(group: &ProfileGroup, config: &AggregationConfig) -> EngagementMetrics {
    let retained = window_posts(&group.posts, config);
    let fields: Vec<InteractionField> = InteractionField::ALL
        .into_iter()
        .filter(|field| config.counts(*field))
        .collect();

    let videos_considered = retained.len();
    let total_views = retained
        .iter()
        .fold(0u64, |acc, post| acc.saturating_add(post.views));
    let total_interactions = retained.iter().fold(0u64, |acc, post| {
        fields
            .iter()
            .fold(acc, |acc, field| acc.saturating_add(post.interaction(*field)))
    });

    let engagement_rate_by_followers_percent = (group.followers > 0).then(|| {
        rounded_percent(
            Decimal::from(total_interactions),
            Decimal::from(videos_considered)
                .checked_mul(Decimal::from(group.followers))
                .unwrap_or(Decimal::ZERO),
        )
    });

    EngagementMetrics {
        videos_considered,
        total_views,
        total_interactions,
        avg_views: rounded_average(total_views, videos_considered),
        engagement_rate_percent: rounded_percent(
            Decimal::from(total_interactions),
            Decimal::from(total_views),
        ),
        engagement_rate_by_followers_percent,
    }
}

/// Selects the posts that contribute to the sums.
///
/// When `sort_before_window` is set, posts are stably sorted newest first
/// with missing timestamps last; the list is then truncated to
/// `window_size`.
#[must_use]
pub fn window_posts<'a>(
    posts: &'a [PostRecord],
    config: &AggregationConfig,
) -> Vec<&'a PostRecord> {
    let mut retained: Vec<&PostRecord> = posts.iter().collect();
    if config.sort_before_window {
        retained.sort_by(|a, b| newest_first(a, b));
    }
    if let Some(limit) = config.window_size {
        retained.truncate(limit);
    }
    retained
}

fn newest_first(a: &PostRecord, b: &PostRecord) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `total / count`, rounded half-up; 0 when `count` is 0.
fn rounded_average(total: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = count as u128;
    let avg = (u128::from(total) + count / 2) / count;
    u64::try_from(avg).unwrap_or(u64::MAX)
}

/// `0.00`, kept at the same scale as computed rates.
const ZERO_RATE: Decimal = Decimal::from_parts(0, 0, 0, false, 2);

/// `numerator / denominator × 100` rounded half-up to two decimal places;
/// 0.00 when the denominator is 0.
fn rounded_percent(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return ZERO_RATE;
    }
    numerator
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(denominator))
        .map_or(ZERO_RATE, |ratio| {
            let mut rounded =
                ratio.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded
        })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use kolboard_core::AnalysisPreset;

    use super::*;

    fn post(views: u64, likes: u64, comments: u64) -> PostRecord {
        PostRecord {
            views,
            likes,
            comments,
            ..PostRecord::default()
        }
    }

    fn group(posts: Vec<PostRecord>) -> ProfileGroup {
        ProfileGroup {
            posts,
            ..ProfileGroup::new("jane")
        }
    }

    fn config(
        window_size: Option<usize>,
        sort: bool,
        fields: &[InteractionField],
    ) -> AggregationConfig {
        AggregationConfig {
            window_size,
            sort_before_window: sort,
            interaction_fields: fields.to_vec(),
        }
    }

    fn base_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_714_521_600, 0).unwrap()
    }

    fn three_post_fixture() -> ProfileGroup {
        group(vec![post(100, 1, 0), post(200, 2, 1), post(300, 3, 2)])
    }

    #[test]
    fn likes_and_comments_rate() {
        let metrics = aggregate(
            &three_post_fixture(),
            &config(None, false, &[InteractionField::Likes, InteractionField::Comments]),
        );
        assert_eq!(metrics.videos_considered, 3);
        assert_eq!(metrics.total_views, 600);
        assert_eq!(metrics.total_interactions, 9);
        assert_eq!(metrics.avg_views, 200);
        assert_eq!(metrics.engagement_rate_percent, Decimal::new(150, 2));
        assert_eq!(metrics.engagement_rate_percent.to_string(), "1.50");
    }

    #[test]
    fn all_four_interaction_fields_rate() {
        let mut fixture = three_post_fixture();
        for p in &mut fixture.posts {
            p.shares = 1;
            p.collects = 0;
        }
        let metrics = aggregate(&fixture, &config(None, false, &InteractionField::ALL));
        assert_eq!(metrics.total_interactions, 12);
        assert_eq!(metrics.engagement_rate_percent, Decimal::new(200, 2));
    }

    #[test]
    fn duplicate_fields_in_config_are_counted_once() {
        let metrics = aggregate(
            &three_post_fixture(),
            &config(None, false, &[InteractionField::Likes, InteractionField::Likes]),
        );
        assert_eq!(metrics.total_interactions, 6);
    }

    #[test]
    fn sorted_window_keeps_most_recent_posts() {
        // Oldest first in input so the window must reorder.
        let posts = (0..10u64)
            .map(|i| PostRecord {
                created_at: Some(base_time() + Duration::days(i64::try_from(i).unwrap())),
                views: 10 * (i + 1),
                likes: i + 1,
                ..PostRecord::default()
            })
            .collect();
        let metrics = aggregate(
            &group(posts),
            &config(Some(5), true, &[InteractionField::Likes]),
        );
        assert_eq!(metrics.videos_considered, 5);
        // Days 5..=9 -> views 60..=100, likes 6..=10.
        assert_eq!(metrics.total_views, 60 + 70 + 80 + 90 + 100);
        assert_eq!(metrics.total_interactions, 6 + 7 + 8 + 9 + 10);
    }

    #[test]
    fn unsorted_window_keeps_input_order() {
        let posts = (1..=10u64).map(|i| post(i, 0, 0)).collect();
        let metrics = aggregate(&group(posts), &AnalysisPreset::QuickScan.config());
        assert_eq!(metrics.videos_considered, 5);
        assert_eq!(metrics.total_views, 1 + 2 + 3 + 4 + 5);
    }

    #[test]
    fn missing_timestamps_sort_last_and_ties_keep_input_order() {
        let t = base_time();
        let stamped = |id: &str, created_at: Option<DateTime<Utc>>| PostRecord {
            id: Some(id.to_owned()),
            created_at,
            ..PostRecord::default()
        };
        let posts = vec![
            stamped("a", None),
            stamped("b", Some(t)),
            stamped("c", None),
            stamped("d", Some(t)),
            stamped("e", Some(t + Duration::hours(1))),
        ];
        let retained = window_posts(&posts, &config(None, true, &[]));
        let ids: Vec<&str> = retained.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, vec!["e", "b", "d", "a", "c"]);
    }

    #[test]
    fn zero_videos_yield_zero_metrics() {
        for preset in AnalysisPreset::ALL {
            let metrics = aggregate(&group(Vec::new()), &preset.config());
            assert_eq!(metrics.videos_considered, 0);
            assert_eq!(metrics.avg_views, 0);
            assert_eq!(metrics.engagement_rate_percent, Decimal::ZERO);
            assert!(!metrics.has_data());
        }
    }

    #[test]
    fn zero_views_with_interactions_yield_zero_rate() {
        let metrics = aggregate(
            &group(vec![post(0, 5, 5)]),
            &config(None, false, &InteractionField::ALL),
        );
        assert_eq!(metrics.total_interactions, 10);
        assert_eq!(metrics.engagement_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn zero_rates_keep_two_decimal_places() {
        let mut empty = group(Vec::new());
        empty.followers = 5_000;
        let cfg = AnalysisPreset::QuickScan.config();

        let value = serde_json::to_value(aggregate(&empty, &cfg)).unwrap();
        assert_eq!(value["engagement_rate_percent"], "0.00");
        assert_eq!(value["engagement_rate_by_followers_percent"], "0.00");

        let tiny = serde_json::to_value(aggregate(&group(vec![post(1_000_000, 1, 0)]), &cfg))
            .unwrap();
        assert_eq!(tiny["engagement_rate_percent"], "0.00");
    }

    #[test]
    fn aggregation_is_idempotent() {
        let fixture = three_post_fixture();
        let cfg = AnalysisPreset::ProfileAnalysis.config();
        assert_eq!(aggregate(&fixture, &cfg), aggregate(&fixture, &cfg));
    }

    #[test]
    fn average_views_round_half_up() {
        let metrics = aggregate(
            &group(vec![post(1, 0, 0), post(2, 0, 0)]),
            &config(None, false, &[]),
        );
        assert_eq!(metrics.avg_views, 2);
    }

    #[test]
    fn rate_rounds_half_up_to_two_places() {
        // 1 / 8 * 100 = 12.5 exactly; 1 / 1600 * 100 = 0.0625 -> 0.06;
        // 1 / 800 * 100 = 0.125 -> 0.13.
        let one = Decimal::ONE;
        assert_eq!(rounded_percent(one, Decimal::from(8)), Decimal::new(1250, 2));
        assert_eq!(rounded_percent(one, Decimal::from(1600)), Decimal::new(6, 2));
        assert_eq!(rounded_percent(one, Decimal::from(800)), Decimal::new(13, 2));
    }

    #[test]
    fn follower_rate_uses_average_interactions_per_post() {
        let mut fixture = three_post_fixture();
        fixture.followers = 300;
        let metrics = aggregate(
            &fixture,
            &config(None, false, &[InteractionField::Likes, InteractionField::Comments]),
        );
        // (9 / 3) / 300 * 100 = 1.00
        assert_eq!(
            metrics.engagement_rate_by_followers_percent,
            Some(Decimal::new(100, 2))
        );
    }

    #[test]
    fn follower_rate_absent_without_followers_and_zero_without_posts() {
        let metrics = aggregate(&three_post_fixture(), &AnalysisPreset::QuickScan.config());
        assert!(metrics.engagement_rate_by_followers_percent.is_none());

        let mut empty = group(Vec::new());
        empty.followers = 5000;
        let metrics = aggregate(&empty, &AnalysisPreset::QuickScan.config());
        assert_eq!(
            metrics.engagement_rate_by_followers_percent,
            Some(Decimal::ZERO)
        );
    }
}
