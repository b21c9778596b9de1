//! Normalization from raw scraper items to per-username [`ProfileGroup`]s.
//!
//! Counter parsing is delegated to [`crate::lenient`]; this module focuses on
//! deciding which profile an item belongs to and flattening profile-shaped
//! items into post entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kolboard_core::InteractionField;
use serde_json::Value;

use crate::error::PipelineError;
use crate::types::{RawAuthorMeta, RawPost, RawScrapedItem};

/// Unix timestamps above this are treated as milliseconds.
const MILLISECOND_TIMESTAMP_FLOOR: i64 = 100_000_000_000;

/// One post-shaped entry attributed to a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRecord {
    pub id: Option<String>,
    /// `None` when the scraper sent no timestamp or one we could not parse.
    pub created_at: Option<DateTime<Utc>>,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub collects: u64,
}

impl PostRecord {
    #[must_use]
    pub fn from_raw(raw: &RawPost) -> Self {
        Self {
            id: raw.id.clone(),
            created_at: parse_created_at(raw),
            views: raw.play_count.unwrap_or(0),
            likes: raw.digg_count.unwrap_or(0),
            comments: raw.comment_count.unwrap_or(0),
            shares: raw.share_count.unwrap_or(0),
            collects: raw.collect_count.unwrap_or(0),
        }
    }

    #[must_use]
    pub fn interaction(&self, field: InteractionField) -> u64 {
        match field {
            InteractionField::Likes => self.likes,
            InteractionField::Comments => self.comments,
            InteractionField::Shares => self.shares,
            InteractionField::Collects => self.collects,
        }
    }
}

/// All posts and the best-known author metadata for one canonical username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileGroup {
    /// Trimmed, lower-cased username without a leading `@`.
    pub username: String,
    /// Posts in the order the scraper returned them.
    pub posts: Vec<PostRecord>,
    /// Last non-zero follower count seen across the group's items.
    pub followers: u64,
    /// `true` once any item reported the profile as verified.
    pub is_verified: bool,
    pub display_name: String,
    pub avatar_url: String,
    pub bio: String,
}

/// Author fields gathered from one item before folding into a group.
#[derive(Default)]
struct AuthorFields<'a> {
    followers: Option<u64>,
    verified: Option<bool>,
    display_name: Option<&'a str>,
    avatar_url: Option<&'a str>,
    bio: Option<&'a str>,
}

impl<'a> AuthorFields<'a> {
    fn from_meta(meta: &'a RawAuthorMeta) -> Self {
        Self {
            followers: meta.fans,
            verified: meta.verified,
            display_name: meta.nick_name.as_deref(),
            avatar_url: meta.avatar.as_deref(),
            bio: meta.signature.as_deref(),
        }
    }
}

impl ProfileGroup {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Returns `true` when no post was attributed to this profile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn absorb_item(&mut self, item: &RawScrapedItem) {
        let meta = item.author_meta();
        self.note_author(&AuthorFields {
            followers: first_non_zero(&[
                meta.and_then(|m| m.fans),
                item.fans,
                item.stats.as_ref().and_then(|s| s.follower_count),
                item.author.as_ref().and_then(|a| a.fans),
            ]),
            verified: meta.and_then(|m| m.verified).or(item.verified),
            display_name: meta
                .and_then(|m| m.nick_name.as_deref())
                .or(item.nick_name.as_deref()),
            avatar_url: meta
                .and_then(|m| m.avatar.as_deref())
                .or(item.avatar.as_deref()),
            bio: meta
                .and_then(|m| m.signature.as_deref())
                .or(item.signature.as_deref()),
        });

        if let Some(videos) = &item.videos {
            for video in videos {
                if let Some(video_meta) = &video.author_meta {
                    self.note_author(&AuthorFields::from_meta(video_meta));
                }
                self.posts.push(PostRecord::from_raw(video));
            }
        } else if item.post.has_post_fields() {
            self.posts.push(PostRecord::from_raw(&item.post));
        }
    }

    /// Folds author fields in; later non-zero / non-empty values win.
    fn note_author(&mut self, fields: &AuthorFields<'_>) {
        if let Some(followers) = fields.followers.filter(|f| *f > 0) {
            self.followers = followers;
        }
        if fields.verified == Some(true) {
            self.is_verified = true;
        }
        overwrite_if_present(&mut self.display_name, fields.display_name);
        overwrite_if_present(&mut self.avatar_url, fields.avatar_url);
        overwrite_if_present(&mut self.bio, fields.bio);
    }
}

/// Canonical form of a username: trimmed, leading `@` removed, lower-cased.
#[must_use]
pub fn canonical_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_lowercase()
}

/// Resolves the profile an item belongs to.
///
/// Candidates, first non-empty wins: `name`, `uniqueId`, `authorMeta.name`,
/// `author.uniqueId`, and the flattened `"authorMeta.name"` key.
#[must_use]
pub fn resolve_username(item: &RawScrapedItem) -> Option<String> {
    [
        item.name.as_deref(),
        item.unique_id.as_deref(),
        item.author_meta().and_then(|m| m.name.as_deref()),
        item.author.as_ref().and_then(|a| a.unique_id.as_deref()),
        item.flat_author_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(canonical_username)
    .find(|u| !u.is_empty())
}

/// Groups raw items by canonical username.
///
/// Every requested username gets an entry, empty when no item matched.
/// Items for usernames that were not requested are kept as well. Items whose
/// username cannot be resolved are dropped.
pub fn group_items<S: AsRef<str>>(
    items: &[RawScrapedItem],
    requested: &[S],
) -> BTreeMap<String, ProfileGroup> {
    let mut groups: BTreeMap<String, ProfileGroup> = BTreeMap::new();

    for username in requested {
        let key = canonical_username(username.as_ref());
        if !key.is_empty() {
            groups
                .entry(key.clone())
                .or_insert_with(|| ProfileGroup::new(key));
        }
    }

    let mut unattributed = 0usize;
    for item in items {
        let Some(username) = resolve_username(item) else {
            unattributed += 1;
            continue;
        };
        groups
            .entry(username.clone())
            .or_insert_with(|| ProfileGroup::new(username))
            .absorb_item(item);
    }

    if unattributed > 0 {
        tracing::debug!(
            dropped = unattributed,
            "dropped scraped items with no resolvable username"
        );
    }

    groups
}

/// Decodes a scraper dataset document.
///
/// Accepts either a bare JSON array of items or an object with an `items`
/// array (the dataset listing envelope).
///
/// # Errors
///
/// Returns [`PipelineError::Deserialize`] if `json` is not valid JSON and
/// [`PipelineError::UnexpectedShape`] if it holds no item array.
pub fn decode_items(json: &str) -> Result<Vec<RawScrapedItem>, PipelineError> {
    let document: Value =
        serde_json::from_str(json).map_err(|source| PipelineError::Deserialize {
            context: "scraper dataset".to_string(),
            source,
        })?;

    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut envelope) => match envelope.remove("items") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(PipelineError::UnexpectedShape {
                    context: "scraper dataset".to_string(),
                    reason: "object without an `items` array".to_string(),
                })
            }
        },
        _ => {
            return Err(PipelineError::UnexpectedShape {
                context: "scraper dataset".to_string(),
                reason: "expected an array of items".to_string(),
            })
        }
    };

    Ok(decode_entries(entries))
}

/// Decodes dataset entries one by one, skipping (and logging) entries that
/// are not JSON objects.
#[must_use]
pub fn decode_entries(entries: Vec<Value>) -> Vec<RawScrapedItem> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if !entry.is_object() {
                tracing::warn!(index, "skipping non-object dataset entry");
                return None;
            }
            match serde_json::from_value::<RawScrapedItem>(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping undecodable dataset entry");
                    None
                }
            }
        })
        .collect()
}

fn parse_created_at(raw: &RawPost) -> Option<DateTime<Utc>> {
    raw.create_time_iso
        .as_deref()
        .and_then(|iso| DateTime::parse_from_rfc3339(iso.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            raw.create_time.and_then(|ts| {
                if ts >= MILLISECOND_TIMESTAMP_FLOOR {
                    DateTime::from_timestamp_millis(ts)
                } else {
                    DateTime::from_timestamp(ts, 0)
                }
            })
        })
}

fn first_non_zero(candidates: &[Option<u64>]) -> Option<u64> {
    candidates.iter().flatten().copied().find(|v| *v > 0)
}

fn overwrite_if_present(slot: &mut String, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        *slot = v.to_string();
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
