//! Raw dataset types emitted by the TikTok scraper actors.
//!
//! ## Observed shapes
//!
//! ### Profile-shaped items
//! Produced when the actor runs with `profileScrapeSections: ["videos"]`.
//! Carry `name` / `uniqueId`, a follower count (`fans`, or
//! `stats.followerCount` on older actor versions) and a nested `videos`
//! array. Nested videos usually omit `authorMeta`; they inherit the profile.
//!
//! ### Post-shaped items
//! One item per video. Counters live at the top level (`playCount`,
//! `diggCount`, `commentCount`, `shareCount`, `collectCount`) and the author
//! is inlined as `authorMeta { name, nickName, fans, verified, avatar,
//! signature }`. Some exports flatten the author into dotted keys such as
//! `"authorMeta.name"`.
//!
//! ### Field hygiene
//! Every field is optional. Counters arrive as numbers or numeric strings
//! and occasionally as garbage; all of it is decoded through
//! [`crate::lenient`] so a bad field becomes `None`, never a decode error.
//! Username case varies between items for the same profile.

use serde::Deserialize;

use crate::lenient::{
    lenient_bool, lenient_count, lenient_list, lenient_object, lenient_string, lenient_timestamp,
};

/// Inline author metadata attached to a post.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAuthorMeta {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Display name, e.g. `"Jane ✨"`.
    #[serde(rename = "nickName", deserialize_with = "lenient_string")]
    pub nick_name: Option<String>,

    /// Follower count.
    #[serde(deserialize_with = "lenient_count")]
    pub fans: Option<u64>,

    #[serde(deserialize_with = "lenient_bool")]
    pub verified: Option<bool>,

    /// Avatar image URL.
    #[serde(deserialize_with = "lenient_string")]
    pub avatar: Option<String>,

    /// Profile biography, the only place contact details appear.
    #[serde(deserialize_with = "lenient_string")]
    pub signature: Option<String>,
}

/// Minimal author reference used by some actor versions instead of
/// `authorMeta`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAuthorRef {
    #[serde(rename = "uniqueId", deserialize_with = "lenient_string")]
    pub unique_id: Option<String>,

    #[serde(deserialize_with = "lenient_count")]
    pub fans: Option<u64>,
}

/// Profile statistics block on profile-shaped items.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProfileStats {
    #[serde(rename = "followerCount", deserialize_with = "lenient_count")]
    pub follower_count: Option<u64>,
}

/// A single post (video) with its engagement counters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    /// Numeric video id; kept as a string to avoid precision loss.
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub text: Option<String>,

    /// RFC 3339 creation time, e.g. `"2024-05-01T10:00:00.000Z"`.
    #[serde(rename = "createTimeISO", deserialize_with = "lenient_string")]
    pub create_time_iso: Option<String>,

    /// Unix creation time in seconds. Used when `createTimeISO` is absent.
    #[serde(rename = "createTime", deserialize_with = "lenient_timestamp")]
    pub create_time: Option<i64>,

    /// Views.
    #[serde(rename = "playCount", deserialize_with = "lenient_count")]
    pub play_count: Option<u64>,

    /// Likes.
    #[serde(rename = "diggCount", deserialize_with = "lenient_count")]
    pub digg_count: Option<u64>,

    #[serde(rename = "commentCount", deserialize_with = "lenient_count")]
    pub comment_count: Option<u64>,

    #[serde(rename = "shareCount", deserialize_with = "lenient_count")]
    pub share_count: Option<u64>,

    /// Saves / favourites.
    #[serde(rename = "collectCount", deserialize_with = "lenient_count")]
    pub collect_count: Option<u64>,

    #[serde(rename = "authorMeta", deserialize_with = "lenient_object")]
    pub author_meta: Option<RawAuthorMeta>,
}

impl RawPost {
    /// Returns `true` if the record carries any post-level data. Items with
    /// only profile metadata are not posts.
    #[must_use]
    pub fn has_post_fields(&self) -> bool {
        self.play_count.is_some()
            || self.digg_count.is_some()
            || self.comment_count.is_some()
            || self.share_count.is_some()
            || self.collect_count.is_some()
            || self.create_time_iso.is_some()
            || self.create_time.is_some()
    }
}

/// One entry of a scraper dataset: profile-shaped or post-shaped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawScrapedItem {
    /// Profile handle on profile-shaped items.
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(rename = "uniqueId", deserialize_with = "lenient_string")]
    pub unique_id: Option<String>,

    #[serde(rename = "nickName", deserialize_with = "lenient_string")]
    pub nick_name: Option<String>,

    #[serde(deserialize_with = "lenient_count")]
    pub fans: Option<u64>,

    #[serde(deserialize_with = "lenient_bool")]
    pub verified: Option<bool>,

    #[serde(deserialize_with = "lenient_string")]
    pub avatar: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub signature: Option<String>,

    #[serde(deserialize_with = "lenient_object")]
    pub stats: Option<RawProfileStats>,

    #[serde(deserialize_with = "lenient_object")]
    pub author: Option<RawAuthorRef>,

    /// Flattened-export variant of `authorMeta.name`.
    #[serde(rename = "authorMeta.name", deserialize_with = "lenient_string")]
    pub flat_author_name: Option<String>,

    /// Nested posts on profile-shaped items.
    #[serde(deserialize_with = "lenient_list")]
    pub videos: Option<Vec<RawPost>>,

    /// Post fields when the item itself is post-shaped.
    #[serde(flatten)]
    pub post: RawPost,
}

impl RawScrapedItem {
    /// Returns `true` if the item exposes a nested post collection.
    #[must_use]
    pub fn is_profile_shaped(&self) -> bool {
        self.videos.is_some()
    }

    /// Inline author metadata, if any.
    #[must_use]
    pub fn author_meta(&self) -> Option<&RawAuthorMeta> {
        self.post.author_meta.as_ref()
    }
}
