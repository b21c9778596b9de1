pub mod contact;
pub mod error;
mod lenient;
pub mod merge;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod tier;
pub mod types;

pub use contact::{
    extract_contact, extract_email, extract_phone, fill_missing_contact, normalize_phone,
};
pub use error::PipelineError;
pub use merge::{
    find_store_duplicates, reconcile, DuplicateMode, DuplicateSource, ExistingProfile,
    MergeDecision, MergePlan, MergeScope, MergeSummary, PlannedMerge,
};
pub use metrics::{aggregate, window_posts};
pub use normalize::{
    canonical_username, decode_entries, decode_items, group_items, resolve_username, PostRecord,
    ProfileGroup,
};
pub use pipeline::{analyze, build_record, into_requested_order, PipelineOptions};
pub use tier::{classify_tier, resolve_tier, tier_floor};
pub use types::RawScrapedItem;
