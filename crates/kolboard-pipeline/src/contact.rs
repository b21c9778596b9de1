//! Email and phone extraction from profile biographies.
//!
//! Phone numbers are Indonesian mobile numbers (`08…`, `628…`, `+628…`).
//! Two strategies run in order:
//!
//! 1. Strip everything except ASCII alphanumerics and `+`, then look for an
//!    unbroken number. Catches numbers wedged into prose or split by emoji.
//! 2. Look for a conventionally grouped number (`0812-3456-7890`,
//!    `0812 345 67`) in the untouched text. Only runs if 1 found nothing.
//!
//! Every match is normalized to digits with the `62` country code.

use std::sync::LazyLock;

use kolboard_core::ContactInfo;
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static STRICT_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?62|0)8[0-9]{8,12}").expect("valid strict phone regex")
});

static LOOSE_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?62|0)\s?8[0-9]{2,4}[-.\s]?[0-9]{2,4}[-.\s]?[0-9]{2,5}\b")
        .expect("valid loose phone regex")
});

/// Extracts both contact fields from a biography.
#[must_use]
pub fn extract_contact(bio: &str) -> ContactInfo {
    ContactInfo {
        email: extract_email(bio).unwrap_or_default(),
        phone: extract_phone(bio).unwrap_or_default(),
    }
}

/// First email address in `text`, lower-cased.
#[must_use]
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_lowercase())
}

/// First phone number in `text`, normalized by [`normalize_phone`].
#[must_use]
pub fn extract_phone(text: &str) -> Option<String> {
    let compacted: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '+')
        .collect();

    STRICT_PHONE_RE
        .find(&compacted)
        .or_else(|| LOOSE_PHONE_RE.find(text))
        .map(|m| normalize_phone(m.as_str()))
}

/// Reduces a matched number to digits with the country code.
///
/// A leading `0` becomes `62`; a leading `+` is dropped; numbers already
/// starting with `62` pass through unchanged.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('0') {
        Some(local) => format!("62{local}"),
        None => digits,
    }
}

/// Fills empty fields of `contact` from `bio`, leaving known values alone.
///
/// Returns `true` if any field changed.
pub fn fill_missing_contact(contact: &mut ContactInfo, bio: &str) -> bool {
    let mut changed = false;
    if contact.email.is_empty() {
        if let Some(email) = extract_email(bio) {
            contact.email = email;
            changed = true;
        }
    }
    if contact.phone.is_empty() {
        if let Some(phone) = extract_phone(bio) {
            contact.phone = phone;
            changed = true;
        }
    }
    changed
}
