use kolboard_core::ContactInfo;
use kolboard_pipeline::fill_missing_contact;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ContactReport {
    contact: ContactInfo,
    changed: bool,
    complete: bool,
}

fn contact_report(bio: &str, email: String, phone: String) -> ContactReport {
    let mut contact = ContactInfo { email, phone };
    let changed = fill_missing_contact(&mut contact, bio);
    let complete = contact.is_complete();
    ContactReport {
        contact,
        changed,
        complete,
    }
}

/// Backfills the known contact fields from `bio` and prints the result.
pub(crate) fn run_contacts(bio: &str, email: String, phone: String) -> anyhow::Result<()> {
    let report = contact_report(bio, email, phone);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
