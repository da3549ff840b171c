//! Sample bills and payloads for tests and local development.

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use super::{BillId, BillRecord, SourceHash};

/// Builds a bill record with fixed content and the given id and hash.
///
/// # Panics
///
/// Panics if `id` is not a valid [`BillId`].
pub fn sample_bill(id: &str, hash: &str) -> BillRecord {
    BillRecord {
        id: BillId::parse(id).expect("sample bill id must be valid"),
        identifier: "AB 123".to_string(),
        title: "An act relating to housing".to_string(),
        jurisdiction: "California".to_string(),
        session: "20252026".to_string(),
        chamber: "Assembly".to_string(),
        status: "Referred to Com. on HOUSING.".to_string(),
        first_action_date: Some("2025-01-10".to_string()),
        latest_action_date: Some("2025-02-01".to_string()),
        sponsors: vec![],
        votes: None,
        abstract_text: None,
        source_url: None,
        fetched_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        source_hash: SourceHash::from_hex(hash),
    }
}

/// Builds an OpenStates-shaped bill payload whose content varies with `status`.
pub fn sample_payload(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "identifier": "AB 123",
        "title": "An act relating to housing",
        "session": "20252026",
        "jurisdiction": { "id": "ocd-jurisdiction/country:us/state:ca/government", "name": "California" },
        "from_organization": { "name": "Assembly" },
        "first_action_date": "2025-01-10",
        "latest_action_date": "2025-02-01",
        "actions": [
            { "date": "2025-01-10", "description": "Introduced. Read first time." },
            { "date": "2025-02-01", "description": status }
        ],
        "sponsorships": [
            { "name": "Wicks", "primary": true, "person": { "name": "Buffy Wicks", "party": "Democratic" } }
        ],
        "abstracts": [
            { "abstract": "Existing law requires cities to plan for housing." }
        ],
        "sources": [
            { "url": "https://leginfo.legislature.ca.gov/" }
        ]
    })
}
