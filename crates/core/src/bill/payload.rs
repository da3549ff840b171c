//! Pure mapping from OpenStates bill payloads to [`BillRecord`].

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{source_hash, BillId, BillRecord, PayloadError, Sponsor, VoteTally};

/// Status reported for bills without any recorded action.
const NO_ACTIONS: &str = "No actions";

/// Parses a raw upstream payload into a bill record stamped with `fetched_at`.
///
/// The source hash is computed over the whole payload. Fields the payload does
/// not carry default to empty values.
///
/// # Examples
///
/// ```
/// use billwatch_core::bill::{parse_bill_payload, BillId};
/// use chrono::Utc;
/// use serde_json::json;
///
/// let id = BillId::parse("AB-1").unwrap();
/// let payload = json!({
///     "title": "An act to add Section 1",
///     "actions": [
///         {"date": "2025-01-02", "description": "Introduced"},
///         {"date": "2025-03-04", "description": "Passed Assembly"}
///     ]
/// });
///
/// let bill = parse_bill_payload(&id, &payload, Utc::now()).unwrap();
/// assert_eq!(bill.status, "Passed Assembly");
/// ```
pub fn parse_bill_payload(
    id: &BillId,
    payload: &Value,
    fetched_at: DateTime<Utc>,
) -> Result<BillRecord, PayloadError> {
    if !payload.is_object() {
        return Err(PayloadError::NotAnObject);
    }

    Ok(BillRecord {
        id: id.clone(),
        identifier: str_at(payload, &["identifier"]).unwrap_or_default(),
        title: str_at(payload, &["title"]).unwrap_or_default(),
        jurisdiction: str_at(payload, &["jurisdiction", "name"]).unwrap_or_default(),
        session: str_at(payload, &["session"]).unwrap_or_default(),
        chamber: str_at(payload, &["from_organization", "name"]).unwrap_or_default(),
        status: latest_action(payload).unwrap_or_else(|| NO_ACTIONS.to_string()),
        first_action_date: str_at(payload, &["first_action_date"]).filter(|s| !s.is_empty()),
        latest_action_date: str_at(payload, &["latest_action_date"]).filter(|s| !s.is_empty()),
        sponsors: sponsors(payload),
        votes: latest_vote(payload),
        abstract_text: first_in(payload, "abstracts", "abstract"),
        source_url: first_in(payload, "sources", "url"),
        fetched_at,
        source_hash: source_hash(payload),
    })
}

fn str_at(value: &Value, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn first_in(payload: &Value, list: &str, field: &str) -> Option<String> {
    array(payload, list)
        .iter()
        .find_map(|item| str_at(item, &[field]))
        .filter(|s| !s.trim().is_empty())
}

/// Description of the latest-dated action. Dates are ISO strings, so
/// lexicographic order is chronological.
fn latest_action(payload: &Value) -> Option<String> {
    array(payload, "actions")
        .iter()
        .max_by(|a, b| {
            let a = a.get("date").and_then(Value::as_str).unwrap_or("");
            let b = b.get("date").and_then(Value::as_str).unwrap_or("");
            a.cmp(b)
        })
        .map(|action| str_at(action, &["description"]).unwrap_or_else(|| "Unknown action".into()))
}

fn sponsors(payload: &Value) -> Vec<Sponsor> {
    array(payload, "sponsorships")
        .iter()
        .filter_map(|s| {
            let name = str_at(s, &["person", "name"]).or_else(|| str_at(s, &["name"]))?;
            Some(Sponsor {
                name,
                party: party(s),
                primary: s.get("primary").and_then(Value::as_bool).unwrap_or(false),
            })
        })
        .collect()
}

/// Party appears either as a plain string or as a list of `{name}` objects.
fn party(sponsorship: &Value) -> Option<String> {
    let party = sponsorship.get("person")?.get("party")?;
    match party {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(|p| str_at(p, &["name"])),
        _ => None,
    }
}

fn latest_vote(payload: &Value) -> Option<VoteTally> {
    let vote = array(payload, "votes").iter().max_by(|a, b| {
        let a = a.get("start_date").and_then(Value::as_str).unwrap_or("");
        let b = b.get("start_date").and_then(Value::as_str).unwrap_or("");
        a.cmp(b)
    })?;

    let mut tally = VoteTally {
        motion: str_at(vote, &["motion_text"]),
        date: str_at(vote, &["start_date"]),
        ..VoteTally::default()
    };

    for count in array(vote, "counts") {
        let value = count
            .get("value")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        match count.get("option").and_then(Value::as_str) {
            Some("yes") => tally.yes += value,
            Some("no") => tally.no += value,
            _ => tally.other += value,
        }
    }

    Some(tally)
}
