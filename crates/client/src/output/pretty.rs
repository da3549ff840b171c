//! Pretty output formatting.

use billwatch_core::bill::{BillView, SummaryRecord};
use billwatch_core::cache::InvalidationReport;
use billwatch_core::sync::CacheStats;

use crate::client::health::Health;

/// Format a bill lookup for display.
pub fn format_bill_view(view: &BillView) -> String {
    let bill = &view.bill;
    let mut output = format!(
        "{} - {}\n  ID: {}\n  Session: {} ({})\n  Status: {}",
        bill.identifier, bill.title, bill.id, bill.session, bill.chamber, bill.status
    );
    if let Some(date) = &bill.latest_action_date {
        output.push_str(&format!("\n  Last action: {}", date));
    }
    if !bill.sponsors.is_empty() {
        let names: Vec<&str> = bill.sponsors.iter().map(|s| s.name.as_str()).collect();
        output.push_str(&format!("\n  Sponsors: {}", names.join(", ")));
    }
    if let Some(votes) = &bill.votes {
        output.push_str(&format!(
            "\n  Votes: {} yes / {} no / {} other",
            votes.yes, votes.no, votes.other
        ));
    }
    output.push_str(&format!("\n  Fetched: {}", bill.fetched_at));
    if view.stale {
        output.push_str(" (stale, upstream unavailable)");
    }

    if let Some(summary) = &view.summary {
        output.push_str(&format!("\n\n{}", format_summary(summary)));
    } else if view.summary_unavailable {
        output.push_str("\n\nSummary unavailable.");
    }
    output
}

fn format_summary(summary: &SummaryRecord) -> String {
    let mut output = format!("SUMMARY ({})\n{}", summary.model, summary.text);
    if !summary.key_provisions.is_empty() {
        output.push_str("\n\nKey provisions:");
        for provision in &summary.key_provisions {
            output.push_str(&format!("\n  - {}", provision));
        }
    }
    output.push_str(&format!("\n\nImpact: {}", summary.impact));
    output
}

/// Format cache statistics for display.
pub fn format_stats(stats: &CacheStats) -> String {
    let oldest = stats
        .oldest_entry_age_seconds
        .map(|secs| format!("{}s", secs))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "CACHE\n  Bills: {} ({} fresh, {} stale)\n  Summaries: {}\n  Oldest entry: {}\n  \
         In flight: {} bills, {} summaries\n  Not found: {}",
        stats.bill_entries,
        stats.fresh_bills,
        stats.stale_bills,
        stats.summary_entries,
        oldest,
        stats.in_flight_bill_fetches,
        stats.in_flight_summary_fetches,
        stats.not_found_entries
    )
}

/// Format an invalidation report for display.
pub fn format_report(report: &InvalidationReport) -> String {
    format!(
        "Invalidated:\n  Bills: {}\n  Summaries: {}\n  Not-found entries: {}",
        report.bills_removed, report.summaries_removed, report.not_found_cleared
    )
}

pub fn format_health(health: &Health) -> String {
    format!(
        "Health: {}\n  Bills cached: {}\n  Summaries cached: {}\n  In-flight fetches: {}",
        health.status, health.bill_entries, health.summary_entries, health.in_flight_fetches
    )
}
