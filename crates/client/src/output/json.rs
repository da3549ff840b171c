//! JSON output formatting.

/// Format a value as compact JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use billwatch_core::cache::InvalidationReport;

    #[test]
    fn test_format_report_json() {
        let report = InvalidationReport {
            bills_removed: 2,
            ..InvalidationReport::default()
        };

        assert_eq!(
            format_json(&report),
            r#"{"bills_removed":2,"summaries_removed":0,"not_found_cleared":0}"#
        );
    }
}
