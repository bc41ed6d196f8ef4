//! JSON reporter
//!
//! Outputs the full ViolationReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use super::ViolationReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &ViolationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["violation_count"], 3);
        assert_eq!(parsed["root"], "com.acme:app:jar:1.0");
        let groups = parsed["groups"].as_array().expect("groups array");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1]["actual_scope"], "test");
        assert_eq!(groups[1]["entries"][0]["declared_scope"], "compile");
        assert!(parsed.get("documentation_url").is_none());
    }

    #[test]
    fn test_json_includes_documentation_url() {
        let report = test_report().with_documentation_url(Some("https://docs.example.org/scope".into()));
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["documentation_url"], "https://docs.example.org/scope");
    }
}
