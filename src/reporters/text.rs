//! Text (terminal) reporter with colors and formatting

use super::ViolationReport;
use anyhow::Result;
use console::style;

/// Render report as formatted terminal output
pub fn render(report: &ViolationReport, verbose: bool) -> Result<String> {
    let mut out = String::new();

    if report.is_clean() {
        out.push_str(&format!(
            "{} No dependency scope violations in {}\n",
            style("✓").green(),
            report.root
        ));
        return Ok(out);
    }

    let noun = if report.violation_count == 1 {
        "violation"
    } else {
        "violations"
    };
    out.push_str(&format!(
        "\n{} {} dependency scope {} in {}\n",
        style("✗").red(),
        style(report.violation_count).bold(),
        noun,
        report.root
    ));

    for group in &report.groups {
        out.push_str(&format!(
            "\n  {} is {} in this build but required at runtime by:\n",
            style(&group.target).bold(),
            style(format!("{}-scoped", group.actual_scope)).yellow()
        ));
        for entry in &group.entries {
            if entry.source == entry.introduced_by {
                out.push_str(&format!(
                    "    - {} ({})\n",
                    style(&entry.source).cyan(),
                    entry.declared_scope
                ));
            } else {
                out.push_str(&format!(
                    "    - {} ({}, via {})\n",
                    style(&entry.source).cyan(),
                    entry.declared_scope,
                    entry.introduced_by
                ));
            }
            if verbose {
                out.push_str(&format!(
                    "        {}\n",
                    style(entry.path.join(" -> ")).dim()
                ));
            }
        }
    }

    out.push_str(
        "\nDeclare these artifacts with compile or runtime scope, or exclude them explicitly.\n",
    );
    if let Some(ref url) = report.documentation_url {
        out.push_str(&format!("See {} for details.\n", style(url).underlined()));
    }

    Ok(out)
}
