use std::fmt::Write;

use crate::TOOL_NAME;
use crate::report::model::Report;

const RULER: &str = "--------------------------------------------------";

/// Render the classic console form: one START/END pair per rule, base
/// outcomes indented underneath alias rules, counters at the end.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} on {} [{}] ({} PEs)",
        TOOL_NAME,
        report.tool.version,
        report.platform.name,
        report.platform.kind,
        report.platform.pe_count
    );
    let _ = writeln!(
        out,
        "Architectures: {}  Level: {}",
        report.selections.architectures.join(","),
        report.selections.level
    );
    out.push('\n');

    for result in &report.results {
        let _ = writeln!(out, "START {} {} : {}", result.module, result.rule, result.summary);
        for base in &result.bases {
            let _ = writeln!(out, "    {} : {}", base.rule, base.status.console_label());
        }
        let label = match result.status {
            Some(status) => status.console_label(),
            None => "NO STATUS",
        };
        let _ = writeln!(out, "END {} : {}", result.rule, label);
    }

    out.push('\n');
    let s = &report.summary;
    let _ = writeln!(out, "{RULER}");
    let _ = writeln!(out, "Total rules      : {}", s.total);
    let _ = writeln!(out, "Passed           : {}", s.passed);
    let _ = writeln!(out, "Passed (partial) : {}", s.passed_partial);
    let _ = writeln!(out, "Warnings         : {}", s.warnings);
    let _ = writeln!(out, "Skipped          : {}", s.skipped);
    let _ = writeln!(out, "Failed           : {}", s.failed);
    let _ = writeln!(out, "Not supported    : {}", s.not_supported);
    let _ = writeln!(out, "Not implemented  : {}", s.not_implemented);
    let _ = writeln!(out, "{RULER}");

    if !report.defects.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Catalog defects:");
        for defect in &report.defects {
            let _ = writeln!(out, "  - {defect}");
        }
    }

    out
}
