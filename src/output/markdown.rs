//! Markdown report generation
//!
//! Produces a run header followed by one table row per partner page found.

use crate::output::OutputResult;
use crate::storage::RunRecord;
use crate::traversal::ResultRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A run together with the records it produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub run: RunRecord,
    pub records: Vec<ResultRecord>,
}

/// Writes the markdown report to `output_path`
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();
    let run = &report.run;

    md.push_str("# Partner Programs Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", run.id));
    md.push_str(&format!("- **Started**: {}\n", run.started_at));
    if let Some(finished) = &run.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    md.push_str(&format!("- **Status**: {}\n", run.status.to_db_string()));
    md.push_str(&format!("- **Config Hash**: {}\n", run.config_hash));
    md.push_str(&format!(
        "- **Partner Pages Found**: {}\n\n",
        report.records.len()
    ));

    md.push_str("## Partner Pages\n\n");
    if report.records.is_empty() {
        md.push_str("_No partner pages were found._\n");
        return md;
    }

    md.push_str("| Source | Partner Page | Emails | Contact Form |\n");
    md.push_str("|--------|--------------|--------|--------------|\n");
    for record in &report.records {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(record.source_url.as_str()),
            escape_cell(record.partner_page_url.as_str()),
            escape_cell(&record.emails_display()),
            record.contact_form_display()
        ));
    }

    md
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
