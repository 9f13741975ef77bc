/*!
 * Reporting functionality for pagedump
 *
 * Renders a summary of an export run as console tables using the tabled
 * library.
 */

use std::time::Duration;

use chrono::{DateTime, Local};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::exporter::PageDocument;

/// How a single input ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// A document was produced
    Exported,
    /// Nothing was extracted
    Empty,
    /// The export failed
    Failed(String),
}

/// Information about one exported input
#[derive(Debug, Clone)]
pub struct PageReportInfo {
    /// Where the snapshot came from
    pub source: String,
    /// Outcome of the export
    pub outcome: PageOutcome,
    /// Characters of normalized content
    pub chars: usize,
    /// Lines of normalized content
    pub lines: usize,
    /// Nodes entered by the traversal
    pub nodes_visited: usize,
    /// Invisible subtrees skipped
    pub subtrees_excluded: usize,
    /// Nodes whose own text was emitted
    pub nodes_extracted: usize,
    /// Nodes visited only for their children
    pub nodes_passed_through: usize,
}

impl PageReportInfo {
    /// Report entry for a produced document
    pub fn exported(source: impl Into<String>, doc: &PageDocument) -> Self {
        Self {
            source: source.into(),
            outcome: PageOutcome::Exported,
            chars: doc.content.chars().count(),
            lines: doc.content.lines().count(),
            nodes_visited: doc.stats.nodes_visited,
            subtrees_excluded: doc.stats.subtrees_excluded,
            nodes_extracted: doc.stats.nodes_extracted,
            nodes_passed_through: doc.stats.nodes_passed_through,
        }
    }

    /// Report entry for an input that produced no document
    pub fn skipped(source: impl Into<String>, outcome: PageOutcome) -> Self {
        Self {
            source: source.into(),
            outcome,
            chars: 0,
            lines: 0,
            nodes_visited: 0,
            subtrees_excluded: 0,
            nodes_extracted: 0,
            nodes_passed_through: 0,
        }
    }
}

/// Statistics for an export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Where documents were written
    pub destination: String,
    /// Time taken for the whole run
    pub duration: Duration,
    /// How long each snapshot delivery may take
    pub timeout: Duration,
    /// When the run finished
    pub finished_at: DateTime<Local>,
    /// One entry per input, in input order
    pub pages: Vec<PageReportInfo>,
}

impl ExportReport {
    /// Number of inputs with the given outcome kind
    fn count(&self, pred: impl Fn(&PageOutcome) -> bool) -> usize {
        self.pages.iter().filter(|p| pred(&p.outcome)).count()
    }

    /// Total characters exported
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.chars).sum()
    }
}

/// Format a number with human-readable units
fn format_number(num: usize) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Shorten long sources, keeping the tail
fn truncate_source(source: &str, max_len: usize) -> String {
    let count = source.chars().count();
    if count <= max_len {
        return source.to_string();
    }
    let tail: String = source.chars().skip(count - (max_len - 3)).collect();
    format!("...{}", tail)
}

/// Render the summary table
fn summary_table(report: &ExportReport) -> String {
    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Metric")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let total_chars = report.total_chars();
    let rows = vec![
        SummaryRow {
            key: "📂 Destination".to_string(),
            value: report.destination.clone(),
        },
        SummaryRow {
            key: "⏱️ Process Time".to_string(),
            value: format!("{:.4?}", report.duration),
        },
        SummaryRow {
            key: "⌛ Snapshot Timeout".to_string(),
            value: format!("{:?}", report.timeout),
        },
        SummaryRow {
            key: "🕒 Finished At".to_string(),
            value: report.finished_at.to_rfc3339(),
        },
        SummaryRow {
            key: "📄 Pages Exported".to_string(),
            value: format_number(report.count(|o| *o == PageOutcome::Exported)),
        },
        SummaryRow {
            key: "🫙 Pages Empty".to_string(),
            value: format_number(report.count(|o| *o == PageOutcome::Empty)),
        },
        SummaryRow {
            key: "❌ Pages Failed".to_string(),
            value: format_number(report.count(|o| matches!(o, PageOutcome::Failed(_)))),
        },
        SummaryRow {
            key: "📦 LLM Tokens".to_string(),
            value: format!("{} tokens (estimated)", format_number(total_chars / 4)),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}

/// Render the per-page table
fn pages_table(report: &ExportReport) -> String {
    #[derive(Tabled)]
    struct PageRow {
        #[tabled(rename = "Source")]
        source: String,
        #[tabled(rename = "Result")]
        outcome: String,
        #[tabled(rename = "Lines")]
        lines: String,
        #[tabled(rename = "Est. Tokens")]
        tokens: String,
        #[tabled(rename = "Nodes")]
        nodes: String,
        #[tabled(rename = "Extracted")]
        extracted: String,
        #[tabled(rename = "Passed")]
        passed: String,
        #[tabled(rename = "Hidden")]
        hidden: String,
    }

    let rows: Vec<PageRow> = report
        .pages
        .iter()
        .map(|page| PageRow {
            source: truncate_source(&page.source, 48),
            outcome: match &page.outcome {
                PageOutcome::Exported => "exported".to_string(),
                PageOutcome::Empty => "empty".to_string(),
                PageOutcome::Failed(reason) => format!("failed: {}", reason),
            },
            lines: format_number(page.lines),
            tokens: format_number(page.chars / 4),
            nodes: format_number(page.nodes_visited),
            extracted: format_number(page.nodes_extracted),
            passed: format_number(page.nodes_passed_through),
            hidden: format_number(page.subtrees_excluded),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}

/// Render the full console report
pub fn render_report(report: &ExportReport) -> String {
    format!(
        "📋  PAGES\n{}\n\n✅  EXPORT COMPLETE\n{}",
        pages_table(report),
        summary_table(report)
    )
}
