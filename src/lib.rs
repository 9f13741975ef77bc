/*!
 * pagedump - Turn accessibility snapshots of rendered pages into text documents
 *
 * This library walks an accessibility tree snapshot, keeps the visible text,
 * separates block content into paragraphs and wraps the result in a page
 * banner suitable for pasting into LLM prompts.
 */

pub mod clipboard;
pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod filter;
pub mod index;
pub mod normalize;
pub mod provider;
pub mod report;
pub mod types;
pub mod writer;


// Re-export main components for easier access
pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use config::Config;
pub use error::{PageDumpError, Result};
pub use exporter::{export_snapshot, PageDocument, PageExporter};
pub use extractor::{extract_text, Extraction, ExtractionStats, TextExtractor};
pub use filter::Visibility;
pub use index::NodeIndex;
pub use normalize::collapse_spaces;
pub use provider::{FileSnapshotProvider, SnapshotProvider, SnapshotSource};
pub use report::{ExportReport, PageOutcome, PageReportInfo};
pub use types::{AccessibilityNode, CapturedPage, NodeId, Role, Snapshot};
pub use writer::{format_page, PageWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
