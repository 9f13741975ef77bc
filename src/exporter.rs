/*!
 * End-to-end page export
 *
 * snapshot -> NodeIndex -> TextExtractor -> collapse_spaces -> format_page.
 * Any pipeline error aborts the export; no partial document is produced.
 */

use std::time::Duration;

use log::{debug, info};

use crate::clipboard::ClipboardSink;
use crate::error::{PageDumpError, Result};
use crate::extractor::{extract_text, ExtractionStats};
use crate::index::NodeIndex;
use crate::normalize::collapse_spaces;
use crate::provider::{SnapshotProvider, DEFAULT_TIMEOUT};
use crate::types::{CapturedPage, Snapshot};
use crate::writer::format_page;

/// A finished page document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDocument {
    /// Title inserted into the banner
    pub title: String,
    /// Locator inserted into the banner
    pub url: String,
    /// Normalized page text
    pub content: String,
    /// The complete formatted document
    pub document: String,
    /// Traversal counters
    pub stats: ExtractionStats,
}

/// Extract, normalize and format one snapshot
///
/// Returns [`PageDumpError::EmptyResult`] when the page has no text beyond
/// whitespace; callers treat that as nothing to do.
pub fn export_snapshot(snapshot: &Snapshot, title: &str, url: &str) -> Result<PageDocument> {
    let index = NodeIndex::build(snapshot)?;
    let extraction = extract_text(&index)?;

    if extraction.text.trim().is_empty() {
        debug!("Snapshot produced no text");
        return Err(PageDumpError::EmptyResult);
    }

    let content = collapse_spaces(&extraction.text);
    let document = format_page(&content, title, url);

    Ok(PageDocument {
        title: title.to_string(),
        url: url.to_string(),
        content,
        document,
        stats: extraction.stats,
    })
}

/// Requests snapshots from a provider and turns them into documents
#[derive(Debug, Clone)]
pub struct PageExporter {
    timeout: Duration,
    title: Option<String>,
    url: Option<String>,
}

impl Default for PageExporter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl PageExporter {
    /// Create an exporter with a snapshot timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            title: None,
            url: None,
        }
    }

    /// Use this title instead of the one delivered with the snapshot
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Use this locator instead of the one delivered with the snapshot
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The snapshot timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Request a snapshot and export it
    pub fn export<P: SnapshotProvider + ?Sized>(&self, provider: &P) -> Result<PageDocument> {
        let page = provider.request_snapshot(self.timeout)?;
        self.export_page(&page)
    }

    /// Export an already delivered page
    pub fn export_page(&self, page: &CapturedPage) -> Result<PageDocument> {
        let title = self.title.as_deref().or(page.title.as_deref()).unwrap_or("");
        let url = self.url.as_deref().or(page.url.as_deref()).unwrap_or("");
        export_snapshot(&page.snapshot, title, url)
    }

    /// Export a page and hand the document to a clipboard sink
    ///
    /// `Ok(None)` means nothing was extracted: the sink is not touched and
    /// no notification is due.
    pub fn copy_to_clipboard<P, C>(&self, provider: &P, sink: &C) -> Result<Option<PageDocument>>
    where
        P: SnapshotProvider + ?Sized,
        C: ClipboardSink + ?Sized,
    {
        match self.export(provider) {
            Ok(doc) => {
                sink.write_text(&doc.document)?;
                info!("Copied page \"{}\" ({} chars)", doc.title, doc.content.len());
                Ok(Some(doc))
            }
            Err(e) if e.is_noop() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::provider::ProviderError;
    use crate::types::{AccessibilityNode, Role};
    use pretty_assertions::assert_eq;

    struct TimesOut;

    impl SnapshotProvider for TimesOut {
        fn request_snapshot(&self, timeout: Duration) -> std::result::Result<CapturedPage, ProviderError> {
            Err(ProviderError::Timeout(timeout))
        }
    }

    fn hello_page() -> CapturedPage {
        CapturedPage {
            title: Some("Example".to_string()),
            url: Some("https://example.test/".to_string()),
            snapshot: Snapshot::new(
                1,
                vec![
                    AccessibilityNode::new(1, Role::GenericContainer).with_children([2]),
                    AccessibilityNode::new(2, Role::StaticText).with_name("Hello"),
                ],
            ),
        }
    }

    #[test]
    fn test_export_uses_delivered_metadata() {
        let doc = PageExporter::default().export(&hello_page()).unwrap();
        assert_eq!(doc.title, "Example");
        assert_eq!(doc.url, "https://example.test/");
        assert_eq!(doc.content, "Hello ");
        assert!(doc.document.starts_with("----------- WEB PAGE -----------\n\nTITLE: Example\n\n"));
    }

    #[test]
    fn test_overrides_win() {
        let doc = PageExporter::default()
            .with_title("Other")
            .with_url("file:///tmp/page")
            .export(&hello_page())
            .unwrap();
        assert!(doc.document.contains("TITLE: Other\n\nURL: file:///tmp/page\n\n"));
    }

    #[test]
    fn test_missing_metadata_is_empty() {
        let mut page = hello_page();
        page.title = None;
        page.url = None;
        let doc = PageExporter::default().export_page(&page).unwrap();
        assert!(doc.document.contains("TITLE: \n\nURL: \n\n"));
    }

    #[test]
    fn test_content_is_normalized() {
        let snapshot = Snapshot::new(
            1,
            vec![AccessibilityNode::new(1, Role::Paragraph).with_name("A    B")],
        );
        let doc = export_snapshot(&snapshot, "t", "u").unwrap();
        assert_eq!(doc.content, "A B \n\n");
    }

    #[test]
    fn test_whitespace_only_is_empty_result() {
        let snapshot = Snapshot::new(
            1,
            vec![AccessibilityNode::new(1, Role::Paragraph).with_name("   ")],
        );
        assert!(matches!(
            export_snapshot(&snapshot, "t", "u"),
            Err(PageDumpError::EmptyResult)
        ));
    }

    #[test]
    fn test_copy_writes_document() {
        let clipboard = MemoryClipboard::new();
        let doc = PageExporter::default()
            .copy_to_clipboard(&hello_page(), &clipboard)
            .unwrap()
            .unwrap();
        assert_eq!(clipboard.contents(), Some(doc.document));
    }

    #[test]
    fn test_copy_of_empty_page_is_silent() {
        let mut page = hello_page();
        page.snapshot.nodes[1].is_invisible = true;
        let clipboard = MemoryClipboard::new();

        let outcome = PageExporter::default()
            .copy_to_clipboard(&page, &clipboard)
            .unwrap();

        assert_eq!(outcome, None);
        assert_eq!(clipboard.write_count(), 0);
    }

    #[test]
    fn test_copy_failure_leaves_clipboard_untouched() {
        let clipboard = MemoryClipboard::new();
        let mut page = hello_page();
        page.snapshot.root_id = 5;

        assert!(matches!(
            PageExporter::default().copy_to_clipboard(&page, &clipboard),
            Err(PageDumpError::MissingRoot(5))
        ));
        assert!(matches!(
            PageExporter::new(Duration::from_millis(1)).copy_to_clipboard(&TimesOut, &clipboard),
            Err(PageDumpError::Provider(ProviderError::Timeout(_)))
        ));
        assert_eq!(clipboard.write_count(), 0);
    }
}
