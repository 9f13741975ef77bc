/*!
 * Page document formatting and output
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Banner opening a page document
pub const PAGE_HEADER: &str = "----------- WEB PAGE -----------";

/// Banner closing a page document
pub const PAGE_FOOTER: &str = "----------- END PAGE -----------";

/// Wrap normalized content with the page banner, title and locator
///
/// Title and locator are inserted verbatim.
pub fn format_page(content: &str, title: &str, locator: &str) -> String {
    let mut doc = String::with_capacity(
        content.len() + title.len() + locator.len() + PAGE_HEADER.len() + PAGE_FOOTER.len() + 40,
    );

    doc.push_str(PAGE_HEADER);
    doc.push_str("\n\n");
    doc.push_str("TITLE: ");
    doc.push_str(title);
    doc.push_str("\n\n");
    doc.push_str("URL: ");
    doc.push_str(locator);
    doc.push_str("\n\n");
    doc.push_str("CONTENT:\n\n");
    doc.push_str(content);
    doc.push_str("\n\n");
    doc.push_str(PAGE_FOOTER);
    doc.push_str("\n\n");

    doc
}

/// Writes finished page documents to a file or stdout
pub struct PageWriter {
    /// Target file, stdout when absent
    output_file: Option<PathBuf>,
}

impl PageWriter {
    /// Create a new page writer
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    /// Where documents go, if not stdout
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// Write documents back to back
    pub fn write_all<'d, I>(&self, documents: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'d str>,
    {
        match &self.output_file {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                Self::write_documents(&mut writer, documents)?;
                writer.flush()
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                Self::write_documents(&mut writer, documents)?;
                writer.flush()
            }
        }
    }

    fn write_documents<'d, W, I>(writer: &mut W, documents: I) -> io::Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'d str>,
    {
        for doc in documents {
            writer.write_all(doc.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_page_layout() {
        let doc = format_page("Hello ", "Example", "https://example.test/");
        assert_eq!(
            doc,
            "----------- WEB PAGE -----------\n\n\
             TITLE: Example\n\n\
             URL: https://example.test/\n\n\
             CONTENT:\n\n\
             Hello \n\n\
             ----------- END PAGE -----------\n\n"
        );
    }

    #[test]
    fn test_metadata_is_verbatim() {
        let doc = format_page("x", "A <b>&\"title\"", "not a url at all");
        assert!(doc.contains("TITLE: A <b>&\"title\"\n\n"));
        assert!(doc.contains("URL: not a url at all\n\n"));
    }

    #[test]
    fn test_write_to_file() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("page.txt");
        let writer = PageWriter::new(Some(path.clone()));

        let first = format_page("one ", "First", "a://1");
        let second = format_page("two ", "Second", "a://2");
        writer.write_all([first.as_str(), second.as_str()])?;

        assert_eq!(fs::read_to_string(&path)?, format!("{}{}", first, second));
        assert_eq!(writer.output_file(), Some(path.as_path()));
        Ok(())
    }
}
