//! Page-at-a-time export.
//!
//! [`PageStream`] exports one selected page per call to `next()`, so a host
//! can write each page out as soon as it is finished, or stop between
//! pages.
//!
//! # Example
//!
//! ```no_run
//! use pagelayer::{Document, HtmlExporter};
//!
//! fn main() -> pagelayer::Result<()> {
//!     let doc = Document::from_file("report.json")?;
//!     let mut exporter = HtmlExporter::default();
//!
//!     for page in exporter.stream(&doc) {
//!         let page = page?;
//!         println!("page {}: {} bytes", page.number, page.html.len());
//!     }
//!     Ok(())
//! }
//! ```

use super::exporter::ExportSession;
use super::sink::FinishedPage;
use crate::error::Result;
use crate::model::Document;

/// Iterator over the finished pages of a document.
pub struct PageStream<'e, 'd> {
    session: ExportSession<'e>,
    doc: &'d Document,
    /// Index of the next page to look at
    next_index: usize,
    current_page_number: u32,
}

impl<'e, 'd> PageStream<'e, 'd> {
    pub fn new(session: ExportSession<'e>, doc: &'d Document) -> Self {
        Self {
            session,
            doc,
            next_index: 0,
            current_page_number: 0,
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.page_count()
    }

    /// Number of the page most recently exported, 0 before the first.
    pub fn current_page(&self) -> u32 {
        self.current_page_number
    }

    /// Check if every selected page has been exported.
    pub fn is_done(&self) -> bool {
        self.find_next_page(self.next_index).is_none()
    }

    pub fn session(&self) -> &ExportSession<'e> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ExportSession<'e> {
        &mut self.session
    }

    /// Stop streaming and keep the session state.
    pub fn into_session(self) -> ExportSession<'e> {
        self.session
    }

    /// Find the next page that should be exported (respecting page selection).
    fn find_next_page(&self, start_index: usize) -> Option<usize> {
        let selection = &self.session.options().page_selection;
        (start_index..self.doc.pages.len()).find(|&i| selection.includes(i as u32 + 1))
    }
}

impl Iterator for PageStream<'_, '_> {
    type Item = Result<FinishedPage>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.find_next_page(self.next_index)?;
        self.next_index = index + 1;

        let number = index as u32 + 1;
        self.current_page_number = number;
        Some(self.session.export_page(number, &self.doc.pages[index]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.doc.pages.len().saturating_sub(self.next_index);
        (0, Some(remaining))
    }
}
