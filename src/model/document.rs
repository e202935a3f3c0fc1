//! Document-level types.

use super::Page;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A prepared report: metadata plus pages ready for export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Pages in the document
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        Ok(doc)
    }

    /// Load a document from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Get a page by number, failing when out of range.
    pub fn page(&self, page_num: u32) -> Result<&Page> {
        self.get_page(page_num).ok_or(Error::PageOutOfRange(page_num, self.page_count()))
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of objects across all pages.
    pub fn object_count(&self) -> usize {
        self.pages.iter().map(Page::object_count).sum()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// `<meta>` elements for the HTML head.
    pub fn to_html_meta(&self) -> String {
        let mut out = String::new();
        let mut push = |name: &str, value: &str| {
            out.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                name,
                html_escape::encode_double_quoted_attribute(value)
            ));
        };

        if let Some(ref author) = self.author {
            push("author", author);
        }
        if let Some(ref subject) = self.subject {
            push("description", subject);
        }
        if let Some(ref creator) = self.creator {
            push("generator", creator);
        }
        if let Some(created) = self.created {
            push("created", &created.to_rfc3339());
        }
        if let Some(modified) = self.modified {
            push("modified", &modified.to_rfc3339());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_page_lookup() {
        let mut doc = Document::new();
        doc.add_page(Page::a4());
        assert!(doc.get_page(0).is_none());
        assert!(doc.get_page(1).is_some());
        assert!(matches!(doc.page(2), Err(Error::PageOutOfRange(2, 1))));
    }

    #[test]
    fn test_from_json() {
        let doc = Document::from_json(
            r#"{"metadata":{"title":"Sales"},"pages":[{"paper_width":100,"paper_height":50}]}"#,
        )
        .unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("Sales"));
        assert_eq!(doc.pages[0].paper_width, 100.0);
        assert_eq!(doc.pages[0].margins.left, 10.0);
    }

    #[test]
    fn test_html_meta() {
        let meta = Metadata {
            author: Some("A \"B\"".to_string()),
            created: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ..Default::default()
        };
        let html = meta.to_html_meta();
        assert!(html.contains("content=\"A &quot;B&quot;\""));
        assert!(html.contains("2024-01-02T03:04:05+00:00"));
    }
}
