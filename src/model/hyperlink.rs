//! Hyperlink descriptors attached to document objects.

use serde::{Deserialize, Serialize};

/// Target kind of a hyperlink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HyperlinkKind {
    /// External URL
    #[default]
    Url,
    /// Named bookmark inside the document
    Bookmark,
    /// Page number inside the document
    PageNumber,
    /// Drill-down into a detail report
    DetailReport,
    /// Drill-down into a detail page
    DetailPage,
}

/// A hyperlink attached to an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperlink {
    pub kind: HyperlinkKind,
    /// URL, bookmark name, page number or detail parameter value
    pub value: String,
    /// Parameter name passed to detail reports and pages
    pub report_parameter: String,
    pub open_in_new_tab: bool,
}

impl Hyperlink {
    /// Link to an external URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            kind: HyperlinkKind::Url,
            value: url.into(),
            ..Default::default()
        }
    }

    /// Link to a bookmark.
    pub fn bookmark(name: impl Into<String>) -> Self {
        Self {
            kind: HyperlinkKind::Bookmark,
            value: name.into(),
            ..Default::default()
        }
    }

    /// Link to a page number.
    pub fn page(number: u32) -> Self {
        Self {
            kind: HyperlinkKind::PageNumber,
            value: number.to_string(),
            ..Default::default()
        }
    }

    /// Check if the hyperlink carries a target.
    pub fn is_set(&self) -> bool {
        !self.value.is_empty()
    }
}
