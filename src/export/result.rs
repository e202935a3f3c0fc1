//! Export results and statistics.

use super::sink::FinishedPage;
use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Statistics collected while exporting a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Pages exported
    pub pages: u32,

    /// Objects dispatched, bands and table cells excluded
    pub objects: u32,

    /// Tables walked, cellular text included
    pub tables: u32,

    /// Visible table cells layered
    pub cells: u32,

    /// Rasterized pictures encoded
    pub pictures: u32,

    /// Rasterizations answered from the picture cache
    pub picture_cache_hits: u32,

    /// Rasterizations that failed and were replaced by a placeholder
    pub failed_pictures: u32,

    /// Objects and cells rendered by a custom-draw hook
    pub custom_drawn: u32,

    /// Style rules written
    pub styles: u32,

    /// Linked pages that could not be loaded
    pub linked_page_failures: u32,

    /// Text runs a raster surface could not draw
    #[serde(default)]
    pub skipped_text: u32,
}

impl ExportStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self) {
        self.pages += 1;
    }

    pub fn add_object(&mut self) {
        self.objects += 1;
    }

    pub fn add_table(&mut self) {
        self.tables += 1;
    }

    pub fn add_cell(&mut self) {
        self.cells += 1;
    }

    pub fn add_picture(&mut self) {
        self.pictures += 1;
    }

    pub fn add_cache_hit(&mut self) {
        self.picture_cache_hits += 1;
    }

    pub fn add_failed_picture(&mut self) {
        self.failed_pictures += 1;
    }

    pub fn add_custom_drawn(&mut self) {
        self.custom_drawn += 1;
    }

    pub fn add_styles(&mut self, count: usize) {
        self.styles += count as u32;
    }

    pub fn add_linked_page_failure(&mut self) {
        self.linked_page_failures += 1;
    }

    pub fn add_skipped_text(&mut self, count: u32) {
        self.skipped_text += count;
    }

    /// Check if every rasterization succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed_pictures == 0 && self.linked_page_failures == 0
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExportStats) {
        self.pages += other.pages;
        self.objects += other.objects;
        self.tables += other.tables;
        self.cells += other.cells;
        self.pictures += other.pictures;
        self.picture_cache_hits += other.picture_cache_hits;
        self.failed_pictures += other.failed_pictures;
        self.custom_drawn += other.custom_drawn;
        self.styles += other.styles;
        self.linked_page_failures += other.linked_page_failures;
        self.skipped_text += other.skipped_text;
    }
}

/// A rasterized picture written by reference rather than embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPicture {
    /// File name, including the configured prefix
    pub name: String,
    /// Encoded image bytes
    pub data: Vec<u8>,
}

/// Complete output of one export session.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Finished pages in export order
    pub pages: Vec<FinishedPage>,

    /// Pictures referenced by file name from the markup
    pub pictures: Vec<StoredPicture>,

    pub stats: ExportStats,

    /// Document metadata, title resolved from the options
    pub metadata: Metadata,
}

impl ExportResult {
    /// Assemble all pages into one standalone HTML document.
    pub fn to_html(&self) -> String {
        super::sink::html_document(&self.metadata, &self.pages)
    }

    /// Total markup length in bytes.
    pub fn content_len(&self) -> usize {
        self.pages.iter().map(|p| p.html.len() + p.styles.len()).sum()
    }
}
