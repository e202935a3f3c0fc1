//! Export options and configuration.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Raster encoding used for rasterized objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Bmp,
    #[default]
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Bmp => "bmp",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
        }
    }

    /// MIME type for data URIs.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Check if the format has no alpha channel.
    pub fn is_opaque(&self) -> bool {
        matches!(self, ImageFormat::Bmp | ImageFormat::Jpeg)
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bmp" => Ok(ImageFormat::Bmp),
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "gif" => Ok(ImageFormat::Gif),
            other => Err(Error::Other(format!("Unknown image format '{}'", other))),
        }
    }
}

/// Options for exporting a document to HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output pixels per document pixel
    pub zoom: f32,

    /// Keep page margins as empty space around the content
    pub enable_margins: bool,

    /// Stack all pages into one scrollable surface
    pub continuous: bool,

    /// Insert print page breaks between stacked pages
    pub page_breaks: bool,

    /// Rasterize pictures, shapes and other non-text objects
    pub export_pictures: bool,

    /// Embed rasterized pictures as data URIs instead of file references
    pub embed_pictures: bool,

    /// Encoding of rasterized pictures
    pub image_format: ImageFormat,

    /// Rasterize at three times the output resolution and downsample
    pub high_quality: bool,

    /// Size tab stops by the cumulative run width of the line
    pub layers: bool,

    /// Script object receiving click events; clicks are disabled when unset
    pub report_id: Option<String>,

    /// Prefix for referenced picture file names
    pub image_prefix: String,

    /// Pages to export
    pub page_selection: PageSelection,

    /// Title of the assembled HTML document
    pub title: Option<String>,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Set the zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = if zoom > 0.0 { zoom } else { 1.0 };
        self
    }

    /// Enable or disable page margins.
    pub fn with_margins(mut self, enable: bool) -> Self {
        self.enable_margins = enable;
        self
    }

    /// Enable or disable continuous single-surface output.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Enable or disable page breaks between stacked pages.
    pub fn with_page_breaks(mut self, page_breaks: bool) -> Self {
        self.page_breaks = page_breaks;
        self
    }

    /// Enable or disable picture export.
    pub fn with_pictures(mut self, export: bool) -> Self {
        self.export_pictures = export;
        self
    }

    /// Enable or disable picture embedding.
    pub fn with_embedded_pictures(mut self, embed: bool) -> Self {
        self.embed_pictures = embed;
        self
    }

    /// Set the picture encoding.
    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// Enable or disable supersampled rasterization.
    pub fn with_high_quality(mut self, high_quality: bool) -> Self {
        self.high_quality = high_quality;
        self
    }

    /// Select cumulative (layered) or absolute tab-stop sizing.
    pub fn with_layers(mut self, layers: bool) -> Self {
        self.layers = layers;
        self
    }

    /// Set the script object receiving click events.
    pub fn with_report_id(mut self, id: impl Into<String>) -> Self {
        self.report_id = Some(id.into());
        self
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Raster supersampling factor.
    pub fn supersample(&self) -> f32 {
        if self.high_quality {
            3.0
        } else {
            1.0
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            enable_margins: true,
            continuous: false,
            page_breaks: true,
            export_pictures: true,
            embed_pictures: true,
            image_format: ImageFormat::Png,
            high_quality: false,
            layers: true,
            report_id: None,
            image_prefix: String::new(),
            page_selection: PageSelection::All,
            title: None,
        }
    }
}

/// Page selection for export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageSelection {
    /// Export all pages
    #[default]
    All,
    /// Export a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Export specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        let invalid = |what: &str| Error::InvalidPageRange(format!("{} in '{}'", what, s));

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Check for simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| invalid("Invalid start page"))?;
                let end: u32 = end.trim().parse().map_err(|_| invalid("Invalid end page"))?;
                if start > end {
                    return Err(invalid("Start page after end page"));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Parse comma-separated list with possible ranges
        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| invalid("Invalid page number"))?;
                let end: u32 = end.trim().parse().map_err(|_| invalid("Invalid page number"))?;
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p: u32 = part.parse().map_err(|_| invalid("Invalid page number"))?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        pages.sort();
        Ok(PageSelection::Pages(pages))
    }
}

impl TryFrom<String> for PageSelection {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PageSelection::parse(&value)
    }
}

impl From<PageSelection> for String {
    fn from(selection: PageSelection) -> Self {
        match selection {
            PageSelection::All => "all".to_string(),
            PageSelection::Range(range) => format!("{}-{}", range.start(), range.end()),
            PageSelection::Pages(pages) => pages
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_options_builder() {
        let options = ExportOptions::new()
            .with_zoom(2.0)
            .with_continuous(true)
            .with_image_format(ImageFormat::Jpeg)
            .with_report_id("rep1");

        assert_eq!(options.zoom, 2.0);
        assert!(options.continuous);
        assert_eq!(options.image_format, ImageFormat::Jpeg);
        assert_eq!(options.report_id.as_deref(), Some("rep1"));
        assert_eq!(options.supersample(), 1.0);
        assert_eq!(ExportOptions::new().with_zoom(-1.0).zoom, 1.0);
    }

    #[test]
    fn test_options_from_json() {
        let options: ExportOptions =
            serde_json::from_str(r#"{"zoom": 1.5, "image_format": "gif", "page_selection": "2-3"}"#)
                .unwrap();
        assert_eq!(options.zoom, 1.5);
        assert_eq!(options.image_format, ImageFormat::Gif);
        assert!(options.enable_margins);
        assert!(options.page_selection.includes(3));
        assert!(!options.page_selection.includes(1));
    }

    #[test]
    fn test_page_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1));
        assert!(all.includes(100));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3, 5, 7]);
        assert!(pages.includes(1));
        assert!(!pages.includes(2));
        assert!(pages.includes(3));
    }

    #[test]
    fn test_page_selection_parse() {
        let all = PageSelection::parse("all").unwrap();
        assert!(matches!(all, PageSelection::All));

        let range = PageSelection::parse("1-10").unwrap();
        assert!(matches!(range, PageSelection::Range(_)));

        let mixed = PageSelection::parse("1,3,5-7,10").unwrap();
        if let PageSelection::Pages(pages) = mixed {
            assert_eq!(pages, vec![1, 3, 5, 6, 7, 10]);
        } else {
            panic!("Expected Pages variant");
        }

        assert!(matches!(
            PageSelection::parse("x-2"),
            Err(Error::InvalidPageRange(_))
        ));
    }

    #[test]
    fn test_image_format() {
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert!(ImageFormat::Bmp.is_opaque());
        assert!(!ImageFormat::Png.is_opaque());
    }
}
