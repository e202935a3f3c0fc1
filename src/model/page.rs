//! Page-level types.

use super::{Color, Fill, Font, ObjectBase, ReportObject, PX_PER_MM};
use serde::{Deserialize, Serialize};

/// A single prepared page of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Page name
    pub name: String,

    /// Paper width in millimetres
    pub paper_width: f32,

    /// Paper height in millimetres
    pub paper_height: f32,

    /// Page margins in millimetres
    pub margins: Margins,

    /// Page background
    pub fill: Fill,

    pub watermark: Watermark,

    /// Bands in paint order
    pub bands: Vec<Band>,

    /// Grow the page to fit its content instead of using the paper height
    pub unlimited_height: bool,

    /// Page height in pixels used when `unlimited_height` is set
    pub unlimited_height_value: f32,

    /// Take the page content from a page of another document
    pub link: Option<PageLink>,
}

impl Page {
    /// Create a page with the given paper size in millimetres.
    pub fn new(paper_width: f32, paper_height: f32) -> Self {
        Self {
            paper_width,
            paper_height,
            ..Self::default()
        }
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(210.0, 297.0)
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(215.9, 279.4)
    }

    /// Add a band to the page.
    pub fn add_band(&mut self, band: Band) {
        self.bands.push(band);
    }

    /// Page width in pixels.
    pub fn width_px(&self) -> f32 {
        self.paper_width * PX_PER_MM
    }

    /// Page height in pixels.
    pub fn height_px(&self) -> f32 {
        if self.unlimited_height {
            let content = self
                .bands
                .iter()
                .map(|b| b.base.top + b.base.height)
                .fold(0.0_f32, f32::max);
            self.unlimited_height_value
                .max(content + (self.margins.top + self.margins.bottom) * PX_PER_MM)
        } else {
            self.paper_height * PX_PER_MM
        }
    }

    /// Total number of objects on the page, bands excluded.
    pub fn object_count(&self) -> usize {
        fn count(objects: &[ReportObject]) -> usize {
            objects
                .iter()
                .map(|o| match &o.kind {
                    super::ObjectKind::Container(c) => 1 + count(&c.objects),
                    _ => 1,
                })
                .sum()
        }
        self.bands.iter().map(|b| count(&b.objects)).sum()
    }

    /// Check if the page has no bands.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Remove all content, keeping paper geometry.
    pub fn clear_content(&mut self) {
        self.bands.clear();
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            name: String::new(),
            paper_width: 210.0,
            paper_height: 297.0,
            margins: Margins::default(),
            fill: Fill::solid(Color::WHITE),
            watermark: Watermark::default(),
            bands: Vec::new(),
            unlimited_height: false,
            unlimited_height_value: 0.0,
            link: None,
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    /// Same margin on every side.
    pub fn uniform(mm: f32) -> Self {
        Self {
            left: mm,
            top: mm,
            right: mm,
            bottom: mm,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

/// Reference to a page of another document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Document identifier understood by the host resolver
    pub document: String,

    /// Zero-based page index inside that document
    #[serde(default)]
    pub page: usize,
}

/// Section kind of a band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    ReportTitle,
    PageHeader,
    ColumnHeader,
    GroupHeader,
    #[default]
    Data,
    GroupFooter,
    ColumnFooter,
    ReportSummary,
    PageFooter,
    Overlay,
    Child,
}

/// A horizontal strip of objects.
///
/// The band itself only contributes a background; its objects are
/// exported separately in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Band {
    pub kind: BandKind,

    #[serde(flatten)]
    pub base: ObjectBase,

    /// Objects in paint order
    pub objects: Vec<ReportObject>,
}

impl Band {
    /// Create an empty band spanning the given area.
    pub fn new(kind: BandKind, base: ObjectBase) -> Self {
        Self {
            kind,
            base,
            objects: Vec::new(),
        }
    }

    /// Add an object to the band.
    pub fn add_object(&mut self, object: ReportObject) {
        self.objects.push(object);
    }
}

/// Placement of a watermark image on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkImageSize {
    Normal,
    Center,
    #[default]
    Stretch,
    Zoom,
    Tile,
}

/// Direction of the watermark text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkTextRotation {
    Horizontal,
    Vertical,
    #[default]
    ForwardDiagonal,
    BackwardDiagonal,
}

impl WatermarkTextRotation {
    /// CSS rotation in degrees (clockwise).
    pub fn degrees(&self) -> f32 {
        match self {
            WatermarkTextRotation::Horizontal => 0.0,
            WatermarkTextRotation::Vertical => 270.0,
            WatermarkTextRotation::ForwardDiagonal => 315.0,
            WatermarkTextRotation::BackwardDiagonal => 45.0,
        }
    }
}

/// Page watermark made of an optional image and an optional text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watermark {
    pub enabled: bool,

    #[serde(with = "super::bytes::option")]
    pub image: Option<Vec<u8>>,
    pub image_size: WatermarkImageSize,
    /// 0 = opaque, 1 = invisible
    pub image_transparency: f32,

    pub text: String,
    pub font: Font,
    pub text_color: Color,
    pub text_rotation: WatermarkTextRotation,

    pub show_image_on_top: bool,
    pub show_text_on_top: bool,
}

impl Watermark {
    /// Check if an image layer is present.
    pub fn has_image(&self) -> bool {
        self.enabled && self.image.as_ref().is_some_and(|i| !i.is_empty())
    }

    /// Check if a text layer is present.
    pub fn has_text(&self) -> bool {
        self.enabled && !self.text.trim().is_empty()
    }
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            enabled: false,
            image: None,
            image_size: WatermarkImageSize::Stretch,
            image_transparency: 0.0,
            text: String::new(),
            font: Font::new("Arial", 60.0),
            text_color: Color::argb(40, 128, 128, 128),
            text_rotation: WatermarkTextRotation::ForwardDiagonal,
            show_image_on_top: false,
            show_text_on_top: true,
        }
    }
}
