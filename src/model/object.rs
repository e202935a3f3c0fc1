//! Document objects placed on report bands.

use super::{Border, Color, Fill, Font, HorzAlign, Hyperlink, Padding, Rect, TableObject, VertAlign};
use serde::{Deserialize, Serialize};

/// Properties every positioned object carries.
///
/// Coordinates are page-absolute, in pixels at 96 dpi, before zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectBase {
    /// Object name, used as the click-event identifier
    pub name: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub border: Border,
    pub fill: Fill,
    pub visible: bool,
    pub printable: bool,
    /// Excluded from export when false
    pub exportable: bool,
    pub hyperlink: Option<Hyperlink>,
    /// Anchor name emitted before the object
    pub bookmark: Option<String>,
    /// The host attached click behaviour to this object
    pub has_click_listeners: bool,
}

impl ObjectBase {
    /// Create a named object at the given position.
    pub fn new(name: impl Into<String>, left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            left,
            top,
            width,
            height,
            ..Self::default()
        }
    }

    /// Bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Set the border.
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Set the fill.
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Set the hyperlink.
    pub fn with_hyperlink(mut self, hyperlink: Hyperlink) -> Self {
        self.hyperlink = Some(hyperlink);
        self
    }

    /// Check if the object takes part in export.
    pub fn is_exported(&self) -> bool {
        self.visible && self.exportable
    }

    /// The hyperlink, if one with a target is set.
    pub fn active_hyperlink(&self) -> Option<&Hyperlink> {
        self.hyperlink.as_ref().filter(|h| h.is_set())
    }
}

impl Default for ObjectBase {
    fn default() -> Self {
        Self {
            name: String::new(),
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            border: Border::default(),
            fill: Fill::default(),
            visible: true,
            printable: true,
            exportable: true,
            hyperlink: None,
            bookmark: None,
            has_click_listeners: false,
        }
    }
}

/// A document object: shared properties plus its capability-specific kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportObject {
    #[serde(flatten)]
    pub base: ObjectBase,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl ReportObject {
    /// Create an object from its parts.
    pub fn new(base: ObjectBase, kind: ObjectKind) -> Self {
        Self { base, kind }
    }

    /// Text object.
    pub fn text(base: ObjectBase, text: TextObject) -> Self {
        Self::new(base, ObjectKind::Text(text))
    }

    /// Picture object.
    pub fn picture(base: ObjectBase, picture: PictureObject) -> Self {
        Self::new(base, ObjectKind::Picture(picture))
    }

    /// Shape object.
    pub fn shape(base: ObjectBase, shape: ShapeObject) -> Self {
        Self::new(base, ObjectKind::Shape(shape))
    }

    /// Line object.
    pub fn line(base: ObjectBase, line: LineObject) -> Self {
        Self::new(base, ObjectKind::Line(line))
    }

    /// Table object.
    pub fn table(base: ObjectBase, table: TableObject) -> Self {
        Self::new(base, ObjectKind::Table(table))
    }

    /// Object name.
    pub fn name(&self) -> &str {
        &self.base.name
    }
}

/// Capability-specific content of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    /// Text with font, alignment and padding
    Text(TextObject),
    /// Pre-built HTML fragment
    Html(HtmlObject),
    /// Raster picture
    Picture(PictureObject),
    /// Geometric shape
    Shape(ShapeObject),
    /// Straight line
    Line(LineObject),
    /// Row/column grid of cells
    Table(TableObject),
    /// Text laid out one character per cell
    CellularText(CellularTextObject),
    /// Plain container whose children are exported in paint order
    Container(ContainerObject),
    /// Host-defined object exported by a registered extension
    Custom(CustomObject),
}

/// How the text of a text object is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRenderMode {
    /// Literal text
    #[default]
    Plain,
    /// Text containing simple inline HTML tags
    HtmlTags,
    /// Rich text laid out into paragraphs by the text shaper
    HtmlParagraph,
}

/// Text content of an object or table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextObject {
    pub text: String,
    pub font: Font,
    pub text_color: Color,
    pub horz_align: HorzAlign,
    pub vert_align: VertAlign,
    pub padding: Padding,
    /// Rotation in degrees
    pub angle: f32,
    pub font_width_ratio: f32,
    /// Outlined glyphs
    pub outline: bool,
    /// Ruled underlines under every line
    pub underlines: bool,
    pub word_wrap: bool,
    pub render_mode: TextRenderMode,
    /// First-line offset in pixels
    pub paragraph_offset: f32,
    /// First-line indent used by rich paragraphs, in pixels
    pub first_line_indent: f32,
    /// Explicit line height in pixels (0 = from font)
    pub line_height: f32,
    /// The viewer may edit the text in place
    pub editable: bool,
}

impl TextObject {
    /// Text with default formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the font.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Set the vertical alignment.
    pub fn with_vert_align(mut self, align: VertAlign) -> Self {
        self.vert_align = align;
        self
    }

    /// Set the render mode.
    pub fn with_render_mode(mut self, mode: TextRenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Plain horizontal text that needs no raster fallback.
    pub fn is_memo(&self) -> bool {
        self.angle == 0.0 && self.font_width_ratio == 1.0 && !self.outline && !self.underlines
    }
}

impl Default for TextObject {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: Font::default(),
            text_color: Color::BLACK,
            horz_align: HorzAlign::Left,
            vert_align: VertAlign::Top,
            padding: Padding {
                left: 2.0,
                top: 0.0,
                right: 2.0,
                bottom: 0.0,
            },
            angle: 0.0,
            font_width_ratio: 1.0,
            outline: false,
            underlines: false,
            word_wrap: true,
            render_mode: TextRenderMode::Plain,
            paragraph_offset: 0.0,
            first_line_indent: 0.0,
            line_height: 0.0,
            editable: false,
        }
    }
}

/// Object holding a ready-made HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlObject {
    pub html: String,
    pub padding: Padding,
}

/// How a picture is fitted into its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// Natural size at the top-left corner
    Normal,
    /// Natural size, centred
    Center,
    /// Stretched to the box
    #[default]
    Stretch,
    /// Scaled to fit, keeping the aspect ratio
    Zoom,
}

/// Pixel crop applied to the source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Raster picture object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureObject {
    /// Encoded image bytes (PNG, JPEG, GIF or BMP)
    #[serde(with = "super::bytes::option")]
    pub image: Option<Vec<u8>>,
    pub size_mode: SizeMode,
    /// Rotation in degrees
    pub angle: f32,
    /// 0 = opaque, 1 = invisible
    pub transparency: f32,
    pub crop: Option<Crop>,
}

impl PictureObject {
    /// Picture from encoded bytes.
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }
}

impl Default for PictureObject {
    fn default() -> Self {
        Self {
            image: None,
            size_mode: SizeMode::Stretch,
            angle: 0.0,
            transparency: 0.0,
            crop: None,
        }
    }
}

/// Geometric figure of a shape object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundRectangle,
    Ellipse,
    Triangle,
    Diamond,
}

/// Shape object, outlined with its border's left line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeObject {
    pub shape: ShapeKind,
    /// Corner radius of a round rectangle (0 = automatic)
    pub curve: f32,
}

impl ShapeObject {
    /// Shape of the given kind.
    pub fn new(shape: ShapeKind) -> Self {
        Self { shape, curve: 0.0 }
    }
}

/// Decoration at a line end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStyle {
    #[default]
    None,
    Arrow,
    Circle,
    Square,
}

/// Straight line from the top-left corner across the object box.
///
/// Width and height may be negative. The line pen is the border's left line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineObject {
    /// Draw corner to corner instead of snapping to the dominant axis
    pub diagonal: bool,
    pub start_cap: CapStyle,
    pub end_cap: CapStyle,
}

/// Text rendered into a grid of fixed-size cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellularTextObject {
    pub text: String,
    pub font: Font,
    pub text_color: Color,
    pub cell_width: f32,
    pub cell_height: f32,
    pub horz_spacing: f32,
    pub vert_spacing: f32,
    /// Border drawn around each cell
    pub cell_border: Border,
}

impl Default for CellularTextObject {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: Font::default(),
            text_color: Color::BLACK,
            cell_width: 0.0,
            cell_height: 0.0,
            horz_spacing: 0.0,
            vert_spacing: 0.0,
            cell_border: Border::all(1.0, Color::BLACK),
        }
    }
}

/// Object grouping other objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerObject {
    pub objects: Vec<ReportObject>,
}

/// Host-defined object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomObject {
    /// Key used to look up the registered extension
    pub type_name: String,
    pub properties: serde_json::Value,
}
