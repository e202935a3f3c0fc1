//! Document model consumed by the export pipeline.
//!
//! A [`Document`] is a list of prepared pages. Each page holds bands, and
//! each band holds positioned objects whose kind decides how they are
//! exported. The model is read-only during export and deserializes from
//! JSON so documents can be produced by any host.

mod bytes;
mod color;
mod document;
mod geometry;
mod hyperlink;
mod object;
mod page;
mod style;
mod table;

pub use color::Color;
pub use document::{Document, Metadata};
pub use geometry::{Padding, Rect, PX_PER_MM, PX_PER_PT};
pub use hyperlink::{Hyperlink, HyperlinkKind};
pub use object::{
    CapStyle, CellularTextObject, ContainerObject, Crop, CustomObject, HtmlObject, LineObject,
    ObjectBase, ObjectKind, PictureObject, ReportObject, ShapeKind, ShapeObject, SizeMode,
    TextObject, TextRenderMode,
};
pub use page::{
    Band, BandKind, Margins, Page, PageLink, Watermark, WatermarkImageSize, WatermarkTextRotation,
};
pub use style::{Border, BorderLine, BorderSides, Fill, Font, HorzAlign, LineStyle, VertAlign};
pub use table::{TableCell, TableColumn, TableObject, TableRow};
