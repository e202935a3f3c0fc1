//! Layered HTML export.
//!
//! Each document object becomes an absolutely positioned layer inside its
//! page container. Style bodies are interned and written once per page,
//! text is emitted from shaped layouts and everything CSS cannot express is
//! rasterized into a picture.

mod context;
pub mod css;
mod dispatch;
mod exporter;
mod hooks;
mod options;
mod page;
mod picture;
mod positioner;
mod result;
mod sink;
mod stream;
mod styles;
mod table;
mod text;

pub use context::{ExportEnv, PageContext};
pub use dispatch::{export_band, export_object};
pub use exporter::{ExportSession, HtmlExporter};
pub use hooks::{
    CompositeHook, CustomDrawArgs, DrawTarget, ExportHook, ExtendedExport, ExtensionRegistry, HookAction,
    PageResolver,
};
pub use options::{ExportOptions, ImageFormat, PageSelection};
pub use page::{begin_page, end_page, export_page, page_geometry, PageGeometry};
pub use picture::{PictureRasterizer, RasterPicture, JPEG_QUALITY};
pub use positioner::{layer, layer_back, layer_box, layer_picture, layer_shape, LayerSource};
pub use result::{ExportResult, ExportStats, StoredPicture};
pub use sink::{html_document, DirectorySink, FinishedPage, PageSink};
pub use stream::PageStream;
pub use styles::StyleCache;
pub use table::{layer_table, visible_cells, PlacedCell};
pub use text::{
    html_string, layer_text, rich_html, span_text, vertical_offset, SpanBox, TextMeasure, BOTTOM_SNAP_THRESHOLD,
};
