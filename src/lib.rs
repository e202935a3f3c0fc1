//! # pagelayer
//!
//! Layered HTML export for paginated report documents.
//!
//! Every object of a prepared document is turned into an absolutely
//! positioned layer that reproduces the printed page: borders straddle the
//! nominal box edge, text is emitted from a shaped layout with its runs
//! merged by style, and anything CSS cannot express is rasterized into a
//! picture that is encoded once per distinct content.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagelayer::{Document, ExportOptions};
//!
//! fn main() -> pagelayer::Result<()> {
//!     let doc = Document::from_file("report.json")?;
//!
//!     let options = ExportOptions::default().with_zoom(1.5).with_continuous(true);
//!     let html = pagelayer::export_html(&doc, &options)?;
//!     std::fs::write("report.html", html)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Style deduplication**: identical style bodies share one class
//! - **Continuous or paged output**: stack pages on one surface or keep them apart
//! - **Picture cache**: identical rasterizations are encoded once per session
//! - **Host hooks**: custom drawing, extension objects, linked pages
//! - **Parallel batches**: independent documents export on Rayon workers

pub mod draw;
pub mod error;
pub mod export;
pub mod model;
pub mod text;

// Re-export commonly used types
pub use error::{Error, Result};
pub use export::{
    CompositeHook, CustomDrawArgs, DirectorySink, DrawTarget, ExportHook, ExportOptions, ExportResult,
    ExportStats, ExtendedExport, FinishedPage, HookAction, HtmlExporter, ImageFormat, PageResolver, PageSelection,
    PageSink, PageStream,
};
pub use model::{Band, BandKind, Document, Metadata, ObjectBase, ObjectKind, Page, ReportObject};
pub use text::{MetricShaper, TextShaper};

use rayon::prelude::*;
use std::path::Path;

/// Export a document to one standalone HTML string.
///
/// # Example
///
/// ```
/// use pagelayer::{Document, ExportOptions, Page};
///
/// let mut doc = Document::new();
/// doc.add_page(Page::a4());
/// let html = pagelayer::export_html(&doc, &ExportOptions::default()).unwrap();
/// assert!(html.contains("PageN1"));
/// ```
pub fn export_html(doc: &Document, options: &ExportOptions) -> Result<String> {
    let result = HtmlExporter::new(options.clone()).export(doc)?;
    Ok(result.to_html())
}

/// Read a JSON document and export it to HTML.
pub fn export_file<P: AsRef<Path>>(path: P, options: &ExportOptions) -> Result<ExportResult> {
    let doc = Document::from_file(path)?;
    HtmlExporter::new(options.clone()).export(&doc)
}

/// Export several documents in parallel.
///
/// Each document gets its own exporter and session; results keep the input
/// order.
pub fn export_batch(docs: &[Document], options: &ExportOptions) -> Vec<Result<ExportResult>> {
    docs.par_iter()
        .map(|doc| HtmlExporter::new(options.clone()).export(doc))
        .collect()
}
