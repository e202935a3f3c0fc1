//! Export sessions.
//!
//! [`HtmlExporter`] holds the configuration and the host collaborators.
//! Every export runs in its own [`ExportSession`]: a fresh style cache,
//! picture cache, statistics and continuous-surface offset, so two
//! exports never share state.

use super::context::{ExportEnv, PageContext};
use super::hooks::{CompositeHook, ExportHook, ExtendedExport, ExtensionRegistry, PageResolver};
use super::options::ExportOptions;
use super::page::export_page;
use super::picture::PictureRasterizer;
use super::result::{ExportResult, ExportStats, StoredPicture};
use super::sink::{FinishedPage, PageSink};
use super::stream::PageStream;
use super::styles::StyleCache;
use crate::draw::{SkiaSurfaceFactory, SurfaceFactory};
use crate::error::Result;
use crate::model::{Document, Metadata, Page};
use crate::text::{MetricShaper, TextShaper};
use std::borrow::Cow;
use std::sync::Arc;

/// HTML exporter with its configuration and host collaborators.
///
/// # Example
///
/// ```
/// use pagelayer::{Document, ExportOptions, HtmlExporter};
///
/// let doc = Document::new();
/// let mut exporter = HtmlExporter::new(ExportOptions::default().with_zoom(1.5));
/// let result = exporter.export(&doc).unwrap();
/// assert!(result.pages.is_empty());
/// ```
pub struct HtmlExporter {
    options: ExportOptions,
    shaper: Arc<dyn TextShaper>,
    surfaces: Arc<dyn SurfaceFactory>,
    hooks: CompositeHook,
    extensions: ExtensionRegistry,
    resolver: Option<Arc<dyn PageResolver>>,
}

impl HtmlExporter {
    /// Create an exporter with the default metric shaper and tiny-skia
    /// surfaces.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            shaper: Arc::new(MetricShaper::new()),
            surfaces: Arc::new(SkiaSurfaceFactory),
            hooks: CompositeHook::new(),
            extensions: ExtensionRegistry::new(),
            resolver: None,
        }
    }

    /// Use another text shaper.
    pub fn with_shaper(mut self, shaper: Arc<dyn TextShaper>) -> Self {
        self.shaper = shaper;
        self
    }

    /// Use another drawing surface backend.
    pub fn with_surface_factory(mut self, surfaces: Arc<dyn SurfaceFactory>) -> Self {
        self.surfaces = surfaces;
        self
    }

    /// Add a custom-draw hook. Earlier hooks take precedence.
    pub fn with_hook<H: ExportHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.add(hook);
        self
    }

    /// Register the exporter of a custom object type.
    pub fn with_extension<E: ExtendedExport + 'static>(mut self, type_name: impl Into<String>, extension: E) -> Self {
        self.extensions.register(type_name, extension);
        self
    }

    /// Set the loader of linked pages.
    pub fn with_resolver(mut self, resolver: Arc<dyn PageResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Start a new session.
    pub fn session(&mut self) -> ExportSession<'_> {
        ExportSession {
            options: &self.options,
            shaper: self.shaper.as_ref(),
            hooks: &mut self.hooks,
            extensions: &self.extensions,
            resolver: self.resolver.as_deref(),
            styles: StyleCache::new(),
            pictures: PictureRasterizer::new(&self.options, Arc::clone(&self.surfaces)),
            stats: ExportStats::new(),
            h_pos: 0.0,
            index: 0,
        }
    }

    /// Export the selected pages one at a time.
    pub fn stream<'d>(&mut self, doc: &'d Document) -> PageStream<'_, 'd> {
        PageStream::new(self.session(), doc)
    }

    /// Export the selected pages of a document.
    pub fn export(&mut self, doc: &Document) -> Result<ExportResult> {
        let metadata = self.metadata(doc);
        let mut stream = self.stream(doc);
        let mut pages = Vec::new();
        for page in stream.by_ref() {
            pages.push(page?);
        }
        let mut session = stream.into_session();

        log::debug!(
            "Exported {} pages, {} pictures, {} styles",
            session.stats.pages,
            session.stats.pictures,
            session.stats.styles
        );
        Ok(ExportResult {
            pages,
            pictures: session.take_pictures(),
            stats: session.stats,
            metadata,
        })
    }

    /// Export the selected pages into a sink.
    pub fn export_to(&mut self, doc: &Document, sink: &mut dyn PageSink) -> Result<ExportStats> {
        let metadata = self.metadata(doc);
        let mut stream = self.stream(doc);
        while let Some(page) = stream.next() {
            sink.page(page?)?;
            let pictures = stream.session_mut().take_pictures();
            if !pictures.is_empty() {
                sink.pictures(pictures)?;
            }
        }
        sink.finish(&metadata)?;
        Ok(stream.into_session().stats)
    }

    /// Document metadata with the title override applied.
    pub fn metadata(&self, doc: &Document) -> Metadata {
        let mut metadata = doc.metadata.clone();
        if let Some(title) = &self.options.title {
            metadata.title = Some(title.clone());
        }
        metadata
    }
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

/// State of one export run.
pub struct ExportSession<'e> {
    options: &'e ExportOptions,
    shaper: &'e dyn TextShaper,
    hooks: &'e mut CompositeHook,
    extensions: &'e ExtensionRegistry,
    resolver: Option<&'e dyn PageResolver>,
    styles: StyleCache,
    pictures: PictureRasterizer,
    stats: ExportStats,
    /// Top of the next page on the continuous surface
    h_pos: f32,
    /// Pages exported so far
    index: u32,
}

impl<'e> ExportSession<'e> {
    pub fn options(&self) -> &ExportOptions {
        self.options
    }

    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    pub fn into_stats(self) -> ExportStats {
        self.stats
    }

    /// Take the pictures written by reference since the last call.
    pub fn take_pictures(&mut self) -> Vec<StoredPicture> {
        self.pictures.take_stored()
    }

    /// Export one page as the next page of this session.
    pub fn export_page(&mut self, number: u32, page: &Page) -> Result<FinishedPage> {
        let page = self.resolve(page);

        self.hooks.on_page_start(number);
        let mut ctx = PageContext::new(number, self.index, self.options.zoom);
        ctx.h_pos = self.h_pos;

        let finished = {
            let mut env = ExportEnv {
                options: self.options,
                styles: &mut self.styles,
                pictures: &mut self.pictures,
                shaper: self.shaper,
                hooks: &mut *self.hooks,
                extensions: self.extensions,
                stats: &mut self.stats,
            };
            export_page(&mut env, &mut ctx, &page)?
        };
        self.hooks.on_page_end(number);

        if self.options.continuous {
            self.h_pos += finished.height;
        }
        self.index += 1;
        Ok(finished)
    }

    /// The page to export: the page itself, or the page it links to.
    ///
    /// A link that cannot be resolved leaves the page geometry with no
    /// content.
    fn resolve<'p>(&mut self, page: &'p Page) -> Cow<'p, Page> {
        let Some(link) = &page.link else {
            return Cow::Borrowed(page);
        };

        let resolved = match self.resolver {
            Some(resolver) => resolver.resolve(link),
            None => Err(crate::Error::LinkedPage(format!(
                "no resolver for page {} of '{}'",
                link.page, link.document
            ))),
        };
        match resolved {
            Ok(linked) => Cow::Owned(linked),
            Err(e) => {
                log::warn!("Failed to load linked page: {}", e);
                self.stats.add_linked_page_failure();
                let mut empty = page.clone();
                empty.clear_content();
                Cow::Owned(empty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Band, BandKind, ObjectBase, PageLink, ReportObject, TextObject};

    fn text_page(text: &str) -> Page {
        let mut page = Page::new(100.0, 50.0);
        let mut band = Band::new(BandKind::Data, ObjectBase::new("Data1", 0.0, 0.0, 300.0, 40.0));
        band.add_object(ReportObject::text(
            ObjectBase::new("Text1", 0.0, 0.0, 100.0, 20.0),
            TextObject::new(text),
        ));
        page.add_band(band);
        page
    }

    struct Library;

    impl PageResolver for Library {
        fn resolve(&self, link: &PageLink) -> Result<Page> {
            if link.document == "known" {
                Ok(text_page("from library"))
            } else {
                Err(crate::Error::LinkedPage(format!("unknown document '{}'", link.document)))
            }
        }
    }

    fn linked(document: &str) -> Page {
        let mut page = text_page("own content");
        page.link = Some(PageLink {
            document: document.into(),
            page: 0,
        });
        page
    }

    #[test]
    fn test_linked_page_resolved() {
        let mut doc = Document::new();
        doc.add_page(linked("known"));
        let mut exporter = HtmlExporter::default().with_resolver(Arc::new(Library));

        let result = exporter.export(&doc).unwrap();
        assert!(result.pages[0].html.contains("from library"));
        assert!(!result.pages[0].html.contains("own content"));
        assert!(result.stats.is_clean());
    }

    #[test]
    fn test_broken_link_clears_content() {
        let mut doc = Document::new();
        doc.add_page(linked("missing"));
        doc.add_page(text_page("second"));
        let mut exporter = HtmlExporter::default().with_resolver(Arc::new(Library));

        let result = exporter.export(&doc).unwrap();
        assert_eq!(result.pages.len(), 2);
        assert!(!result.pages[0].html.contains("own content"));
        assert!(result.pages[1].html.contains("second"));
        assert_eq!(result.stats.linked_page_failures, 1);
    }

    #[test]
    fn test_continuous_offsets_accumulate() {
        let mut doc = Document::new();
        doc.add_page(text_page("a"));
        doc.add_page(text_page("b"));
        let mut exporter = HtmlExporter::new(ExportOptions::default().with_continuous(true).with_zoom(2.0));

        let result = exporter.export(&doc).unwrap();
        assert_eq!(result.pages[0].surface_top, 0.0);
        assert_eq!(result.pages[1].surface_top, result.pages[0].height);
    }

    #[test]
    fn test_title_override() {
        let mut doc = Document::new();
        doc.metadata = Metadata::with_title("From document");
        let mut exporter = HtmlExporter::new(ExportOptions::default().with_title("Override"));
        let result = exporter.export(&doc).unwrap();
        assert_eq!(result.metadata.title.as_deref(), Some("Override"));
    }
}
