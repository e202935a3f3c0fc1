//! Per-page state and the session collaborators passed to every layering
//! call.

use super::hooks::{ExportHook, ExtensionRegistry};
use super::options::ExportOptions;
use super::picture::PictureRasterizer;
use super::result::ExportStats;
use super::styles::StyleCache;
use crate::text::TextShaper;

/// Mutable state of the page being exported.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Page number in the document, 1-indexed
    pub number: u32,
    /// Position among exported pages, 0-indexed
    pub index: u32,
    pub zoom: f32,
    /// Left margin in unscaled pixels, 0 when margins are suppressed
    pub left_margin: f32,
    pub top_margin: f32,
    /// Content width in unscaled pixels
    pub width: f32,
    pub height: f32,
    /// Running vertical offset of continuous output
    pub h_pos: f32,
    /// Page markup
    pub html: String,
    /// Style rules contributed by custom-draw hooks
    pub css: String,
}

impl PageContext {
    pub fn new(number: u32, index: u32, zoom: f32) -> Self {
        Self {
            number,
            index,
            zoom,
            ..Self::default()
        }
    }
}

/// Session collaborators borrowed for the duration of one page.
pub struct ExportEnv<'a> {
    pub options: &'a ExportOptions,
    pub styles: &'a mut StyleCache,
    pub pictures: &'a mut PictureRasterizer,
    pub shaper: &'a dyn TextShaper,
    pub hooks: &'a mut dyn ExportHook,
    pub extensions: &'a ExtensionRegistry,
    pub stats: &'a mut ExportStats,
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;
    use crate::draw::SkiaSurfaceFactory;
    use crate::export::hooks::CompositeHook;
    use crate::text::MetricShaper;
    use std::sync::Arc;

    /// Owns one set of session collaborators for unit tests.
    pub struct Fixture {
        pub options: ExportOptions,
        pub styles: StyleCache,
        pub pictures: PictureRasterizer,
        pub shaper: MetricShaper,
        pub hooks: CompositeHook,
        pub extensions: ExtensionRegistry,
        pub stats: ExportStats,
    }

    impl Fixture {
        pub fn new(options: ExportOptions) -> Self {
            let pictures = PictureRasterizer::new(&options, Arc::new(SkiaSurfaceFactory));
            Self {
                options,
                styles: StyleCache::new(),
                pictures,
                shaper: MetricShaper::new(),
                hooks: CompositeHook::new(),
                extensions: ExtensionRegistry::new(),
                stats: ExportStats::new(),
            }
        }

        pub fn env(&mut self) -> ExportEnv<'_> {
            ExportEnv {
                options: &self.options,
                styles: &mut self.styles,
                pictures: &mut self.pictures,
                shaper: &self.shaper,
                hooks: &mut self.hooks,
                extensions: &self.extensions,
                stats: &mut self.stats,
            }
        }

        pub fn page(&self) -> PageContext {
            PageContext::new(1, 0, self.options.zoom)
        }
    }
}
