//! Shaped-text model and the text shaping collaborator.
//!
//! The export pipeline never measures glyphs itself. It asks a
//! [`TextShaper`] for a [`TextLayout`] and turns that into markup.
//! [`MetricShaper`] is the default, metric-based implementation; hosts
//! with access to real fonts supply their own.

mod layout;
pub mod markup;
mod shaper;

pub use layout::{
    Baseline, InlineImage, Line, Paragraph, Run, RunKind, StyleDescriptor, TextLayout, Word,
    WordKind,
};
pub use shaper::{MetricShaper, ShapeRequest, TextShaper};
