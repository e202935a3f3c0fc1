//! Host extension points.
//!
//! Hooks let the host take over the rendering of individual objects and
//! table cells before the default layering runs. Extensions export host
//! defined object types, and a page resolver loads pages that link into
//! other documents.
//!
//! # Example
//!
//! ```
//! use pagelayer::export::{CustomDrawArgs, ExportHook, HookAction};
//!
//! struct Placeholder;
//!
//! impl ExportHook for Placeholder {
//!     fn custom_draw(&mut self, args: &CustomDrawArgs<'_>) -> HookAction {
//!         if args.target.name() == "Chart1" {
//!             HookAction::Replace {
//!                 html: "<div class=\"chart\"></div>".to_string(),
//!                 css: String::new(),
//!             }
//!         } else {
//!             HookAction::Continue
//!         }
//!     }
//! }
//! ```

use crate::error::Result;
use crate::model::{CustomObject, Page, PageLink, ReportObject, TableCell};
use std::collections::HashMap;

/// The object or cell offered to a custom-draw hook.
#[derive(Debug, Clone, Copy)]
pub enum DrawTarget<'a> {
    Object(&'a ReportObject),
    Cell(&'a TableCell),
}

impl<'a> DrawTarget<'a> {
    /// Name of the object or cell.
    pub fn name(&self) -> &'a str {
        match self {
            DrawTarget::Object(obj) => &obj.base.name,
            DrawTarget::Cell(cell) => &cell.name,
        }
    }
}

/// Resolved placement of an object offered to a hook.
///
/// Coordinates are page-absolute and unscaled; `top` includes the running
/// vertical offset of continuous output.
#[derive(Debug, Clone, Copy)]
pub struct CustomDrawArgs<'a> {
    pub target: DrawTarget<'a>,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
    /// Cumulative tab-stop sizing is active
    pub layers: bool,
    pub page_number: u32,
}

/// Action returned by a hook to control default layering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HookAction {
    /// Continue with default layering.
    #[default]
    Continue,

    /// The hook rendered the object; append its fragments verbatim.
    Replace { html: String, css: String },

    /// Produce no output for the object.
    Skip,
}

impl HookAction {
    /// Check if the hook handled the object.
    pub fn is_handled(&self) -> bool {
        !matches!(self, HookAction::Continue)
    }
}

/// Custom-draw and page lifecycle callbacks.
///
/// All methods default to doing nothing.
pub trait ExportHook: Send {
    /// Called before an object or table cell is layered.
    fn custom_draw(&mut self, args: &CustomDrawArgs<'_>) -> HookAction {
        let _ = args;
        HookAction::Continue
    }

    /// Called at the start of a page, 1-indexed.
    fn on_page_start(&mut self, page_number: u32) {
        let _ = page_number;
    }

    /// Called when a page is finished, 1-indexed.
    fn on_page_end(&mut self, page_number: u32) {
        let _ = page_number;
    }
}

/// Hook chaining several hooks in registration order.
///
/// The first hook that handles an object wins; later hooks are not asked.
#[derive(Default)]
pub struct CompositeHook {
    hooks: Vec<Box<dyn ExportHook>>,
}

impl CompositeHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook to the chain.
    pub fn add<H: ExportHook + 'static>(&mut self, hook: H) {
        self.hooks.push(Box::new(hook));
    }

    /// Add a hook (builder pattern).
    pub fn with<H: ExportHook + 'static>(mut self, hook: H) -> Self {
        self.add(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ExportHook for CompositeHook {
    fn custom_draw(&mut self, args: &CustomDrawArgs<'_>) -> HookAction {
        for hook in &mut self.hooks {
            let action = hook.custom_draw(args);
            if action.is_handled() {
                return action;
            }
        }
        HookAction::Continue
    }

    fn on_page_start(&mut self, page_number: u32) {
        for hook in &mut self.hooks {
            hook.on_page_start(page_number);
        }
    }

    fn on_page_end(&mut self, page_number: u32) {
        for hook in &mut self.hooks {
            hook.on_page_end(page_number);
        }
    }
}

/// Exporter for a host-defined object type.
pub trait ExtendedExport: Send + Sync {
    /// Inner markup of the object's layer at the given zoom.
    ///
    /// The object's box, border and fill are positioned by the exporter.
    fn content(&self, object: &ReportObject, custom: &CustomObject, zoom: f32) -> Result<String>;
}

/// Extended exporters keyed by custom object type name.
#[derive(Default)]
pub struct ExtensionRegistry {
    exporters: HashMap<String, Box<dyn ExtendedExport>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exporter for a type name, replacing any previous one.
    pub fn register<E: ExtendedExport + 'static>(&mut self, type_name: impl Into<String>, exporter: E) {
        self.exporters.insert(type_name.into(), Box::new(exporter));
    }

    /// Look up the exporter for a type name.
    pub fn get(&self, type_name: &str) -> Option<&dyn ExtendedExport> {
        self.exporters.get(type_name).map(|e| e.as_ref())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.exporters.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.exporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }
}

/// Loads pages that link into other documents.
pub trait PageResolver: Send + Sync {
    fn resolve(&self, link: &PageLink) -> Result<Page>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectBase, TextObject};

    struct Named(&'static str);

    impl ExportHook for Named {
        fn custom_draw(&mut self, args: &CustomDrawArgs<'_>) -> HookAction {
            if args.target.name() == self.0 {
                HookAction::Replace {
                    html: self.0.to_string(),
                    css: String::new(),
                }
            } else {
                HookAction::Continue
            }
        }
    }

    struct SkipAll;

    impl ExportHook for SkipAll {
        fn custom_draw(&mut self, _args: &CustomDrawArgs<'_>) -> HookAction {
            HookAction::Skip
        }
    }

    fn args(obj: &ReportObject) -> CustomDrawArgs<'_> {
        CustomDrawArgs {
            target: DrawTarget::Object(obj),
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
            zoom: 1.0,
            layers: true,
            page_number: 1,
        }
    }

    #[test]
    fn test_composite_first_handler_wins() {
        let mut hook = CompositeHook::new().with(Named("A")).with(SkipAll);
        let a = ReportObject::text(ObjectBase::new("A", 0.0, 0.0, 1.0, 1.0), TextObject::new("x"));
        let b = ReportObject::text(ObjectBase::new("B", 0.0, 0.0, 1.0, 1.0), TextObject::new("x"));

        assert!(matches!(hook.custom_draw(&args(&a)), HookAction::Replace { ref html, .. } if html == "A"));
        assert_eq!(hook.custom_draw(&args(&b)), HookAction::Skip);
        assert_eq!(hook.len(), 2);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut hook = CompositeHook::new();
        let a = ReportObject::text(ObjectBase::new("A", 0.0, 0.0, 1.0, 1.0), TextObject::new("x"));
        assert_eq!(hook.custom_draw(&args(&a)), HookAction::Continue);
        assert!(!HookAction::Continue.is_handled());
    }
}
