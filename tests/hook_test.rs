//! Integration tests for custom-draw hooks and extensions.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use pagelayer::model::{CustomObject, TableCell, TableObject, TableRow, TextObject};
use pagelayer::{
    Band, BandKind, CompositeHook, CustomDrawArgs, Document, DrawTarget, ExportHook, ExportOptions,
    ExtendedExport, HookAction, HtmlExporter, ObjectBase, ObjectKind, Page, ReportObject,
};

fn doc_with(objects: Vec<ReportObject>, pages: usize) -> Document {
    let mut doc = Document::new();
    for _ in 0..pages {
        let mut page = Page::new(100.0, 80.0);
        let mut band = Band::new(BandKind::Data, ObjectBase::new("Data1", 0.0, 0.0, 300.0, 200.0));
        band.objects = objects.clone();
        page.add_band(band);
        doc.add_page(page);
    }
    doc
}

fn text(name: &str, value: &str) -> ReportObject {
    ReportObject::text(ObjectBase::new(name, 10.0, 10.0, 100.0, 20.0), TextObject::new(value))
}

/// Replaces one named target with a fixed fragment.
struct ReplaceNamed {
    name: &'static str,
    html: &'static str,
}

impl ExportHook for ReplaceNamed {
    fn custom_draw(&mut self, args: &CustomDrawArgs<'_>) -> HookAction {
        if args.target.name() == self.name {
            HookAction::Replace {
                html: self.html.to_string(),
                css: format!(".{} {{ color:red; }}", self.name.to_lowercase()),
            }
        } else {
            HookAction::Continue
        }
    }
}

/// Records every offered target and lifecycle call.
#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<(String, bool, f32)>>>,
    starts: Arc<AtomicU32>,
    ends: Arc<AtomicU32>,
}

impl ExportHook for Recorder {
    fn custom_draw(&mut self, args: &CustomDrawArgs<'_>) -> HookAction {
        let is_cell = matches!(args.target, DrawTarget::Cell(_));
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((args.target.name().to_string(), is_cell, args.top));
        }
        HookAction::Continue
    }

    fn on_page_start(&mut self, _page_number: u32) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_page_end(&mut self, _page_number: u32) {
        self.ends.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_replace_appends_fragments() {
    let doc = doc_with(vec![text("Chart", "unused"), text("Other", "kept")], 1);
    let mut exporter = HtmlExporter::default().with_hook(ReplaceNamed {
        name: "Chart",
        html: "<canvas id=\"chart\"></canvas>",
    });
    let result = exporter.export(&doc).unwrap();
    let page = &result.pages[0];

    assert!(page.html.contains("<canvas id=\"chart\"></canvas>"));
    assert!(!page.html.contains("unused"));
    assert!(page.html.contains("kept"));
    assert!(page.styles.contains(".chart { color:red; }"));
    assert_eq!(result.stats.custom_drawn, 1);
}

#[test]
fn test_first_handling_hook_wins() {
    let doc = doc_with(vec![text("Chart", "unused")], 1);
    let recorder = Recorder::default();
    let mut exporter = HtmlExporter::default()
        .with_hook(ReplaceNamed {
            name: "Chart",
            html: "<b>first</b>",
        })
        .with_hook(ReplaceNamed {
            name: "Chart",
            html: "<b>second</b>",
        })
        .with_hook(recorder.clone());
    let result = exporter.export(&doc).unwrap();

    assert!(result.pages[0].html.contains("<b>first</b>"));
    assert!(!result.pages[0].html.contains("<b>second</b>"));
    // the chain stopped before the recorder
    assert!(recorder.seen.lock().unwrap().is_empty());
}

#[test]
fn test_composite_hook_as_one_hook() {
    let doc = doc_with(vec![text("A", "a"), text("B", "b")], 1);
    let composite = CompositeHook::new()
        .with(ReplaceNamed { name: "A", html: "<i>a</i>" })
        .with(ReplaceNamed { name: "B", html: "<i>b</i>" });
    assert_eq!(composite.len(), 2);

    let result = HtmlExporter::default().with_hook(composite).export(&doc).unwrap();
    assert!(result.pages[0].html.contains("<i>a</i>"));
    assert!(result.pages[0].html.contains("<i>b</i>"));
    assert_eq!(result.stats.custom_drawn, 2);
}

#[test]
fn test_skip_produces_nothing() {
    struct SkipAll;
    impl ExportHook for SkipAll {
        fn custom_draw(&mut self, _args: &CustomDrawArgs<'_>) -> HookAction {
            HookAction::Skip
        }
    }

    let doc = doc_with(vec![text("A", "hidden text")], 1);
    let result = HtmlExporter::default().with_hook(SkipAll).export(&doc).unwrap();
    assert!(!result.pages[0].html.contains("hidden text"));
    assert_eq!(result.stats.objects, 0);
    assert_eq!(result.stats.custom_drawn, 1);
}

#[test]
fn test_cells_are_offered_to_hooks() {
    let mut table = TableObject::with_grid(&[40.0, 40.0], vec![TableRow::from_strings(20.0, ["x", "y"])]);
    table.rows[0].cells[1] = TableCell::text("y").named("Cell_y");
    let obj = ReportObject::table(ObjectBase::new("Table1", 0.0, 0.0, 80.0, 20.0), table);
    let doc = doc_with(vec![obj], 1);
    let recorder = Recorder::default();
    let mut exporter = HtmlExporter::default()
        .with_hook(ReplaceNamed {
            name: "Cell_y",
            html: "<u>cell</u>",
        })
        .with_hook(recorder.clone());
    let result = exporter.export(&doc).unwrap();

    assert!(result.pages[0].html.contains("<u>cell</u>"));
    assert!(result.pages[0].html.contains(">x</div>"));
    let seen = recorder.seen.lock().unwrap();
    assert!(seen.iter().any(|(name, is_cell, _)| name == "Table1" && !is_cell));
    assert_eq!(seen.iter().filter(|(_, is_cell, _)| *is_cell).count(), 1);
}

#[test]
fn test_page_lifecycle_calls() {
    let doc = doc_with(vec![text("A", "a")], 3);
    let recorder = Recorder::default();
    let mut exporter = HtmlExporter::default().with_hook(recorder.clone());
    exporter.export(&doc).unwrap();

    assert_eq!(recorder.starts.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.ends.load(Ordering::SeqCst), 3);
}

#[test]
fn test_hook_top_includes_surface_offset() {
    let doc = doc_with(vec![text("A", "a")], 2);
    let recorder = Recorder::default();
    let options = ExportOptions::default().with_continuous(true);
    let result = HtmlExporter::new(options).with_hook(recorder.clone()).export(&doc).unwrap();

    let seen = recorder.seen.lock().unwrap();
    let tops: Vec<f32> = seen.iter().map(|(_, _, top)| *top).collect();
    assert_eq!(tops.len(), 2);
    assert_eq!(tops[0], 10.0);
    assert_eq!(tops[1], 10.0 + result.pages[1].surface_top);
}

struct Badge;

impl ExtendedExport for Badge {
    fn content(&self, object: &ReportObject, custom: &CustomObject, zoom: f32) -> pagelayer::Result<String> {
        let label = custom.properties["label"].as_str().unwrap_or_default();
        Ok(format!(
            "<span data-name=\"{}\" data-zoom=\"{}\">{}</span>",
            object.base.name, zoom, label
        ))
    }
}

fn custom(name: &str, type_name: &str) -> ReportObject {
    ReportObject::new(
        ObjectBase::new(name, 0.0, 0.0, 40.0, 20.0),
        ObjectKind::Custom(CustomObject {
            type_name: type_name.into(),
            properties: serde_json::json!({ "label": "new" }),
        }),
    )
}

#[test]
fn test_registered_extension_exports_content() {
    let doc = doc_with(vec![custom("Badge1", "badge")], 1);
    let options = ExportOptions::default().with_zoom(2.0);
    let result = HtmlExporter::new(options).with_extension("badge", Badge).export(&doc).unwrap();

    assert!(result.pages[0]
        .html
        .contains("<span data-name=\"Badge1\" data-zoom=\"2\">new</span>"));
}

#[test]
fn test_unregistered_extension_falls_back() {
    let doc = doc_with(vec![custom("Badge1", "unknown")], 1);
    let result = HtmlExporter::default().with_extension("badge", Badge).export(&doc).unwrap();

    assert!(!result.pages[0].html.contains("data-name"));
    assert_eq!(result.stats.objects, 1);
}
