//! Integration tests for page streaming and sinks.

use pagelayer::model::{Color, Fill, ShapeKind, ShapeObject, TextObject};
use pagelayer::{
    Band, BandKind, DirectorySink, Document, ExportOptions, FinishedPage, HtmlExporter, ObjectBase, Page,
    PageSelection, ReportObject,
};

fn numbered_doc(pages: u32) -> Document {
    let mut doc = Document::new();
    for n in 1..=pages {
        let mut page = Page::new(100.0, 80.0);
        let mut band = Band::new(BandKind::Data, ObjectBase::new("Data1", 0.0, 0.0, 300.0, 200.0));
        band.add_object(ReportObject::text(
            ObjectBase::new("Number", 0.0, 0.0, 100.0, 20.0),
            TextObject::new(format!("page-{}", n)),
        ));
        band.add_object(ReportObject::shape(
            ObjectBase::new("Dot", 0.0, 40.0, 20.0, 20.0).with_fill(Fill::solid(Color::rgb(0, 0, 255))),
            ShapeObject::new(ShapeKind::Ellipse),
        ));
        page.add_band(band);
        doc.add_page(page);
    }
    doc
}

#[test]
fn test_stream_yields_pages_in_order() {
    let doc = numbered_doc(3);
    let mut exporter = HtmlExporter::default();
    let mut stream = exporter.stream(&doc);

    assert_eq!(stream.page_count(), 3);
    assert_eq!(stream.current_page(), 0);
    assert!(!stream.is_done());

    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.number, 1);
    assert_eq!(stream.current_page(), 1);
    assert!(first.html.contains("page-1"));

    let rest: Vec<FinishedPage> = stream.by_ref().map(|p| p.unwrap()).collect();
    assert_eq!(rest.len(), 2);
    assert!(rest[1].html.contains("page-3"));
    assert!(stream.is_done());
    assert_eq!(stream.session().stats().pages, 3);
}

#[test]
fn test_stream_respects_page_range() {
    let doc = numbered_doc(5);
    let options = ExportOptions::default().with_pages(PageSelection::parse("2-3").unwrap());
    let mut exporter = HtmlExporter::new(options);
    let pages: Vec<FinishedPage> = exporter.stream(&doc).map(|p| p.unwrap()).collect();

    let numbers: Vec<u32> = pages.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![2, 3]);
    // indexes count exported pages, not document positions
    assert_eq!(pages[0].index, 0);
    assert_eq!(pages[1].index, 1);
    assert!(pages[0].html.contains("<a name=\"PageN2\"></a>"));
}

#[test]
fn test_stopping_early_keeps_session_state() {
    let doc = numbered_doc(4);
    let mut exporter = HtmlExporter::default();
    let mut stream = exporter.stream(&doc);
    stream.next().unwrap().unwrap();

    let stats = stream.into_session().into_stats();
    assert_eq!(stats.pages, 1);
}

#[test]
fn test_pictures_taken_per_page() {
    let doc = numbered_doc(2);
    let options = ExportOptions::default().with_embedded_pictures(false);
    let mut exporter = HtmlExporter::new(options);
    let mut stream = exporter.stream(&doc);

    stream.next().unwrap().unwrap();
    let first = stream.session_mut().take_pictures();
    assert_eq!(first.len(), 1);

    // identical dot on the second page reuses the stored file
    stream.next().unwrap().unwrap();
    assert!(stream.session_mut().take_pictures().is_empty());
    assert_eq!(stream.session().stats().picture_cache_hits, 1);
}

#[test]
fn test_directory_sink_discrete_files() {
    let dir = tempfile::tempdir().unwrap();
    let doc = numbered_doc(2);
    let options = ExportOptions::default()
        .with_embedded_pictures(false)
        .with_image_prefix("images/");
    let mut sink = DirectorySink::new(dir.path(), "report", false);

    let stats = HtmlExporter::new(options).export_to(&doc, &mut sink).unwrap();
    assert_eq!(stats.pages, 2);

    let first = std::fs::read_to_string(dir.path().join("report1.html")).unwrap();
    let second = std::fs::read_to_string(dir.path().join("report2.html")).unwrap();
    assert!(first.contains("page-1") && !first.contains("page-2"));
    assert!(second.contains("page-2"));

    let pictures: Vec<_> = std::fs::read_dir(dir.path().join("images")).unwrap().collect();
    assert_eq!(pictures.len(), 1);
    assert_eq!(sink.written().len(), 3);
}

#[test]
fn test_directory_sink_continuous_file() {
    let dir = tempfile::tempdir().unwrap();
    let doc = numbered_doc(3);
    let options = ExportOptions::default().with_continuous(true).with_title("All pages");
    let mut sink = DirectorySink::new(dir.path(), "report", true);

    HtmlExporter::new(options).export_to(&doc, &mut sink).unwrap();

    let html = std::fs::read_to_string(dir.path().join("report.html")).unwrap();
    assert!(html.contains("<title>All pages</title>"));
    assert!(html.contains("page-1") && html.contains("page-3"));
    assert_eq!(html.matches("break-after:page").count(), 2);
}

#[test]
fn test_vec_sink_collects_pages() {
    let doc = numbered_doc(2);
    let mut pages: Vec<FinishedPage> = Vec::new();
    HtmlExporter::default().export_to(&doc, &mut pages).unwrap();
    assert_eq!(pages.len(), 2);
}
