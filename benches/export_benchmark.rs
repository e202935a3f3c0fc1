//! Benchmarks for pagelayer export performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks export synthetic report documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagelayer::model::{Border, Color, Fill, ShapeKind, ShapeObject, TableObject, TableRow, TextObject, TextRenderMode};
use pagelayer::{Band, BandKind, Document, ExportOptions, HtmlExporter, ObjectBase, Page, ReportObject};

/// Creates a document whose pages each hold a header, a grid and a few shapes.
fn create_test_document(page_count: usize) -> Document {
    let mut doc = Document::new();

    for i in 0..page_count {
        let mut page = Page::a4();

        let mut header = Band::new(BandKind::PageHeader, ObjectBase::new("PageHeader1", 0.0, 0.0, 718.0, 40.0));
        header.add_object(ReportObject::text(
            ObjectBase::new("Title", 0.0, 0.0, 718.0, 30.0).with_border(Border::all(1.0, Color::BLACK)),
            TextObject::new(format!("Quarterly figures, page {}", i + 1)),
        ));
        page.add_band(header);

        let mut data = Band::new(BandKind::Data, ObjectBase::new("Data1", 0.0, 40.0, 718.0, 600.0));
        let rows = (0..20)
            .map(|r| TableRow::from_strings(20.0, (0..5).map(|c| format!("r{}c{}", r, c))))
            .collect();
        data.add_object(ReportObject::table(
            ObjectBase::new("Table1", 0.0, 40.0, 500.0, 400.0),
            TableObject::with_grid(&[100.0; 5], rows),
        ));
        data.add_object(ReportObject::text(
            ObjectBase::new("Notes", 0.0, 450.0, 500.0, 60.0),
            TextObject::new("<b>Note:</b> figures are <i>preliminary</i>.")
                .with_render_mode(TextRenderMode::HtmlParagraph),
        ));
        for s in 0..3 {
            data.add_object(ReportObject::shape(
                ObjectBase::new(format!("Shape{}", s), 520.0, 40.0 + s as f32 * 60.0, 50.0, 50.0)
                    .with_fill(Fill::solid(Color::rgb(200, 40, 40))),
                ShapeObject::new(ShapeKind::Ellipse),
            ));
        }
        page.add_band(data);

        doc.add_page(page);
    }

    doc
}

/// Benchmark export at various document sizes.
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for page_count in [1, 5, 10].iter() {
        let doc = create_test_document(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let mut exporter = HtmlExporter::default();
                let _ = exporter.export(black_box(&doc));
            });
        });
    }

    group.finish();
}

/// Benchmark continuous output, where the style cache spans all pages.
fn bench_continuous(c: &mut Criterion) {
    let doc = create_test_document(10);
    let options = ExportOptions::default().with_continuous(true);

    c.bench_function("continuous_10_pages", |b| {
        b.iter(|| pagelayer::export_html(black_box(&doc), &options).unwrap());
    });
}

/// Benchmark parallel export of independent documents.
fn bench_batch(c: &mut Criterion) {
    let docs: Vec<Document> = (0..8).map(|_| create_test_document(2)).collect();
    let options = ExportOptions::default();

    c.bench_function("batch_8_documents", |b| {
        b.iter(|| pagelayer::export_batch(black_box(&docs), &options));
    });
}

criterion_group!(benches, bench_export, bench_continuous, bench_batch);
criterion_main!(benches);
