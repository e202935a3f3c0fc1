//! pagelayer CLI - layered HTML export for report documents

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagelayer::{
    DirectorySink, Document, ExportOptions, ExportStats, HtmlExporter, ImageFormat, PageSelection, PageSink,
};

#[derive(Parser)]
#[command(name = "pagelayer")]
#[command(author = "pagelayer contributors")]
#[command(version)]
#[command(about = "Export report documents to layered HTML", long_about = None)]
struct Cli {
    /// Input document (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a document to HTML
    Html {
        /// Input document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory (single HTML document on stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Show document information
    Info {
        /// Input document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct ExportArgs {
    /// JSON file with export options; flags override it
    #[arg(long, value_name = "FILE", env = "PAGELAYER_CONFIG")]
    config: Option<PathBuf>,

    /// Zoom factor
    #[arg(short, long)]
    zoom: Option<f32>,

    /// Cut page margins instead of keeping them as empty space
    #[arg(long)]
    no_margins: bool,

    /// Stack all pages on one scrollable surface
    #[arg(long)]
    continuous: bool,

    /// Do not insert print page breaks between stacked pages
    #[arg(long)]
    no_page_breaks: bool,

    /// Skip rasterized objects
    #[arg(long)]
    no_pictures: bool,

    /// Write pictures as separate files instead of data URIs
    #[arg(long)]
    link_pictures: bool,

    /// Picture encoding
    #[arg(long, value_enum)]
    image_format: Option<Encoding>,

    /// Rasterize at three times the resolution and downsample
    #[arg(long)]
    high_quality: bool,

    /// Size tab stops by absolute position instead of run width
    #[arg(long)]
    absolute_tabs: bool,

    /// Script object receiving click events
    #[arg(long)]
    report_id: Option<String>,

    /// Prefix of picture file names
    #[arg(long, default_value = "images/")]
    image_prefix: String,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Document title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Encoding {
    Bmp,
    Png,
    Jpeg,
    Gif,
}

impl From<Encoding> for ImageFormat {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Bmp => ImageFormat::Bmp,
            Encoding::Png => ImageFormat::Png,
            Encoding::Jpeg => ImageFormat::Jpeg,
            Encoding::Gif => ImageFormat::Gif,
        }
    }
}

impl ExportArgs {
    fn to_options(&self) -> Result<ExportOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => ExportOptions::from_file(path)?,
            None => ExportOptions::default(),
        };

        if let Some(zoom) = self.zoom {
            options = options.with_zoom(zoom);
        }
        if self.no_margins {
            options = options.with_margins(false);
        }
        if self.continuous {
            options = options.with_continuous(true);
        }
        if self.no_page_breaks {
            options = options.with_page_breaks(false);
        }
        if self.no_pictures {
            options = options.with_pictures(false);
        }
        if self.link_pictures {
            options = options
                .with_embedded_pictures(false)
                .with_image_prefix(self.image_prefix.as_str());
        }
        if let Some(encoding) = self.image_format {
            options = options.with_image_format(encoding.into());
        }
        if self.high_quality {
            options = options.with_high_quality(true);
        }
        if self.absolute_tabs {
            options = options.with_layers(false);
        }
        if let Some(ref id) = self.report_id {
            options = options.with_report_id(id.as_str());
        }
        if let Some(ref p) = self.pages {
            let selection = PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?;
            options = options.with_pages(selection);
        }
        if let Some(ref title) = self.title {
            options = options.with_title(title.as_str());
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Html {
            input,
            output,
            export,
        }) => cmd_html(&input, output.as_deref(), &export),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: export if input is provided
            if let Some(input) = cli.input {
                let output = cli.output.unwrap_or_else(|| default_output_dir(&input));
                cmd_html(&input, Some(&output), &ExportArgs {
                    image_prefix: "images/".into(),
                    ..ExportArgs::default()
                })
            } else {
                println!("{}", "Usage: pagelayer <FILE> [OUTPUT]".yellow());
                println!("       pagelayer --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}_html", stem))
}

fn cmd_html(input: &Path, output: Option<&Path>, args: &ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options()?;
    let doc = Document::from_file(input)?;

    let Some(output_dir) = output else {
        let result = HtmlExporter::new(options).export(&doc)?;
        for picture in &result.pictures {
            log::warn!("Picture {} not written without an output directory", picture.name);
        }
        println!("{}", result.to_html());
        return Ok(());
    };

    fs::create_dir_all(output_dir)?;
    let base_name = input.file_stem().unwrap_or_default().to_string_lossy().into_owned();
    let mut sink = DirectorySink::new(output_dir, base_name, options.continuous);
    let mut exporter = HtmlExporter::new(options);
    let metadata = exporter.metadata(&doc);

    let pb = ProgressBar::new(doc.page_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut stream = exporter.stream(&doc);
    while let Some(page) = stream.next() {
        let page = page?;
        pb.set_message(format!("page {}", page.number));
        sink.page(page)?;
        let pictures = stream.session_mut().take_pictures();
        if !pictures.is_empty() {
            sink.pictures(pictures)?;
        }
        pb.inc(1);
    }
    let stats = stream.into_session().into_stats();

    pb.set_message("Writing files...");
    sink.finish(&metadata)?;
    pb.finish_with_message("Done!");

    print_stats(&stats);
    println!("\n{}", "Output files:".green().bold());
    let written = sink.written();
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        let shown = path.strip_prefix(output_dir).unwrap_or(path);
        println!("  {} {}", branch.dimmed(), shown.display());
    }

    Ok(())
}

fn print_stats(stats: &ExportStats) {
    println!();
    println!("{}", "Export Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), stats.pages);
    println!("{}: {}", "Objects".bold(), stats.objects);
    println!("{}: {} ({} cells)", "Tables".bold(), stats.tables, stats.cells);
    println!(
        "{}: {} ({} cache hits)",
        "Pictures".bold(),
        stats.pictures,
        stats.picture_cache_hits
    );
    println!("{}: {}", "Styles".bold(), stats.styles);
    if stats.custom_drawn > 0 {
        println!("{}: {}", "Custom drawn".bold(), stats.custom_drawn);
    }
    if stats.skipped_text > 0 {
        println!("{}: {}", "Text runs not rasterized".bold(), stats.skipped_text);
    }
    if !stats.is_clean() {
        println!(
            "{}: {} failed pictures, {} broken page links",
            "Warnings".yellow().bold(),
            stats.failed_pictures,
            stats.linked_page_failures
        );
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::from_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());

    let meta = &doc.metadata;
    if let Some(ref title) = meta.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = meta.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = meta.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref created) = meta.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = meta.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let bands: usize = doc.pages.iter().map(|p| p.bands.len()).sum();
    let linked = doc.pages.iter().filter(|p| p.link.is_some()).count();
    println!("{}: {}", "Bands".bold(), bands);
    println!("{}: {}", "Objects".bold(), doc.object_count());
    if linked > 0 {
        println!("{}: {}", "Linked pages".bold(), linked);
    }

    for (i, page) in doc.pages.iter().enumerate() {
        println!(
            "  {} {} {}x{} mm{}",
            "Page".dimmed(),
            i + 1,
            page.paper_width,
            page.paper_height,
            if page.watermark.enabled { ", watermark" } else { "" }
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagelayer".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layered HTML export for report documents");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(default_output_dir(Path::new("reports/q1.json")), PathBuf::from("q1_html"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("export.json");
        fs::write(&config, r#"{ "zoom": 2.0, "continuous": true }"#).unwrap();

        let args = ExportArgs {
            config: Some(config),
            zoom: Some(1.5),
            link_pictures: true,
            image_prefix: "img/".into(),
            pages: Some("2-3".into()),
            ..ExportArgs::default()
        };
        let options = args.to_options().unwrap();

        assert_eq!(options.zoom, 1.5);
        assert!(options.continuous);
        assert!(!options.embed_pictures);
        assert_eq!(options.image_prefix, "img/");
        assert!(options.page_selection.includes(2) && !options.page_selection.includes(4));
    }

    #[test]
    fn test_invalid_page_range_rejected() {
        let args = ExportArgs {
            pages: Some("5-2".into()),
            ..ExportArgs::default()
        };
        assert!(args.to_options().is_err());
    }
}
