//! Destinations for finished pages.

use super::result::StoredPicture;
use crate::error::Result;
use crate::model::Metadata;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One exported page: its style block, its markup and its geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishedPage {
    /// Page number in the document, 1-indexed
    pub number: u32,
    /// Position among exported pages, 0-indexed
    pub index: u32,
    /// `<style>` blocks introduced by this page
    pub styles: String,
    pub html: String,
    /// Output width in pixels
    pub width: f32,
    /// Output height in pixels
    pub height: f32,
    /// Vertical offset of the page on a continuous surface
    pub surface_top: f32,
}

/// Receiver of finished pages.
pub trait PageSink {
    /// Accept the next finished page.
    fn page(&mut self, page: FinishedPage) -> Result<()>;

    /// Accept pictures referenced by file name from the markup.
    fn pictures(&mut self, _pictures: Vec<StoredPicture>) -> Result<()> {
        Ok(())
    }

    /// Called once after the last page.
    fn finish(&mut self, _metadata: &Metadata) -> Result<()> {
        Ok(())
    }
}

impl PageSink for Vec<FinishedPage> {
    fn page(&mut self, page: FinishedPage) -> Result<()> {
        self.push(page);
        Ok(())
    }
}

/// Assemble pages into one standalone HTML document.
pub fn html_document(metadata: &Metadata, pages: &[FinishedPage]) -> String {
    let body: usize = pages.iter().map(|p| p.html.len() + p.styles.len()).sum();
    let mut out = String::with_capacity(body + 256);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    if let Some(title) = metadata.title.as_deref() {
        out.push_str("<title>");
        out.push_str(&html_escape::encode_text(title));
        out.push_str("</title>\n");
    }
    out.push_str(&metadata.to_html_meta());
    out.push_str("</head>\n<body>\n");
    for page in pages {
        out.push_str(&page.styles);
        out.push_str(&page.html);
        out.push('\n');
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Writes HTML files and referenced pictures into a directory.
///
/// Continuous output goes to `{base}.html`; discrete output writes one
/// `{base}{number}.html` per page.
pub struct DirectorySink {
    dir: PathBuf,
    base_name: String,
    continuous: bool,
    pages: Vec<FinishedPage>,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>, continuous: bool) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            continuous,
            pages: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, path: PathBuf, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        log::debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn target(&self, file_name: &str) -> PathBuf {
        self.dir.join(Path::new(file_name))
    }
}

impl PageSink for DirectorySink {
    fn page(&mut self, page: FinishedPage) -> Result<()> {
        self.pages.push(page);
        Ok(())
    }

    fn pictures(&mut self, pictures: Vec<StoredPicture>) -> Result<()> {
        for picture in pictures {
            let path = self.target(&picture.name);
            self.write(path, &picture.data)?;
        }
        Ok(())
    }

    fn finish(&mut self, metadata: &Metadata) -> Result<()> {
        let pages = std::mem::take(&mut self.pages);
        if self.continuous {
            let path = self.target(&format!("{}.html", self.base_name));
            self.write(path, html_document(metadata, &pages).as_bytes())?;
        } else {
            for page in &pages {
                let path = self.target(&format!("{}{}.html", self.base_name, page.number));
                let html = html_document(metadata, std::slice::from_ref(page));
                self.write(path, html.as_bytes())?;
            }
        }
        Ok(())
    }
}
