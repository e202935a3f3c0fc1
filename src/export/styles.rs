//! Style deduplication.
//!
//! Every distinct style body is interned once and referenced by class name.
//! Rules are flushed per page; only styles added since the previous flush are
//! written. In discrete-page output the cache is cleared at each page start
//! because class names are page-scoped; in continuous output it persists and
//! keeps growing.

use std::collections::HashMap;

/// Interning cache for CSS style bodies.
#[derive(Debug, Default)]
pub struct StyleCache {
    styles: Vec<String>,
    index: HashMap<String, usize>,
    /// Styles below this index have already been written
    emitted: usize,
    /// Page number prefixed to class names, `None` in continuous output
    scope: Option<u32>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for a new page.
    pub fn begin_page(&mut self, page_number: u32, continuous: bool) {
        self.reset_if_not_continuous(continuous);
        self.scope = if continuous { None } else { Some(page_number) };
    }

    /// Clear the cache unless output is continuous.
    pub fn reset_if_not_continuous(&mut self, continuous: bool) {
        if !continuous {
            self.styles.clear();
            self.index.clear();
            self.emitted = 0;
        }
    }

    /// Intern a style body and return its index.
    pub fn intern(&mut self, style: &str) -> usize {
        if let Some(&idx) = self.index.get(style) {
            return idx;
        }
        let idx = self.styles.len();
        self.styles.push(style.to_string());
        self.index.insert(style.to_string(), idx);
        idx
    }

    /// Class name of an interned style.
    pub fn class_name(&self, idx: usize) -> String {
        match self.scope {
            Some(page) => format!("p{}s{}", page, idx),
            None => format!("s{}", idx),
        }
    }

    /// Intern a style body and return a `class="..."` attribute for it.
    pub fn class_attr(&mut self, style: &str) -> String {
        let idx = self.intern(style);
        format!("class=\"{}\"", self.class_name(idx))
    }

    /// Write the rules added since the last flush and advance the watermark.
    ///
    /// Returns an empty string when nothing is new.
    pub fn emit_new_styles(&mut self) -> String {
        if self.emitted >= self.styles.len() {
            return String::new();
        }

        let mut out = String::from("<style type=\"text/css\">\n");
        for idx in self.emitted..self.styles.len() {
            out.push_str(&format!(".{} {{ {} }}\n", self.class_name(idx), self.styles[idx]));
        }
        out.push_str("</style>\n");

        self.emitted = self.styles.len();
        out
    }

    /// Number of interned styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Index below which styles have been written.
    pub fn watermark(&self) -> usize {
        self.emitted
    }
}
