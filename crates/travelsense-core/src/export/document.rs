//! Paginated text documents
//!
//! A [`Document`] is a list of A4 pages, each holding text lines at absolute
//! positions. Coordinates are millimetres from the top-left corner of the
//! page. [`Layout`] fills a document top to bottom with a running cursor. A
//! line never lands below [`PAGE_BOTTOM`]; callers may also break earlier at
//! block boundaries with [`Layout::break_after`].

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// Page width in millimetres (A4)
pub const PAGE_WIDTH: f32 = 210.0;
/// Page height in millimetres (A4)
pub const PAGE_HEIGHT: f32 = 297.0;
/// Left margin and top cursor position of a fresh page
pub const MARGIN: f32 = 20.0;
/// Lowest cursor position a line may be placed at
pub const PAGE_BOTTOM: f32 = PAGE_HEIGHT - MARGIN;
/// Vertical advance per line of text
pub const LINE_HEIGHT: f32 = 7.0;

/// Millimetres per typographic point
const MM_PER_PT: f32 = 25.4 / 72.0;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    Regular,
    Bold,
}

/// One positioned line of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub font: Font,
    /// 0 is black, 255 white
    pub gray: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text in page order, one entry per line
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// Plain text rendering, pages separated by a form feed
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| {
                p.lines
                    .iter()
                    .map(|l| l.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\u{c}\n")
    }

    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        super::pdf::render(self)
    }

    /// Write the document as PDF to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_pdf_bytes();
        std::fs::write(path, &bytes)?;
        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            pages = self.page_count(),
            "Saved PDF"
        );
        Ok(())
    }
}

/// Greedy top-to-bottom layout with a single vertical cursor
#[derive(Debug)]
pub struct Layout {
    doc: Document,
    y: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        Self {
            doc: Document::default(),
            y: MARGIN,
        }
    }

    /// Current cursor position
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Place a line at the left margin and advance one line
    pub fn text(&mut self, text: &str, size: f32, font: Font) {
        self.text_at(MARGIN, text, size, font);
    }

    /// Place a line at `x` and advance one line
    pub fn text_at(&mut self, x: f32, text: &str, size: f32, font: Font) {
        self.place(x, text, size, font, 0);
        self.y += LINE_HEIGHT;
    }

    /// Place a muted line at `x` and advance one line
    pub fn muted_at(&mut self, x: f32, text: &str, size: f32) {
        self.place(x, text, size, Font::Regular, 100);
        self.y += LINE_HEIGHT;
    }

    pub fn gap(&mut self, amount: f32) {
        self.y += amount;
    }

    /// Start a new page when the cursor is past `threshold`
    pub fn break_after(&mut self, threshold: f32) {
        if self.y > threshold {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        self.doc.pages.push(Page::default());
        self.y = MARGIN;
    }

    pub fn finish(self) -> Document {
        self.doc
    }

    fn place(&mut self, x: f32, text: &str, size: f32, font: Font, gray: u8) {
        if self.y > PAGE_BOTTOM {
            self.new_page();
        }
        let line = TextLine {
            x,
            y: self.y,
            size,
            font,
            gray,
            text: text.to_string(),
        };
        if let Some(page) = self.doc.pages.last_mut() {
            page.lines.push(line);
        }
    }
}

/// Break `text` into lines that fit `width` millimetres at `size` points.
///
/// Width is estimated from an average glyph width. Explicit newlines are kept
/// and words longer than a line are split.
pub fn wrap_text(text: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = ((width / (size * MM_PER_PT * AVG_GLYPH_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    lines
}
