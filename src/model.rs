//! Structured document model recovered from rendered HTML, consumed by an
//! external word-processing file serializer.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Base body text size in points.
pub const BASE_FONT_SIZE: f32 = 12.0;
/// Numbered clause headings.
pub const HEADING_FONT_SIZE: f32 = 13.0;
/// Document title line.
pub const TITLE_FONT_SIZE: f32 = 16.0;

pub const DEFAULT_FONT: &str = "Calibri";
pub const GUJARATI_FONT: &str = "Noto Sans Gujarati";

/// A single-style span of text. Bold and regular text in one paragraph
/// are separate runs; a run never mixes styles.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub font_name: &'static str,
    pub font_size: f32,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            font_name: DEFAULT_FONT,
            font_size: BASE_FONT_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub alignment: Alignment,
    pub space_before: f32,
    pub space_after: f32,
    pub page_break_before: bool,
}

impl Paragraph {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: 6.0,
            page_break_before: false,
        }
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// An embedded scanned-document image, sized in points.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub width_pt: f32,
    pub height_pt: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    /// Single-line border on all four sides.
    pub bordered: bool,
    pub v_align: VerticalAlignment,
}

impl TableCell {
    /// Generated cells are uniformly bordered and top-aligned.
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            bordered: true,
            v_align: VerticalAlignment::Top,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// Ordered document content. Tables keep their source position exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentElement {
    Paragraph(Paragraph),
    Table(Table),
    Image(ImageBlock),
}
