//! HTML → document model conversion.
//!
//! Recovers semantic structure (paragraphs with styled runs, tables,
//! images) from the fully resolved HTML so it can be re-emitted as a
//! native word-processing document. The scan is strictly positional:
//! text before the first table, the table, text between tables, and so
//! on. Tables are never reordered or hoisted.

pub(crate) mod signature;
mod tables;

use std::io::Cursor;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::embed::{self, AssetFormat, AssetFetcher, AssetSource, PdfPreviewer};
use crate::model::{
    Alignment, BASE_FONT_SIZE, DEFAULT_FONT, DocumentElement, GUJARATI_FONT, HEADING_FONT_SIZE,
    ImageBlock, ImageFormat, Paragraph, TITLE_FONT_SIZE, TextRun,
};
use crate::record::AgreementRecord;

static TABLE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<table[^>]*>.*?</table>").unwrap());
static STYLE_SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style[^>]*>.*?</style>|<script[^>]*>.*?</script>").unwrap()
});
static PARA_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<br\s*/?>|</p>").unwrap());
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static BOLD_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)\s*>").unwrap());
static CENTERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)text-align\s*:\s*center|align\s*=\s*"?center"#).unwrap());
static NUMBERED_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.").unwrap());
static PARTY_DESIGNATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)hereinafter\s+called\s+the\s+(landlord|tenant)").unwrap());

const MAX_IMAGE_WIDTH_PT: f32 = 450.0;
const MAX_IMAGE_HEIGHT_PT: f32 = 600.0;
const PX_TO_PT: f32 = 0.75;

/// Convert resolved HTML into the ordered document model, appending one
/// page-break-preceded section per owner/tenant identity document found
/// on the record.
pub fn to_document_model(
    html: &str,
    record: &AgreementRecord,
    fetcher: &dyn AssetFetcher,
    previewer: Option<&dyn PdfPreviewer>,
) -> Vec<DocumentElement> {
    let html = signature::normalize(html);
    let mut elements = Vec::new();

    let mut pos = 0;
    for span in TABLE_SPAN.find_iter(&html) {
        segment_text(&html[pos..span.start()], &mut elements);
        elements.push(DocumentElement::Table(tables::parse_table(span.as_str())));
        pos = span.end();
    }
    segment_text(&html[pos..], &mut elements);

    append_document_images(record, fetcher, previewer, &mut elements);
    elements
}

/// Split non-table HTML into paragraph blocks and classify each one.
fn segment_text(fragment: &str, out: &mut Vec<DocumentElement>) {
    let cleaned = STYLE_SCRIPT.replace_all(fragment, "");
    let broken = PARA_BREAK.replace_all(&cleaned, "\n\n");

    for chunk in BLANK_LINE.split(&broken) {
        let text = visible_text(chunk);
        if text.is_empty() {
            continue;
        }
        let mut runs = inline_runs(chunk);
        let mut para = Paragraph::new(Vec::new());
        let upper = text.to_uppercase();

        if upper.contains("RENT AGREEMENT")
            || upper.contains("RENTAL AGREEMENT")
            || CENTERED.is_match(chunk)
        {
            para.alignment = Alignment::Center;
            for run in &mut runs {
                run.bold = true;
                run.font_size = TITLE_FONT_SIZE;
            }
            para.space_after = 12.0;
        } else if NUMBERED_HEADING.is_match(&text) {
            for run in &mut runs {
                run.font_size = HEADING_FONT_SIZE;
            }
            para.space_before = 6.0;
        } else if PARTY_DESIGNATION.is_match(&text) {
            para.alignment = Alignment::Right;
        }

        para.runs = runs;
        out.push(DocumentElement::Paragraph(para));
    }
}

/// Split a fragment into single-style runs: `<strong>`/`<b>` spans become
/// bold runs, the rest stay regular. Font family is chosen per run by
/// script detection, since mixed-language paragraphs are expected.
pub(super) fn inline_runs(fragment: &str) -> Vec<TextRun> {
    let mut runs: Vec<TextRun> = Vec::new();
    let mut pos = 0;

    for span in BOLD_SPAN.captures_iter(fragment) {
        let whole = span.get(0).unwrap();
        push_run(&mut runs, &fragment[pos..whole.start()], false);
        push_run(&mut runs, &span[1], true);
        pos = whole.end();
    }
    push_run(&mut runs, &fragment[pos..], false);

    if let Some(first) = runs.first_mut() {
        let trimmed = first.text.trim_start().to_string();
        first.text = trimmed;
    }
    if let Some(last) = runs.last_mut() {
        let trimmed = last.text.trim_end().to_string();
        last.text = trimmed;
    }
    runs.retain(|r| !r.text.is_empty());
    runs
}

fn push_run(runs: &mut Vec<TextRun>, raw: &str, bold: bool) {
    let text = WS
        .replace_all(&decode_entities(&TAG.replace_all(raw, " ")), " ")
        .into_owned();
    if text.trim().is_empty() {
        return;
    }
    runs.push(TextRun {
        font_name: run_font(&text),
        text,
        bold,
        italic: false,
        font_size: BASE_FONT_SIZE,
    });
}

/// Visible text content of a fragment: tags stripped, entities decoded,
/// whitespace collapsed.
pub(super) fn visible_text(fragment: &str) -> String {
    let no_tags = TAG.replace_all(fragment, " ");
    WS.replace_all(&decode_entities(&no_tags), " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

fn is_gujarati_char(c: char) -> bool {
    ('\u{0A80}'..='\u{0AFF}').contains(&c) || c == '\u{0964}' || c == '\u{0965}'
}

/// Per-run font selection: any Gujarati code point selects the
/// Gujarati-capable family.
fn run_font(text: &str) -> &'static str {
    if text.chars().any(is_gujarati_char) {
        GUJARATI_FONT
    } else {
        DEFAULT_FONT
    }
}

// Identity documents rendered as standalone trailing sections; property
// papers stay inside the HTML body via the embedding resolver.
const PERSON_DOCUMENTS: [(&str, &str); 4] = [
    ("OWNER_AADHAAR_DOCUMENT", "Owner Aadhaar Card"),
    ("OWNER_PAN_DOCUMENT", "Owner PAN Card"),
    ("TENANT_AADHAAR_DOCUMENT", "Tenant Aadhaar Card"),
    ("TENANT_PAN_DOCUMENT", "Tenant PAN Card"),
];

fn append_document_images(
    record: &AgreementRecord,
    fetcher: &dyn AssetFetcher,
    previewer: Option<&dyn PdfPreviewer>,
    out: &mut Vec<DocumentElement>,
) {
    for (key, label) in PERSON_DOCUMENTS {
        let Some(value) = embed::source_from_record(record, key) else {
            continue;
        };
        if embed::is_sentinel(&value) {
            continue;
        }
        out.push(DocumentElement::Paragraph(section_title(label)));
        match materialize_image(&value, fetcher, previewer) {
            Ok(block) => out.push(DocumentElement::Image(block)),
            Err(reason) => {
                log::warn!("{label}: {reason}");
                out.push(DocumentElement::Paragraph(Paragraph::new(vec![TextRun::plain(
                    format!("{label}: {reason}"),
                )])));
            }
        }
    }
}

fn section_title(label: &str) -> Paragraph {
    let mut run = TextRun::plain(label);
    run.bold = true;
    run.font_size = HEADING_FONT_SIZE;
    let mut para = Paragraph::new(vec![run]);
    para.alignment = Alignment::Center;
    para.page_break_before = true;
    para.space_after = 12.0;
    para
}

fn materialize_image(
    value: &str,
    fetcher: &dyn AssetFetcher,
    previewer: Option<&dyn PdfPreviewer>,
) -> Result<ImageBlock, String> {
    let source = AssetSource::classify(value);
    let bytes = fetcher
        .fetch(&source)
        .map_err(|e| format!("document unavailable ({e})"))?;

    match AssetFormat::sniff(&bytes) {
        AssetFormat::Jpeg => Ok(image_block(bytes, ImageFormat::Jpeg)),
        AssetFormat::Png => Ok(image_block(bytes, ImageFormat::Png)),
        AssetFormat::Pdf => match previewer.and_then(|p| p.first_page_png(&bytes)) {
            Some(png) => Ok(image_block(png, ImageFormat::Png)),
            None => Err("PDF preview unavailable".to_string()),
        },
        AssetFormat::Unknown => Err("unsupported document format".to_string()),
    }
}

/// Scale to fit the fixed page bounds, preserving aspect ratio. Scans we
/// cannot decode assume a portrait A4-ish shape.
fn image_block(data: Vec<u8>, format: ImageFormat) -> ImageBlock {
    let (px_w, px_h) = image::ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .ok()
        .and_then(|r| r.into_dimensions().ok())
        .unwrap_or((600, 800));

    let mut width = px_w as f32 * PX_TO_PT;
    let mut height = px_h as f32 * PX_TO_PT;
    let scale = (MAX_IMAGE_WIDTH_PT / width)
        .min(MAX_IMAGE_HEIGHT_PT / height)
        .min(1.0);
    width *= scale;
    height *= scale;

    ImageBlock { data, format, width_pt: width, height_pt: height }
}
