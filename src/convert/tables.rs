//! Table reconstruction from `<table>` spans.
//!
//! Cells become plain paragraphs except for two special shapes: the
//! passport-photo placeholder and signature cells (any cell whose text
//! carries an underscore run), which decompose into name/role lines plus
//! a synthesized signature rule.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Alignment, Paragraph, Table, TableCell, TableRow, TextRun};

use super::inline_runs;
use super::signature::{PHOTO_PLACEHOLDER, SIGNATURE_RULE};
use super::visible_text;

static TR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap());
static TD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<t[dh][^>]*>(.*?)</t[dh]>").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<br\s*/?>|</p>").unwrap());
static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{4,}").unwrap());

pub(super) fn parse_table(table_html: &str) -> Table {
    let rows = TR
        .captures_iter(table_html)
        .map(|row| {
            let cells = TD
                .captures_iter(&row[1])
                .map(|cell| parse_cell(&cell[1]))
                .collect();
            TableRow { cells }
        })
        .collect();
    Table { rows }
}

fn parse_cell(inner: &str) -> TableCell {
    let text = visible_text(inner);

    if text.to_lowercase().contains(&PHOTO_PLACEHOLDER.to_lowercase()) {
        let mut para = Paragraph::new(vec![TextRun::plain(PHOTO_PLACEHOLDER)]);
        para.alignment = Alignment::Center;
        return TableCell::new(vec![para]);
    }

    if UNDERSCORE_RUN.is_match(&text) {
        return signature_cell(inner);
    }

    let paragraphs = cell_lines(inner)
        .into_iter()
        .map(|line| Paragraph::new(inline_runs(&line)))
        .collect();
    TableCell::new(paragraphs)
}

/// Signature cells keep their line order: underscore runs become the
/// synthesized rule line, everything else (name, role) stays a plain
/// paragraph.
fn signature_cell(inner: &str) -> TableCell {
    let paragraphs = cell_lines(inner)
        .into_iter()
        .map(|line| {
            if UNDERSCORE_RUN.is_match(&visible_text(&line)) {
                Paragraph::new(vec![TextRun::plain(SIGNATURE_RULE)])
            } else {
                Paragraph::new(inline_runs(&line))
            }
        })
        .collect();
    TableCell::new(paragraphs)
}

fn cell_lines(inner: &str) -> Vec<String> {
    LINE_BREAK
        .split(inner)
        .map(str::to_string)
        .filter(|line| !visible_text(line).is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_FONT;

    #[test]
    fn rows_and_cells_reconstruct() {
        let table = parse_table(
            "<table><tr><td>Monthly Rent</td><td>Rs. 15000</td></tr>\
             <tr><td>Deposit</td><td>Rs. 45000</td></tr></table>",
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells.len(), 2);
        assert_eq!(table.rows[0].cells[0].paragraphs[0].plain_text(), "Monthly Rent");
        assert_eq!(table.rows[1].cells[1].paragraphs[0].plain_text(), "Rs. 45000");
    }

    #[test]
    fn every_cell_is_bordered_and_top_aligned() {
        use crate::model::VerticalAlignment;
        let table = parse_table(
            "<table><tr><td>Rent</td><td>______________<br/>Ramesh Patel</td></tr></table>",
        );
        for cell in &table.rows[0].cells {
            assert!(cell.bordered);
            assert_eq!(cell.v_align, VerticalAlignment::Top);
        }
    }

    #[test]
    fn photo_cell_becomes_centered_placeholder() {
        let table = parse_table("<table><tr><td>  passport size photo </td></tr></table>");
        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.paragraphs.len(), 1);
        assert_eq!(cell.paragraphs[0].plain_text(), PHOTO_PLACEHOLDER);
        assert_eq!(cell.paragraphs[0].alignment, Alignment::Center);
    }

    #[test]
    fn signature_cell_decomposes_into_rule_and_lines() {
        let table = parse_table(
            "<table><tr><td>______________<br/>Ramesh Patel<br/>Landlord</td></tr></table>",
        );
        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.paragraphs.len(), 3);
        assert_eq!(cell.paragraphs[0].plain_text(), SIGNATURE_RULE);
        assert_eq!(cell.paragraphs[1].plain_text(), "Ramesh Patel");
        assert_eq!(cell.paragraphs[2].plain_text(), "Landlord");
        assert_eq!(cell.paragraphs[1].runs[0].font_name, DEFAULT_FONT);
    }

    #[test]
    fn bold_spans_inside_cells_split_into_runs() {
        let table = parse_table("<table><tr><td><strong>Rent:</strong> 15000</td></tr></table>");
        let runs = &table.rows[0].cells[0].paragraphs[0].runs;
        assert_eq!(runs.len(), 2);
        assert!(runs[0].bold);
        assert_eq!(runs[0].text, "Rent:");
        assert!(!runs[1].bold);
    }
}
