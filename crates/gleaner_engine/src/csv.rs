//! Small CSV reader and writer for the URL list and the results file.

use std::collections::HashSet;
use std::io::{self, Write};
use std::mem::take;

/// Split CSV text into rows of fields. Handles quoted fields, doubled quotes
/// and CRLF; blank lines are dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                push_row(&mut rows, take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    // Unterminated quotes still yield what was read.
    row.push(field);
    push_row(&mut rows, row);
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|cell| !cell.is_empty()) {
        rows.push(row);
    }
}

/// How to pick URLs out of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlColumn {
    /// Zero-based column index.
    pub index: usize,
    pub has_header: bool,
}

impl Default for UrlColumn {
    fn default() -> Self {
        Self {
            index: 1,
            has_header: true,
        }
    }
}

/// Ordered, de-duplicated URL list from CSV text. Rows missing the column or
/// holding only whitespace are skipped; the first occurrence of a URL wins.
pub fn read_url_list(text: &str, column: UrlColumn) -> Vec<String> {
    let rows = parse_rows(text);
    let skip = usize::from(column.has_header);
    let mut seen = HashSet::new();
    rows.into_iter()
        .skip(skip)
        .filter_map(|mut row| {
            if column.index < row.len() {
                Some(row.swap_remove(column.index))
            } else {
                None
            }
        })
        .map(|cell| cell.trim().to_string())
        .filter(|url| !url.is_empty())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Write one row with every field quoted and inner quotes doubled.
pub fn write_quoted_row<W: Write>(mut w: W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
    }
    w.write_all(b"\n")
}
