use anyhow::Result;
use regex::Regex;
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Number of leading lines sampled when deciding between CSV and TSV.
const DELIMITER_SAMPLE_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }

    /// Tab-delimited only when tabs outnumber commas in the sampled lines.
    pub fn detect(text: &str) -> Self {
        let (tabs, commas) = text
            .lines()
            .take(DELIMITER_SAMPLE_LINES)
            .fold((0usize, 0usize), |(tabs, commas), line| {
                (
                    tabs + line.matches('\t').count(),
                    commas + line.matches(',').count(),
                )
            });

        if tabs > commas {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }
}

/// Header plus data rows, every data row fitted to the header width.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub delimiter: Delimiter,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub header_repaired: bool,
    /// Rows whose extra cells were folded into the last column.
    pub overflow_rows: usize,
    /// Rows padded with empty trailing cells.
    pub padded_rows: usize,
}

impl ParsedTable {
    fn empty(delimiter: Delimiter, header_repaired: bool) -> Self {
        ParsedTable {
            delimiter,
            header: Vec::new(),
            rows: Vec::new(),
            header_repaired,
            overflow_rows: 0,
            padded_rows: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowFit {
    Exact,
    Overflow,
    Padded,
}

pub struct DelimitedTokenizer {
    broken_header: Regex,
}

impl DelimitedTokenizer {
    pub fn new() -> Result<Self> {
        // `"Label<newline>"` at the very start of the export: the closing quote
        // landed on the next line.
        let broken_header = Regex::new(r#"^"([^"\r\n,\t]+?)[ \t]*\r?\n[ \t]*""#)?;
        Ok(DelimitedTokenizer { broken_header })
    }

    /// Runs the full pre-pass + scan + column repair over one input text.
    pub fn parse_table(&self, text: &str) -> ParsedTable {
        let (text, header_repaired) = self.repair_header(text);
        if header_repaired {
            warn!("Repaired malformed quoted header at start of input");
        }

        let delimiter = Delimiter::detect(&text);
        info!("Detected delimiter: {:?}", delimiter);

        let mut raw_rows = self.tokenize(&text, delimiter).into_iter();
        let Some(raw_header) = raw_rows.next() else {
            warn!("Input contained no rows, not even a header");
            return ParsedTable::empty(delimiter, header_repaired);
        };

        let header: Vec<String> = raw_header.iter().map(|cell| clean_header_cell(cell)).collect();
        debug!("Header columns: {:?}", header);

        let mut table = ParsedTable::empty(delimiter, header_repaired);
        for raw in raw_rows {
            let (row, fit) = fit_row(raw, header.len(), delimiter);
            match fit {
                RowFit::Overflow => table.overflow_rows += 1,
                RowFit::Padded => table.padded_rows += 1,
                RowFit::Exact => {}
            }
            table.rows.push(row);
        }
        table.header = header;

        if table.overflow_rows > 0 || table.padded_rows > 0 {
            warn!(
                "Repaired column counts: {} overflowing rows, {} short rows",
                table.overflow_rows, table.padded_rows
            );
        }
        info!("Tokenized {} data rows", table.rows.len());

        table
    }

    /// Splits text into rows of raw cells. Quotes are consumed, cells are not
    /// trimmed, and the header row is not treated specially.
    pub fn tokenize(&self, text: &str, delimiter: Delimiter) -> Vec<Vec<String>> {
        let delimiter = delimiter.as_char();
        let mut rows = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut cell = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '"' {
                if in_quotes && chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
                continue;
            }

            if c == delimiter && !in_quotes {
                row.push(std::mem::take(&mut cell));
                continue;
            }

            if (c == '\n' || c == '\r') && !in_quotes {
                if !row.is_empty() || !cell.is_empty() {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
                continue;
            }

            cell.push(c);
        }

        if !row.is_empty() || !cell.is_empty() {
            row.push(cell);
            rows.push(row);
        }

        rows
    }

    fn repair_header<'a>(&self, text: &'a str) -> (Cow<'a, str>, bool) {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        match self.broken_header.replace(text, "$1") {
            Cow::Borrowed(untouched) => (Cow::Borrowed(untouched), false),
            Cow::Owned(patched) => (Cow::Owned(patched), true),
        }
    }
}

/// Fits a raw row to `width` columns. Overflow is assumed to come from an
/// unescaped delimiter in the final free-text column, so surplus cells are
/// re-joined into that column.
fn fit_row(mut raw: Vec<String>, width: usize, delimiter: Delimiter) -> (Vec<String>, RowFit) {
    let fit = if width > 0 && raw.len() > width {
        let tail = raw.split_off(width - 1);
        raw.push(tail.join(&delimiter.as_char().to_string()));
        RowFit::Overflow
    } else if raw.len() < width {
        raw.resize(width, String::new());
        RowFit::Padded
    } else {
        RowFit::Exact
    };

    let row = raw.iter().map(|cell| clean_cell(cell)).collect();
    (row, fit)
}

/// Structural quotes are already consumed by the scan, so any quote left in a
/// data cell is an escaped literal and stays.
fn clean_cell(cell: &str) -> String {
    cell.trim().to_string()
}

/// Header labels also lose residual edge quotes left by broken exports.
fn clean_header_cell(cell: &str) -> String {
    cell.trim().trim_matches('"').trim().to_string()
}
