// src/sources/spreadsheet.rs
//! `.xlsx` bulk download (e.g. the SIPRI military expenditure workbook).
//!
//! The workbook is fetched into memory and read with `calamine`. One sheet holds a
//! label column and one column per period; each row's latest reported period is
//! its right-most numeric cell. Placeholder cells (`"..."`, `"xxx"`) and region
//! sub-headings carry no number and fall out as `None`.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use super::{RawRow, Source, SourceError, SourceMeta};
use crate::core::{net, sanitize::parse_number};

pub struct Spreadsheet {
    name: String,
    url: String,
    sheet: String,
    label_col: usize,
    skip_rows: usize,
    meta: SourceMeta,
}

impl Spreadsheet {
    pub fn new(name: &str, url: &str, sheet: &str, label_col: usize, meta: SourceMeta) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            sheet: sheet.to_string(),
            label_col,
            skip_rows: 0,
            meta,
        }
    }

    /// Title/notes rows above the table.
    pub fn skip_rows(mut self, n: usize) -> Self {
        self.skip_rows = n;
        self
    }

    /// Read the configured sheet out of workbook bytes.
    pub fn extract(&self, bytes: Vec<u8>) -> Result<Vec<RawRow>, SourceError> {
        let mut book: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes)).map_err(|e| SourceError::Spreadsheet(e.to_string()))?;
        let range = book
            .worksheet_range(&self.sheet)
            .map_err(|e| SourceError::Spreadsheet(format!("sheet {:?}: {e}", self.sheet)))?;
        Ok(rows_from_range(&range, self.label_col, self.skip_rows))
    }
}

impl Source for Spreadsheet {
    fn name(&self) -> &str { &self.name }
    fn meta(&self) -> &SourceMeta { &self.meta }

    fn fetch_raw(&self) -> Result<Vec<RawRow>, SourceError> {
        let bytes = net::http_get_bytes(&self.url)?;
        self.extract(bytes)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => s!(),
        other => other.to_string(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

/// `(label, value)` per row of a sheet range; rows without a label are skipped.
/// The value is the right-most numeric cell right of the label.
pub fn rows_from_range(range: &Range<Data>, label_col: usize, skip_rows: usize) -> Vec<RawRow> {
    range
        .rows()
        .skip(skip_rows)
        .filter_map(|row| {
            let label = cell_text(row.get(label_col)?);
            if label.is_empty() {
                return None;
            }
            let value = row.iter().skip(label_col + 1).rev().find_map(cell_number);
            Some((label, value))
        })
        .collect()
}
