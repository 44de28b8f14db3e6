// src/sources/wiki.rs
//! Scrape one `wikitable` off a Wikipedia article.
//!
//! Ground truth is the N-th `<table class="wikitable …">` on the page; the label and
//! value live in fixed columns of each data row. Header rows never become rows;
//! merged cells that shift the value column and dash placeholders fail to parse
//! and are dropped downstream.

use super::{RawRow, Source, SourceError, SourceMeta};
use crate::core::{html, net, sanitize::parse_number};

pub struct WikiTable {
    name: String,
    url: String,
    table_index: usize,
    label_col: usize,
    value_col: usize,
    skip_labels: Vec<String>,
    meta: SourceMeta,
}

impl WikiTable {
    pub fn new(name: &str, url: &str, table_index: usize, label_col: usize, value_col: usize, meta: SourceMeta) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            table_index,
            label_col,
            value_col,
            skip_labels: Vec::new(),
            meta,
        }
    }

    /// Rows whose label equals one of these (case-insensitive) are ignored,
    /// e.g. a leading "World" total.
    pub fn skip_labels(mut self, labels: &[&str]) -> Self {
        self.skip_labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Pure extraction over an already-fetched page.
    pub fn extract(&self, doc: &str) -> Result<Vec<RawRow>, SourceError> {
        let tables = html::tables_with_class(doc, "wikitable");
        let table = tables.get(self.table_index).ok_or_else(|| {
            SourceError::Parse(format!("wikitable #{} not found ({} on page)", self.table_index, tables.len()))
        })?;

        let rows = html::data_rows(table)
            .into_iter()
            .filter_map(|cells| {
                let label = cells.get(self.label_col)?.clone();
                if label.is_empty() || self.skip_labels.iter().any(|s| s.eq_ignore_ascii_case(&label)) {
                    return None;
                }
                let value = cells.get(self.value_col).and_then(|c| parse_number(c));
                Some((label, value))
            })
            .collect();
        Ok(rows)
    }
}

impl Source for WikiTable {
    fn name(&self) -> &str { &self.name }
    fn meta(&self) -> &SourceMeta { &self.meta }

    fn fetch_raw(&self) -> Result<Vec<RawRow>, SourceError> {
        let doc = net::http_get(&self.url)?;
        self.extract(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <table class="wikitable"><tr><td>ignored</td><td>1</td></tr></table>
        <table class="wikitable sortable static-row-numbers">
          <thead><tr><th>Country</th><th>Spending (US$ bn)</th><th>% of GDP</th></tr></thead>
          <tbody>
            <tr><th scope="row">World</th><td>2,443</td><td>2.3</td></tr>
            <tr><td><span class="flagicon"><img src="x.png"></span> <a href="/wiki/United_States">United States</a></td><td>916<sup class="reference"><a>[2]</a></sup></td><td>3.4</td></tr>
            <tr><td>China<sup>[a]</sup></td><td>296</td><td>1.7</td></tr>
            <tr><td>Atlantis</td><td>&#8212;</td><td>n/a</td></tr>
          </tbody>
        </table>
    "#;

    #[test]
    fn extracts_second_wikitable_with_cleanup() {
        let src = WikiTable::new("milex", "http://unused", 1, 0, 1, SourceMeta::new("T", "S"))
            .skip_labels(&["world"]);
        let rows = src.extract(PAGE).unwrap();
        assert_eq!(
            rows,
            vec![
                (s!("United States"), Some(916.0)),
                (s!("China"), Some(296.0)),
                (s!("Atlantis"), None),
            ]
        );
    }

    #[test]
    fn header_with_a_year_is_not_a_row() {
        let page = r#"<table class="wikitable">
            <tr><th>Country</th><th>Spending 2023 (US$ bn)</th></tr>
            <tr><td>United States</td><td>916</td></tr>
            <tr><td>Malta</td><td>0.1</td></tr>
        </table>"#;
        let src = WikiTable::new("milex", "http://unused", 0, 0, 1, SourceMeta::new("T", "S"));
        let rows = src.extract(page).unwrap();
        assert_eq!(rows, vec![(s!("United States"), Some(916.0)), (s!("Malta"), Some(0.1))]);

        let series = crate::series::normalize(rows, crate::series::Ranking::Descending, 10).unwrap();
        assert!(series.entries().iter().all(|(label, _)| label != "Country"));
    }

    #[test]
    fn missing_table_is_parse_error() {
        let src = WikiTable::new("x", "http://unused", 5, 0, 1, SourceMeta::new("T", "S"));
        assert!(matches!(src.extract(PAGE), Err(SourceError::Parse(_))));
    }
}
