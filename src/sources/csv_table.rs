// src/sources/csv_table.rs
//! CSV download in long format (`Entity,Code,Year,Value` as published by Our World
//! in Data and similar). Keeps each label's latest period that carries a value.

use std::collections::HashMap;

use super::{RawRow, Source, SourceError, SourceMeta};
use crate::core::csv::Table;
use crate::core::{net, sanitize::parse_number};

pub struct CsvTable {
    name: String,
    url: String,
    label_col: String,
    value_col: String,
    period_col: Option<String>,
    require_col: Option<String>,
    exclude: Vec<String>,
    meta: SourceMeta,
}

impl CsvTable {
    pub fn new(name: &str, url: &str, label_col: &str, value_col: &str, meta: SourceMeta) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            label_col: label_col.to_string(),
            value_col: value_col.to_string(),
            period_col: None,
            require_col: None,
            exclude: Vec::new(),
            meta,
        }
    }

    /// Keep only the row with the greatest period per label, preferring rows with a value.
    pub fn latest_by(mut self, period_col: &str) -> Self {
        self.period_col = Some(period_col.to_string());
        self
    }

    /// Drop rows where this column is blank (aggregates without a country code).
    pub fn require(mut self, col: &str) -> Self {
        self.require_col = Some(col.to_string());
        self
    }

    pub fn exclude(mut self, labels: &[&str]) -> Self {
        self.exclude = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    fn column(&self, table: &Table, name: &str) -> Result<usize, SourceError> {
        table
            .column(name)
            .ok_or_else(|| SourceError::Parse(format!("{}: no column {name:?} in {:?}", self.name, table.headers)))
    }

    /// Pure extraction over downloaded CSV text. Output follows first appearance
    /// of each label.
    pub fn extract(&self, text: &str) -> Result<Vec<RawRow>, SourceError> {
        let table = Table::from_text(text, ',');
        if table.headers.is_empty() {
            return Err(SourceError::Empty);
        }
        let label_ix = self.column(&table, &self.label_col)?;
        let value_ix = self.column(&table, &self.value_col)?;
        let period_ix = self.period_col.as_deref().map(|c| self.column(&table, c)).transpose()?;
        let require_ix = self.require_col.as_deref().map(|c| self.column(&table, c)).transpose()?;

        let mut order: Vec<String> = Vec::new();
        let mut best: HashMap<String, (f64, Option<f64>)> = HashMap::new();

        for row in &table.rows {
            let Some(label) = row.get(label_ix).map(|l| l.trim()) else { continue };
            if label.is_empty() || self.exclude.iter().any(|x| x.eq_ignore_ascii_case(label)) {
                continue;
            }
            if let Some(ix) = require_ix {
                if row.get(ix).is_none_or(|c| c.trim().is_empty()) {
                    continue;
                }
            }
            let period = period_ix
                .and_then(|ix| row.get(ix))
                .and_then(|p| parse_number(p))
                .unwrap_or(f64::NEG_INFINITY);
            let value = row.get(value_ix).and_then(|v| parse_number(v));

            match best.get_mut(label) {
                Some(slot) => {
                    // A blank newer period never hides an older reported value.
                    let replace = match (slot.1, value) {
                        (Some(_), None) => false,
                        (None, Some(_)) => true,
                        _ => period >= slot.0,
                    };
                    if replace {
                        *slot = (period, value);
                    }
                }
                None => {
                    order.push(label.to_string());
                    best.insert(label.to_string(), (period, value));
                }
            }
        }

        Ok(order
            .into_iter()
            .map(|label| {
                let value = best.get(&label).and_then(|(_, v)| *v);
                (label, value)
            })
            .collect())
    }
}

impl Source for CsvTable {
    fn name(&self) -> &str { &self.name }
    fn meta(&self) -> &SourceMeta { &self.meta }

    fn fetch_raw(&self) -> Result<Vec<RawRow>, SourceError> {
        let text = net::http_get(&self.url)?;
        self.extract(&text)
    }
}
