// src/sources/mod.rs
//! # Source adapters
//!
//! One adapter per data origin. Each knows *where the numbers live* in its
//! upstream format and how to pull `(label, value)` rows out of it; the shared
//! [`Source::chart`] then applies unit scaling and [`crate::series::normalize`].
//!
//! ## What lives here
//! - Fetching (through `core::net`) and format-specific parsing: Yahoo chart JSON,
//!   World Bank JSON, Wikipedia HTML tables, `.xlsx` workbooks, CSV downloads.
//! - Column selection (latest period, closing price, percent change).
//! - Numeric cleanup via `core::sanitize::parse_number`.
//!
//! ## What does **not** live here
//! - Ranking, truncation and shape checks (`series`).
//! - Drawing (`render`) and delivery (`deliver`).
//! - Deciding whether a failure stops the run (`runner`: it never does here).
//!
//! Parsers are plain functions over already-fetched text/bytes so they can be
//! tested offline against captured snippets.

use thiserror::Error;

use crate::config::consts::DEFAULT_MAX_ROWS;
use crate::series::{self, ChartSpec, ColorRule, Ranking};

pub mod csv_table;
pub mod indicator;
pub mod market;
pub mod spreadsheet;
pub mod wiki;

pub use csv_table::CsvTable;
pub use indicator::WorldBankIndicator;
pub use market::{MarketQuotes, QuoteMetric};
pub use spreadsheet::Spreadsheet;
pub use wiki::WikiTable;

/// One upstream row: label plus the value if it parsed.
pub type RawRow = (String, Option<f64>);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error("no usable rows")]
    Empty,
}

impl SourceError {
    /// Upstream answered but nothing chartable came back (as opposed to an outage
    /// or a format we could not read).
    pub fn is_empty(&self) -> bool {
        matches!(self, SourceError::Empty)
    }
}

/// Static presentation and shaping settings of one adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMeta {
    pub title: String,
    pub citation: String,
    pub ranking: Ranking,
    pub color_rule: ColorRule,
    /// Raw values are divided by this (e.g. `1e6` for "millions").
    pub scale: f64,
    pub max_rows: usize,
}

impl SourceMeta {
    pub fn new(title: impl Into<String>, citation: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            citation: citation.into(),
            ranking: Ranking::Descending,
            color_rule: ColorRule::Gradient,
            scale: 1.0,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    pub fn lower_is_better(mut self) -> Self {
        self.ranking = Ranking::Ascending;
        self
    }

    pub fn signed(mut self) -> Self {
        self.color_rule = ColorRule::Signed;
        self
    }

    pub fn scale(mut self, divisor: f64) -> Self {
        self.scale = divisor;
        self
    }

    pub fn max_rows(mut self, n: usize) -> Self {
        self.max_rows = n;
        self
    }
}

pub trait Source {
    /// Short name for logs and run summaries.
    fn name(&self) -> &str;

    fn meta(&self) -> &SourceMeta;

    /// Pull raw rows from upstream. Unparseable cells come back as `None`.
    fn fetch_raw(&self) -> Result<Vec<RawRow>, SourceError>;

    /// Apply this adapter's unit scale to one raw value.
    fn scale_value(&self, value: f64) -> f64 {
        let scale = self.meta().scale;
        if scale == 1.0 || scale == 0.0 { value } else { value / scale }
    }

    /// Fetch, scale, normalize, and wrap in a [`ChartSpec`].
    fn chart(&self) -> Result<ChartSpec, SourceError> {
        let rows = self.fetch_raw()?;
        logd!("{}: {} raw rows", self.name(), rows.len());
        let meta = self.meta();
        let scaled = rows
            .into_iter()
            .map(|(label, value)| (label, value.map(|v| self.scale_value(v))));
        let series = series::normalize(scaled, meta.ranking, meta.max_rows)?;
        Ok(ChartSpec::new(series, meta.title.clone(), meta.citation.clone(), meta.color_rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        rows: Vec<RawRow>,
        meta: SourceMeta,
    }

    impl Source for Fixed {
        fn name(&self) -> &str { "fixed" }
        fn meta(&self) -> &SourceMeta { &self.meta }
        fn fetch_raw(&self) -> Result<Vec<RawRow>, SourceError> { Ok(self.rows.clone()) }
    }

    fn fixed(scale: f64) -> Fixed {
        Fixed {
            rows: vec![
                (s!("India"), Some(1_428_627_663.0)),
                (s!("China"), Some(1_425_671_352.0)),
                (s!("Tuvalu"), None),
                (s!("Brazil"), Some(216_422_446.0)),
            ],
            meta: SourceMeta::new("Population (millions)", "World Bank").scale(scale).max_rows(2),
        }
    }

    #[test]
    fn chart_divides_by_scale_before_ranking() {
        let spec = fixed(1e6).chart().unwrap();
        let entries = spec.series().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "India");
        assert!((entries[0].1 - 1428.627663).abs() < 1e-9);
        assert!((entries[1].1 - 1425.671352).abs() < 1e-9);
        assert_eq!(spec.title(), "Population (millions)");
    }

    #[test]
    fn zero_scale_leaves_values_alone() {
        let src = fixed(0.0);
        assert_eq!(src.scale_value(42.5), 42.5);
        let spec = src.chart().unwrap();
        assert_eq!(spec.series().entries()[0].1, 1_428_627_663.0);
        assert_eq!(fixed(1e3).scale_value(2_443.0), 2.443);
    }
}
