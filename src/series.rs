// src/series.rs
//! The one tabular shape every chart is drawn from.
//!
//! Adapters hand over loose `(label, Option<value>)` rows; [`normalize`] turns them
//! into a [`NormalizedSeries`]: labels trimmed and unique, values finite, ranked,
//! truncated. A series is never empty, so the renderer only ever sees drawable data.

use std::collections::HashSet;

use crate::sources::{RawRow, SourceError};

/// Ranking direction. Most metrics are "higher is more notable"; some
/// (unemployment, inflation) read better lowest-first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ranking {
    #[default]
    Descending,
    Ascending,
}

/// Bar coloring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorRule {
    /// Palette sweep across the bars, for plain magnitudes.
    #[default]
    Gradient,
    /// Green for `>= 0`, red for `< 0`, for movement/percentage-change data.
    Signed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedSeries {
    entries: Vec<(String, f64)>,
}

impl NormalizedSeries {
    /// Accept already-ranked pairs as they are. Order is kept; anything violating
    /// the shape (blank or duplicate label, non-finite value, no rows) is refused.
    pub fn from_ranked(entries: Vec<(String, f64)>) -> Result<Self, SourceError> {
        if entries.is_empty() {
            return Err(SourceError::Empty);
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for (label, value) in &entries {
            if label.trim().is_empty() {
                return Err(SourceError::Parse(s!("blank label")));
            }
            if !value.is_finite() {
                return Err(SourceError::Parse(format!("non-finite value for {label}")));
            }
            if !seen.insert(label.as_str()) {
                return Err(SourceError::Parse(format!("duplicate label {label}")));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, f64)] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }
}

/// Clean, rank and truncate raw rows.
///
/// - rows with a missing or non-finite value are dropped
/// - labels are whitespace-normalized; blank labels are dropped
/// - a repeated label keeps its first row
/// - stable sort, so ties keep source order
/// - at most `max_rows` survive
///
/// Nothing left afterwards is [`SourceError::Empty`].
pub fn normalize<I>(rows: I, ranking: Ranking, max_rows: usize) -> Result<NormalizedSeries, SourceError>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut entries: Vec<(String, f64)> = rows
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.filter(|v| v.is_finite())?;
            let label = crate::core::sanitize::normalize_ws(&label);
            if label.is_empty() || !seen.insert(label.clone()) {
                return None;
            }
            Some((label, value))
        })
        .collect();

    match ranking {
        Ranking::Descending => entries.sort_by(|a, b| b.1.total_cmp(&a.1)),
        Ranking::Ascending => entries.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }
    entries.truncate(max_rows);

    NormalizedSeries::from_ranked(entries)
}

/// Everything the renderer needs for one chart. Built once, consumed by
/// [`crate::render::Renderer::render`].
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    series: NormalizedSeries,
    title: String,
    source_citation: String,
    color_rule: ColorRule,
}

impl ChartSpec {
    pub fn new(
        series: NormalizedSeries,
        title: impl Into<String>,
        source_citation: impl Into<String>,
        color_rule: ColorRule,
    ) -> Self {
        Self {
            series,
            title: title.into(),
            source_citation: source_citation.into(),
            color_rule,
        }
    }

    pub fn series(&self) -> &NormalizedSeries { &self.series }
    pub fn title(&self) -> &str { &self.title }
    pub fn source_citation(&self) -> &str { &self.source_citation }
    pub fn color_rule(&self) -> ColorRule { self.color_rule }
}
