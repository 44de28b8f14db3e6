// src/sources/market.rs
//! Market quotes from the Yahoo Finance chart endpoint, one request per ticker.
//!
//! The endpoint answers `{"chart":{"result":[{"meta":…,"indicators":{"quote":[{"close":[…]}]}}]}}`
//! with daily closes for the requested range; `null` marks days without a close.

use serde::Deserialize;

use super::{RawRow, Source, SourceError, SourceMeta};
use crate::config::consts::YAHOO_CHART_API;
use crate::core::net;

/// Which number one ticker contributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteMetric {
    /// Last close against the close before it, in percent.
    PercentChange,
    /// Last close, in the quote currency.
    Close,
}

pub struct MarketQuotes {
    name: String,
    /// `(ticker, display label)`
    tickers: Vec<(String, String)>,
    metric: QuoteMetric,
    meta: SourceMeta,
    base_url: String,
}

impl MarketQuotes {
    pub fn new(name: &str, tickers: &[(&str, &str)], metric: QuoteMetric, meta: SourceMeta) -> Self {
        Self {
            name: name.to_string(),
            tickers: tickers.iter().map(|(t, l)| (t.to_string(), l.to_string())).collect(),
            metric,
            meta,
            base_url: YAHOO_CHART_API.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url_for(&self, ticker: &str) -> String {
        format!("{}/{}?range=5d&interval=1d", self.base_url.trim_end_matches('/'), ticker)
    }
}

impl Source for MarketQuotes {
    fn name(&self) -> &str { &self.name }
    fn meta(&self) -> &SourceMeta { &self.meta }

    /// A ticker that fails on its own becomes a `None` row; only when every ticker
    /// failed does the last error surface.
    fn fetch_raw(&self) -> Result<Vec<RawRow>, SourceError> {
        let mut rows = Vec::with_capacity(self.tickers.len());
        let mut last_err = None;

        for (ticker, label) in &self.tickers {
            let value = net::http_get(&self.url_for(ticker))
                .and_then(|body| quote_value(&body, self.metric));
            match value {
                Ok(v) => rows.push((label.clone(), Some(v))),
                Err(e) => {
                    logd!("{}: {ticker}: {e}", self.name);
                    rows.push((label.clone(), None));
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) if rows.iter().all(|(_, v)| v.is_none()) => Err(e),
            _ => Ok(rows),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartFault>,
}

#[derive(Deserialize)]
struct ChartFault {
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    indicators: Indicators,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Pull the requested metric out of one chart response body.
pub fn quote_value(body: &str, metric: QuoteMetric) -> Result<f64, SourceError> {
    let env: Envelope = serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    if let Some(fault) = env.chart.error {
        return Err(SourceError::Parse(fault.description.unwrap_or_else(|| s!("chart error"))));
    }
    let result = env
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or(SourceError::Empty)?;

    let closes: Vec<f64> = result
        .indicators
        .quote
        .first()
        .map(|q| q.close.iter().flatten().copied().filter(|v| v.is_finite()).collect())
        .unwrap_or_default();

    match metric {
        QuoteMetric::Close => closes
            .last()
            .copied()
            .or(result.meta.regular_market_price)
            .ok_or(SourceError::Empty),
        QuoteMetric::PercentChange => {
            let (prev, last) = match closes.as_slice() {
                [.., prev, last] => (*prev, *last),
                _ => match (result.meta.previous_close, result.meta.regular_market_price) {
                    (Some(p), Some(l)) => (p, l),
                    _ => return Err(SourceError::Empty),
                },
            };
            if prev == 0.0 {
                return Err(SourceError::Parse(s!("previous close is zero")));
            }
            Ok((last - prev) / prev * 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"chart":{"result":[{"meta":{"symbol":"ZIM","regularMarketPrice":21.04},
        "indicators":{"quote":[{"close":[19.5,null,20.0,21.04]}]}}],"error":null}}"#;

    #[test]
    fn percent_change_uses_last_two_closes() {
        let v = quote_value(BODY, QuoteMetric::PercentChange).unwrap();
        assert!((v - 5.2).abs() < 1e-9);
    }

    #[test]
    fn close_is_last_non_null() {
        assert_eq!(quote_value(BODY, QuoteMetric::Close).unwrap(), 21.04);
    }

    #[test]
    fn upstream_error_and_missing_result() {
        let err = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(quote_value(err, QuoteMetric::Close), Err(SourceError::Parse(m)) if m.contains("delisted")));

        let empty = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#;
        assert!(matches!(quote_value(empty, QuoteMetric::PercentChange), Err(SourceError::Empty)));
    }

    #[test]
    fn url_shape() {
        let m = MarketQuotes::new("t", &[("FDX", "FedEx")], QuoteMetric::Close, SourceMeta::new("T", "S"))
            .with_base_url("http://localhost:1/chart/");
        assert_eq!(m.url_for("FDX"), "http://localhost:1/chart/FDX?range=5d&interval=1d");
    }
}
