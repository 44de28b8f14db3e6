// src/sources/indicator.rs
//! World Bank indicator lookup by code.
//!
//! `GET /v2/country/USA;CHN;…/indicator/SL.UEM.TOTL.ZS?format=json&mrnev=1` returns
//! `[ {paging}, [ {"country":{"value":"China"},"date":"2023","value":4.67}, … ] ]`;
//! `mrnev=1` asks for each country's most recent non-empty period. Errors come back
//! as `[ {"message":[{"key":…,"value":…}]} ]` with a 200 status.

use serde_json::Value;

use super::{RawRow, Source, SourceError, SourceMeta};
use crate::config::consts::WORLD_BANK_API;
use crate::core::net;

pub struct WorldBankIndicator {
    code: String,
    countries: Vec<String>,
    meta: SourceMeta,
    base_url: String,
}

impl WorldBankIndicator {
    /// `countries` are ISO3 codes.
    pub fn new(code: &str, countries: &[&str], meta: SourceMeta) -> Self {
        Self {
            code: code.to_string(),
            countries: countries.iter().map(|c| c.to_string()).collect(),
            meta,
            base_url: WORLD_BANK_API.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self) -> String {
        let countries = if self.countries.is_empty() { s!("all") } else { self.countries.join(";") };
        format!(
            "{}/country/{}/indicator/{}?format=json&mrnev=1&per_page=500",
            self.base_url.trim_end_matches('/'),
            countries,
            self.code
        )
    }
}

impl Source for WorldBankIndicator {
    fn name(&self) -> &str { &self.code }
    fn meta(&self) -> &SourceMeta { &self.meta }

    fn fetch_raw(&self) -> Result<Vec<RawRow>, SourceError> {
        let body = net::http_get(&self.url())?;
        parse_indicator(&body)
    }
}

/// Rows of one indicator response: country name → value (`None` for `null`).
pub fn parse_indicator(body: &str) -> Result<Vec<RawRow>, SourceError> {
    let doc: Value = serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    if let Some(msg) = doc.get(0).and_then(|head| head.get("message")) {
        let text = msg
            .get(0)
            .and_then(|m| m.get("value"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(SourceError::Parse(format!("World Bank: {text}")));
    }

    let Some(entries) = doc.get(1).and_then(Value::as_array) else {
        return Err(SourceError::Empty);
    };

    let rows = entries
        .iter()
        .filter_map(|e| {
            let label = e.get("country")?.get("value")?.as_str()?.to_string();
            Some((label, e.get("value").and_then(Value::as_f64)))
        })
        .collect();
    Ok(rows)
}
