// src/config/jobs.rs
//! Built-in job presets: a named list of sources plus the channel it reports to.
//!
//! Three presets, one per daily report:
//! - `markets`: shipping/logistics equities and commodity futures (day-on-day move) plus
//!   precious metal closes, to chat
//! - `indicators`: World Bank macro indicators for the G20 economies, by mail
//! - `world`: defense spending, Wikipedia and OWID tables, by mail

use super::options::NotifierKind;
use super::secrets::ConfigError;
use crate::sources::{
    CsvTable, MarketQuotes, QuoteMetric, Source, SourceMeta, Spreadsheet, WikiTable, WorldBankIndicator,
};

pub struct Job {
    pub name: &'static str,
    /// Mail subject / log heading.
    pub subject: &'static str,
    pub notifier: NotifierKind,
    pub sources: Vec<Box<dyn Source>>,
}

/// Listing entry for `chartpost jobs`.
pub struct JobInfo {
    pub name: &'static str,
    pub notifier: NotifierKind,
    pub about: &'static str,
}

pub const JOBS: &[JobInfo] = &[
    JobInfo { name: "markets", notifier: NotifierKind::Telegram, about: "Shipping stocks and commodity futures (daily % change), metal closes" },
    JobInfo { name: "indicators", notifier: NotifierKind::Email, about: "World Bank GDP, unemployment, inflation, population (G20)" },
    JobInfo { name: "world", notifier: NotifierKind::Email, about: "Military spending (SIPRI), GDP per capita (Wikipedia), internet use (OWID)" },
];

const G20: &[&str] = &[
    "ARG", "AUS", "BRA", "CAN", "CHN", "DEU", "FRA", "GBR", "IDN", "IND",
    "ITA", "JPN", "KOR", "MEX", "RUS", "SAU", "TUR", "USA", "ZAF",
];

const SHIPPING: &[(&str, &str)] = &[
    ("ZIM", "ZIM Shipping"),
    ("FDX", "FedEx"),
    ("UPS", "UPS"),
    ("MAERSK-B.CO", "Maersk"),
    ("HLAG.DE", "Hapag-Lloyd"),
    ("MATX", "Matson"),
    ("DAC", "Danaos"),
    ("GSL", "Global Ship Lease"),
    ("EXPD", "Expeditors"),
    ("1919.HK", "COSCO Shipping"),
];

const COMMODITIES: &[(&str, &str)] = &[
    ("CL=F", "Crude Oil (WTI)"),
    ("BZ=F", "Brent Crude"),
    ("NG=F", "Natural Gas"),
    ("GC=F", "Gold"),
    ("SI=F", "Silver"),
    ("HG=F", "Copper"),
];

const METALS: &[(&str, &str)] = &[
    ("GC=F", "Gold"),
    ("PL=F", "Platinum"),
    ("PA=F", "Palladium"),
    ("SI=F", "Silver"),
];

const SIPRI_MILEX_XLSX: &str = "https://www.sipri.org/sites/default/files/SIPRI-Milex-data-1949-2023.xlsx";
const WIKI_GDP_PER_CAPITA: &str = "https://en.wikipedia.org/wiki/List_of_countries_by_GDP_(nominal)_per_capita";
const OWID_INTERNET_CSV: &str = "https://ourworldindata.org/grapher/share-of-individuals-using-the-internet.csv";

fn markets(max_rows: usize) -> Vec<Box<dyn Source>> {
    vec![
        Box::new(MarketQuotes::new(
            "shipping",
            SHIPPING,
            QuoteMetric::PercentChange,
            SourceMeta::new("Shipping & Logistics: Daily Change (%)", "Yahoo Finance").signed().max_rows(max_rows),
        )),
        Box::new(MarketQuotes::new(
            "commodities",
            COMMODITIES,
            QuoteMetric::PercentChange,
            SourceMeta::new("Commodity Futures: Daily Change (%)", "Yahoo Finance").signed().max_rows(max_rows),
        )),
        Box::new(MarketQuotes::new(
            "metals",
            METALS,
            QuoteMetric::Close,
            SourceMeta::new("Precious Metals: Last Close (US$/oz)", "Yahoo Finance").max_rows(max_rows),
        )),
    ]
}

fn indicators(max_rows: usize) -> Vec<Box<dyn Source>> {
    let wb = "World Bank WDI";
    vec![
        Box::new(WorldBankIndicator::new(
            "NY.GDP.MKTP.CD",
            G20,
            SourceMeta::new("GDP (current US$, billions)", wb).scale(1e9).max_rows(max_rows),
        )),
        Box::new(WorldBankIndicator::new(
            "SL.UEM.TOTL.ZS",
            G20,
            SourceMeta::new("Unemployment Rate (% of labor force)", wb).lower_is_better().max_rows(max_rows),
        )),
        Box::new(WorldBankIndicator::new(
            "FP.CPI.TOTL.ZG",
            G20,
            SourceMeta::new("Inflation, consumer prices (annual %)", wb).lower_is_better().max_rows(max_rows),
        )),
        Box::new(WorldBankIndicator::new(
            "SP.POP.TOTL",
            G20,
            SourceMeta::new("Population (millions)", wb).scale(1e6).max_rows(max_rows),
        )),
    ]
}

fn world(max_rows: usize) -> Vec<Box<dyn Source>> {
    vec![
        Box::new(
            Spreadsheet::new(
                "sipri-milex",
                SIPRI_MILEX_XLSX,
                "Current US$",
                0,
                SourceMeta::new("Military Expenditure (current US$, billions)", "SIPRI Military Expenditure Database")
                    .scale(1e3)
                    .max_rows(max_rows),
            )
            .skip_rows(6),
        ),
        Box::new(
            WikiTable::new(
                "gdp-per-capita",
                WIKI_GDP_PER_CAPITA,
                0,
                0,
                1,
                SourceMeta::new("GDP per Capita (nominal, US$)", "Wikipedia / IMF").max_rows(max_rows),
            )
            .skip_labels(&["World"]),
        ),
        Box::new(
            CsvTable::new(
                "internet-use",
                OWID_INTERNET_CSV,
                "Entity",
                "Individuals using the Internet (% of population)",
                SourceMeta::new("Internet Users (% of population)", "Our World in Data / ITU").max_rows(max_rows),
            )
            .latest_by("Year")
            .require("Code")
            .exclude(&["World"]),
        ),
    ]
}

/// Instantiate a preset. Every source is capped at `max_rows` bars.
pub fn build(name: &str, max_rows: usize) -> Result<Job, ConfigError> {
    let (subject, sources) = match name {
        "markets" => ("Market Movers", markets(max_rows)),
        "indicators" => ("Economic Data Update", indicators(max_rows)),
        "world" => ("World Data Update", world(max_rows)),
        other => return Err(ConfigError::UnknownJob(other.to_string())),
    };
    let info = JOBS
        .iter()
        .find(|j| j.name == name)
        .ok_or_else(|| ConfigError::UnknownJob(name.to_string()))?;
    Ok(Job { name: info.name, subject, notifier: info.notifier, sources })
}
