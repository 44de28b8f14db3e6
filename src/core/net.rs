// src/core/net.rs
//
// Blocking HTTP GET helpers for the source adapters. One client per call: runs are
// short and strictly sequential.

use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::sources::SourceError;

pub fn client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
}

fn get_ok(url: &str) -> Result<Response, SourceError> {
    logd!("GET {url}");
    let resp = client()?.get(url).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status { status: status.as_u16(), url: url.to_string() });
    }
    Ok(resp)
}

/// GET `url` and return the body as text. Non-2xx is an error.
pub fn http_get(url: &str) -> Result<String, SourceError> {
    Ok(get_ok(url)?.text()?)
}

/// GET `url` and return the raw body (spreadsheets and other binary downloads).
pub fn http_get_bytes(url: &str) -> Result<Vec<u8>, SourceError> {
    let bytes = get_ok(url)?.bytes()?;
    logd!("GET {url}: {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
