//! Sequential, fail-fast HTTP fetches for the data-preparation commands.
//!
//! This is a batch tool, not a service: no retries, no backoff, no
//! parallelism. The first network or parse error aborts the whole run.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::io::PendingWrite;

/// GET a URL and parse the body as JSON.
pub fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let body = reqwest::blocking::get(url)
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?
        .text()
        .with_context(|| format!("read body of {url}"))?;
    serde_json::from_str(&body).with_context(|| format!("parse JSON from {url}"))
}

/// Stream a URL into a file via tempfile-and-rename, so an interrupted
/// download never leaves a partial file behind.
pub fn download_file(url: &str, out_path: &Path, force: bool) -> Result<()> {
    let mut sink = PendingWrite::create(out_path, force)?;

    let mut resp = reqwest::blocking::get(url)
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?;

    io::copy(&mut resp, &mut sink)
        .with_context(|| format!("write {}", out_path.display()))?;

    sink.commit()
}
