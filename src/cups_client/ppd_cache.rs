use std::{future::Future, sync::Arc, time::Duration};

use dashmap::DashMap;
use log::debug;
use sha2::{Digest, Sha256};
use snafu::ResultExt;
use url::Url;

use super::error::*;

/// Capability documents (PPDs) and their fingerprints, per printer.
pub trait CapabilitySource: Send + Sync + 'static {
    fn get_capability_document(&self, printer: &str) -> impl Future<Output = Result<String, CupsError>> + Send;

    fn get_capability_hash(&self, printer: &str) -> impl Future<Output = Result<String, CupsError>> + Send;

    fn invalidate(&self, printer: &str);
}

/// Where PPDs come from when they are not cached.
pub trait PpdSource: Send + Sync + 'static {
    fn fetch_ppd(&self, printer: &str) -> impl Future<Output = Result<String, CupsError>> + Send;
}

#[derive(Debug, Clone)]
struct CachedPpd {
    document: Arc<str>,
    hash: String,
}

/// Caches one PPD per printer until invalidated.
pub struct PpdCache<S> {
    source: S,
    entries: DashMap<String, CachedPpd>,
}

impl<S: PpdSource> PpdCache<S> {
    pub fn new(source: S) -> Self {
        PpdCache { source, entries: DashMap::new() }
    }

    async fn get(&self, printer: &str) -> Result<CachedPpd, CupsError> {
        if let Some(entry) = self.entries.get(printer) {
            return Ok(entry.clone());
        }

        debug!("Fetching PPD for {printer}");
        let document = self.source.fetch_ppd(printer).await?;
        let entry = CachedPpd { hash: hash_ppd(&document), document: document.into() };
        self.entries.insert(printer.to_string(), entry.clone());
        Ok(entry)
    }
}

impl<S: PpdSource> CapabilitySource for PpdCache<S> {
    async fn get_capability_document(&self, printer: &str) -> Result<String, CupsError> {
        Ok(self.get(printer).await?.document.to_string())
    }

    async fn get_capability_hash(&self, printer: &str) -> Result<String, CupsError> {
        Ok(self.get(printer).await?.hash)
    }

    fn invalidate(&self, printer: &str) {
        self.entries.remove(printer);
    }
}

pub fn hash_ppd(document: &str) -> String {
    hex::encode(Sha256::digest(document.as_bytes()))
}

/// Fetches PPDs from the `/printers/<name>.ppd` endpoint of the CUPS web interface.
pub struct HttpPpdSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpPpdSource {
    pub fn new(base: Url, ignore_tls_errors: bool, timeout: Duration) -> Result<Self, CupsError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(ignore_tls_errors)
            .timeout(timeout)
            .build()
            .whatever_context("Could not build HTTP client for PPD downloads")?;
        Ok(HttpPpdSource { base, client })
    }
}

impl PpdSource for HttpPpdSource {
    async fn fetch_ppd(&self, printer: &str) -> Result<String, CupsError> {
        let url = self
            .base
            .join(&format!("printers/{printer}.ppd"))
            .with_whatever_context(|_| format!("Invalid PPD URL for printer {printer}"))?;

        let resp = self.client.get(url).send().await.context(PpdFetchSnafu { printer })?;
        resp.error_for_status().context(PpdFetchSnafu { printer })?.text().await.context(PpdFetchSnafu { printer })
    }
}

/// Reads `*Manufacturer` and `*ModelName` from a PPD. The manufacturer is
/// stripped from the front of the model name when repeated there.
pub fn parse_manufacturer_and_model(ppd: &str) -> (String, String) {
    let keyword = |name: &str| {
        ppd.lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.trim_start().strip_prefix(':'))
            .map(|value| value.trim().trim_matches('"').to_string())
            .unwrap_or_default()
    };

    let manufacturer = keyword("*Manufacturer");
    let mut model = keyword("*ModelName");

    if !manufacturer.is_empty() {
        if let Some(rest) = model.strip_prefix(&manufacturer) {
            model = rest.trim_start().to_string();
        }
    }

    (manufacturer, model)
}
