use std::{path::Path, sync::Arc};

use log::{debug, error};
use url::Url;

use crate::cdd::models::{CloudJobTicket, PrintJobStateDiff};
use crate::config::models::Cups as CupsSettings;

use super::attributes::*;
use super::error::*;
use super::job::tags_to_job_state;
use super::models::{GroupTag, Printer, ResponseStatus};
use super::ppd_cache::{parse_manufacturer_and_model, CapabilitySource};
use super::printer::tags_to_printer;
use super::system_tags::SystemTags;
use super::ticket::ticket_to_options;
use super::transport::PrintServer;

pub fn build_cups_url(cups_settings: &CupsSettings) -> Result<Url, CupsError> {
    let invalid = || InvalidUriSnafu { uri: cups_settings.uri.clone() }.build();

    let mut cups_url = Url::parse(&cups_settings.uri).map_err(|_| invalid())?;
    if !cups_settings.username.is_empty() && !cups_settings.password.is_empty() {
        cups_url.set_username(&cups_settings.username).map_err(|_| invalid())?;
        cups_url.set_password(Some(&cups_settings.password)).map_err(|_| invalid())?;
    }

    Ok(cups_url)
}

/// The connector's view of a CUPS server.
pub struct Cups<T, C> {
    transport: T,
    capabilities: Arc<C>,
    info_to_display_name: bool,
    printer_attributes: Vec<String>,
    system_tags: SystemTags,
}

impl<T: PrintServer, C: CapabilitySource> Cups<T, C> {
    pub fn new(
        transport: T,
        capabilities: C,
        info_to_display_name: bool,
        printer_attributes: Vec<String>,
        system_tags: SystemTags,
    ) -> Result<Self, CupsError> {
        check_printer_attributes(&printer_attributes)?;

        Ok(Cups { transport, capabilities: Arc::new(capabilities), info_to_display_name, printer_attributes, system_tags })
    }

    /// Connections to CUPS currently open.
    pub fn conn_qty_open(&self) -> usize {
        self.transport.conn_qty_open()
    }

    /// Most connections to CUPS that may be open at once.
    pub fn conn_qty_max(&self) -> usize {
        self.transport.conn_qty_max()
    }

    /// Gets all printers on the CUPS server, with their PPD hashes.
    pub async fn get_printers(&self) -> Result<Vec<Printer>, CupsError> {
        let response = self.transport.fetch_printers(&self.printer_attributes).await?;

        match response.status {
            ResponseStatus::Ok => {}
            // Normal when there are no printers.
            ResponseStatus::NotFound => return Ok(Vec::new()),
            ResponseStatus::Other(code) => {
                return StatusSnafu { operation: "CUPS-Get-Printers", code: format!("{code:#06x}") }.fail();
            }
        }

        let mut printers: Vec<Printer> = response_to_tag_mappings(&response.attributes, GroupTag::Printer)
            .iter()
            .map(|tags| tags_to_printer(tags, &self.system_tags, self.info_to_display_name))
            .collect();
        debug!("Received {} printers from CUPS", printers.len());

        self.add_ppd_hashes(&mut printers).await;
        Ok(printers)
    }

    /// Looks up the PPD hash of every non-raw printer concurrently, and
    /// returns once every lookup has finished. Failed lookups leave the
    /// printer's hash unset.
    pub async fn add_ppd_hashes(&self, printers: &mut [Printer]) {
        let lookups: Vec<_> = printers
            .iter()
            .map(|printer| {
                if printer.is_raw() {
                    return None;
                }
                let capabilities = Arc::clone(&self.capabilities);
                let name = printer.name.clone();
                Some(tokio::spawn(async move { capabilities.get_capability_hash(&name).await }))
            })
            .collect();

        for (printer, lookup) in printers.iter_mut().zip(lookups) {
            let Some(lookup) = lookup else { continue };
            match lookup.await {
                Ok(Ok(hash)) => printer.caps_hash = Some(hash),
                Ok(Err(e)) => error!("Failed to get PPD hash of {}: {:?}", printer.name, e),
                Err(e) => error!("PPD hash lookup of {} did not finish: {:?}", printer.name, e),
            }
        }
    }

    /// Gets the PPD of `printer`, with the manufacturer and model it names.
    pub async fn get_ppd(&self, printer: &str) -> Result<(String, String, String), CupsError> {
        let ppd = self.capabilities.get_capability_document(printer).await?;
        let (manufacturer, model) = parse_manufacturer_and_model(&ppd);
        Ok((ppd, manufacturer, model))
    }

    /// Drops the cached PPD of `printer`.
    pub fn remove_cached_ppd(&self, printer: &str) {
        self.capabilities.invalidate(printer);
    }

    /// Gets the current state of job `job_id`.
    pub async fn get_job_state(&self, job_id: u32) -> Result<PrintJobStateDiff, CupsError> {
        let attributes: Vec<String> = JOB_ATTRIBUTES.iter().map(|a| a.to_string()).collect();
        let response = self.transport.fetch_job_attributes(job_id, &attributes).await?;

        if let ResponseStatus::NotFound | ResponseStatus::Other(_) = response.status {
            return StatusSnafu { operation: "Get-Job-Attributes", code: format!("{:?}", response.status) }.fail();
        }

        let job_tags = response_to_tag_mappings(&response.attributes, GroupTag::Job)
            .into_iter()
            .next()
            .unwrap_or_default();
        Ok(tags_to_job_state(&job_tags))
    }

    /// Sends a new print job to `printer` and returns its job id.
    pub async fn print(&self, printer: &str, file_path: &Path, title: &str, user: &str, ticket: &CloudJobTicket) -> Result<u32, CupsError> {
        let options = ticket_to_options(ticket);
        debug!("Printing {} on {printer} with options {options:?}", file_path.display());
        self.transport.submit_print_job(user, printer, file_path, title, &options).await
    }
}

/// Fails unless `printer_attributes` asks for everything the printer mapper
/// reads, or for "all".
pub fn check_printer_attributes(printer_attributes: &[String]) -> Result<(), CupsError> {
    if printer_attributes.iter().any(|a| a == "all") {
        return Ok(());
    }

    let missing: Vec<String> = REQUIRED_PRINTER_ATTRIBUTES
        .iter()
        .filter(|required| !printer_attributes.iter().any(|a| a == *required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        MissingPrinterAttributesSnafu { missing }.fail()
    }
}
