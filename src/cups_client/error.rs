use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CupsError {
    #[snafu(display("Printer attributes missing from config: {}", missing.join(",")))]
    MissingPrinterAttributes { missing: Vec<String> },

    #[snafu(display("Invalid CUPS URI: {uri}"))]
    InvalidUri { uri: String },

    #[snafu(display("IPP {operation} request failed"))]
    Ipp { operation: String, source: ipp::error::IppError },

    #[snafu(display("IPP {operation} request timed out"))]
    Timeout { operation: String },

    #[snafu(display("IPP {operation} returned status {code}"))]
    Status { operation: String, code: String },

    #[snafu(display("Print-Job response did not contain a job-id"))]
    MissingJobId,

    #[snafu(display("Could not read document {}", path.display()))]
    ReadDocument { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not fetch PPD for printer {printer}"))]
    PpdFetch { printer: String, source: reqwest::Error },

    #[snafu(display("Failed to collect system tags"))]
    SystemTags { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
