use std::{collections::HashMap, future::Future, path::Path, sync::Arc, time::Duration};

use ipp::prelude::*;
use log::debug;
use snafu::{OptionExt, ResultExt};
use tokio::sync::Semaphore;

use super::error::*;
use super::models::{GroupTag, IppResponse, RawAttribute, RawValue, ResolutionUnit, ResponseStatus, ValueTag};

/// The print server, as far as the connector core needs it.
pub trait PrintServer: Send + Sync + 'static {
    /// CUPS-Get-Printers, asking only for `attributes`.
    fn fetch_printers(&self, attributes: &[String]) -> impl Future<Output = Result<IppResponse, CupsError>> + Send;

    /// Get-Job-Attributes for one job.
    fn fetch_job_attributes(&self, job_id: u32, attributes: &[String]) -> impl Future<Output = Result<IppResponse, CupsError>> + Send;

    /// Print-Job. Returns the job id CUPS assigned.
    fn submit_print_job(
        &self,
        user: &str,
        printer: &str,
        file_path: &Path,
        title: &str,
        options: &HashMap<String, String>,
    ) -> impl Future<Output = Result<u32, CupsError>> + Send;

    /// Connections currently in use.
    fn conn_qty_open(&self) -> usize;

    /// Connection ceiling.
    fn conn_qty_max(&self) -> usize;
}

/// `PrintServer` over IPP, using the `ipp` crate's async client.
pub struct IppTransport {
    uri: String,
    ignore_tls_errors: bool,
    connect_timeout: Duration,
    max_connections: usize,
    connections: Arc<Semaphore>,
}

impl IppTransport {
    pub fn new(uri: String, ignore_tls_errors: bool, max_connections: usize, connect_timeout: Duration) -> Self {
        IppTransport {
            uri,
            ignore_tls_errors,
            connect_timeout,
            max_connections,
            connections: Arc::new(Semaphore::new(max_connections)),
        }
    }

    fn parse_uri(&self, path: Option<&str>) -> Result<Uri, CupsError> {
        let uri = match path {
            Some(path) => format!("{}/{}", self.uri.trim_end_matches('/'), path),
            None => self.uri.clone(),
        };
        uri.parse().ok().context(InvalidUriSnafu { uri })
    }

    /// Sends `req` to `uri`, holding one connection permit for the duration.
    async fn send(&self, operation: &str, uri: Uri, req: IppRequestResponse) -> Result<IppRequestResponse, CupsError> {
        // The semaphore is never closed.
        let _permit = self.connections.acquire().await.ok().whatever_context("connection pool closed")?;

        let client = AsyncIppClient::builder(uri).ignore_tls_errors(self.ignore_tls_errors).build();
        debug!("Sending IPP {operation} request");

        tokio::time::timeout(self.connect_timeout, client.send(req))
            .await
            .ok()
            .context(TimeoutSnafu { operation })?
            .context(IppSnafu { operation })
    }
}

impl PrintServer for IppTransport {
    async fn fetch_printers(&self, attributes: &[String]) -> Result<IppResponse, CupsError> {
        let uri = self.parse_uri(None)?;
        let mut req = IppRequestResponse::new(IppVersion::v1_1(), Operation::CupsGetPrinters, Some(uri.clone()));
        req.attributes_mut().add(DelimiterTag::OperationAttributes, requested_attributes(attributes));

        let resp = self.send("CUPS-Get-Printers", uri, req).await?;
        Ok(to_response(&resp))
    }

    async fn fetch_job_attributes(&self, job_id: u32, attributes: &[String]) -> Result<IppResponse, CupsError> {
        let uri = self.parse_uri(Some(&format!("jobs/{job_id}")))?;
        let mut req = IppRequestResponse::new(IppVersion::v1_1(), Operation::GetJobAttributes, Some(uri.clone()));
        req.attributes_mut().add(DelimiterTag::OperationAttributes, requested_attributes(attributes));

        let resp = self.send("Get-Job-Attributes", uri, req).await?;
        Ok(to_response(&resp))
    }

    async fn submit_print_job(
        &self,
        user: &str,
        printer: &str,
        file_path: &Path,
        title: &str,
        options: &HashMap<String, String>,
    ) -> Result<u32, CupsError> {
        let uri = self.parse_uri(Some(&format!("printers/{printer}")))?;
        let document = tokio::fs::read(file_path).await.context(ReadDocumentSnafu { path: file_path })?;
        let payload = IppPayload::new(std::io::Cursor::new(document));

        let print_job = IppOperationBuilder::print_job(uri.clone(), payload)
            .user_name(user)
            .job_title(title)
            .attributes(options.iter().map(|(k, v)| option_to_attribute(k, v)));

        let resp = self.send("Print-Job", uri, print_job.build().into()).await?;
        let response = to_response(&resp);
        if response.status != ResponseStatus::Ok {
            return StatusSnafu { operation: "Print-Job", code: format!("{:?}", resp.header().status_code()) }.fail();
        }

        response
            .attributes
            .iter()
            .find(|a| a.group == GroupTag::Job && a.name == IppAttribute::JOB_ID)
            .and_then(|a| match a.values.first() {
                Some(RawValue::Integer(id)) => u32::try_from(*id).ok(),
                _ => None,
            })
            .context(MissingJobIdSnafu)
    }

    fn conn_qty_open(&self) -> usize {
        self.max_connections - self.connections.available_permits()
    }

    fn conn_qty_max(&self) -> usize {
        self.max_connections
    }
}

fn requested_attributes(attributes: &[String]) -> IppAttribute {
    let values = attributes.iter().map(|a| IppValue::Keyword(a.clone().into())).collect();
    IppAttribute::new("requested-attributes", IppValue::Array(values))
}

/// CUPS option strings become integers, booleans or keywords, the same way
/// the CUPS command line tools type them. `page-ranges` and
/// `orientation-requested` carry their own IPP syntax.
fn option_to_attribute(key: &str, value: &str) -> IppAttribute {
    let typed = match key {
        "page-ranges" => parse_page_ranges(value),
        "orientation-requested" => value.parse::<i32>().ok().map(IppValue::Enum),
        _ => None,
    };

    let value = if let Some(typed) = typed {
        typed
    } else if let Ok(i) = value.parse::<i32>() {
        IppValue::Integer(i)
    } else if let Ok(b) = value.parse::<bool>() {
        IppValue::Boolean(b)
    } else {
        IppValue::Keyword(value.to_string().into())
    };
    IppAttribute::new(key, value)
}

/// "1-3,7" => [1..3, 7..7]
fn parse_page_ranges(value: &str) -> Option<IppValue> {
    let ranges = value
        .split(',')
        .map(|part| {
            let (start, end) = part.split_once('-').unwrap_or((part, part));
            let min = start.trim().parse::<i32>().ok()?;
            let max = end.trim().parse::<i32>().ok()?;
            Some(IppValue::RangeOfInteger { min, max })
        })
        .collect::<Option<Vec<_>>>()?;

    match ranges.len() {
        1 => ranges.into_iter().next(),
        _ => Some(IppValue::Array(ranges)),
    }
}

/// Flattens an `ipp` response into wire-ordered records. Consecutive groups
/// of the same kind are separated by a `Separator` record.
fn to_response(resp: &IppRequestResponse) -> IppResponse {
    let status_code = resp.header().status_code();
    let status = if status_code.is_success() {
        ResponseStatus::Ok
    } else if matches!(status_code, StatusCode::ClientErrorNotFound) {
        ResponseStatus::NotFound
    } else {
        ResponseStatus::Other(status_code as u16)
    };

    let mut attributes = Vec::new();
    for group in resp.attributes().groups() {
        let group_tag = match group.tag() {
            DelimiterTag::OperationAttributes => GroupTag::Operation,
            DelimiterTag::JobAttributes => GroupTag::Job,
            DelimiterTag::PrinterAttributes => GroupTag::Printer,
            DelimiterTag::UnsupportedAttributes => GroupTag::Unsupported,
            other => GroupTag::Other(other as u8),
        };
        if !attributes.is_empty() {
            attributes.push(RawAttribute::separator());
        }
        for (name, attribute) in group.attributes() {
            attributes.push(to_raw_attribute(name, group_tag, attribute.value()));
        }
    }

    IppResponse { status, attributes }
}

fn to_raw_attribute(name: &str, group: GroupTag, value: &IppValue) -> RawAttribute {
    let values: Vec<&IppValue> = match value {
        IppValue::Array(values) => values.iter().collect(),
        single => vec![single],
    };
    let value_tag = values.first().map(|v| value_tag_of(v)).unwrap_or(ValueTag::NoValue);

    RawAttribute::new(name, group, value_tag, values.into_iter().map(to_raw_value).collect())
}

fn value_tag_of(value: &IppValue) -> ValueTag {
    match value {
        IppValue::Integer(_) => ValueTag::Integer,
        IppValue::Enum(_) => ValueTag::Enum,
        IppValue::Boolean(_) => ValueTag::Boolean,
        IppValue::OctetString(_) => ValueTag::OctetString,
        IppValue::TextWithoutLanguage(_) | IppValue::TextWithLanguage { .. } => ValueTag::Text,
        IppValue::NameWithoutLanguage(_) | IppValue::NameWithLanguage { .. } => ValueTag::Name,
        IppValue::Keyword(_) => ValueTag::Keyword,
        IppValue::Uri(_) => ValueTag::Uri,
        IppValue::UriScheme(_) => ValueTag::UriScheme,
        IppValue::Charset(_) => ValueTag::Charset,
        IppValue::NaturalLanguage(_) => ValueTag::NaturalLanguage,
        IppValue::MimeMediaType(_) => ValueTag::MimeMediaType,
        IppValue::DateTime { .. } => ValueTag::DateTime,
        IppValue::Resolution { .. } => ValueTag::Resolution,
        IppValue::RangeOfInteger { .. } => ValueTag::RangeOfInteger,
        IppValue::Collection(_) => ValueTag::Collection,
        IppValue::NoValue => ValueTag::NoValue,
        IppValue::Other { tag, .. } => ValueTag::from(*tag),
        _ => ValueTag::Unknown,
    }
}

fn to_raw_value(value: &IppValue) -> RawValue {
    match value {
        IppValue::Integer(i) | IppValue::Enum(i) => RawValue::Integer(*i),
        IppValue::Boolean(b) => RawValue::Boolean(*b),
        IppValue::DateTime { year, month, day, hour, minutes, seconds, deci_seconds, utc_dir, utc_hours, utc_mins } => {
            let [y0, y1] = year.to_be_bytes();
            RawValue::Date([y0, y1, *month, *day, *hour, *minutes, *seconds, *deci_seconds, *utc_dir as u8, *utc_hours, *utc_mins])
        }
        IppValue::Resolution { cross_feed, feed, units } => RawValue::Resolution {
            x: *cross_feed,
            y: *feed,
            unit: ResolutionUnit::from(*units as i32),
        },
        IppValue::RangeOfInteger { min, max } => RawValue::Range { lower: *min, upper: *max },
        IppValue::Collection(_) | IppValue::NoValue | IppValue::Other { .. } | IppValue::Array(_) => RawValue::Opaque,
        text => RawValue::Text(text.to_string()),
    }
}
