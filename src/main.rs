use std::path::Path;

use backon::{ExponentialBuilder, Retryable};
use clap::Parser;
use cli::{Cli, Commands};
use crate::config::models::Settings;
use cups_client::{
    client::{build_cups_url, Cups},
    models::Printer,
    ppd_cache::{HttpPpdSource, PpdCache},
    system_tags::SystemTags,
    transport::IppTransport,
};
use cdd::models::CloudJobTicket;
use log::{debug, error, info, warn};
use snafu::{ResultExt, Whatever};

mod cdd;
mod cli;
mod config;
mod cups_client;

type CupsConnector = Cups<IppTransport, PpdCache<HttpPpdSource>>;

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), Whatever> {
    colog::init();

    let cli = Cli::parse();
    let settings = crate::config::loading::load_config().whatever_context("Could not load settings")?;

    let _sentry = settings.sentry_dsn.as_deref().filter(|dsn| !dsn.is_empty()).map(|dsn| {
        sentry::init((dsn, sentry::ClientOptions { release: sentry::release_name!(), ..Default::default() }))
    });

    let cups = connect(&settings).whatever_context("Could not set up CUPS connector")?;

    match cli.command.unwrap_or(Commands::Printers { watch: false }) {
        Commands::Printers { watch: false } => print_printers(&cups).await?,
        Commands::Printers { watch: true } => {
            info!("Printing printers every {}", humantime::format_duration(settings.poll_interval));
            loop {
                if let Err(e) = print_printers(&cups).await {
                    error!("Error reading printers from CUPS: {:?}", e);
                }
                tokio::time::sleep(settings.poll_interval).await;
            }
        }
        Commands::JobState { job_id } => {
            let state = cups.get_job_state(job_id).await.whatever_context("Could not get job state")?;
            println!("{}", serde_json::to_string_pretty(&state).whatever_context("Could not serialize job state")?);
        }
        Commands::Print { printer, file, title, user, ticket } => {
            let ticket = match ticket {
                Some(path) => read_ticket(&path)?,
                None => CloudJobTicket::default(),
            };
            let user = user.unwrap_or_else(|| settings.cups.user.clone());
            let job_id = cups.print(&printer, &file, &title, &user, &ticket).await.whatever_context("Could not submit print job")?;
            println!("{job_id}");
        }
        Commands::Ppd { printer } => {
            let (ppd, manufacturer, model) = cups.get_ppd(&printer).await.whatever_context("Could not get PPD")?;
            println!("Manufacturer: {manufacturer}");
            println!("Model: {model}");
            println!("{ppd}");
        }
    }

    Ok(())
}

fn connect(settings: &Settings) -> Result<CupsConnector, cups_client::error::CupsError> {
    let cups_settings = &settings.cups;
    let cups_url = build_cups_url(cups_settings)?;
    debug!("Connecting to CUPS at {}", cups_settings.uri);

    let transport = IppTransport::new(
        cups_url.to_string(),
        cups_settings.ignore_tls_errors,
        cups_settings.max_connections,
        cups_settings.connect_timeout,
    );
    let ppd_source = HttpPpdSource::new(cups_url, cups_settings.ignore_tls_errors, cups_settings.connect_timeout)?;

    Cups::new(
        transport,
        PpdCache::new(ppd_source),
        cups_settings.info_to_display_name,
        cups_settings.printer_attributes.clone(),
        SystemTags::collect()?,
    )
}

async fn print_printers(cups: &CupsConnector) -> Result<(), Whatever> {
    let printers: Vec<Printer> = (|| async { cups.get_printers().await })
        .retry(ExponentialBuilder::default().with_factor(4.0))
        .notify(|e, dur| warn!("Reading printers from CUPS failed, retrying in {:?}: {}", dur, e))
        .await
        .whatever_context("Could not read printers from CUPS")?;

    debug!("{} of {} CUPS connections open", cups.conn_qty_open(), cups.conn_qty_max());
    println!("{}", serde_json::to_string_pretty(&printers).whatever_context("Could not serialize printers")?);
    Ok(())
}

fn read_ticket(path: &Path) -> Result<CloudJobTicket, Whatever> {
    let json = std::fs::read_to_string(path).with_whatever_context(|_| format!("Could not read ticket {}", path.display()))?;
    serde_json::from_str(&json).with_whatever_context(|_| format!("Invalid ticket {}", path.display()))
}
