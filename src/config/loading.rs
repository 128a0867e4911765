use config::{Config, Environment};
use log::info;
use snafu::{ResultExt, Snafu};

use crate::cups_client::attributes::REQUIRED_PRINTER_ATTRIBUTES;

use super::models::Settings;

pub fn load_config() -> Result<Settings, ConfigError> {
    // As Rust has no native support for .env files,
    // we use the dotenv_flow crate to import to actual ENV vars.
    if let Ok(dotenv_path) = dotenv_flow::dotenv_flow() {
        info!("Loaded dotenv file: {:?}", dotenv_path);
    }

    build_config(Environment::default())
}

fn build_config(environment: Environment) -> Result<Settings, ConfigError> {
    let default_attributes: Vec<&str> = REQUIRED_PRINTER_ATTRIBUTES.to_vec();

    let config = Config::builder()
        .add_source(environment
            .prefix("C2C")
            .separator("_")
            .prefix_separator("_")
            .try_parsing(true)
            .with_list_parse_key("cups.printerattributes")
            .list_separator(","))
        .set_default("cups.uri", "https://localhost:631/").context(BuildSnafu)?
        .set_default("cups.ignoretlserrors", "true").context(BuildSnafu)?
        .set_default("cups.username", "").context(BuildSnafu)?
        .set_default("cups.password", "").context(BuildSnafu)?
        .set_default("cups.infotodisplayname", "true").context(BuildSnafu)?
        .set_default("cups.printerattributes", default_attributes).context(BuildSnafu)?
        .set_default("cups.maxconnections", "50").context(BuildSnafu)?
        .set_default("cups.connecttimeout", "5s").context(BuildSnafu)?
        .set_default("cups.user", "cups2cloud").context(BuildSnafu)?
        .set_default("pollinterval", "1m").context(BuildSnafu)?
        .set_default("sentrydsn", "").context(BuildSnafu)?
        .build().context(BuildSnafu)?;

    config.try_deserialize().context(DeserializeSnafu)
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Could not read configuration"))]
    Build { source: config::ConfigError },

    #[snafu(display("Invalid configuration"))]
    Deserialize { source: config::ConfigError },
}
