use std::time::Duration;

use serde_derive::Deserialize;

// When changing anything here, make sure to add
// #[serde(alias = "ihavenounderscores")]
// where needed, so it can be read from the ENV vars.

#[derive(Debug, Clone, Deserialize)]
pub struct Cups {
    pub uri: String,
    #[serde(alias = "ignoretlserrors")]
    pub ignore_tls_errors: bool,
    pub username: String,
    pub password: String,
    #[serde(alias = "infotodisplayname")]
    pub info_to_display_name: bool,
    #[serde(alias = "printerattributes")]
    pub printer_attributes: Vec<String>,
    #[serde(alias = "maxconnections")]
    pub max_connections: usize,
    #[serde(alias = "connecttimeout", with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Default requesting user for print jobs.
    pub user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub cups: Cups,
    #[serde(alias = "pollinterval", with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(alias = "sentrydsn")]
    pub sentry_dsn: Option<String>,
}
