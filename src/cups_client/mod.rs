pub mod attributes;
pub mod client;
pub mod error;
pub mod job;
pub mod models;
pub mod ppd_cache;
pub mod printer;
pub mod system_tags;
pub mod ticket;
pub mod transport;
