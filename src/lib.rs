pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod scrapers;
pub mod utils;

pub use config::Config;
pub use pipeline::{run, RunSummary};
