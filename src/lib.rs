pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod output;
pub mod query;
pub mod source;
pub mod stations;
pub mod view;

pub use error::{ConfigError, DataLoadError, Error, Result};
