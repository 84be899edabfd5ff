pub mod config;
pub mod error;
pub mod host;
pub mod manifest;
pub mod release;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
