pub mod config;
pub mod error;
pub mod types;

pub use config::ImproverConfig;
pub use error::{ImproverError, Result};
