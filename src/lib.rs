pub mod checks;
pub mod config;
pub mod error;
pub mod structs;
pub mod utils;
pub mod version;

pub use config::{ConfigOverrides, Settings};
pub use error::{ReleaseCheckError, Result};
