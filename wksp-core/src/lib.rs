//! Foundation types shared by the workspace lifecycle crates.

pub mod error;

pub use error::{Result, WkspError};
