//! Common types shared by the process inspection tools.
//!
//! This crate provides:
//! - Process identifier parsing with strict decimal validation
//! - The unified error taxonomy and stable error codes
//! - Output format selection and schema versioning

pub mod error;
pub mod id;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use id::ProcessId;
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
