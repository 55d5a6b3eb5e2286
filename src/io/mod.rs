//! Input/output helpers.
//!
//! - numeric table ingest + validation (`ingest`)
//! - result exports (JSON/CSV) and table writing (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
