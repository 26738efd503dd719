//! Input/output helpers.
//!
//! - raw transaction CSV ingest (`ingest`)
//! - canonical `Sales,Date,Region` read/write (`canonical`)
//! - series exports (CSV/JSON) (`export`)

pub mod canonical;
pub mod export;
mod fields;
pub mod ingest;

pub use canonical::*;
pub use export::*;
pub use ingest::*;
