//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and canonical transaction records (`RawTransaction`, `CanonicalRecord`)
//! - the immutable in-memory `Dataset`
//! - query inputs/outputs (`RegionSelector`, `SeriesPoint`)
//! - resolved configuration (`AppConfig`)

pub mod types;

pub use types::*;
