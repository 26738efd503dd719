//! Sales core: normalization, daily aggregation, and the query entry point.

pub mod aggregate;
pub mod normalize;
pub mod query;

pub use aggregate::{aggregate, series_total};
pub use normalize::{normalize, normalize_dataset};
pub use query::{query, selector_options};
