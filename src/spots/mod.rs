//! Spot storage.
//!
//! - [`types`]: the `Spot` record
//! - [`store`]: one profile's CSV file and its in-memory cache
//! - [`registry`]: every resident profile store, plus the reload scan

pub mod registry;
pub mod store;
pub mod types;

pub use registry::{ReloadReport, SpotRegistry};
pub use store::{CSV_HEADERS, FileSignature, SpotStore};
pub use types::Spot;
