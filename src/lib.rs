//! DTP labor estimation and XML checking for localization hand-off batches.
//!
//! The library side exposes the estimator, the directory scanner with its
//! injectable [`counter::UnitCounter`] boundary, and the XML checks; the
//! binary in `main.rs` wires them to a small clap CLI.

pub mod cli;
pub mod config;
pub mod counter;
pub mod estimate;
pub mod report;
pub mod scan;
pub mod util;
pub mod xml;
