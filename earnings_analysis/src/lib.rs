//! Post-earnings price-movement analysis.
//!
//! Daily bars and earnings announcements are aligned by calendar date, and the
//! window around each announcement is searched for the largest return versus
//! the announcement-day close.
//!
//! The core in [`analysis`] is pure and synchronous. [`pipeline`] wires it to
//! the providers of `market_data_ingestor`, [`render`] draws SVG charts and
//! [`report`] formats results for the CLI.

#![deny(missing_docs)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod render;
pub mod report;
pub mod tz;
