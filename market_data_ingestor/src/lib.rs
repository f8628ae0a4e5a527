//! Market data retrieval for the earnings analysis workspace.
//!
//! Two vendor-agnostic contracts live in [`providers`]: [`providers::DataProvider`]
//! for OHLCV bars and [`providers::EarningsProvider`] for earnings calendars.
//! Everything returned crosses the crate boundary as the plain models in
//! [`models`], never as vendor response types.

pub mod models;
pub mod providers;
