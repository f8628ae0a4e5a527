//! Alpaca Market Data v2 (REST) bar provider.
//!
//! Only the historical stock bars endpoint is used. Credentials come from
//! `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`.

pub mod params;
pub mod provider;
pub mod response;

pub use params::{Adjustment, AlpacaBarsParams, Feed, Sort};
pub use provider::AlpacaProvider;
