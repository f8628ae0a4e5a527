//! Alpha Vantage earnings-calendar provider (`function=EARNINGS`).
//!
//! The free tier allows a handful of requests per minute, so the provider
//! carries its own rate limiter. Credentials come from `ALPHAVANTAGE_API_KEY`.

pub mod provider;
pub mod response;

pub use provider::{AlphaVantageProvider, DEFAULT_REQUESTS_PER_MINUTE};
