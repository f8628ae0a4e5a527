//! The analysis core: pure, synchronous functions over explicit slices.
//!
//! - [`normalize`] turns provider output into date-keyed records.
//! - [`align`] outer-joins prices and earnings by date.
//! - [`window`] slices the combined series around an anchor.
//! - [`returns`] finds the return extremum within a window.
//! - [`aggregate`] drives the above for every earnings anchor.

pub mod aggregate;
pub mod align;
pub mod normalize;
pub mod returns;
pub mod window;

pub use aggregate::{analyze, analyze_run, augment};
pub use align::align;
pub use returns::{average_daily_range, compute_returns};
pub use window::extract_window;
