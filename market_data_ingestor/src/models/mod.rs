pub mod asset;
pub mod bar;
pub mod bar_series;
pub mod earnings;
pub mod request_params;
pub mod timeframe;
