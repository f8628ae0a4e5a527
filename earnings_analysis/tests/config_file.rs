use std::io::Write;

use earnings_analysis::config::load_config_path;
use market_data_ingestor::providers::alpaca_rest::{Adjustment, Feed};
use tempfile::NamedTempFile;

#[test]
fn loads_and_normalizes_file() {
    let mut f = NamedTempFile::new().unwrap();
    write!(
        f,
        r#"
[analysis]
days_before = 3
days_after = 10
timezone = " America/Chicago "

[bars]
provider = "ALPACA"
feed = "sip"
adjustment = "split"

[earnings]
provider = "alphavantage"
requests_per_minute = 75
"#
    )
    .unwrap();

    let cfg = load_config_path(f.path()).unwrap();
    assert_eq!(cfg.analysis.timezone, "America/Chicago");
    assert_eq!(cfg.bars.provider, "alpaca");
    assert_eq!(cfg.bars.feed, Some(Feed::Sip));
    assert_eq!(cfg.bars.adjustment, Adjustment::Split);
    assert_eq!(cfg.earnings.provider, "alpha_vantage");
    assert_eq!(cfg.earnings.requests_per_minute, 75);

    let s = cfg.analysis_settings().unwrap();
    assert_eq!((s.days_before, s.days_after), (3, 10));
    assert_eq!(s.timezone, chrono_tz::America::Chicago);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let err = load_config_path(&path).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn malformed_toml_is_an_error() {
    let mut f = NamedTempFile::new().unwrap();
    write!(f, "[analysis\ndays_before = 3").unwrap();
    let err = load_config_path(f.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse config TOML"));
}
