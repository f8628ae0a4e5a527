mod common;
use common::{FakeBars, FakeEarnings, date, report, vendor_bar};

use chrono::{TimeZone, Utc};
use earnings_analysis::{
    error::{AnalysisError, PipelineError},
    pipeline::{AnalysisSettings, TickerRequest, analyze_ticker},
    report::{format_text, to_json},
};
use market_data_ingestor::models::request_params::ProviderParams;

fn request(symbol: &str) -> TickerRequest {
    TickerRequest {
        symbol: symbol.to_string(),
        from: date(2023, 4, 1),
        to: date(2023, 7, 31),
        provider_params: ProviderParams::None,
    }
}

fn settings(before: u32, after: u32) -> AnalysisSettings {
    AnalysisSettings {
        days_before: before,
        days_after: after,
        ..Default::default()
    }
}

#[tokio::test]
async fn fetches_aligns_and_analyses() {
    let bars = FakeBars::new(
        "AAPL",
        vec![
            vendor_bar(date(2023, 4, 10), 100.0),
            vendor_bar(date(2023, 4, 11), 110.0),
            vendor_bar(date(2023, 4, 12), 105.0),
            vendor_bar(date(2023, 7, 27), 50.0),
            vendor_bar(date(2023, 7, 28), 49.0),
        ],
    );
    let earnings = FakeEarnings {
        reports: vec![
            report("AAPL", date(2023, 4, 10), Some(1.52)),
            report("AAPL", date(2023, 7, 27), Some(1.26)),
            // outside the requested range
            report("AAPL", date(2023, 11, 2), Some(1.46)),
        ],
    };

    let out = analyze_ticker(&bars, &earnings, &request("AAPL"), &settings(0, 3))
        .await
        .unwrap();

    assert_eq!(out.symbol, "AAPL");
    assert_eq!(out.run.results.len(), 2);
    assert!(out.run.skipped.is_empty());

    let first = &out.run.results[0];
    assert_eq!(first.anchor_date, date(2023, 4, 10));
    assert!((first.max_return_pct - 10.0).abs() < 1e-9);
    assert_eq!(first.days_to_max, 1);
    assert_eq!(first.avg_daily_range, Some(2.0));

    let second = &out.run.results[1];
    assert_eq!(second.max_return_pct, 0.0);
    assert_eq!(second.days_to_max, 0);
}

#[tokio::test]
async fn bar_request_is_padded_by_the_window_in_exchange_time() {
    let bars = FakeBars::new("AAPL", vec![]);
    let earnings = FakeEarnings { reports: vec![] };

    analyze_ticker(&bars, &earnings, &request("AAPL"), &settings(5, 20))
        .await
        .unwrap();

    let sent = bars.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(sent.symbols, vec!["AAPL".to_string()]);
    assert_eq!(sent.timeframe.to_string(), "1Day");
    // 2023-03-27 00:00 EDT
    assert_eq!(sent.start, Utc.with_ymd_and_hms(2023, 3, 27, 4, 0, 0).unwrap());
    // 2023-08-21 00:00 EDT, exclusive
    assert_eq!(sent.end, Utc.with_ymd_and_hms(2023, 8, 21, 4, 0, 0).unwrap());
}

#[tokio::test]
async fn missing_series_skips_every_anchor() {
    let bars = FakeBars::new("MSFT", vec![vendor_bar(date(2023, 4, 25), 280.0)]);
    let earnings = FakeEarnings {
        reports: vec![report("AAPL", date(2023, 5, 4), None)],
    };

    let out = analyze_ticker(&bars, &earnings, &request("AAPL"), &settings(5, 20))
        .await
        .unwrap();
    assert!(out.run.results.is_empty());
    assert_eq!(
        out.run.skipped[0].reason,
        AnalysisError::MissingAnchorPrice { anchor: date(2023, 5, 4) }
    );
}

#[tokio::test]
async fn provider_failure_propagates() {
    let bars = FakeBars::failing();
    let earnings = FakeEarnings { reports: vec![] };

    let err = analyze_ticker(&bars, &earnings, &request("AAPL"), &settings(5, 20))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Bars { ref symbol, .. } if symbol == "AAPL"));
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn inverted_range_is_rejected_before_fetching() {
    let bars = FakeBars::new("AAPL", vec![]);
    let earnings = FakeEarnings { reports: vec![] };
    let mut req = request("AAPL");
    std::mem::swap(&mut req.from, &mut req.to);

    let err = analyze_ticker(&bars, &earnings, &req, &settings(5, 20))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidRange { .. }));
    assert!(bars.last_request.lock().unwrap().is_none());
}

#[tokio::test]
async fn reports_render_results_and_skips() {
    let bars = FakeBars::new(
        "AAPL",
        vec![vendor_bar(date(2023, 4, 10), 100.0), vendor_bar(date(2023, 4, 11), 110.0)],
    );
    let earnings = FakeEarnings {
        reports: vec![
            report("AAPL", date(2023, 4, 10), Some(1.52)),
            report("AAPL", date(2023, 6, 10), None),
        ],
    };
    let out = analyze_ticker(&bars, &earnings, &request("AAPL"), &settings(0, 1))
        .await
        .unwrap();

    let text = format_text(&out);
    assert!(text.starts_with("AAPL (1 anchors analysed, 1 skipped)"));
    assert!(text.contains("2023-04-10"));
    assert!(text.contains("1.52"));
    assert!(text.contains("10.00"));
    assert!(text.contains("skipped 2023-06-10: no close price on anchor date 2023-06-10"));

    let json: serde_json::Value = serde_json::from_str(&to_json(&[out]).unwrap()).unwrap();
    assert_eq!(json[0]["symbol"], "AAPL");
    assert_eq!(json[0]["results"][0]["days_to_max"], 1);
    assert_eq!(json[0]["results"][0]["anchor_date"], "2023-04-10");
    assert_eq!(json[0]["skipped"][0]["anchor_date"], "2023-06-10");
    assert!(json[0].get("combined").is_none());
}
