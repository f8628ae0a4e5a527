#![cfg(test)]
use chrono::NaiveDate;
use market_data_ingestor::{
    models::request_params::EarningsRequestParams,
    providers::{alpha_vantage::AlphaVantageProvider, EarningsProvider},
};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore]
async fn test_alpha_vantage_fetch_earnings() {
    // Requires ALPHAVANTAGE_API_KEY (a .env file is honoured).
    let _ = dotenvy::dotenv();
    if std::env::var("ALPHAVANTAGE_API_KEY").is_err() {
        println!("Skipping test_alpha_vantage_fetch_earnings: API key not set.");
        return;
    }

    let provider = AlphaVantageProvider::new(5).expect("Failed to create AlphaVantageProvider");
    let params = EarningsRequestParams {
        symbol: "IBM".into(),
        start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    };

    let reports = provider.fetch_earnings(params.clone()).await.unwrap();

    // IBM reports quarterly, so two years hold eight announcements.
    assert_eq!(reports.len(), 8);
    assert!(reports.iter().all(|r| params.contains(r.reported_date)));
    assert!(reports.windows(2).all(|w| w[0].reported_date <= w[1].reported_date));
    assert!(reports.iter().all(|r| r.symbol == "IBM"));
}
