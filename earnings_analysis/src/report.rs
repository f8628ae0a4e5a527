//! Text and JSON rendering of per-ticker results.

use std::fmt::Write;

use crate::{analysis::aggregate::augment, pipeline::TickerAnalysis};

fn opt(v: Option<f64>, precision: usize) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

/// Fixed-width table of one ticker's results followed by its skipped anchors.
pub fn format_text(analysis: &TickerAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} anchors analysed, {} skipped)",
        analysis.symbol,
        analysis.run.results.len(),
        analysis.run.skipped.len()
    );
    let _ = writeln!(
        out,
        "{:<10}  {:>8}  {:>8}  {:>12}  {:>11}  {:>7}  {:>9}",
        "anchor", "eps", "surp%", "max_return%", "days_to_max", "max_on", "avg_range"
    );

    for row in augment(&analysis.run.results, &analysis.combined) {
        let figures = row.record.and_then(|r| r.earnings).unwrap_or_default();
        let r = &row.result;
        let _ = writeln!(
            out,
            "{:<10}  {:>8}  {:>8}  {:>12.2}  {:>11}  {:>7}  {:>9}",
            r.anchor_date.to_string(),
            opt(figures.reported_eps, 2),
            opt(figures.surprise_pct, 1),
            r.max_return_pct,
            r.days_to_max,
            r.max_return_date.format("%m-%d").to_string(),
            opt(r.avg_daily_range, 3),
        );
    }

    for s in &analysis.run.skipped {
        let _ = writeln!(out, "skipped {}: {}", s.anchor_date, s.reason);
    }
    out
}

/// Pretty JSON array with one object per ticker.
pub fn to_json(analyses: &[TickerAnalysis]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(analyses)
}
