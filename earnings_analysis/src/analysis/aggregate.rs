//! Per-anchor driver over the combined series.

use crate::{
    analysis::{
        returns::{average_daily_range, compute_returns},
        window::extract_window,
    },
    models::{AnalysisRun, AugmentedResult, CombinedRecord, SkippedAnchor, WindowResult},
};

/// Evaluate the window around every earnings anchor in `combined`.
///
/// Anchors are visited in ascending date order. An anchor whose window cannot
/// be evaluated is logged and recorded in [`AnalysisRun::skipped`]; the run
/// itself never fails.
pub fn analyze_run(combined: &[CombinedRecord], days_before: u32, days_after: u32) -> AnalysisRun {
    let mut run = AnalysisRun::default();

    for anchor in combined.iter().filter(|r| r.is_anchor()).map(|r| r.date) {
        let window = extract_window(combined, anchor, days_before, days_after);
        match compute_returns(window, anchor) {
            Ok(stats) => run.results.push(WindowResult {
                anchor_date: anchor,
                max_return_pct: stats.max_return_pct,
                days_to_max: stats.days_to_max,
                max_return_date: stats.max_return_date,
                avg_daily_range: average_daily_range(window),
                observations: stats.observations,
            }),
            Err(reason) => {
                tracing::warn!(%anchor, %reason, "skipping earnings anchor");
                run.skipped.push(SkippedAnchor {
                    anchor_date: anchor,
                    reason,
                });
            }
        }
    }

    run
}

/// [`analyze_run`] without the skipped-anchor diagnostics.
pub fn analyze(
    combined: &[CombinedRecord],
    days_before: u32,
    days_after: u32,
) -> Vec<WindowResult> {
    analyze_run(combined, days_before, days_after).results
}

/// Join every result with the combined row at its anchor date.
pub fn augment(results: &[WindowResult], combined: &[CombinedRecord]) -> Vec<AugmentedResult> {
    results
        .iter()
        .map(|result| AugmentedResult {
            result: result.clone(),
            record: combined
                .binary_search_by_key(&result.anchor_date, |r| r.date)
                .ok()
                .map(|i| combined[i].clone()),
        })
        .collect()
}
