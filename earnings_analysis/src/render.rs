//! SVG charts of the analysis output.
//!
//! Every function returns a self-contained `<svg>` document. Empty input
//! still yields a valid document carrying a "no data" note.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{CombinedRecord, WindowResult};

const WIDTH: i32 = 720;
const HEIGHT: i32 = 320;
const PADDING: f64 = 40.0;
const PRICE_COLOR: &str = "#348dc1";
const MARKER_COLOR: &str = "#af4b64";
const MAX_COLOR: &str = "#4fa487";
const BAR_COLOR: &str = "#ff9933";
const SERIES_COLORS: [&str; 6] = ["#348dc1", "#ff9933", "#4fa487", "#af4b64", "#8c6bb1", "#8c8c8c"];

fn svg_header(width: i32, height: i32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style><rect width="{w}" height="{h}" fill="#fff" />"##,
        w = width,
        h = height
    )
}

fn svg_footer() -> &'static str {
    "</svg>"
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn title(svg: &mut String, text: &str) {
    svg.push_str(&format!(
        r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="13" fill="#333">{t}</text>"##,
        x = WIDTH as f64 / 2.0,
        y = PADDING / 2.0 + 4.0,
        t = escape_xml(text)
    ));
}

fn no_data(svg: &mut String) {
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">no data</text>"#,
        x = WIDTH as f64 / 2.0,
        y = HEIGHT as f64 / 2.0
    ));
}

fn extent(values: impl Iterator<Item = f64>, include_zero: bool) -> Option<(f64, f64)> {
    let (mut min_v, mut max_v) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if include_zero {
        min_v = min_v.min(0.0);
        max_v = max_v.max(0.0);
    }
    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }
    if min_v == max_v {
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        min_v -= adjust;
        max_v += adjust;
    }
    Some((min_v, max_v))
}

fn scale_value(value: f64, min_v: f64, max_v: f64, height: f64) -> f64 {
    let inner_height = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn x_positions(len: usize, width: f64) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![width / 2.0],
        _ => {
            let inner_width = width - 2.0 * PADDING;
            (0..len)
                .map(|i| PADDING + inner_width * (i as f64 / (len - 1) as f64))
                .collect()
        }
    }
}

fn polyline(points: &[(f64, f64)], stroke: &str) -> String {
    if points.is_empty() {
        return String::new();
    }
    let coords = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(r#"<polyline fill="none" stroke="{stroke}" stroke-width="1.5" points="{coords}" />"#)
}

fn y_axis(svg: &mut String, min_v: f64, max_v: f64, height: f64, unit: &str) {
    for i in 0..=4 {
        let v = min_v + (max_v - min_v) * i as f64 / 4.0;
        let y = scale_value(v, min_v, max_v, height);
        svg.push_str(&format!(
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#eeeeee" stroke-width="0.5" />"##,
            x1 = PADDING,
            x2 = WIDTH as f64 - PADDING,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{v:.1}{unit}</text>"#,
            x = PADDING - 4.0,
            y = y + 3.0,
        ));
    }
}

/// Axis line plus one label per month, placed at the first date of the month.
fn add_time_axis(svg: &mut String, dates: &[NaiveDate], xs: &[f64], height: f64) {
    let axis_y = height - PADDING + 5.0;
    svg.push_str(&format!(
        r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#000" stroke-width="1" />"##,
        x1 = PADDING,
        x2 = WIDTH as f64 - PADDING,
        y = axis_y
    ));

    let mut last_month: Option<(i32, u32)> = None;
    for (date, x) in dates.iter().zip(xs) {
        let key = (date.year(), date.month());
        if last_month == Some(key) {
            continue;
        }
        last_month = Some(key);
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            y = axis_y + 16.0,
            label = date.format("%Y-%m")
        ));
    }
}

/// x coordinate for `date` on an axis laid out over the ascending `dates`.
///
/// Dates between two points are interpolated by calendar day, dates outside
/// the axis clamp to its ends.
fn x_for_date(date: NaiveDate, dates: &[NaiveDate], xs: &[f64]) -> Option<f64> {
    let (first, last) = (*dates.first()?, *dates.last()?);
    if date <= first {
        return xs.first().copied();
    }
    if date >= last {
        return xs.last().copied();
    }
    let i = dates.partition_point(|d| *d < date);
    if dates[i] == date {
        return Some(xs[i]);
    }
    let (d0, d1) = (dates[i - 1], dates[i]);
    let step = (date - d0).num_days() as f64;
    let span = (d1 - d0).num_days() as f64;
    Some(xs[i - 1] + (xs[i] - xs[i - 1]) * step / span)
}

fn price_panel(
    svg: &mut String,
    symbol: &str,
    combined: &[CombinedRecord],
    results: &[WindowResult],
) {
    let height = HEIGHT as f64;
    title(svg, &format!("{symbol} close with earnings dates"));

    let priced: Vec<(NaiveDate, f64)> = combined
        .iter()
        .filter_map(|r| r.close().map(|c| (r.date, c)))
        .collect();
    let Some((min_v, max_v)) = extent(priced.iter().map(|(_, c)| *c), false) else {
        no_data(svg);
        return;
    };

    let dates: Vec<NaiveDate> = priced.iter().map(|(d, _)| *d).collect();
    let xs = x_positions(dates.len(), WIDTH as f64);
    y_axis(svg, min_v, max_v, height, "");

    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(&priced)
        .map(|(x, (_, c))| (*x, scale_value(*c, min_v, max_v, height)))
        .collect();
    svg.push_str(&polyline(&points, PRICE_COLOR));

    for anchor in combined.iter().filter(|r| r.is_anchor()).map(|r| r.date) {
        let Some(x) = x_for_date(anchor, &dates, &xs) else { continue };
        svg.push_str(&format!(
            r#"<line class="earnings-marker" data-date="{anchor}" x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="{MARKER_COLOR}" stroke-width="1" stroke-dasharray="4 3" />"#,
            y1 = PADDING,
            y2 = height - PADDING,
        ));
    }

    for r in results {
        let Ok(i) = dates.binary_search(&r.max_return_date) else { continue };
        svg.push_str(&format!(
            r#"<circle class="max-return" data-anchor="{anchor}" cx="{x:.2}" cy="{y:.2}" r="3" fill="{MAX_COLOR}" />"#,
            anchor = r.anchor_date,
            x = xs[i],
            y = scale_value(priced[i].1, min_v, max_v, height),
        ));
    }

    add_time_axis(svg, &dates, &xs, height);
}

fn bar_panel(
    svg: &mut String,
    heading: &str,
    labels: &[String],
    values: &[Option<f64>],
    unit: &str,
) {
    let height = HEIGHT as f64;
    title(svg, heading);

    let Some((min_v, max_v)) = extent(values.iter().flatten().copied(), true) else {
        no_data(svg);
        return;
    };
    y_axis(svg, min_v, max_v, height, unit);

    let xs = x_positions(values.len(), WIDTH as f64);
    let bar_width = ((WIDTH as f64 - 2.0 * PADDING) / values.len().max(1) as f64) * 0.7;
    let zero = scale_value(0.0, min_v, max_v, height);

    for ((x, v), label) in xs.iter().zip(values).zip(labels) {
        if let Some(v) = v.filter(|v| v.is_finite()) {
            let y = scale_value(v, min_v, max_v, height);
            let (top, bottom) = if y < zero { (y, zero) } else { (zero, y) };
            svg.push_str(&format!(
                r#"<rect class="bar" x="{bx:.2}" y="{top:.2}" width="{bar_width:.2}" height="{h:.2}" fill="{BAR_COLOR}" />"#,
                bx = x - bar_width / 2.0,
                h = bottom - top,
            ));
        }
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            y = height - PADDING + 16.0,
            label = escape_xml(label)
        ));
    }
}

fn avg_range_panel(svg: &mut String, results: &[WindowResult]) {
    let labels: Vec<String> = results.iter().map(|r| r.anchor_date.to_string()).collect();
    let values: Vec<Option<f64>> = results.iter().map(|r| r.avg_daily_range).collect();
    bar_panel(svg, "Average daily range around earnings", &labels, &values, "");
}

/// Close-price line with a dashed vertical marker at every earnings date and
/// a dot at each window's maximum.
pub fn price_chart_svg(
    symbol: &str,
    combined: &[CombinedRecord],
    results: &[WindowResult],
) -> String {
    let mut svg = svg_header(WIDTH, HEIGHT);
    price_panel(&mut svg, symbol, combined, results);
    svg.push_str(svg_footer());
    svg
}

/// One bar per anchor showing the mean `high - low` over its window.
pub fn avg_range_chart_svg(results: &[WindowResult]) -> String {
    let mut svg = svg_header(WIDTH, HEIGHT);
    avg_range_panel(&mut svg, results);
    svg.push_str(svg_footer());
    svg
}

/// The price chart above the average-range chart in one document.
pub fn performance_report_svg(
    symbol: &str,
    combined: &[CombinedRecord],
    results: &[WindowResult],
) -> String {
    let mut svg = svg_header(WIDTH, HEIGHT * 2);
    svg.push_str(r#"<g class="panel">"#);
    price_panel(&mut svg, symbol, combined, results);
    svg.push_str("</g>");
    svg.push_str(&format!(r#"<g class="panel" transform="translate(0,{HEIGHT})">"#));
    avg_range_panel(&mut svg, results);
    svg.push_str("</g>");
    svg.push_str(svg_footer());
    svg
}

/// Distribution of days-to-max across tickers, stacked per ticker, one bar per
/// signed day offset.
pub fn days_to_max_histogram_svg(runs: &[(String, Vec<WindowResult>)]) -> String {
    let height = HEIGHT as f64;
    let mut svg = svg_header(WIDTH, HEIGHT);
    title(&mut svg, "Days to maximum return after earnings");

    // offset -> count per ticker, in `runs` order
    let mut bins: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, (_, results)) in runs.iter().enumerate() {
        for r in results {
            bins.entry(r.days_to_max).or_insert_with(|| vec![0; runs.len()])[i] += 1;
        }
    }
    let (Some(&lo), Some(&hi)) = (bins.keys().next(), bins.keys().next_back()) else {
        no_data(&mut svg);
        svg.push_str(svg_footer());
        return svg;
    };

    let offsets: Vec<i64> = (lo..=hi).collect();
    let max_count = bins
        .values()
        .map(|c| c.iter().sum::<usize>())
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    y_axis(&mut svg, 0.0, max_count, height, "");

    let xs = x_positions(offsets.len(), WIDTH as f64);
    let bar_width = ((WIDTH as f64 - 2.0 * PADDING) / offsets.len() as f64) * 0.8;
    for (x, offset) in xs.iter().zip(&offsets) {
        let mut stacked = 0usize;
        if let Some(counts) = bins.get(offset) {
            for (i, count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
                let top = scale_value((stacked + count) as f64, 0.0, max_count, height);
                let bottom = scale_value(stacked as f64, 0.0, max_count, height);
                svg.push_str(&format!(
                    r#"<rect class="bin" data-offset="{offset}" data-symbol="{sym}" x="{bx:.2}" y="{top:.2}" width="{bar_width:.2}" height="{h:.2}" fill="{color}" />"#,
                    sym = escape_xml(&runs[i].0),
                    bx = x - bar_width / 2.0,
                    h = bottom - top,
                    color = SERIES_COLORS[i % SERIES_COLORS.len()],
                ));
                stacked += count;
            }
        }
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{offset}</text>"#,
            y = height - PADDING + 16.0,
        ));
    }

    for (i, (symbol, _)) in runs.iter().enumerate() {
        let y = PADDING + 14.0 * (i as f64 + 1.0);
        let x = WIDTH as f64 - PADDING - 80.0;
        svg.push_str(&format!(
            r#"<rect x="{x:.2}" y="{ry:.2}" width="10" height="8" fill="{color}" /><text x="{tx:.2}" y="{y:.2}" text-anchor="start">{label}</text>"#,
            ry = y - 8.0,
            tx = x + 14.0,
            color = SERIES_COLORS[i % SERIES_COLORS.len()],
            label = escape_xml(symbol)
        ));
    }

    svg.push_str(svg_footer());
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, day).unwrap()
    }

    #[test]
    fn interpolates_between_trading_days() {
        let dates = [d(4, 7), d(4, 10)];
        let xs = [100.0, 400.0];
        assert_eq!(x_for_date(d(4, 8), &dates, &xs), Some(200.0));
        assert_eq!(x_for_date(d(4, 1), &dates, &xs), Some(100.0));
        assert_eq!(x_for_date(d(5, 1), &dates, &xs), Some(400.0));
        assert_eq!(x_for_date(d(5, 1), &[], &[]), None);
    }

    #[test]
    fn escapes_symbol_text() {
        assert_eq!(escape_xml("BRK<B>&\""), "BRK&lt;B&gt;&amp;&quot;");
    }

    #[test]
    fn empty_histogram_is_valid_document() {
        let svg = days_to_max_histogram_svg(&[]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("no data"));
    }
}
