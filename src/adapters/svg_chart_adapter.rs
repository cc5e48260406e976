//! Standalone SVG charts: price/EMA/MACD panels and portfolio allocation pie.

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::dashboard::PriceChart;
use crate::domain::error::DashboardError;
use crate::domain::portfolio::AllocationSlice;
use crate::ports::chart_port::ChartPort;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 620.0;
const PADDING: f64 = 60.0;
const PRICE_TOP: f64 = 50.0;
const PRICE_HEIGHT: f64 = 300.0;
const MACD_TOP: f64 = 420.0;
const MACD_HEIGHT: f64 = 140.0;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#17becf",
];

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPort for SvgChartAdapter {
    fn render_price_chart(&self, chart: &PriceChart, output: &Path) -> Result<(), DashboardError> {
        write_file(output, &price_chart_svg(chart))
    }

    fn render_allocation(
        &self,
        slices: &[AllocationSlice],
        output: &Path,
    ) -> Result<(), DashboardError> {
        write_file(output, &allocation_svg(slices))
    }
}

fn write_file(path: &Path, svg: &str) -> Result<(), DashboardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, svg)?;
    Ok(())
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_open(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif" font-size="12">
<rect width="100%" height="100%" fill="white"/>
"#,
        w = width,
        h = height
    )
}

fn placeholder(width: f64, height: f64, message: &str) -> String {
    let mut svg = svg_open(width, height);
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle">{}</text>"#,
        width / 2.0,
        height / 2.0,
        escape_xml(message)
    );
    svg.push_str("</svg>\n");
    svg
}

/// Maps `values` onto the plot width, scaling [`min`, `max`] into the panel at `top`.
fn polyline_points(values: &[f64], top: f64, height: f64, min: f64, max: f64) -> String {
    let plot_width = WIDTH - 2.0 * PADDING;
    let range = max - min;
    let scale_y = if range > 0.0 { height / range } else { 1.0 };
    let scale_x = if values.len() > 1 {
        plot_width / (values.len() - 1) as f64
    } else {
        0.0
    };
    // a flat series sits mid-panel
    let offset = if range > 0.0 { 0.0 } else { height / 2.0 };

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = PADDING + i as f64 * scale_x;
            let y = top + height - offset - (v - min) * scale_y;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bounds<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> (f64, f64) {
    series
        .into_iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn panel_frame(svg: &mut String, top: f64, height: f64, title: &str, min: f64, max: f64) {
    let right = WIDTH - PADDING;
    let bottom = top + height;
    let _ = writeln!(
        svg,
        r##"<rect x="{PADDING:.0}" y="{top:.0}" width="{:.0}" height="{height:.0}" fill="none" stroke="#cccccc"/>"##,
        right - PADDING
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-size="14">{}</text>"#,
        WIDTH / 2.0,
        top - 10.0,
        escape_xml(title)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="end">{:.2}</text>"#,
        PADDING - 5.0,
        top + 4.0,
        max
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="end">{:.2}</text>"#,
        PADDING - 5.0,
        bottom,
        min
    );
}

fn line(svg: &mut String, points: &str, color: &str, width: f64) {
    let _ = writeln!(
        svg,
        r#"<polyline fill="none" stroke="{color}" stroke-width="{width}" points="{points}"/>"#
    );
}

pub fn price_chart_svg(chart: &PriceChart) -> String {
    let closes = chart.series.closes();
    if closes.is_empty() {
        return placeholder(WIDTH, HEIGHT, "No price data available.");
    }

    let mut svg = svg_open(WIDTH, HEIGHT);
    let symbol = chart.symbol.as_str();
    let fast = chart.fast_ema.raw_values();
    let slow = chart.slow_ema.raw_values();
    let macd = chart.macd.raw_values();

    let (lo, hi) = bounds([closes.as_slice(), fast.as_slice(), slow.as_slice()]);
    panel_frame(
        &mut svg,
        PRICE_TOP,
        PRICE_HEIGHT,
        &format!("Last {} Prices for {} (INR)", closes.len(), symbol),
        lo,
        hi,
    );
    line(&mut svg, &polyline_points(&closes, PRICE_TOP, PRICE_HEIGHT, lo, hi), "blue", 2.0);
    line(&mut svg, &polyline_points(&fast, PRICE_TOP, PRICE_HEIGHT, lo, hi), "green", 1.5);
    line(&mut svg, &polyline_points(&slow, PRICE_TOP, PRICE_HEIGHT, lo, hi), "red", 1.5);

    let legend = [
        ("blue", "Price".to_string()),
        ("green", chart.fast_ema.indicator_type.to_string()),
        ("red", chart.slow_ema.indicator_type.to_string()),
    ];
    for (i, (color, label)) in legend.iter().enumerate() {
        let y = PRICE_TOP + 15.0 + i as f64 * 16.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.0}" y="{:.0}" width="12" height="4" fill="{color}"/><text x="{:.0}" y="{:.0}">{label}</text>"#,
            PADDING + 10.0,
            y - 4.0,
            PADDING + 28.0,
            y
        );
    }

    let (mlo, mhi) = bounds([macd.as_slice(), &[0.0][..]]);
    panel_frame(&mut svg, MACD_TOP, MACD_HEIGHT, "MACD Indicator", mlo, mhi);
    let zero = polyline_points(&[0.0, 0.0], MACD_TOP, MACD_HEIGHT, mlo, mhi);
    line(&mut svg, &zero, "gray", 1.0);
    line(&mut svg, &polyline_points(&macd, MACD_TOP, MACD_HEIGHT, mlo, mhi), "purple", 1.5);

    if let (Some(first), Some(last)) = (chart.macd.values.first(), chart.macd.values.last()) {
        let y = HEIGHT - 20.0;
        let _ = writeln!(
            svg,
            r#"<text x="{PADDING:.0}" y="{y:.0}">{}</text><text x="{:.0}" y="{y:.0}" text-anchor="end">{}</text>"#,
            first.date,
            WIDTH - PADDING,
            last.date
        );
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn allocation_svg(slices: &[AllocationSlice]) -> String {
    const SIZE: f64 = 480.0;
    if slices.is_empty() {
        return placeholder(SIZE, SIZE, "No data: the portfolio is empty.");
    }

    let (cx, cy, r) = (SIZE / 2.0, SIZE / 2.0 + 10.0, SIZE / 2.0 - 80.0);
    let mut svg = svg_open(SIZE, SIZE);
    let _ = writeln!(
        svg,
        r#"<text x="{cx:.0}" y="30" text-anchor="middle" font-size="14">Portfolio Visualization</text>"#
    );

    // start at the top, clockwise
    let mut angle = -PI / 2.0;
    for (i, slice) in slices.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let sweep = slice.weight * 2.0 * PI;

        if slice.weight >= 1.0 - 1e-9 {
            let _ = writeln!(
                svg,
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{color}"/>"#
            );
        } else if sweep > 0.0 {
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = u8::from(sweep > PI);
            let _ = writeln!(
                svg,
                r#"<path d="M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large_arc} 1 {x2:.1} {y2:.1} Z" fill="{color}" stroke="white"/>"#
            );
        }

        let mid = angle + sweep / 2.0;
        let (lx, ly) = (cx + (r + 25.0) * mid.cos(), cy + (r + 25.0) * mid.sin());
        let anchor = if mid.cos() >= 0.0 { "start" } else { "end" };
        let _ = writeln!(
            svg,
            r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="{anchor}">{} {:.1}%</text>"#,
            escape_xml(slice.symbol.as_str()),
            slice.weight * 100.0
        );
        angle += sweep;
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{ema_series, macd_series, IndicatorSeries, IndicatorType};
    use crate::domain::input::parse_symbol;
    use crate::domain::price::PriceSeries;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_chart(prices: &[f64]) -> PriceChart {
        let mut series = PriceSeries::new();
        for (i, p) in prices.iter().enumerate() {
            series.push(NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(), *p);
        }
        let (fast_ema, slow_ema, macd) = if prices.is_empty() {
            let empty = |indicator_type| IndicatorSeries {
                indicator_type,
                values: vec![],
            };
            (
                empty(IndicatorType::Ema(8)),
                empty(IndicatorType::Ema(20)),
                empty(IndicatorType::Macd { fast: 8, slow: 20 }),
            )
        } else {
            (
                ema_series(&series, 8).unwrap(),
                ema_series(&series, 20).unwrap(),
                macd_series(&series, 8, 20).unwrap(),
            )
        };
        PriceChart {
            symbol: parse_symbol("M&M").unwrap(),
            series,
            fast_ema,
            slow_ema,
            macd,
        }
    }

    fn slice(symbol: &str, weight: f64) -> AllocationSlice {
        AllocationSlice {
            symbol: parse_symbol(symbol).unwrap(),
            value: weight * 1000.0,
            weight,
        }
    }

    #[test]
    fn price_chart_has_all_series() {
        let svg = price_chart_svg(&sample_chart(&[100.0, 102.0, 101.0, 105.0, 107.0]));

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 5);
        assert!(svg.contains("EMA 8"));
        assert!(svg.contains("EMA 20"));
        assert!(svg.contains("MACD Indicator"));
        assert!(svg.contains("2024-01-01"));
        assert!(svg.contains("2024-01-05"));
    }

    #[test]
    fn price_chart_escapes_symbol() {
        let svg = price_chart_svg(&sample_chart(&[100.0, 101.0]));
        assert!(svg.contains("M&amp;M"));
        assert!(!svg.contains("M&M"));
    }

    #[test]
    fn flat_series_renders() {
        let svg = price_chart_svg(&sample_chart(&[50.0, 50.0, 50.0]));
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn empty_chart_placeholder() {
        let svg = price_chart_svg(&sample_chart(&[]));
        assert!(svg.contains("No price data available."));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn polyline_spans_plot_width() {
        let points = polyline_points(&[1.0, 2.0, 3.0], 0.0, 100.0, 1.0, 3.0);
        assert_eq!(points, "60.0,100.0 400.0,50.0 740.0,0.0");
    }

    #[test]
    fn allocation_pie_slices_and_labels() {
        let svg = allocation_svg(&[slice("INFY", 0.75), slice("TCS", 0.25)]);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("INFY 75.0%"));
        assert!(svg.contains("TCS 25.0%"));
    }

    #[test]
    fn allocation_single_holding_is_circle() {
        let svg = allocation_svg(&[slice("TCS", 1.0)]);
        assert!(svg.contains("<circle"));
        assert!(svg.contains("TCS 100.0%"));
    }

    #[test]
    fn allocation_empty_placeholder() {
        assert!(allocation_svg(&[]).contains("portfolio is empty"));
    }

    #[test]
    fn adapter_writes_files_and_creates_directories() {
        let dir = TempDir::new().unwrap();
        let adapter = SvgChartAdapter::new();

        let chart_path = dir.path().join("charts/nested/TCS.svg");
        adapter
            .render_price_chart(&sample_chart(&[100.0, 101.0, 99.5]), &chart_path)
            .unwrap();
        assert!(fs::read_to_string(&chart_path).unwrap().contains("<svg"));

        let pie_path = dir.path().join("portfolio.svg");
        adapter
            .render_allocation(&[slice("TCS", 1.0)], &pie_path)
            .unwrap();
        assert!(fs::read_to_string(&pie_path).unwrap().contains("<circle"));
    }
}
