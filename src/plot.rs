//! PNG charts of benchmark series. Log axes plot `log2(x)` and `log10(y)`
//! on linear axes so ticks read as exponents.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    ReportError,
    compare::ratio_series,
    humanize::{BYTES_PER_MIB, DurationUnit, convert_micros},
    labels::LabelMap,
    measurement::{Series, format_number},
    table::BenchTable,
};

pub const PNG_EXTENSION: &str = "png";

pub const BLUE_HEX: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
pub const ORANGE_HEX: RGBColor = RGBColor(0xff, 0x7f, 0x0e);
pub const GREEN_HEX: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);
pub const RED_HEX: RGBColor = RGBColor(0xd6, 0x27, 0x28);

const DASH_PIECES: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub font_size: u32,
    pub tick_label_size: u32,
    pub legend_size: u32,
    pub line_width: u32,
    pub marker_size: u32,
    pub log_x: bool,
    pub log_y: bool,
    pub palette: Vec<RGBColor>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 750,
            font_family: "sans-serif".to_string(),
            font_size: 28,
            tick_label_size: 24,
            legend_size: 28,
            line_width: 3,
            marker_size: 8,
            log_x: true,
            log_y: true,
            palette: vec![BLUE_HEX, ORANGE_HEX, GREEN_HEX, RED_HEX],
        }
    }
}

impl ChartStyle {
    pub fn with_palette(self, palette: Vec<RGBColor>) -> Self {
        Self { palette, ..self }
    }

    pub fn with_legend_size(self, legend_size: u32) -> Self {
        Self {
            legend_size,
            ..self
        }
    }

    pub fn with_log_axes(self, log_x: bool, log_y: bool) -> Self {
        Self {
            log_x,
            log_y,
            ..self
        }
    }

    pub fn with_lines(self, line_width: u32, marker_size: u32) -> Self {
        Self {
            line_width,
            marker_size,
            ..self
        }
    }

    fn color_for(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            BLACK
        } else {
            self.palette[idx % self.palette.len()]
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
    None,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineSpec {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub dashed: bool,
    pub marker: Marker,
    pub color: Option<RGBColor>,
}

impl LineSpec {
    pub fn solid<L: Into<String>>(label: L, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
            dashed: false,
            marker: Marker::Circle,
            color: None,
        }
    }

    pub fn dashed<L: Into<String>>(label: L, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
            dashed: true,
            marker: Marker::Cross,
            color: None,
        }
    }

    pub fn with_marker(self, marker: Marker) -> Self {
        Self { marker, ..self }
    }

    pub fn with_color(self, color: RGBColor) -> Self {
        Self {
            color: Some(color),
            ..self
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub x_desc: String,
    pub y_desc: String,
    pub lines: Vec<LineSpec>,
    /// Fixed y range in data units; derived from the points otherwise.
    pub y_range: Option<(f64, f64)>,
    pub y_reference: Option<f64>,
}

impl ChartSpec {
    pub fn line_labels(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.label.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartJob {
    pub path: PathBuf,
    pub spec: ChartSpec,
    pub style: ChartStyle,
}

impl ChartJob {
    pub fn render(&self) -> Result<(), ReportError> {
        info!(path = %self.path.display(), "saving graph");
        render_png(&self.path, &self.spec, &self.style)
    }
}

/// Restricts the table to `min_n <= n <= max_n`; a bound of 0 means the
/// data's own minimum or maximum.
pub fn select_players(table: &BenchTable, min_n: u64, max_n: u64) -> Result<BenchTable, ReportError> {
    let (data_min, data_max) = table
        .min_max("n")?
        .ok_or_else(|| ReportError::invalid_input("no benchmark rows to plot"))?;
    let min = if min_n == 0 { data_min } else { min_n as f64 };
    let max = if max_n == 0 { data_max } else { max_n as f64 };
    info!(min_n = min, max_n = max, "player range");
    table.filter_range("n", min, max)
}

pub fn render_png<P: AsRef<Path>>(
    path: P,
    spec: &ChartSpec,
    style: &ChartStyle,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let lines: Vec<(LineSpec, RGBColor)> = spec
        .lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let color = line.color.unwrap_or_else(|| style.color_for(idx));
            let points = line
                .points
                .iter()
                .filter_map(|(x, y)| project(*x, *y, style))
                .collect();
            (
                LineSpec {
                    points,
                    ..line.clone()
                },
                color,
            )
        })
        .collect();

    let (x_range, y_range) = axis_ranges(&lines, spec, style)?;
    let x_ticks = lines
        .iter()
        .flat_map(|(line, _)| line.points.iter().map(|(x, _)| *x))
        .fold(Vec::<f64>::new(), |mut acc, x| {
            if !acc.contains(&x) {
                acc.push(x);
            }
            acc
        })
        .len();

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(110);
    if let Some(title) = &spec.title {
        builder.caption(title, (style.font_family.as_str(), style.font_size).into_font());
    }
    let mut chart = builder
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(render_err)?;

    let log_x = style.log_x;
    let log_y = style.log_y;
    let x_fmt = move |x: &f64| {
        if log_x {
            format!("{}", x.round() as i64)
        } else {
            format_number(*x)
        }
    };
    let y_fmt = move |y: &f64| {
        if log_y {
            format_tick(10f64.powf(*y))
        } else {
            format_tick(*y)
        }
    };
    chart
        .configure_mesh()
        .x_labels(x_ticks.clamp(2, 16))
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((style.font_family.as_str(), style.tick_label_size).into_font())
        .axis_desc_style((style.font_family.as_str(), style.font_size).into_font())
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .draw()
        .map_err(render_err)?;

    if let Some(reference) = spec.y_reference {
        let y = if log_y { reference.log10() } else { reference };
        chart
            .draw_series(dashes(&[(x_range.0, y), (x_range.1, y)], BLACK.stroke_width(2)))
            .map_err(render_err)?;
    }

    for (line, color) in &lines {
        if line.points.is_empty() {
            warn!(label = %line.label, "nothing to plot");
            continue;
        }
        let stroke = color.stroke_width(style.line_width);
        let anno = if line.dashed {
            chart
                .draw_series(dashes(&line.points, stroke))
                .map_err(render_err)?
        } else {
            chart
                .draw_series(LineSeries::new(line.points.iter().copied(), stroke))
                .map_err(render_err)?
        };
        let legend_color = *color;
        let legend_width = style.line_width;
        anno.label(line.label.as_str()).legend(move |(x, y)| {
            PathElement::new(
                vec![(x, y), (x + 30, y)],
                legend_color.stroke_width(legend_width),
            )
        });

        let size = style.marker_size;
        match line.marker {
            Marker::Circle => {
                chart
                    .draw_series(
                        line.points
                            .iter()
                            .map(|p| Circle::new(*p, size / 2, color.filled())),
                    )
                    .map_err(render_err)?;
            }
            Marker::Cross => {
                chart
                    .draw_series(line.points.iter().map(|p| Cross::new(*p, size / 2, stroke)))
                    .map_err(render_err)?;
            }
            Marker::None => {}
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((style.font_family.as_str(), style.legend_size).into_font())
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    debug!(path = %path.display(), lines = lines.len(), "chart rendered");
    Ok(())
}

fn render_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::render(err.to_string())
}

fn project(x: f64, y: f64, style: &ChartStyle) -> Option<(f64, f64)> {
    if (style.log_x && x <= 0.0) || (style.log_y && y <= 0.0) {
        return None;
    }
    let x = if style.log_x { x.log2() } else { x };
    let y = if style.log_y { y.log10() } else { y };
    // an infinite speed-up has no place on the axis
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

type Range2 = ((f64, f64), (f64, f64));

fn axis_ranges(
    lines: &[(LineSpec, RGBColor)],
    spec: &ChartSpec,
    style: &ChartStyle,
) -> Result<Range2, ReportError> {
    let points: Vec<(f64, f64)> = lines
        .iter()
        .flat_map(|(line, _)| line.points.iter().copied())
        .collect();
    if points.is_empty() {
        return Err(ReportError::render("chart has no plottable points"));
    }
    let (x_lo, x_hi) = bounds(points.iter().map(|p| p.0));
    let x_pad = ((x_hi - x_lo) * 0.05).max(0.5);

    let (y_lo, y_hi) = match spec.y_range {
        Some((lo, hi)) if style.log_y && lo > 0.0 && hi > 0.0 => (lo.log10(), hi.log10()),
        Some((lo, hi)) if !style.log_y => (lo, hi),
        _ => {
            let (lo, hi) = bounds(points.iter().map(|p| p.1));
            if style.log_y {
                (lo.floor(), hi.ceil().max(lo.floor() + 1.0))
            } else {
                let pad = ((hi - lo) * 0.05).max(f64::EPSILON.max(hi.abs() * 0.05));
                (lo - pad, hi + pad)
            }
        }
    };
    Ok(((x_lo - x_pad, x_hi + x_pad), (y_lo, y_hi)))
}

fn bounds<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 100.0 || magnitude == 0.0 {
        format!("{value:.0}")
    } else if magnitude >= 1.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.3}")
    }
}

fn dashes(points: &[(f64, f64)], style: ShapeStyle) -> Vec<PathElement<(f64, f64)>> {
    let mut elements = Vec::new();
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        for piece in (0..DASH_PIECES).step_by(2) {
            let t0 = piece as f64 / DASH_PIECES as f64;
            let t1 = (piece + 1) as f64 / DASH_PIECES as f64;
            elements.push(PathElement::new(
                vec![
                    (x0 + (x1 - x0) * t0, y0 + (y1 - y0) * t0),
                    (x0 + (x1 - x0) * t1, y0 + (y1 - y0) * t1),
                ],
                style,
            ));
        }
    }
    elements
}

fn measured_points(series: &Series, scale: impl Fn(f64) -> f64) -> Vec<(f64, f64)> {
    series
        .points()
        .iter()
        .filter_map(|p| p.measurement.value().map(|v| (p.key, scale(v))))
        .collect()
}

fn warn_short(series: &Series, domain: usize, column: &str) {
    let measured = series
        .points()
        .iter()
        .filter(|p| p.measurement.is_measured())
        .count();
    if measured < domain {
        warn!(
            label = series.label(),
            column,
            expected = domain,
            got = measured,
            "not enough y-values"
        );
    }
}

fn seconds(v: f64) -> f64 {
    convert_micros(v, DurationUnit::Secs)
}

pub fn dkg_charts(table: &BenchTable, out_prefix: &str) -> Result<Vec<ChartJob>, ReportError> {
    let table = table
        .canonicalize("dkg", &LabelMap::dkg_legend())?
        .with_sum(
            "end_to_end_bc_usec",
            &["avg_deal_usec", "avg_verify_best_case_usec", "avg_reconstr_bc_usec"],
        )?
        .with_sum(
            "end_to_end_wc_usec",
            &["avg_deal_usec", "avg_verify_worst_case_usec", "avg_reconstr_wc_usec"],
        )?;
    let domain = table.unique_numbers("t")?.len();
    let paired = ChartStyle::default().with_palette(vec![BLUE_HEX, BLUE_HEX, ORANGE_HEX, ORANGE_HEX]);

    let mut jobs = Vec::new();
    let deal = best_worst_lines(&table, "dkg", "avg_deal_usec", None, domain)?;
    jobs.push(ChartJob {
        path: PathBuf::from(format!("{out_prefix}-deal-times.png")),
        spec: time_chart("DKG per-player deal times", deal),
        style: ChartStyle::default().with_palette(vec![BLUE_HEX, ORANGE_HEX]),
    });

    let verify = best_worst_lines(
        &table,
        "dkg",
        "avg_verify_best_case_usec",
        Some("avg_verify_worst_case_usec"),
        domain,
    )?;
    jobs.push(ChartJob {
        path: PathBuf::from(format!("{out_prefix}-verify-times.png")),
        spec: time_chart("DKG per-player verify times", verify),
        style: paired.clone().with_legend_size(26),
    });

    jobs.push(ChartJob {
        path: PathBuf::from(format!("{out_prefix}-reconstr-times.png")),
        spec: time_chart("DKG reconstruct times", reconstr_lines(&table, domain)?),
        style: ChartStyle::default()
            .with_palette(vec![BLUE_HEX, ORANGE_HEX, ORANGE_HEX])
            .with_legend_size(24),
    });

    let e2e = best_worst_lines(
        &table,
        "dkg",
        "end_to_end_bc_usec",
        Some("end_to_end_wc_usec"),
        domain,
    )?;
    jobs.push(ChartJob {
        path: PathBuf::from(format!("{out_prefix}-e2e-times.png")),
        spec: time_chart("DKG per-player end-to-end times", e2e),
        style: paired,
    });
    Ok(jobs)
}

fn time_chart(title: &str, lines: Vec<LineSpec>) -> ChartSpec {
    ChartSpec {
        title: Some(title.to_string()),
        x_desc: "log2 of threshold t".to_string(),
        y_desc: "Time (in seconds)".to_string(),
        lines,
        ..ChartSpec::default()
    }
}

fn best_worst_lines(
    table: &BenchTable,
    label_col: &str,
    best_col: &str,
    worst_col: Option<&str>,
    domain: usize,
) -> Result<Vec<LineSpec>, ReportError> {
    let mut lines = Vec::new();
    let best = table.series(label_col, "t", best_col)?;
    let worst = match worst_col {
        Some(col) => Some(table.series(label_col, "t", col)?),
        None => None,
    };
    for (idx, series) in best.iter().enumerate() {
        warn_short(series, domain, best_col);
        match &worst {
            None => lines.push(LineSpec::solid(series.label(), measured_points(series, seconds))),
            Some(worst) => {
                lines.push(LineSpec::dashed(
                    format!("{} (best case)", series.label()),
                    measured_points(series, seconds),
                ));
                let worst_series = &worst[idx];
                lines.push(LineSpec::solid(
                    format!("{} (worst case)", worst_series.label()),
                    measured_points(worst_series, seconds),
                ));
            }
        }
    }
    Ok(lines)
}

/// Worst-case reconstruction per DKG plus the shared best case of the
/// first DKG, which eJF and AMT DKG have in common.
fn reconstr_lines(table: &BenchTable, domain: usize) -> Result<Vec<LineSpec>, ReportError> {
    let worst = table.series("dkg", "t", "avg_reconstr_wc_usec")?;
    let mut lines: Vec<LineSpec> = worst
        .iter()
        .map(|series| {
            warn_short(series, domain, "avg_reconstr_wc_usec");
            LineSpec::solid(
                format!("{} (worst case)", series.label()),
                measured_points(series, seconds),
            )
        })
        .collect();
    if let Some(first) = table.unique("dkg")?.first() {
        let best = table.series_for("dkg", first, "t", "avg_reconstr_bc_usec")?;
        lines.push(LineSpec::dashed(
            "eJF & AMT DKG (best case)",
            measured_points(&best, seconds),
        ));
    }
    Ok(lines)
}

pub fn vss_charts(table: &BenchTable, out_suffix: &str) -> Result<Vec<ChartJob>, ReportError> {
    let table = table
        .canonicalize("vss", &LabelMap::vss_legend())?
        .with_sum(
            "avg_e2e_bc_usec",
            &["avg_deal_usec", "avg_verify_usec", "avg_reconstr_bc_usec"],
        )?
        .with_sum(
            "avg_e2e_wc_usec",
            &["avg_deal_usec", "avg_verify_usec", "avg_reconstr_wc_usec"],
        )?;
    let domain = table.unique_numbers("t")?.len();
    let paired = ChartStyle::default()
        .with_palette(vec![BLUE_HEX, BLUE_HEX, ORANGE_HEX, ORANGE_HEX]);

    let deal = scheme_lines(&table, &[("avg_deal_usec", "")], DurationUnit::Secs, domain)?;
    let verify = scheme_lines(&table, &[("avg_verify_usec", "")], DurationUnit::Millis, domain)?;
    let reconstr = scheme_lines(
        &table,
        &[
            ("avg_reconstr_bc_usec", " best-case"),
            ("avg_reconstr_wc_usec", " worst-case"),
        ],
        DurationUnit::Secs,
        domain,
    )?;
    let e2e = scheme_lines(
        &table,
        &[
            ("avg_e2e_bc_usec", " best-case"),
            ("avg_e2e_wc_usec", " worst-case"),
        ],
        DurationUnit::Secs,
        domain,
    )?;

    Ok(vec![
        ChartJob {
            path: PathBuf::from(format!("vss-deal-times{out_suffix}.png")),
            spec: unit_chart(deal, DurationUnit::Secs),
            style: ChartStyle::default(),
        },
        ChartJob {
            // verification sits in the 2-20 ms band, a log y axis hides it
            path: PathBuf::from(format!("vss-verify-times{out_suffix}.png")),
            spec: unit_chart(verify, DurationUnit::Millis),
            style: ChartStyle::default().with_log_axes(true, false),
        },
        ChartJob {
            path: PathBuf::from(format!("vss-reconstr-times{out_suffix}.png")),
            spec: unit_chart(reconstr, DurationUnit::Secs),
            style: paired.clone().with_legend_size(27),
        },
        ChartJob {
            path: PathBuf::from(format!("vss-e2e-times{out_suffix}.png")),
            spec: unit_chart(e2e, DurationUnit::Secs),
            style: paired,
        },
    ])
}

pub fn deal_chart(table: &BenchTable, out_suffix: &str) -> Result<ChartJob, ReportError> {
    let table = table.canonicalize("vss", &LabelMap::deal_legend())?;
    let domain = table.unique_numbers("t")?.len();
    let lines = scheme_lines(&table, &[("avg_deal_usec", "")], DurationUnit::Secs, domain)?;
    Ok(ChartJob {
        path: PathBuf::from(format!("all-deal-times{out_suffix}.png")),
        spec: unit_chart(lines, DurationUnit::Secs),
        style: ChartStyle::default().with_lines(4, 10),
    })
}

fn unit_chart(lines: Vec<LineSpec>, unit: DurationUnit) -> ChartSpec {
    ChartSpec {
        x_desc: "log2 of threshold t".to_string(),
        y_desc: format!("Time (in {})", unit.label()),
        lines,
        ..ChartSpec::default()
    }
}

fn scheme_lines(
    table: &BenchTable,
    columns: &[(&str, &str)],
    unit: DurationUnit,
    domain: usize,
) -> Result<Vec<LineSpec>, ReportError> {
    let mut lines = Vec::new();
    for scheme in table.unique("vss")? {
        for (column, appendix) in columns {
            debug!(scheme = %scheme, column, "plotting column");
            let series = table.series_for("vss", &scheme, "t", column)?;
            warn_short(&series, domain, column);
            let points = measured_points(&series, |v| convert_micros(v, unit));
            let label = format!("{scheme}{appendix}");
            lines.push(if appendix.contains("best-case") {
                LineSpec::dashed(label, points)
            } else {
                LineSpec::solid(label, points)
            });
        }
    }
    Ok(lines)
}

const FAST_LAGRANGE: &str = "Fast Lagrange";

// the detailed variant adds the Lagrange-only and multiexp lines
pub fn threshsig_chart<P: Into<PathBuf>>(
    table: &BenchTable,
    out: P,
    detailed: bool,
) -> Result<ChartJob, ReportError> {
    let table = table
        .canonicalize("interpolation_method", &LabelMap::interpolation_legend())?
        .with_sum("total_usec", &["lagr_usec", "multiexp_usec"])?;
    let mut lines = Vec::new();
    let methods = table.unique("interpolation_method")?;
    for method in &methods {
        debug!(method = %method, "plotting Lagrange type");
        if detailed {
            let lagr = table.series_for("interpolation_method", method, "k", "lagr_usec")?;
            lines.push(LineSpec::dashed(method.as_str(), measured_points(&lagr, seconds)));
        }
        let total = table.series_for("interpolation_method", method, "k", "total_usec")?;
        let marker = if detailed { Marker::None } else { Marker::Circle };
        lines.push(
            LineSpec::solid(format!("{method} + Multiexp"), measured_points(&total, seconds))
                .with_marker(marker),
        );
    }
    if detailed {
        // more samples were taken for multiexp in the fast Lagrange runs
        let source = if methods.iter().any(|m| m == FAST_LAGRANGE) {
            Some(FAST_LAGRANGE.to_string())
        } else {
            methods.first().cloned()
        };
        if let Some(source) = source {
            info!(source = %source, "multiexp numbers");
            let multiexp = table.series_for("interpolation_method", &source, "k", "multiexp_usec")?;
            lines.push(
                LineSpec::solid("Multiexp", measured_points(&multiexp, seconds))
                    .with_marker(Marker::None)
                    .with_color(GREEN_HEX),
            );
        }
    }
    Ok(ChartJob {
        path: out.into(),
        spec: ChartSpec {
            title: None,
            x_desc: "log2 of signers k".to_string(),
            y_desc: "Time (in seconds)".to_string(),
            lines,
            ..ChartSpec::default()
        },
        style: ChartStyle::default()
            .with_lines(4, 10)
            .with_legend_size(24)
            .with_palette(vec![BLUE_HEX, BLUE_HEX, ORANGE_HEX, ORANGE_HEX, GREEN_HEX]),
    })
}

/// DKGs in plotting order, so colours stay stable across figures.
pub const BANDWIDTH_ORDER: [&str; 3] = ["eJF-DKG", "AMT DKG", "JF-DKG"];

pub fn bandwidth_chart<P: Into<PathBuf>>(
    table: &BenchTable,
    out: P,
    allowed: &[String],
) -> Result<ChartJob, ReportError> {
    let table = table.canonicalize("dkg", &LabelMap::bandwidth_legend())?;
    let present = table.unique("dkg")?;
    let mut lines = Vec::new();
    for dkg in BANDWIDTH_ORDER {
        if !allowed.iter().any(|a| a == dkg) {
            info!(dkg, "skipping over disallowed DKG");
            continue;
        }
        if !present.iter().any(|p| p == dkg) {
            warn!(dkg, "DKG not present in data");
            continue;
        }
        let mib = |v: f64| v / BYTES_PER_MIB;
        let download = table.series_for("dkg", dkg, "n", "download_bw_bytes")?;
        lines.push(LineSpec::solid(format!("{dkg} download"), measured_points(&download, mib)));
        let upload = table.series_for("dkg", dkg, "n", "upload_bw_bytes")?;
        lines.push(LineSpec::dashed(format!("{dkg} upload"), measured_points(&upload, mib)));
    }
    Ok(ChartJob {
        path: out.into(),
        spec: ChartSpec {
            title: None,
            x_desc: "log2 of players n".to_string(),
            y_desc: "Bandwidth (in MiB)".to_string(),
            lines,
            ..ChartSpec::default()
        },
        style: ChartStyle::default()
            .with_palette(vec![BLUE_HEX, BLUE_HEX, ORANGE_HEX, ORANGE_HEX]),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    Dkg,
    Vss,
}

impl Protocol {
    pub fn detect(table: &BenchTable) -> Result<Self, ReportError> {
        if table.has_column("vss") {
            Ok(Protocol::Vss)
        } else if table.has_column("dkg") {
            Ok(Protocol::Dkg)
        } else {
            Err(ReportError::invalid_input(
                "expected a 'dkg' or 'vss' column in the CSV",
            ))
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Protocol::Dkg => "dkg",
            Protocol::Vss => "vss",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Protocol::Dkg => "DKG",
            Protocol::Vss => "VSS",
        }
    }

    fn verify_columns(self) -> &'static [&'static str] {
        match self {
            Protocol::Dkg => &["avg_verify_best_case_usec", "avg_verify_worst_case_usec"],
            Protocol::Vss => &["avg_verify_usec"],
        }
    }

    fn legend(self) -> LabelMap {
        match self {
            Protocol::Dkg => LabelMap::dkg_legend(),
            Protocol::Vss => LabelMap::vss_legend(),
        }
    }
}

/// Speed-up columns: (stem of `avg_<stem>_usec`, legend entry, colour).
const SPEEDUP_COLUMNS: [(&str, &str, RGBColor); 8] = [
    ("deal", "FK dealing speedup", RED_HEX),
    ("verify", "FK verify speedup", BLUE_HEX),
    ("verify_best_case", "FK verify (BC) speedup", BLUE_HEX),
    ("verify_worst_case", "FK verify (WC) speedup", BLUE_HEX),
    ("reconstr_bc", "FK reconstr. (BC) speedup", ORANGE_HEX),
    ("reconstr_wc", "FK reconstr. (WC) speedup", ORANGE_HEX),
    ("e2e_bc", "FK e2e (BC) speedup", GREEN_HEX),
    ("e2e_wc", "FK e2e (WC) speedup", GREEN_HEX),
];

pub fn fk_speedup_chart(
    table: &BenchTable,
    out_suffix: &str,
    has_logscale: bool,
) -> Result<ChartJob, ReportError> {
    let protocol = Protocol::detect(table)?;
    info!(protocol = protocol.suffix(), "csv file detected");
    let label_col = protocol.column();
    let (verify_bc, verify_wc) = match protocol {
        Protocol::Dkg => ("avg_verify_best_case_usec", "avg_verify_worst_case_usec"),
        Protocol::Vss => ("avg_verify_usec", "avg_verify_usec"),
    };
    let table = table
        .canonicalize(label_col, &protocol.legend())?
        .with_sum(
            "avg_e2e_bc_usec",
            &["avg_deal_usec", verify_bc, "avg_reconstr_bc_usec"],
        )?
        .with_sum(
            "avg_e2e_wc_usec",
            &["avg_deal_usec", verify_wc, "avg_reconstr_wc_usec"],
        )?;

    let amt = format!("AMT {}", protocol.suffix());
    let fk = format!("FK {}", protocol.suffix());
    let mut lines = Vec::new();
    for (stem, legend, color) in SPEEDUP_COLUMNS {
        let column = format!("avg_{stem}_usec");
        let is_verify = stem.starts_with("verify");
        if is_verify && !protocol.verify_columns().contains(&column.as_str()) {
            continue;
        }
        let slow = table.series_for(label_col, &amt, "t", &column)?;
        let fast = table.series_for(label_col, &fk, "t", &column)?;
        let points: Vec<(f64, f64)> = ratio_series(&slow, &fast)?
            .into_iter()
            .filter_map(|p| p.rounded().map(|r| (p.key, r)))
            .collect();
        debug!(column = %column, ?points, "FK speedup");
        let line = if legend.contains("(BC)") {
            LineSpec::dashed(legend, points)
        } else {
            LineSpec::solid(legend, points)
        };
        lines.push(line.with_color(color));
    }

    let x_desc = if has_logscale {
        "Log2 of threshold t (n = 2t-1)"
    } else {
        "Threshold t (n = 2t-1)"
    };
    Ok(ChartJob {
        path: PathBuf::from(format!(
            "fk-{}-speedup{out_suffix}.png",
            protocol.column()
        )),
        spec: ChartSpec {
            title: None,
            x_desc: x_desc.to_string(),
            y_desc: format!("Speed up over AMT {}", protocol.suffix()),
            lines,
            y_range: Some((0.0, 10.0)),
            y_reference: Some(1.0),
        },
        style: ChartStyle {
            tick_label_size: 20,
            legend_size: 20,
            ..ChartStyle::default().with_log_axes(has_logscale, false)
        },
    })
}
