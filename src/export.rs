//! `.tex` macro reports for the DKG, VSS, threshold-signature and DKG
//! bandwidth experiments.

use tracing::{info, warn};

use crate::{
    ReportError,
    compare::{Comparison, CompareOptions, compare_all, first_crossing, ratio_series},
    config::ReportConfig,
    labels::LabelMap,
    latex::MacroWriter,
    measurement::format_number,
    table::BenchTable,
};

pub const PLAYERS_COL: &str = "n";

/// One reported timing column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpec {
    pub usec_col: &'static str,
    pub hum_col: &'static str,
    pub macro_suffix: &'static str,
    pub min_players: f64,
}

const fn column(
    usec_col: &'static str,
    hum_col: &'static str,
    macro_suffix: &'static str,
    min_players: f64,
) -> ColumnSpec {
    ColumnSpec {
        usec_col,
        hum_col,
        macro_suffix,
        min_players,
    }
}

pub const DKG_COLUMNS: [ColumnSpec; 7] = [
    column("avg_deal_usec", "avg_deal_hum", "DkgDealTime", 16.0),
    column("avg_verify_best_case_usec", "avg_verify_bc_hum", "DkgVerifyBcTime", 3.0),
    column("avg_verify_worst_case_usec", "avg_verify_wc_hum", "DkgVerifyWcTime", 3.0),
    column("avg_reconstr_bc_usec", "avg_reconstr_bc_hum", "DkgReconstrBcTime", 3.0),
    column("avg_reconstr_wc_usec", "avg_reconstr_wc_hum", "DkgReconstrWcTime", 3.0),
    column("end_to_end_bc_usec", "end_to_end_bc_hum", "DkgEndToEndBcTime", 16.0),
    column("end_to_end_wc_usec", "end_to_end_wc_hum", "DkgEndToEndWcTime", 16.0),
];

pub const VSS_COLUMNS: [ColumnSpec; 6] = [
    column("avg_deal_usec", "avg_deal_hum", "VssDealTime", 16.0),
    column("avg_verify_usec", "avg_verify_hum", "VssVerifyTime", 3.0),
    column("avg_reconstr_bc_usec", "avg_reconstr_bc_hum", "VssReconstrBcTime", 3.0),
    column("avg_reconstr_wc_usec", "avg_reconstr_wc_hum", "VssReconstrWcTime", 3.0),
    column("end_to_end_bc_usec", "end_to_end_bc_hum", "VssEndToEndBcTime", 16.0),
    column("end_to_end_wc_usec", "end_to_end_wc_hum", "VssEndToEndWcTime", 16.0),
];

const NAIVE_LAGRANGE: &str = "naive-lagr-wnk";
const FAST_LAGRANGE: &str = "fft-eval";
const THRESHSIG_MIN_PLAYERS: f64 = 64.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Experiment {
    Dkg,
    Vss,
    Threshsig,
    DkgBandwidth,
}

impl Experiment {
    pub fn export(self, table: &BenchTable, config: &ReportConfig) -> Result<Report, ReportError> {
        match self {
            Experiment::Dkg => export_dkg(table, config),
            Experiment::Vss => export_vss(table, config),
            Experiment::Threshsig => export_threshsig(table, config),
            Experiment::DkgBandwidth => export_dkg_bandwidth(table, config),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub macros: MacroWriter,
    pub comparisons: Vec<Comparison>,
}

pub fn export_dkg(table: &BenchTable, config: &ReportConfig) -> Result<Report, ReportError> {
    let table = table
        .canonicalize("dkg", &LabelMap::dkg_macros())?
        .with_sum(
            "end_to_end_bc_usec",
            &["avg_deal_usec", "avg_verify_best_case_usec", "avg_reconstr_bc_usec"],
        )?
        .with_sum(
            "end_to_end_wc_usec",
            &["avg_deal_usec", "avg_verify_worst_case_usec", "avg_reconstr_wc_usec"],
        )?;
    log_player_range(&table)?;
    export_columns(&table, "dkg", &DKG_COLUMNS, config)
}

pub fn export_vss(table: &BenchTable, config: &ReportConfig) -> Result<Report, ReportError> {
    let table = table
        .canonicalize("vss", &LabelMap::vss_macros())?
        .with_sum(
            "end_to_end_bc_usec",
            &["avg_deal_usec", "avg_verify_usec", "avg_reconstr_bc_usec"],
        )?
        .with_sum(
            "end_to_end_wc_usec",
            &["avg_deal_usec", "avg_verify_usec", "avg_reconstr_wc_usec"],
        )?;
    log_player_range(&table)?;
    export_columns(&table, "vss", &VSS_COLUMNS, config)
}

fn export_columns(
    table: &BenchTable,
    label_col: &str,
    columns: &[ColumnSpec],
    config: &ReportConfig,
) -> Result<Report, ReportError> {
    let mut report = Report::default();
    let mut table = table.clone();
    for spec in columns {
        table = table.with_missing_humanized(spec.usec_col, spec.hum_col, config.precision)?;
    }
    let labels = table.unique(label_col)?;
    info!(variants = ?labels, "variants in file");
    for spec in columns {
        write_column(&mut report, &table, label_col, &labels, spec, config)?;
    }
    Ok(report)
}

fn write_column(
    report: &mut Report,
    table: &BenchTable,
    label_col: &str,
    labels: &[String],
    spec: &ColumnSpec,
    config: &ReportConfig,
) -> Result<(), ReportError> {
    let opts = config.compare_options(spec.min_players);
    report
        .macros
        .section_header(spec.usec_col, opts.margin, opts.min_independent_value);

    for label in labels {
        let rows = table.filter_eq(label_col, label)?;
        let keys = rows.numbers(PLAYERS_COL)?;
        let values = rows.column(spec.hum_col)?;
        report.macros.numeric_case_macro(
            &format!("{label}{}", spec.macro_suffix),
            keys.into_iter().zip(values),
        );
    }

    let series = table.series(label_col, PLAYERS_COL, spec.usec_col)?;
    for comparison in compare_all(&series, &opts)? {
        let Some(crossing) = comparison.first_crossing else {
            warn!(
                winner = %comparison.winner,
                loser = %comparison.loser,
                column = spec.usec_col,
                "no crossover: {}",
                comparison.summary()
            );
            report.comparisons.push(comparison);
            continue;
        };
        let name = format!("{}{}", comparison.winner, spec.macro_suffix);
        report.macros.numeric_case_macro(
            &format!("{name}ImprovOver{}", comparison.loser),
            comparison.ratios.iter().map(|point| {
                (
                    point.key,
                    point.display(&config.improvement_symbol).unwrap_or_default(),
                )
            }),
        );
        info!(
            column = spec.macro_suffix,
            "{}",
            comparison.summary()
        );
        report.macros.constant(
            &format!("{name}OutperformN{}", comparison.loser),
            &format_number(crossing.key),
        );
        report.macros.blank_lines(2);
        report.comparisons.push(comparison);
    }
    Ok(())
}

pub fn export_threshsig(table: &BenchTable, config: &ReportConfig) -> Result<Report, ReportError> {
    let table = table
        .with_missing_humanized("total_usec", "total_hum", config.precision)?
        .with_missing_humanized("lagr_usec", "lagr_hum", config.precision)?
        .with_missing_humanized("multiexp_usec", "multiexp_hum", config.precision)?;
    log_player_range(&table)?;

    let mut report = Report::default();
    let macros = [
        (NAIVE_LAGRANGE, "blsNaiveTime", "total_hum"),
        (NAIVE_LAGRANGE, "naiveLagrTime", "lagr_hum"),
        (NAIVE_LAGRANGE, "multiexpTime", "multiexp_hum"),
        (FAST_LAGRANGE, "blsEffTime", "total_hum"),
        (FAST_LAGRANGE, "fastLagrTime", "lagr_hum"),
    ];
    for (method, name, hum_col) in macros {
        let rows = table.filter_eq("interpolation_method", method)?;
        let keys = rows.numbers(PLAYERS_COL)?;
        let values = rows.column(hum_col)?;
        report
            .macros
            .numeric_case_macro(name, keys.into_iter().zip(values));
    }

    let naive = table.series_for("interpolation_method", NAIVE_LAGRANGE, PLAYERS_COL, "total_usec")?;
    let fast = table.series_for("interpolation_method", FAST_LAGRANGE, PLAYERS_COL, "total_usec")?;
    let ratios = ratio_series(&naive, &fast)?;
    let opts = config.compare_options(THRESHSIG_MIN_PLAYERS);
    report.macros.numeric_case_macro(
        "blsTimeImprov",
        ratios.iter().map(|point| {
            (
                point.key,
                point.display(&config.improvement_symbol).unwrap_or_default(),
            )
        }),
    );
    match first_crossing(&ratios, &opts) {
        Some(crossing) => {
            info!(n = crossing.key, "fast Lagrange starts outperforming naive");
            report
                .macros
                .constant("blsOutperformN", &format_number(crossing.key));
        }
        None => warn!(
            margin = opts.margin,
            min_n = opts.min_independent_value,
            "fast Lagrange never outperforms naive Lagrange"
        ),
    }
    Ok(report)
}

const BANDWIDTH_DKGS: [(&str, &str); 3] = [
    ("JF-DKG", "jfDkg"),
    ("AMT DKG", "amtDkg"),
    ("eJF-DKG", "ejfDkg"),
];

const BANDWIDTH_COLUMNS: [(&str, &str, &str); 3] = [
    ("download_bw_bytes", "download_bw_hum", "Download"),
    ("upload_bw_bytes", "upload_bw_hum", "Upload"),
    ("comm_bw_bytes", "comm_bw_hum", "Comm"),
];

pub fn export_dkg_bandwidth(
    table: &BenchTable,
    config: &ReportConfig,
) -> Result<Report, ReportError> {
    let mut table = table.canonicalize("dkg", &LabelMap::bandwidth_legend())?;
    for (bytes_col, hum_col, _) in BANDWIDTH_COLUMNS {
        table = table.with_missing_humanized_bytes(bytes_col, hum_col, config.precision)?;
    }
    log_player_range(&table)?;

    let mut report = Report::default();
    for (_, hum_col, suffix) in BANDWIDTH_COLUMNS {
        for (dkg, prefix) in BANDWIDTH_DKGS {
            let rows = table.filter_eq("dkg", dkg)?;
            let keys = rows.numbers(PLAYERS_COL)?;
            let values = rows.column(hum_col)?;
            report
                .macros
                .numeric_case_macro(&format!("{prefix}{suffix}"), keys.into_iter().zip(values));
        }
    }

    for (bytes_col, _, suffix) in BANDWIDTH_COLUMNS {
        let amt = table.series_for("dkg", "AMT DKG", PLAYERS_COL, bytes_col)?;
        let ejf = table.series_for("dkg", "eJF-DKG", PLAYERS_COL, bytes_col)?;
        let overhead = ratio_series(&amt, &ejf)?;
        report.macros.numeric_case_macro(
            &format!("amtDkg{suffix}Overhead"),
            overhead.iter().map(|point| {
                (
                    point.key,
                    point.display(&config.improvement_symbol).unwrap_or_default(),
                )
            }),
        );
    }
    Ok(report)
}

fn log_player_range(table: &BenchTable) -> Result<(), ReportError> {
    match table.min_max(PLAYERS_COL)? {
        Some((min_n, max_n)) => {
            info!(min_n, max_n, rows = table.len(), "player range");
            Ok(())
        }
        None => Err(ReportError::invalid_input("no benchmark rows to report")),
    }
}

/// Compares every pair of `label_col` variants on `value_col`, keyed by `n`.
pub fn pairwise(
    table: &BenchTable,
    label_col: &str,
    value_col: &str,
    opts: &CompareOptions,
) -> Result<Vec<Comparison>, ReportError> {
    let series = table.series(label_col, PLAYERS_COL, value_col)?;
    compare_all(&series, opts)
}
