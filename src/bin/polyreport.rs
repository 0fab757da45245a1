use std::{
    env,
    path::{Path, PathBuf},
    process,
};

use polyreport::{
    BenchTable, ReportConfig, ReportError,
    cli::{Command, CliError, CommandLineConfig, PlayerRange},
    compare::DEFAULT_MIN_INDEPENDENT_VALUE,
    config::log_level_from_env,
    export::pairwise,
    plot::{self, ChartJob},
    table::{HUM_SUFFIX, USEC_SUFFIX},
};
use tracing::{info, warn};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level_from_env())
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let cli = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(CliError::Usage(usage)) => {
            println!("{usage}");
            return;
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(err.exit_code());
        }
    };

    let config = match ReportConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    if let Err(err) = run_command(&cli.command, &config) {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn run_command(command: &Command, config: &ReportConfig) -> Result<(), ReportError> {
    match command {
        Command::HumanizeCsv { csv, columns } => humanize_csv(csv, columns.as_ref(), config),
        Command::Export {
            experiment,
            out,
            csvs,
        } => {
            let table = read_tables(csvs)?;
            let report = experiment.export(&table, config)?;
            report.macros.write_to(out)?;
            info!(
                path = %out.display(),
                comparisons = report.comparisons.len(),
                "wrote macros"
            );
            Ok(())
        }
        Command::PlotDkg {
            out_prefix,
            range,
            csvs,
        } => render_all(plot::dkg_charts(&select(csvs, *range)?, out_prefix)?),
        Command::PlotVss {
            out_suffix,
            range,
            csvs,
        } => render_all(plot::vss_charts(&select(csvs, *range)?, out_suffix)?),
        Command::PlotDeal {
            out_suffix,
            range,
            csvs,
        } => plot::deal_chart(&select(csvs, *range)?, out_suffix)?.render(),
        Command::PlotThreshsig {
            out,
            range,
            detailed,
            csvs,
        } => plot::threshsig_chart(&select(csvs, *range)?, out.clone(), *detailed)?.render(),
        Command::PlotBandwidth {
            out,
            allowed,
            range,
            csvs,
        } => plot::bandwidth_chart(&select(csvs, *range)?, out.clone(), allowed)?.render(),
        Command::PlotFkSpeedup {
            out_suffix,
            range,
            has_logscale,
            csvs,
        } => plot::fk_speedup_chart(&select(csvs, *range)?, out_suffix, *has_logscale)?.render(),
        Command::Compare {
            csv,
            label_col,
            value_col,
            margin,
            min_n,
        } => {
            let table = BenchTable::read_csv(csv)?;
            let mut opts = config.compare_options(min_n.unwrap_or(DEFAULT_MIN_INDEPENDENT_VALUE));
            if let Some(margin) = margin {
                opts.margin = *margin;
            }
            let comparisons = pairwise(&table, label_col, value_col, &opts)?;
            let payload = serde_json::to_string_pretty(&comparisons)
                .map_err(|e| ReportError::invalid_input(e.to_string()))?;
            println!("{payload}");
            Ok(())
        }
    }
}

fn humanize_csv(
    csv: &Path,
    columns: Option<&(String, String)>,
    config: &ReportConfig,
) -> Result<(), ReportError> {
    let table = BenchTable::read_csv(csv)?;
    let (table, shown) = match columns {
        Some((usec, hum)) => (
            table.with_humanized(usec, hum, config.precision)?,
            vec![usec.clone(), hum.clone()],
        ),
        None => {
            let shown: Vec<String> = table
                .headers()
                .iter()
                .filter_map(|h| h.strip_suffix(USEC_SUFFIX))
                .flat_map(|stem| [format!("{stem}{USEC_SUFFIX}"), format!("{stem}{HUM_SUFFIX}")])
                .collect();
            if shown.is_empty() {
                warn!(path = %csv.display(), "no *{USEC_SUFFIX} columns to humanize");
            }
            (table.humanize_usec_columns(config.precision)?, shown)
        }
    };
    table.write_csv(csv)?;
    info!(path = %csv.display(), rows = table.len(), "rewrote csv");
    if !shown.is_empty() {
        let shown: Vec<&str> = shown.iter().map(String::as_str).collect();
        print!("{}", table.to_text(&shown)?);
    }
    Ok(())
}

fn read_tables(csvs: &[PathBuf]) -> Result<BenchTable, ReportError> {
    info!(files = ?csvs, "reading CSV files");
    BenchTable::read_all(csvs)
}

fn select(csvs: &[PathBuf], range: PlayerRange) -> Result<BenchTable, ReportError> {
    plot::select_players(&read_tables(csvs)?, range.min_n, range.max_n)
}

fn render_all(jobs: Vec<ChartJob>) -> Result<(), ReportError> {
    for job in &jobs {
        job.render()?;
    }
    Ok(())
}
