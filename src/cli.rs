//! Positional argument parsing for the `polyreport` binary.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{export::Experiment, latex::TEX_EXTENSION, plot::PNG_EXTENSION};

#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Too few arguments; carries the usage text to print.
    #[error("{0}")]
    Usage(String),
    #[error("unknown command {0}")]
    UnknownCommand(String),
    #[error("expected .{expected} file as output, got '{path}'")]
    BadExtension { path: String, expected: &'static str },
    #[error("invalid argument: {0}")]
    Invalid(String),
}

impl CliError {
    /// Usage is not a failure; argument-shape errors exit 2, bad values 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 0,
            CliError::UnknownCommand(_) => 2,
            CliError::BadExtension { .. } | CliError::Invalid(_) => 1,
        }
    }
}

/// Inclusive player range; 0 on either side means the data's own bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerRange {
    pub min_n: u64,
    pub max_n: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    HumanizeCsv {
        csv: PathBuf,
        columns: Option<(String, String)>,
    },
    Export {
        experiment: Experiment,
        out: PathBuf,
        csvs: Vec<PathBuf>,
    },
    PlotDkg {
        out_prefix: String,
        range: PlayerRange,
        csvs: Vec<PathBuf>,
    },
    PlotVss {
        out_suffix: String,
        range: PlayerRange,
        csvs: Vec<PathBuf>,
    },
    PlotDeal {
        out_suffix: String,
        range: PlayerRange,
        csvs: Vec<PathBuf>,
    },
    PlotThreshsig {
        out: PathBuf,
        range: PlayerRange,
        detailed: bool,
        csvs: Vec<PathBuf>,
    },
    PlotBandwidth {
        out: PathBuf,
        allowed: Vec<String>,
        range: PlayerRange,
        csvs: Vec<PathBuf>,
    },
    PlotFkSpeedup {
        out_suffix: String,
        range: PlayerRange,
        has_logscale: bool,
        csvs: Vec<PathBuf>,
    },
    Compare {
        csv: PathBuf,
        label_col: String,
        value_col: String,
        margin: Option<f64>,
        min_n: Option<f64>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommandLineConfig {
    pub command: Command,
}

const COMMANDS: [(&str, &str); 13] = [
    ("humanize-csv", "<csv-file> [<col_usec> <col_hum>]"),
    ("export-dkg", "<output-tex-file> <csv-file> [<csv-file>] ..."),
    ("export-vss", "<output-tex-file> <csv-file> [<csv-file>] ..."),
    ("export-threshsig", "<output-tex-file> <csv-file> [<csv-file>] ..."),
    ("export-dkg-bw", "<output-tex-file> <csv-file> [<csv-file>] ..."),
    ("plot-dkg", "<output-file-prefix> <min-N> <max-N> <csv-file> [<csv-file>] ..."),
    ("plot-vss", "<output-file-suffix> <min-N> <max-N> <csv-file> [<csv-file>] ..."),
    ("plot-deal", "<output-file-suffix> <min-N> <max-N> <csv-file> [<csv-file>] ..."),
    (
        "plot-threshsig",
        "<output-png-file> <min-N> <max-N> <is-detailed> <csv-file> [<csv-file>] ...",
    ),
    (
        "plot-bandwidth",
        "<output-png-file> <dkgs-allowed> <min-N> <max-N> <csv-file> [<csv-file>] ...",
    ),
    (
        "plot-fk-speedup",
        "<output-file-suffix> <min-N> <max-N> <has-logscale> <csv-file> [<csv-file>] ...",
    ),
    ("compare", "<csv-file> <label-col> <value-col> [<margin> [<min-N>]]"),
    ("help", ""),
];

impl CommandLineConfig {
    /// Parses `args` including the program name at index 0.
    pub fn from_args(args: &[&str]) -> Result<Self, CliError> {
        let Some((name, rest)) = args.get(1..).and_then(|a| a.split_first()) else {
            return Err(CliError::Usage(Self::help()));
        };
        let command = match *name {
            "humanize-csv" => {
                let rest = positional(name, rest, 1)?;
                let columns = match rest.get(1..) {
                    Some([usec, hum, ..]) => Some((usec.to_string(), hum.to_string())),
                    Some([usec]) => {
                        return Err(CliError::Invalid(format!(
                            "no humanized column name given for '{usec}'"
                        )));
                    }
                    _ => None,
                };
                Command::HumanizeCsv {
                    csv: PathBuf::from(rest[0]),
                    columns,
                }
            }
            "export-dkg" | "export-vss" | "export-threshsig" | "export-dkg-bw" => {
                let rest = positional(name, rest, 2)?;
                let experiment = match *name {
                    "export-dkg" => Experiment::Dkg,
                    "export-vss" => Experiment::Vss,
                    "export-threshsig" => Experiment::Threshsig,
                    _ => Experiment::DkgBandwidth,
                };
                Command::Export {
                    experiment,
                    out: output_file(rest[0], TEX_EXTENSION)?,
                    csvs: paths(&rest[1..]),
                }
            }
            "plot-dkg" | "plot-vss" | "plot-deal" => {
                let rest = positional(name, rest, 4)?;
                let out = rest[0].to_string();
                let range = player_range(rest[1], rest[2])?;
                let csvs = paths(&rest[3..]);
                match *name {
                    "plot-dkg" => Command::PlotDkg {
                        out_prefix: out,
                        range,
                        csvs,
                    },
                    "plot-vss" => Command::PlotVss {
                        out_suffix: out,
                        range,
                        csvs,
                    },
                    _ => Command::PlotDeal {
                        out_suffix: out,
                        range,
                        csvs,
                    },
                }
            }
            "plot-threshsig" => {
                let rest = positional(name, rest, 5)?;
                Command::PlotThreshsig {
                    out: output_file(rest[0], PNG_EXTENSION)?,
                    range: player_range(rest[1], rest[2])?,
                    detailed: flag("is-detailed", rest[3])?,
                    csvs: paths(&rest[4..]),
                }
            }
            "plot-bandwidth" => {
                let rest = positional(name, rest, 5)?;
                Command::PlotBandwidth {
                    out: output_file(rest[0], PNG_EXTENSION)?,
                    allowed: rest[1].split(',').map(|s| s.trim().to_string()).collect(),
                    range: player_range(rest[2], rest[3])?,
                    csvs: paths(&rest[4..]),
                }
            }
            "plot-fk-speedup" => {
                let rest = positional(name, rest, 5)?;
                Command::PlotFkSpeedup {
                    out_suffix: rest[0].to_string(),
                    range: player_range(rest[1], rest[2])?,
                    has_logscale: flag("has-logscale", rest[3])?,
                    csvs: paths(&rest[4..]),
                }
            }
            "compare" => {
                let rest = positional(name, rest, 3)?;
                Command::Compare {
                    csv: PathBuf::from(rest[0]),
                    label_col: rest[1].to_string(),
                    value_col: rest[2].to_string(),
                    margin: rest.get(3).map(|raw| number("margin", raw)).transpose()?,
                    min_n: rest.get(4).map(|raw| number("min-N", raw)).transpose()?,
                }
            }
            "help" => return Err(CliError::Usage(Self::help())),
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };
        Ok(Self { command })
    }

    pub fn help() -> String {
        let mut out = String::from("Usage: polyreport <command> [args...]\n\nCommands:\n");
        for (name, args) in COMMANDS {
            out.push_str(&format!("  {name} {args}\n"));
        }
        out.push_str(
            "\nEnvironment: POLYREPORT_MARGIN, POLYREPORT_PRECISION, POLYREPORT_LOG\n",
        );
        out
    }

    pub fn usage(command: &str) -> String {
        let args = COMMANDS
            .iter()
            .find(|(name, _)| *name == command)
            .map(|(_, args)| *args)
            .unwrap_or_default();
        format!("Usage: polyreport {command} {args}")
    }
}

fn positional<'a, 'b>(
    command: &str,
    rest: &'b [&'a str],
    required: usize,
) -> Result<&'b [&'a str], CliError> {
    if rest.len() < required {
        Err(CliError::Usage(CommandLineConfig::usage(command)))
    } else {
        Ok(rest)
    }
}

fn output_file(raw: &str, expected: &'static str) -> Result<PathBuf, CliError> {
    let path = PathBuf::from(raw);
    if has_extension(&path, expected) {
        Ok(path)
    } else {
        Err(CliError::BadExtension {
            path: raw.to_string(),
            expected,
        })
    }
}

pub fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(expected)
}

fn paths(raw: &[&str]) -> Vec<PathBuf> {
    raw.iter().map(PathBuf::from).collect()
}

fn player_range(min_raw: &str, max_raw: &str) -> Result<PlayerRange, CliError> {
    let parse = |name: &str, raw: &str| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| CliError::Invalid(format!("{name} '{raw}': {e}")))
    };
    Ok(PlayerRange {
        min_n: parse("min-N", min_raw)?,
        max_n: parse("max-N", max_raw)?,
    })
}

/// `0`/`1` style switch; any non-zero integer or `true` enables it.
fn flag(name: &str, raw: &str) -> Result<bool, CliError> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value != 0);
    }
    raw.parse::<bool>()
        .map_err(|_| CliError::Invalid(format!("{name} must be 0 or 1, got '{raw}'")))
}

fn number(name: &str, raw: &str) -> Result<f64, CliError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| CliError::Invalid(format!("{name} '{raw}': {e}")))
}
