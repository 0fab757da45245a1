use std::{fs, path::Path};

use crate::{ReportError, measurement::format_number};

pub const TEX_EXTENSION: &str = "tex";

const NODATA: &str = "\\textcolor{red}{\\textbf{NODATA}}";

/// Accumulates `\newcommand` definitions for a `.tex` report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroWriter {
    buf: String,
}

impl MacroWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-argument macro that maps each key to its value through
    /// `\IfStrEqCase`. Entries with a blank value are left out, so the macro
    /// falls through to NODATA for them.
    pub fn case_macro<I, K, V>(&mut self, name: &str, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.buf.push_str(&format!("\\newcommand{{\\{name}}}[1]{{%\n"));
        self.buf.push_str("    \\IfStrEqCase{#1}{");
        for (key, value) in entries {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            self.buf.push_str(&format!(
                "\n        {{{}}}{{{value}\\xspace}}",
                key.as_ref().trim()
            ));
        }
        self.buf.push_str(&format!("}}[{NODATA}]}}\n\n"));
    }

    /// Case macro keyed by numbers (`n`, `k`, ...).
    pub fn numeric_case_macro<I, V>(&mut self, name: &str, entries: I)
    where
        I: IntoIterator<Item = (f64, V)>,
        V: AsRef<str>,
    {
        self.case_macro(
            name,
            entries
                .into_iter()
                .map(|(key, value)| (format_number(key), value)),
        );
    }

    pub fn constant(&mut self, name: &str, value: &str) {
        self.buf
            .push_str(&format!("\\newcommand{{\\{name}}}{{{value}}}\n"));
    }

    pub fn section_header(&mut self, column: &str, margin: f64, min_independent_value: f64) {
        self.buf.push_str("%\n");
        self.buf
            .push_str(&format!("% Data for column '{column}'\n"));
        self.buf.push_str(&format!(
            "% (improvements must be better than {margin} and occur after n > {})\n",
            format_number(min_independent_value)
        ));
        self.buf.push_str("%\n");
    }

    pub fn blank_lines(&mut self, count: usize) {
        for _ in 0..count {
            self.buf.push('\n');
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Truncates and rewrites `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let path = path.as_ref();
        fs::write(path, &self.buf).map_err(|e| ReportError::io(format!("{}: {e}", path.display())))
    }
}
