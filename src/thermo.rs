//! Thermo output extraction from LAMMPS log files.

use log::{info, warn};
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_HEADER: &str = "Steps Temp KinE PotE TotE Press Vol";

// a line made only of numbers: optional sign, digits/dots, optional exponent
const NUMERIC_LINE: &str =
    r"^[ \t]*[-+]?[0-9.]+(?:[eE][-+]?[0-9]+)?(?:[ \t]+[-+]?[0-9.]+(?:[eE][-+]?[0-9]+)?)*[ \t]*$";

/// Numeric table with one row per thermo line; column 0 is the timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl ThermoTable {
    pub fn n_columns(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn column(&self, c: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[c]).collect()
    }

    /// Extract the thermo rows of a log's text.
    pub fn from_log(text: &str, header: &str) -> Result<ThermoTable> {
        let re = Regex::new(NUMERIC_LINE)
            .map_err(|e| Error::config(format!("bad thermo pattern: {}", e)))?;

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (n, line) in text.lines().enumerate() {
            if !re.is_match(line) {
                continue;
            }
            let row = parse_row(n + 1, line.split_whitespace())?;
            push_row(&mut rows, n + 1, row)?;
        }

        if rows.is_empty() {
            return Err(Error::format("no numeric thermo lines found in log"));
        }

        Ok(ThermoTable {
            header: header.split_whitespace().map(String::from).collect(),
            rows,
        })
    }

    /// Read a table written by [`ThermoTable::write`]: an optional `#` header
    /// line, then rows separated by commas or whitespace.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<ThermoTable> {
        let text = fs::read_to_string(path)?;
        let mut header = Vec::new();
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(names) = line.strip_prefix('#') {
                if header.is_empty() && rows.is_empty() {
                    header = names.split_whitespace().map(String::from).collect();
                }
                continue;
            }
            let tokens = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty());
            let row = parse_row(n + 1, tokens)?;
            push_row(&mut rows, n + 1, row)?;
        }

        if rows.is_empty() {
            return Err(Error::format("table has no data rows"));
        }
        Ok(ThermoTable { header, rows })
    }

    pub fn write<W: Write>(&self, w: &mut W, delim: &str) -> std::io::Result<()> {
        writeln!(w, "# {}", self.header.join(" "))?;
        for row in &self.rows {
            let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(w, "{}", fields.join(delim))?;
        }
        Ok(())
    }
}

// every row must be as wide as the first
fn push_row(rows: &mut Vec<Vec<f64>>, line_no: usize, row: Vec<f64>) -> Result<()> {
    if let Some(first) = rows.first() {
        if first.len() != row.len() {
            return Err(Error::format(format!(
                "line {} has {} columns, earlier lines have {}",
                line_no,
                row.len(),
                first.len()
            )));
        }
    }
    rows.push(row);
    Ok(())
}

fn parse_row<'a, I: Iterator<Item = &'a str>>(line_no: usize, tokens: I) -> Result<Vec<f64>> {
    tokens
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| Error::parse(line_no, format!("bad number '{}'", t)))
        })
        .collect()
}

/// Comma for `.csv` outputs, a space for anything else.
pub fn delimiter_for<P: AsRef<Path>>(path: P) -> &'static str {
    match path.as_ref().extension() {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => ",",
        _ => " ",
    }
}

/// Copy the numeric thermo rows of `input` to `output` under a `# header`
/// line, returning the parsed table.
pub fn clean_log<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q, header: &str) -> Result<ThermoTable> {
    let input = input.as_ref();
    let output = output.as_ref();
    info!("Cleaning log {}", input.display());

    let text = fs::read_to_string(input)?;
    let table = ThermoTable::from_log(&text, header)?;
    if !table.header.is_empty() && table.header.len() != table.n_columns() {
        warn!(
            "header has {} names but the log has {} columns",
            table.header.len(),
            table.n_columns()
        );
    }

    let mut file = BufWriter::new(File::create(output)?);
    table.write(&mut file, delimiter_for(output))?;
    file.flush()?;
    info!("Wrote {} thermo rows to {}", table.rows.len(), output.display());
    Ok(table)
}
