//! Wrapper around an external per-column statistics script.
//!
//! The script is run once per column and its stdout scraped for lines
//! containing `Mean`; token 3 of such a line is the mean and token 5 the
//! standard deviation (`<name> Mean = <mean> +/- <std>`). Any column the tool
//! fails on is skipped with a warning.

use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

pub const DEFAULT_COMMAND: &str = "python stats.py -o {column} -f {file}";

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
}

/// Collect every `Mean` line of one tool run.
pub fn parse_stats_output(name: &str, stdout: &str) -> Vec<ColumnStats> {
    let mut found = Vec::new();
    for line in stdout.lines().filter(|l| l.contains("Mean")) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mean = tokens.get(3).and_then(|t| t.parse::<f64>().ok());
        let std_dev = tokens.get(5).and_then(|t| t.parse::<f64>().ok());
        match (mean, std_dev) {
            (Some(mean), Some(std_dev)) => found.push(ColumnStats {
                name: name.to_string(),
                mean,
                std_dev,
            }),
            _ => warn!("could not read statistics for {} from '{}'", name, line.trim()),
        }
    }
    found
}

/// Run the tool for one column and return its stdout. Blocks until the
/// process exits.
pub fn run_column(template: &str, column: &str, file: &Path) -> Result<String> {
    let file = file.to_string_lossy();
    let mut args = template
        .split_whitespace()
        .map(|t| t.replace("{column}", column).replace("{file}", &file));
    let program = args
        .next()
        .ok_or_else(|| Error::config("statistics command template is empty"))?;

    let output = Command::new(&program)
        .args(args)
        .output()
        .map_err(|e| Error::Stats(format!("could not start '{}': {}", program, e)))?;

    if !output.status.success() {
        return Err(Error::Stats(format!(
            "'{}' exited with {} for column {}: {}",
            program,
            output.status,
            column,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Statistics for each column in turn. Tool failures only drop the affected
/// column; the returned list may be empty.
pub fn do_stats(columns: &[String], file: &Path, template: &str, output: Option<&Path>) -> Result<Vec<ColumnStats>> {
    info!("Note: a divide error usually means a constant column such as the volume");
    let mut stats = Vec::new();
    for column in columns {
        info!("Doing stats on {}", column);
        match run_column(template, column, file) {
            Ok(stdout) => {
                let found = parse_stats_output(column, &stdout);
                if found.is_empty() {
                    warn!("statistics tool printed no Mean line for {}", column);
                }
                stats.extend(found);
            }
            Err(e) => warn!("skipping {}: {}", column, e),
        }
    }

    if let Some(path) = output {
        let mut w = BufWriter::new(File::create(path)?);
        write_stats(&mut w, &stats)?;
        w.flush()?;
    }
    Ok(stats)
}

pub fn write_stats<W: Write>(w: &mut W, stats: &[ColumnStats]) -> std::io::Result<()> {
    for s in stats {
        writeln!(w, "{} {} {}", s.name, s.mean, s.std_dev)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_lines_are_scraped() {
        let out = "reading data\nTemp Mean = 0.998 +/- 0.012\nblocks 10\n";
        let stats = parse_stats_output("Temp", out);
        assert_eq!(
            stats,
            vec![ColumnStats { name: "Temp".into(), mean: 0.998, std_dev: 0.012 }]
        );
    }

    #[test]
    fn unparseable_mean_line_is_skipped() {
        assert!(parse_stats_output("Vol", "Vol Mean = nan? +/-\n").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn tool_output_is_collected() {
        let stats = do_stats(
            &["Temp".to_string()],
            Path::new("thermo.dat"),
            "echo {column} Mean = 1.5 +/- 0.25 {file}",
            None,
        )
        .unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "Temp");
        assert_eq!(stats[0].mean, 1.5);
        assert_eq!(stats[0].std_dev, 0.25);
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_yields_no_stats() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("stats.txt");
        let stats = do_stats(
            &["Temp".to_string(), "Press".to_string()],
            Path::new("thermo.dat"),
            "false {column}",
            Some(&out),
        )
        .unwrap();
        assert!(stats.is_empty());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "");

        assert!(do_stats(&["Temp".to_string()], Path::new("x"), "md-tools-no-such-program", None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_template_is_a_configuration_error() {
        assert!(matches!(
            run_column("   ", "Temp", Path::new("x")),
            Err(Error::Configuration(_))
        ));
    }
}
