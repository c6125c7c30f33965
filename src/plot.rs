//! SVG figures: thermo columns against time, and bond length histograms.

use log::info;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

use crate::error::{Error, Result};
use crate::histogram::Histogram;
use crate::thermo::ThermoTable;

/// Inclusive time range to plot; open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeWindow {
    lo: Option<f64>,
    hi: Option<f64>,
}

impl TimeWindow {
    pub fn new(lo: Option<f64>, hi: Option<f64>) -> Result<TimeWindow> {
        if let (Some(lo), Some(hi)) = (lo, hi) {
            if lo > hi {
                return Err(Error::config(format!("t_lo ({}) > t_hi ({})", lo, hi)));
            }
        }
        Ok(TimeWindow { lo, hi })
    }

    pub fn contains(&self, t: f64) -> bool {
        self.lo.map_or(true, |lo| t >= lo) && self.hi.map_or(true, |hi| t <= hi)
    }
}

fn plot_err<E: Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

// value range padded so flat series still get a visible axis
fn span(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        0.0..1.0
    } else if hi - lo <= 0.0 {
        (lo - 0.5)..(hi + 0.5)
    } else {
        let pad = 0.05 * (hi - lo);
        (lo - pad)..(hi + pad)
    }
}

/// `(rows, cols)` for one panel per non-time column.
pub fn grid(n_columns: usize) -> (usize, usize) {
    let panels = n_columns.saturating_sub(1).max(1);
    let cols = ((n_columns as f64).sqrt().ceil() as usize).max(1);
    let rows = (panels + cols - 1) / cols;
    (rows, cols)
}

/// One panel per table column (column 0 is the time axis), laid out on a
/// near-square grid. `labels` name the columns including time; the table
/// header is used where a label is missing.
pub fn plot_params(
    out: &Path,
    table: &ThermoTable,
    labels: &[String],
    window: TimeWindow,
    caption: Option<&str>,
) -> Result<()> {
    let n_columns = table.n_columns();
    if n_columns < 2 {
        return Err(Error::format("need a time column and at least one data column"));
    }
    if let Some(i) = table.rows.iter().position(|r| r.len() != n_columns) {
        return Err(Error::format(format!(
            "table row {} has {} columns, expected {}",
            i + 1,
            table.rows[i].len(),
            n_columns
        )));
    }
    let rows: Vec<&Vec<f64>> = table.rows.iter().filter(|r| window.contains(r[0])).collect();
    if rows.is_empty() {
        return Err(Error::config("no rows fall inside the requested time window"));
    }

    let label = |c: usize| -> String {
        labels
            .get(c)
            .or_else(|| table.header.get(c))
            .cloned()
            .unwrap_or_else(|| format!("column {}", c))
    };

    info!("Plotting {} columns to {}", n_columns - 1, out.display());
    let root = SVGBackend::new(out, (2500, 1500)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (panels_area, footer) = root.split_vertically(1420);

    let (n_rows, n_cols) = grid(n_columns);
    let panels = panels_area.split_evenly((n_rows, n_cols));
    let x_range = span(rows.iter().map(|r| r[0]));

    for (c, panel) in (1..n_columns).zip(panels.iter()) {
        let name = label(c);
        let mut chart = ChartBuilder::on(panel)
            .caption(format!("{} vs Time", name), ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), span(rows.iter().map(|r| r[c])))
            .map_err(plot_err)?;
        chart
            .configure_mesh()
            .x_desc("Timestep")
            .y_desc(name.as_str())
            .draw()
            .map_err(plot_err)?;
        chart
            .draw_series(LineSeries::new(rows.iter().map(|r| (r[0], r[c])), &BLUE))
            .map_err(plot_err)?;
    }

    let text = caption.map(String::from).unwrap_or_else(|| out.display().to_string());
    footer
        .draw(&Text::new(text, (40, 30), ("sans-serif", 18).into_font().color(&BLACK)))
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Bar chart of a histogram.
pub fn plot_histogram(out: &Path, hist: &Histogram, title: &str) -> Result<()> {
    info!("Generating histogram plot {}", out.display());
    let root = SVGBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let x0 = hist.edges.first().copied().unwrap_or(0.0);
    let x1 = hist.edges.last().copied().unwrap_or(1.0);
    let y1 = (hist.max_count().max(1) as f64) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0.0..y1)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Distance")
        .y_desc("Count")
        .draw()
        .map_err(plot_err)?;
    chart
        .draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                BLUE.filled(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_room_for_every_column() {
        for n in 2..30 {
            let (rows, cols) = grid(n);
            assert!(rows * cols >= n - 1, "n = {}", n);
        }
        assert_eq!(grid(7), (2, 3));
        assert_eq!(grid(2), (1, 2));
    }

    #[test]
    fn reversed_window_is_rejected() {
        assert!(matches!(
            TimeWindow::new(Some(10.0), Some(1.0)),
            Err(Error::Configuration(_))
        ));
        let w = TimeWindow::new(Some(1.0), None).unwrap();
        assert!(w.contains(1.0) && w.contains(1e9) && !w.contains(0.5));
    }

    #[test]
    fn writes_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        let table = ThermoTable {
            header: vec!["Step".into(), "Temp".into(), "PotE".into()],
            rows: (0..20).map(|i| vec![i as f64 * 10.0, 1.0, -5.0 + 0.1 * i as f64]).collect(),
        };
        let params = dir.path().join("params.svg");
        plot_params(&params, &table, &[], TimeWindow::default(), None).unwrap();
        let svg = std::fs::read_to_string(&params).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("PotE vs Time"));

        let hist = Histogram::from_values(&[0.9, 1.0, 1.0, 1.1], 4).unwrap();
        let hist_path = dir.path().join("hist.svg");
        plot_histogram(&hist_path, &hist, "Bond lengths").unwrap();
        assert!(std::fs::read_to_string(&hist_path).unwrap().contains("<svg"));
    }

    #[test]
    fn ragged_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = ThermoTable {
            header: vec![],
            rows: vec![vec![0.0, 1.0, -5.0], vec![100.0, 1.1]],
        };
        let out = dir.path().join("p.svg");
        assert!(matches!(
            plot_params(&out, &table, &[], TimeWindow::default(), None),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn empty_window_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = ThermoTable {
            header: vec![],
            rows: vec![vec![0.0, 1.0], vec![10.0, 2.0]],
        };
        let window = TimeWindow::new(Some(100.0), Some(200.0)).unwrap();
        assert!(plot_params(&dir.path().join("p.svg"), &table, &[], window, None).is_err());
    }
}
