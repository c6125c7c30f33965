use itertools_num::linspace;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::AddAssign;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` equally spaced bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin over the full span of `values`.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Histogram> {
        let (lo, hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let (lo, hi) = if values.is_empty() {
            (0.0, 1.0)
        } else if hi - lo <= 0.0 {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        };
        Histogram::with_range(values, bins, lo, hi)
    }

    /// Bin over `[lo, hi]`; values outside are dropped.
    pub fn with_range(values: &[f64], bins: usize, lo: f64, hi: f64) -> Result<Histogram> {
        if bins == 0 {
            return Err(Error::config("histogram needs at least one bin"));
        }
        if !(hi > lo) {
            return Err(Error::config(format!(
                "histogram range [{}, {}] is empty",
                lo, hi
            )));
        }

        let edges: Vec<f64> = linspace(lo, hi, bins + 1).collect();
        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            if v < lo || v > hi {
                continue;
            }
            // the top edge belongs to the last bin
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }
        Ok(Histogram { edges, counts })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn write_table<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "# lower upper count")?;
        for (i, count) in self.counts.iter().enumerate() {
            writeln!(w, "{} {} {}", self.edges[i], self.edges[i + 1], count)?;
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Writing histogram table to {}", path.display());
        let mut file = BufWriter::new(File::create(path)?);
        self.write_table(&mut file)?;
        file.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Option<Summary> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;

        let mut sum = KahanAdder::new();
        for &v in values {
            sum += v;
        }
        let mean = sum.result() / n;

        let mut sq = KahanAdder::new();
        for &v in values {
            sq += (v - mean) * (v - mean);
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        Some(Summary {
            count: values.len(),
            mean,
            std_dev: (sq.result() / n).sqrt(),
            min,
            max,
        })
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq)]
struct KahanAdder {
    accum: f64,
    comp: f64
}

impl KahanAdder {

    fn new() -> Self {
        KahanAdder{accum: 0.0, comp: 0.0}
    }

    fn add(&mut self, num: f64) {
        let y = num - self.comp;
        let t = self.accum + y;
        self.comp = (t - self.accum) - y;
        self.accum = t;
    }

    fn result(&self) -> f64 {
        self.accum
    }
}

impl AddAssign<f64> for KahanAdder {
    fn add_assign(&mut self, other: f64) {
        self.add(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counts_land_in_expected_bins() {
        let hist = Histogram::from_values(&[0.0, 0.1, 0.5, 0.99, 1.0], 4).unwrap();
        assert_eq!(hist.edges.len(), 5);
        assert_relative_eq!(hist.edges[2], 0.5);
        assert_eq!(hist.counts, vec![2, 0, 1, 2]);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn range_drops_outliers() {
        let hist = Histogram::with_range(&[0.05, 0.15, 0.5, 1.2], 2, 0.0, 0.2).unwrap();
        assert_eq!(hist.counts, vec![1, 1]);
    }

    #[test]
    fn single_value_gets_a_unit_range() {
        let hist = Histogram::from_values(&[0.97, 0.97], 10).unwrap();
        assert_relative_eq!(hist.edges[0], 0.47, epsilon = 1e-12);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn zero_bins_is_rejected() {
        assert!(matches!(
            Histogram::from_values(&[1.0], 0),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn summary_matches_population_moments() {
        let s = Summary::of(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_relative_eq!(s.mean, 2.5);
        assert_relative_eq!(s.std_dev, 1.25f64.sqrt());
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.max, 4.0);
        assert!(Summary::of(&[]).is_none());
    }

    #[test]
    fn kahan_keeps_small_terms() {
        let mut k = KahanAdder::new();
        k += 1.0e16;
        for _ in 0..10 {
            k += 1.0;
        }
        k += -1.0e16;
        assert_relative_eq!(k.result(), 10.0);
    }
}
