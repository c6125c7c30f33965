use log::info;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::{AnalysisConfig, Topology};
use crate::dump::{read_dump, Trajectory};
use crate::error::Result;
use crate::histogram::Histogram;
use crate::pbc::minimum_image_distance;
use crate::topology::assign_neighbors;

/// One undirected bond, `pair.0 < pair.1`, with its length at every timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct BondRecord {
    pub pair: (u64, u64),
    pub distances: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub timesteps: Vec<u64>,
    /// Sorted by pair, one record per bond.
    pub bonds: Vec<BondRecord>,
    /// Ids of atoms no topology rule recognized.
    pub unrecognized: Vec<u64>,
}

impl Analysis {
    /// Every bond length at every timestep.
    pub fn distances(&self) -> Vec<f64> {
        self.bonds
            .iter()
            .flat_map(|b| b.distances.iter().copied())
            .collect()
    }

    /// Bond lengths at the final timestep only.
    pub fn last_frame(&self) -> Vec<((u64, u64), f64)> {
        self.bonds
            .iter()
            .filter_map(|b| b.distances.last().map(|&d| (b.pair, d)))
            .collect()
    }

    /// Histogram of every bond length over its full span.
    pub fn histogram(&self, config: &AnalysisConfig) -> Result<Histogram> {
        Histogram::from_values(&self.distances(), config.bins)
    }

    /// Finer histogram restricted to the zoom range; lengths outside it are
    /// dropped.
    pub fn zoom_histogram(&self, config: &AnalysisConfig) -> Result<Histogram> {
        let [lo, hi] = config.zoom_range;
        Histogram::with_range(&self.distances(), config.zoom_bins, lo, hi)
    }

    // one line per bond: idA idB d(t0) d(t1) ...
    pub fn write_bonds<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        write!(w, "# idA idB")?;
        for t in &self.timesteps {
            write!(w, " t{}", t)?;
        }
        writeln!(w)?;
        for bond in &self.bonds {
            write!(w, "{} {}", bond.pair.0, bond.pair.1)?;
            for d in &bond.distances {
                write!(w, " {}", d)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn save_bonds<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_bonds(&mut file)?;
        file.flush()?;
        Ok(())
    }
}

fn canonical(a: u64, b: u64) -> (u64, u64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Per-timestep minimum-image length of every bond in the neighbor lists.
///
/// Each bond is found once from each endpoint; it is measured only the first
/// time and always from its lower-id end, so the two traversals cannot
/// disagree in the last bit.
pub fn bond_distances(traj: &Trajectory) -> Vec<BondRecord> {
    info!("Calculating distance data of neighbors");
    let atoms = traj.atoms();
    let mut bonds: BTreeMap<(u64, u64), Vec<f64>> = BTreeMap::new();

    for atom in atoms {
        for &j in &atom.neighbors {
            let other = &atoms[j];
            let pair = canonical(atom.id, other.id);
            if bonds.contains_key(&pair) {
                continue;
            }
            let (lo, hi) = if atom.id < other.id {
                (atom, other)
            } else {
                (other, atom)
            };
            let distances = lo
                .samples
                .iter()
                .zip(&hi.samples)
                .map(|(a, b)| minimum_image_distance(a, b))
                .collect();
            bonds.insert(pair, distances);
        }
    }

    bonds
        .into_iter()
        .map(|(pair, distances)| BondRecord { pair, distances })
        .collect()
}

/// Assign neighbors on an already parsed trajectory and measure the bonds.
pub fn analyze_trajectory(traj: &mut Trajectory, topology: &Topology) -> Result<Analysis> {
    let unrecognized = assign_neighbors(traj, topology)?;
    let bonds = bond_distances(traj);
    info!(
        "{} bonds over {} timesteps ({} unrecognized atoms)",
        bonds.len(),
        traj.n_frames(),
        unrecognized.len()
    );
    Ok(Analysis {
        timesteps: traj.timesteps().to_vec(),
        bonds,
        unrecognized,
    })
}

/// Full pipeline on a dump file. The configuration is validated before the
/// file is opened.
pub fn analyze_dump<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> Result<Analysis> {
    let topology = config.topology()?;
    config.check_histograms()?;
    let mut traj = read_dump(path)?;
    analyze_trajectory(&mut traj, &topology)
}
