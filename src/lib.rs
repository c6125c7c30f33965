//! Helpers around LAMMPS bead-spring and colloid runs: initial data files,
//! thermo log cleaning, an external statistics wrapper, plots, and bond
//! reconstruction from `id type xs ys zs` dumps with minimum-image lengths.

pub mod analysis;
pub mod config;
pub mod dump;
pub mod error;
pub mod histogram;
pub mod init;
pub mod pbc;
pub mod plot;
pub mod stats;
pub mod thermo;
pub mod topology;

pub use crate::analysis::{analyze_dump, analyze_trajectory, Analysis, BondRecord};
pub use crate::config::{AnalysisConfig, Style, Topology};
pub use crate::dump::{parse_dump, read_dump, Atom, Sample, Trajectory};
pub use crate::error::{Error, Result};
