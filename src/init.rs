//! Initial configurations for polymer melts and solutions, written as LAMMPS
//! data files (`atom_style bond`).
//!
//! Chains are random walks with unit bond length. Bead ids run contiguously
//! along each chain, end to end, which is the ordering the `beadspring`
//! analysis rule expects when the resulting trajectory is read back.

use log::info;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::pbc::{pbc_distance, wrap};

pub const END_TYPE: u32 = 1;
pub const MID_TYPE: u32 = 2;
pub const SOLVENT_TYPE: u32 = 3;
pub const BLOCK_B_TYPE: u32 = 4;

const BOND_LENGTH: f64 = 1.0;
const MAX_INSERT_ATTEMPTS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitStyle {
    /// Homopolymer of `n` beads, ends included.
    BeadSpring { n: usize },
    /// End cap, `n1` A beads, `n2` B beads, end cap.
    Diblock { n1: usize, n2: usize },
    Star,
    Spine,
}

impl InitStyle {
    pub fn from_parts(
        style: &str,
        n: Option<usize>,
        n1: Option<usize>,
        n2: Option<usize>,
    ) -> Result<InitStyle> {
        match style.to_lowercase().as_str() {
            "beadspring" => match n {
                Some(n) => Ok(InitStyle::BeadSpring { n }),
                None => Err(Error::config("style beadspring requires argument N")),
            },
            "diblock" => match (n1, n2) {
                (Some(n1), Some(n2)) => Ok(InitStyle::Diblock { n1, n2 }),
                _ => Err(Error::config(
                    "style diblock requires arguments N1, N2 (which do not include end caps)",
                )),
            },
            "star" => Ok(InitStyle::Star),
            "spine" => Ok(InitStyle::Spine),
            other => Err(Error::config(format!("invalid style '{}'", other))),
        }
    }

    /// Bead types along one chain, first to last.
    pub fn chain_types(&self) -> Result<Vec<u32>> {
        match *self {
            InitStyle::BeadSpring { n } => {
                if n < 2 {
                    return Err(Error::config(format!(
                        "a bead-spring chain needs at least two beads, got {}",
                        n
                    )));
                }
                let mut types = vec![MID_TYPE; n];
                types[0] = END_TYPE;
                types[n - 1] = END_TYPE;
                Ok(types)
            }
            InitStyle::Diblock { n1, n2 } => {
                let mut types = Vec::with_capacity(n1 + n2 + 2);
                types.push(END_TYPE);
                types.extend(std::iter::repeat(MID_TYPE).take(n1));
                types.extend(std::iter::repeat(BLOCK_B_TYPE).take(n2));
                types.push(END_TYPE);
                Ok(types)
            }
            InitStyle::Star => Err(Error::config("style star is not yet implemented")),
            InitStyle::Spine => Err(Error::config("style spine is not yet implemented")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitParams {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    /// number of polymers
    pub n_p: usize,
    /// number of solvent beads
    pub n_s: usize,
    /// exclusion radius around solvent beads, 0 disables the check
    pub rc: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bead {
    pub mol: usize,
    pub atom_type: u32,
    pub x: [f64; 3],
}

/// Beads (id = index + 1) and bonds between bead indices.
#[derive(Debug, Clone)]
pub struct System {
    pub l: [f64; 3],
    pub beads: Vec<Bead>,
    pub bonds: Vec<(usize, usize)>,
    pub seed: u64,
}

impl System {

    // place chains, then solvent, in a fresh box
    pub fn new(params: &InitParams, style: &InitStyle) -> Result<System> {
        let l = [params.lx, params.ly, params.lz];
        if l.iter().any(|&li| !(li > 0.0)) {
            return Err(Error::config(format!("box lengths must be positive, got {:?}", l)));
        }
        if !(params.rc >= 0.0) {
            return Err(Error::config(format!("rc must be non-negative, got {}", params.rc)));
        }
        let chain = style.chain_types()?;

        let mut rng = Pcg64::seed_from_u64(params.seed);
        let normal = Normal::new(0.0f64, 1.0)
            .map_err(|e| Error::config(format!("bad direction distribution: {}", e)))?;

        let mut sys = System {
            l,
            beads: Vec::with_capacity(params.n_p * chain.len() + params.n_s),
            bonds: Vec::with_capacity(params.n_p * (chain.len() - 1)),
            seed: params.seed,
        };

        for mol in 1..=params.n_p {
            let mut x = [rng.gen::<f64>()*l[0], rng.gen::<f64>()*l[1], rng.gen::<f64>()*l[2]];
            for (k, &atom_type) in chain.iter().enumerate() {
                if k > 0 {
                    let step = random_direction(&mut rng, &normal);
                    for d in 0..3 {
                        x[d] = wrap(x[d] + BOND_LENGTH*step[d], 0.0, l[d]);
                    }
                    let idx = sys.beads.len();
                    sys.bonds.push((idx - 1, idx));
                }
                sys.beads.push(Bead { mol, atom_type, x });
            }
        }

        for _ in 0..params.n_s {
            let x = sys.insert_point(&mut rng, params.rc)?;
            sys.beads.push(Bead { mol: 0, atom_type: SOLVENT_TYPE, x });
        }

        info!(
            "Built {} beads ({} polymers, {} solvent) with {} bonds",
            sys.beads.len(),
            params.n_p,
            params.n_s,
            sys.bonds.len()
        );
        Ok(sys)
    }

    // uniform point at least rc away from every placed bead
    fn insert_point<R: Rng>(&self, rng: &mut R, rc: f64) -> Result<[f64; 3]> {
        let bounds = [[0.0, self.l[0]], [0.0, self.l[1]], [0.0, self.l[2]]];
        for _ in 0..MAX_INSERT_ATTEMPTS {
            let x = [rng.gen::<f64>()*self.l[0], rng.gen::<f64>()*self.l[1], rng.gen::<f64>()*self.l[2]];
            if rc <= 0.0 {
                return Ok(x);
            }
            let clear = self
                .beads
                .iter()
                .all(|b| pbc_distance(&x, &bounds, &b.x, &bounds) >= rc);
            if clear {
                return Ok(x);
            }
        }
        Err(Error::config(format!(
            "could not place solvent bead {} after {} attempts, rc = {} is too large",
            self.beads.len() + 1,
            MAX_INSERT_ATTEMPTS,
            rc
        )))
    }

    pub fn n_types(&self) -> u32 {
        self.beads.iter().map(|b| b.atom_type).max().unwrap_or(1)
    }

    pub fn write_data<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "LAMMPS data file written by md-tools (seed {})\n", self.seed)?;
        writeln!(w, "{} atoms", self.beads.len())?;
        writeln!(w, "{} bonds\n", self.bonds.len())?;
        writeln!(w, "{} atom types", self.n_types())?;
        writeln!(w, "1 bond types\n")?;
        writeln!(w, "0.0 {} xlo xhi", self.l[0])?;
        writeln!(w, "0.0 {} ylo yhi", self.l[1])?;
        writeln!(w, "0.0 {} zlo zhi\n", self.l[2])?;

        writeln!(w, "Masses\n")?;
        for t in 1..=self.n_types() {
            writeln!(w, "{} 1.0", t)?;
        }

        writeln!(w, "\nAtoms # bond\n")?;
        for (i, b) in self.beads.iter().enumerate() {
            writeln!(w, "{} {} {} {} {} {}", i + 1, b.mol, b.atom_type, b.x[0], b.x[1], b.x[2])?;
        }

        if !self.bonds.is_empty() {
            writeln!(w, "\nBonds\n")?;
            for (k, (a, b)) in self.bonds.iter().enumerate() {
                writeln!(w, "{} 1 {} {}", k + 1, a + 1, b + 1)?;
            }
        }
        Ok(())
    }
}

fn random_direction<R: Rng>(rng: &mut R, normal: &Normal<f64>) -> [f64; 3] {
    loop {
        let v = [normal.sample(rng), normal.sample(rng), normal.sample(rng)];
        let norm = (v[0]*v[0] + v[1]*v[1] + v[2]*v[2]).sqrt();
        if norm > 1e-12 {
            return [v[0]/norm, v[1]/norm, v[2]/norm];
        }
    }
}

/// Build a system and write it to `path`.
pub fn make_dat_file<P: AsRef<Path>>(path: P, params: &InitParams, style: &InitStyle) -> Result<System> {
    let sys = System::new(params, style)?;
    let path = path.as_ref();
    info!("Writing data file {}", path.display());
    let mut file = BufWriter::new(File::create(path)?);
    sys.write_data(&mut file)?;
    file.flush()?;
    Ok(sys)
}
