//! Reader for LAMMPS text dumps written with `dump ... atom` style output,
//! i.e. atom rows of `id type xs ys zs` in box-scaled coordinates.
//!
//! The whole file is tokenized into timestep blocks before any atom record is
//! built, so a malformed block anywhere in the file fails the read without
//! leaving a partial roster behind.

use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

const TIMESTEP_ITEM: &str = "ITEM: TIMESTEP";
const NUMBER_ITEM: &str = "ITEM: NUMBER OF ATOMS";
const BOX_ITEM: &str = "ITEM: BOX BOUNDS";
const ATOMS_ITEM: &str = "ITEM: ATOMS";
const ATOM_COLUMNS: [&str; 5] = ["id", "type", "xs", "ys", "zs"];

/// `[[xlo, xhi], [ylo, yhi], [zlo, zhi]]`
pub type Bounds = [[f64; 2]; 3];

/// One atom at one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Box-scaled coordinate, nominally in [0, 1) but not checked.
    pub position: [f64; 3],
    pub bounds: Bounds,
}

impl Sample {
    /// Position in box length units.
    pub fn unscaled(&self) -> [f64; 3] {
        let mut x = [0.0; 3];
        for l in 0..3 {
            let [lo, hi] = self.bounds[l];
            x[l] = lo + self.position[l] * (hi - lo);
        }
        x
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub id: u64,
    pub atom_type: u32,
    /// One entry per timestep block, in file order.
    pub samples: Vec<Sample>,
    /// Roster indices of bonded atoms.
    pub neighbors: Vec<usize>,
}

impl Atom {
    fn new(id: u64, atom_type: u32) -> Self {
        Atom {
            id,
            atom_type,
            samples: Vec::new(),
            neighbors: Vec::new(),
        }
    }
}

/// Atom roster sorted by id, with every atom's samples in timestep order.
#[derive(Debug, Clone)]
pub struct Trajectory {
    atoms: Vec<Atom>,
    index: HashMap<u64, usize>,
    timesteps: Vec<u64>,
}

impl Trajectory {
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Timestep values in block order.
    pub fn timesteps(&self) -> &[u64] {
        &self.timesteps
    }

    pub fn n_frames(&self) -> usize {
        self.timesteps.len()
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: u64) -> Option<&Atom> {
        self.index_of(id).map(|i| &self.atoms[i])
    }

    /// True when the roster position `i` holds id `i + 1` for every atom.
    pub fn is_dense(&self) -> bool {
        self.atoms
            .iter()
            .enumerate()
            .all(|(i, atom)| atom.id == i as u64 + 1)
    }

    /// Record `to` as a bonded neighbor of `from` (roster indices).
    pub fn link(&mut self, from: usize, to: usize) {
        self.atoms[from].neighbors.push(to);
    }

    pub fn clear_neighbors(&mut self) {
        for atom in &mut self.atoms {
            atom.neighbors.clear();
        }
    }
}

struct AtomRow {
    line: usize,
    id: u64,
    atom_type: u32,
    position: [f64; 3],
}

struct Block {
    timestep: u64,
    bounds: Bounds,
    rows: Vec<AtomRow>,
}

pub fn read_dump<P: AsRef<Path>>(path: P) -> Result<Trajectory> {
    let path = path.as_ref();
    info!("Reading dump file {}", path.display());
    let text = fs::read_to_string(path)?;
    parse_dump(&text)
}

pub fn parse_dump(text: &str) -> Result<Trajectory> {
    let blocks = split_blocks(text)?;
    info!("Creating atom list from {} timestep blocks", blocks.len());
    let mut traj = build_roster(&blocks[0])?;

    info!("Filling position values for {} atoms", traj.len());
    for block in &blocks {
        fill(&mut traj, block)?;
    }
    Ok(traj)
}

// 1-based line numbers paired with line text
type Lines<'a> = Vec<(usize, &'a str)>;

fn split_blocks(text: &str) -> Result<Vec<Block>> {
    let mut chunks: Vec<Lines> = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        if line.trim() == TIMESTEP_ITEM {
            chunks.push(vec![(line_no, line)]);
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.push((line_no, line));
        } else if !line.trim().is_empty() {
            return Err(Error::format(format!(
                "expected '{}' before line {}",
                TIMESTEP_ITEM, line_no
            )));
        }
    }

    if chunks.is_empty() {
        return Err(Error::format(format!("no '{}' marker found", TIMESTEP_ITEM)));
    }

    chunks.iter().map(|chunk| parse_block(chunk)).collect()
}

fn parse_block(lines: &[(usize, &str)]) -> Result<Block> {
    let marker_line = lines[0].0;
    // skip blank lines, they carry nothing in this format
    let mut cursor = lines[1..].iter().filter(|(_, l)| !l.trim().is_empty());

    let (ts_line, ts_text) = cursor.next().ok_or_else(|| {
        Error::format(format!("timestep block at line {} is empty", marker_line))
    })?;
    let timestep: u64 = ts_text
        .trim()
        .parse()
        .map_err(|_| Error::parse(*ts_line, format!("bad timestep value '{}'", ts_text.trim())))?;

    let mut count: Option<usize> = None;
    let mut bounds: Option<Bounds> = None;
    let mut rows: Option<Vec<AtomRow>> = None;

    while let Some((line_no, line)) = cursor.next() {
        let line = line.trim();
        if let Some(rows) = rows.as_mut() {
            if line.starts_with("ITEM:") {
                return Err(Error::format(format!(
                    "unexpected '{}' after the atoms section (line {})",
                    line, line_no
                )));
            }
            rows.push(parse_atom_row(*line_no, line)?);
        } else if line.starts_with(NUMBER_ITEM) {
            let (n_line, n_text) = cursor
                .next()
                .ok_or_else(|| Error::format(format!("missing atom count after line {}", line_no)))?;
            count = Some(
                n_text
                    .trim()
                    .parse()
                    .map_err(|_| Error::parse(*n_line, "bad atom count"))?,
            );
        } else if line.starts_with(BOX_ITEM) {
            let mut b = [[0.0; 2]; 3];
            for axis in b.iter_mut() {
                let (b_line, b_text) = cursor.next().ok_or_else(|| {
                    Error::format(format!("box bounds after line {} are truncated", line_no))
                })?;
                *axis = parse_bounds(*b_line, b_text)?;
            }
            bounds = Some(b);
        } else if line.starts_with(ATOMS_ITEM) {
            let columns: Vec<&str> = line[ATOMS_ITEM.len()..].split_whitespace().collect();
            if columns != ATOM_COLUMNS {
                return Err(Error::format(format!(
                    "atom columns '{}' at line {} are not 'id type xs ys zs'",
                    columns.join(" "),
                    line_no
                )));
            }
            rows = Some(Vec::new());
        } else {
            return Err(Error::format(format!(
                "unexpected line '{}' in timestep {} (line {})",
                line, timestep, line_no
            )));
        }
    }

    let bounds = bounds.ok_or_else(|| {
        Error::format(format!(
            "timestep {} has no '{}' section",
            timestep, BOX_ITEM
        ))
    })?;
    let rows = rows.ok_or_else(|| {
        Error::format(format!(
            "timestep {} has no '{}' section",
            timestep, ATOMS_ITEM
        ))
    })?;
    if let Some(n) = count {
        if n != rows.len() {
            return Err(Error::format(format!(
                "timestep {} declares {} atoms but lists {}",
                timestep,
                n,
                rows.len()
            )));
        }
    }

    debug!("timestep {}: {} atom rows", timestep, rows.len());
    Ok(Block {
        timestep,
        bounds,
        rows,
    })
}

fn parse_bounds(line_no: usize, text: &str) -> Result<[f64; 2]> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(Error::format(format!(
            "box bounds at line {} must be two numbers (triclinic boxes are not supported)",
            line_no
        )));
    }
    Ok([parse_float(line_no, tokens[0])?, parse_float(line_no, tokens[1])?])
}

fn parse_atom_row(line_no: usize, text: &str) -> Result<AtomRow> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != ATOM_COLUMNS.len() {
        return Err(Error::parse(
            line_no,
            format!("expected 5 columns, found {}", tokens.len()),
        ));
    }
    let id = tokens[0]
        .parse()
        .map_err(|_| Error::parse(line_no, format!("bad atom id '{}'", tokens[0])))?;
    let atom_type = tokens[1]
        .parse()
        .map_err(|_| Error::parse(line_no, format!("bad atom type '{}'", tokens[1])))?;
    Ok(AtomRow {
        line: line_no,
        id,
        atom_type,
        position: [
            parse_float(line_no, tokens[2])?,
            parse_float(line_no, tokens[3])?,
            parse_float(line_no, tokens[4])?,
        ],
    })
}

fn parse_float(line_no: usize, token: &str) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::parse(line_no, format!("bad number '{}'", token))),
    }
}

fn build_roster(first: &Block) -> Result<Trajectory> {
    let mut atoms: Vec<Atom> = first
        .rows
        .iter()
        .map(|row| Atom::new(row.id, row.atom_type))
        .collect();
    // row order in a dump is not id order
    atoms.sort_by_key(|atom| atom.id);

    let mut index = HashMap::with_capacity(atoms.len());
    for (i, atom) in atoms.iter().enumerate() {
        if index.insert(atom.id, i).is_some() {
            return Err(Error::id(
                atom.id,
                format!("listed twice in timestep {}", first.timestep),
            ));
        }
    }

    Ok(Trajectory {
        atoms,
        index,
        timesteps: Vec::new(),
    })
}

fn fill(traj: &mut Trajectory, block: &Block) -> Result<()> {
    let mut seen = vec![false; traj.atoms.len()];

    for row in &block.rows {
        let i = traj.index_of(row.id).ok_or_else(|| {
            Error::id(
                row.id,
                format!(
                    "not present in the first timestep (timestep {}, line {})",
                    block.timestep, row.line
                ),
            )
        })?;
        if seen[i] {
            return Err(Error::id(
                row.id,
                format!("listed twice in timestep {} (line {})", block.timestep, row.line),
            ));
        }
        seen[i] = true;

        let atom = &mut traj.atoms[i];
        if atom.atom_type != row.atom_type {
            return Err(Error::id(
                row.id,
                format!(
                    "type changed from {} to {} at timestep {}",
                    atom.atom_type, row.atom_type, block.timestep
                ),
            ));
        }
        atom.samples.push(Sample {
            position: row.position,
            bounds: block.bounds,
        });
    }

    if let Some(i) = seen.iter().position(|s| !s) {
        return Err(Error::id(
            traj.atoms[i].id,
            format!("missing from timestep {}", block.timestep),
        ));
    }

    traj.timesteps.push(block.timestep);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(step: u64, bounds: &str, rows: &[&str]) -> String {
        let mut s = format!(
            "ITEM: TIMESTEP\n{}\nITEM: NUMBER OF ATOMS\n{}\nITEM: BOX BOUNDS pp pp pp\n{}\nITEM: ATOMS id type xs ys zs\n",
            step,
            rows.len(),
            bounds
        );
        for row in rows {
            s.push_str(row);
            s.push('\n');
        }
        s
    }

    const CUBE: &str = "0 10\n0 10\n0 10";

    #[test]
    fn roster_is_sorted_and_dense() {
        let text = frame(0, CUBE, &["3 1 0.3 0.5 0.5", "1 1 0.1 0.5 0.5", "2 2 0.2 0.5 0.5"])
            + &frame(100, CUBE, &["2 2 0.2 0.5 0.5", "3 1 0.3 0.5 0.5", "1 1 0.1 0.5 0.5"]);
        let traj = parse_dump(&text).unwrap();

        assert_eq!(traj.len(), 3);
        assert!(traj.is_dense());
        for (i, atom) in traj.atoms().iter().enumerate() {
            assert_eq!(atom.id, i as u64 + 1);
            assert_eq!(atom.samples.len(), 2);
        }
        assert_eq!(traj.timesteps(), &[0, 100]);
        assert_eq!(traj.get(2).unwrap().atom_type, 2);
    }

    #[test]
    fn samples_follow_block_order() {
        let text = frame(0, CUBE, &["1 1 0.1 0.5 0.5"])
            + &frame(10, "0 20\n0 10\n0 10", &["1 1 0.4 0.5 0.5"]);
        let traj = parse_dump(&text).unwrap();
        let samples = &traj.atoms()[0].samples;
        assert_relative_eq!(samples[0].position[0], 0.1);
        assert_relative_eq!(samples[1].position[0], 0.4);
        assert_relative_eq!(samples[1].bounds[0][1], 20.0);
        assert_relative_eq!(samples[1].unscaled()[0], 8.0);
    }

    #[test]
    fn missing_atoms_marker_is_a_format_error() {
        let text = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n1\nITEM: BOX BOUNDS pp pp pp\n0 1\n0 1\n0 1\n";
        assert!(matches!(parse_dump(text), Err(Error::Format(_))));
    }

    #[test]
    fn missing_box_marker_is_a_format_error() {
        let text = "ITEM: TIMESTEP\n0\nITEM: ATOMS id type xs ys zs\n1 1 0.1 0.1 0.1\n";
        assert!(matches!(parse_dump(text), Err(Error::Format(_))));
    }

    #[test]
    fn text_without_timestep_marker_is_rejected() {
        assert!(matches!(parse_dump(""), Err(Error::Format(_))));
        assert!(matches!(parse_dump("hello\n"), Err(Error::Format(_))));
    }

    #[test]
    fn other_column_layouts_are_rejected() {
        let text = "ITEM: TIMESTEP\n0\nITEM: BOX BOUNDS pp pp pp\n0 1\n0 1\n0 1\nITEM: ATOMS id type x y z\n1 1 0.1 0.1 0.1\n";
        assert!(matches!(parse_dump(text), Err(Error::Format(_))));
    }

    #[test]
    fn triclinic_bounds_are_rejected() {
        let text = frame(0, "0 1 0.1\n0 1 0\n0 1 0", &["1 1 0.1 0.1 0.1"]);
        assert!(matches!(parse_dump(&text), Err(Error::Format(_))));
    }

    #[test]
    fn atom_count_must_match() {
        let text = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n2\nITEM: BOX BOUNDS pp pp pp\n0 1\n0 1\n0 1\nITEM: ATOMS id type xs ys zs\n1 1 0.1 0.1 0.1\n";
        assert!(matches!(parse_dump(text), Err(Error::Format(_))));
    }

    #[test]
    fn bad_number_reports_line() {
        let text = frame(0, CUBE, &["1 1 0.1 oops 0.1"]);
        match parse_dump(&text) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 10),
            other => panic!("unexpected {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        for bad in &["nan", "inf", "-inf", "NaN"] {
            let row = format!("1 1 0.1 {} 0.1", bad);
            let text = frame(0, CUBE, &[row.as_str()]);
            assert!(
                matches!(parse_dump(&text), Err(Error::Parse { line: 10, .. })),
                "accepted {}",
                bad
            );
        }
        let text = frame(0, "0 inf\n0 10\n0 10", &["1 1 0.1 0.1 0.1"]);
        assert!(matches!(parse_dump(&text), Err(Error::Parse { line: 6, .. })));
    }

    #[test]
    fn unknown_id_in_later_block_fails() {
        let text = frame(0, CUBE, &["1 1 0.1 0.1 0.1"]) + &frame(1, CUBE, &["2 1 0.1 0.1 0.1"]);
        assert!(matches!(
            parse_dump(&text),
            Err(Error::IdConsistency { id: 2, .. })
        ));
    }

    #[test]
    fn duplicate_id_in_first_block_fails() {
        let text = frame(0, CUBE, &["1 1 0.1 0.1 0.1", "1 1 0.2 0.2 0.2"]);
        assert!(matches!(
            parse_dump(&text),
            Err(Error::IdConsistency { id: 1, .. })
        ));
    }

    #[test]
    fn atom_missing_from_block_fails() {
        let text = frame(0, CUBE, &["1 1 0.1 0.1 0.1", "2 1 0.2 0.2 0.2"])
            + &frame(1, CUBE, &["1 1 0.1 0.1 0.1"]);
        assert!(matches!(
            parse_dump(&text),
            Err(Error::IdConsistency { id: 2, .. })
        ));
    }

    #[test]
    fn sparse_ids_are_accepted() {
        let text = frame(0, CUBE, &["10 1 0.1 0.1 0.1", "4 1 0.2 0.2 0.2"]);
        let traj = parse_dump(&text).unwrap();
        assert!(!traj.is_dense());
        assert_eq!(traj.index_of(4), Some(0));
        assert_eq!(traj.index_of(10), Some(1));
    }
}
