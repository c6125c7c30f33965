//! Bond inference from atom types.
//!
//! `BeadSpring` assumes every chain is a contiguous run of ids that starts
//! and ends with an end-type bead; a roster that breaks that assumption
//! produces wrong bonds without any error, except where a chain would run
//! off either end of the roster.

use log::{info, warn};

use crate::config::Topology;
use crate::dump::Trajectory;
use crate::error::{Error, Result};

/// Fill every atom's neighbor list according to `topology`.
///
/// Returns the ids of atoms whose type matched no rule and was not ignored;
/// each one is also logged as a warning.
pub fn assign_neighbors(traj: &mut Trajectory, topology: &Topology) -> Result<Vec<u64>> {
    info!("Adding neighbors ({} style)", topology.style());
    traj.clear_neighbors();

    let unrecognized = match topology {
        Topology::BeadSpring {
            end_type,
            mid_types,
            ignored_types,
        } => {
            let n = traj.len();
            let mut unrecognized = Vec::new();
            // true while the next end bead opens a chain
            let mut at_start = true;

            for i in 0..n {
                let (id, atom_type) = {
                    let atom = &traj.atoms()[i];
                    (atom.id, atom.atom_type)
                };

                if atom_type == *end_type {
                    if at_start {
                        let next = following(n, i, id)?;
                        traj.link(i, next);
                    } else {
                        let prev = preceding(i, id)?;
                        traj.link(i, prev);
                    }
                    at_start = !at_start;
                } else if mid_types.contains(&atom_type) {
                    let next = following(n, i, id)?;
                    let prev = preceding(i, id)?;
                    traj.link(i, next);
                    traj.link(i, prev);
                } else if !ignored_types.contains(&atom_type) {
                    warn!("Atom of unknown type {} encountered (atom id {})", atom_type, id);
                    unrecognized.push(id);
                }
            }
            unrecognized
        }
        Topology::Colloid {
            colloid_type,
            ignored_types,
        } => {
            let mut colloids = Vec::new();
            let mut unrecognized = Vec::new();
            for (i, atom) in traj.atoms().iter().enumerate() {
                if atom.atom_type == *colloid_type {
                    colloids.push(i);
                } else if !ignored_types.contains(&atom.atom_type) {
                    warn!(
                        "Atom of unknown type {} encountered (atom id {})",
                        atom.atom_type, atom.id
                    );
                    unrecognized.push(atom.id);
                }
            }

            for &i in &colloids {
                for &j in &colloids {
                    if i != j {
                        traj.link(i, j);
                    }
                }
            }
            unrecognized
        }
    };

    Ok(unrecognized)
}

fn following(n: usize, i: usize, id: u64) -> Result<usize> {
    if i + 1 < n {
        Ok(i + 1)
    } else {
        Err(Error::Topology(format!(
            "chain bead {} is the last atom in the roster but needs a following bead",
            id
        )))
    }
}

fn preceding(i: usize, id: u64) -> Result<usize> {
    if i > 0 {
        Ok(i - 1)
    } else {
        Err(Error::Topology(format!(
            "chain bead {} is the first atom in the roster but needs a preceding bead",
            id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::parse_dump;

    fn dump(rows: &[(u64, u32)]) -> Trajectory {
        let mut text = String::from(
            "ITEM: TIMESTEP\n0\nITEM: BOX BOUNDS pp pp pp\n0 10\n0 10\n0 10\nITEM: ATOMS id type xs ys zs\n",
        );
        for (id, t) in rows {
            text.push_str(&format!("{} {} 0.5 0.5 0.5\n", id, t));
        }
        parse_dump(&text).unwrap()
    }

    fn ids(traj: &Trajectory, i: usize) -> Vec<u64> {
        traj.atoms()[i]
            .neighbors
            .iter()
            .map(|&j| traj.atoms()[j].id)
            .collect()
    }

    #[test]
    fn single_chain_links_along_ids() {
        let mut traj = dump(&[(1, 1), (2, 2), (3, 2), (4, 1)]);
        let topology = Topology::bead_spring(1, vec![2], vec![3]).unwrap();
        let unknown = assign_neighbors(&mut traj, &topology).unwrap();

        assert!(unknown.is_empty());
        assert_eq!(ids(&traj, 0), vec![2]);
        assert_eq!(ids(&traj, 1), vec![3, 1]);
        assert_eq!(ids(&traj, 2), vec![4, 2]);
        assert_eq!(ids(&traj, 3), vec![3]);
    }

    #[test]
    fn consecutive_chains_do_not_bond() {
        let mut traj = dump(&[(1, 1), (2, 2), (3, 1), (4, 1), (5, 2), (6, 1), (7, 3)]);
        let topology = Topology::bead_spring(1, vec![2], vec![3]).unwrap();
        assert_eq!(assign_neighbors(&mut traj, &topology).unwrap(), Vec::<u64>::new());
        assert_eq!(ids(&traj, 2), vec![2]);
        assert_eq!(ids(&traj, 3), vec![5]);
        assert!(ids(&traj, 6).is_empty());
    }

    #[test]
    fn unknown_types_are_reported_not_bonded() {
        let mut traj = dump(&[(1, 1), (2, 2), (3, 1), (4, 9)]);
        let topology = Topology::bead_spring(1, vec![2], vec![3]).unwrap();
        let unknown = assign_neighbors(&mut traj, &topology).unwrap();
        assert_eq!(unknown, vec![4]);
        assert!(traj.atoms()[3].neighbors.is_empty());
    }

    #[test]
    fn chain_off_the_roster_is_an_error() {
        let mut traj = dump(&[(1, 2), (2, 1)]);
        let topology = Topology::bead_spring(1, vec![2], vec![]).unwrap();
        assert!(matches!(
            assign_neighbors(&mut traj, &topology),
            Err(Error::Topology(_))
        ));
    }

    #[test]
    fn colloids_form_a_full_mesh() {
        let mut traj = dump(&[(1, 4), (2, 3), (3, 4), (4, 4), (5, 7)]);
        let topology = Topology::colloid(4, vec![3]).unwrap();
        let unknown = assign_neighbors(&mut traj, &topology).unwrap();

        assert_eq!(unknown, vec![5]);
        assert_eq!(ids(&traj, 0), vec![3, 4]);
        assert_eq!(ids(&traj, 2), vec![1, 4]);
        assert!(ids(&traj, 1).is_empty());
    }
}
