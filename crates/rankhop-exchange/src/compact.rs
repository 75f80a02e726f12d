//! Mover validation and dense-array compaction.
//!
//! Movers are consumed from the back of the list, so particle indices
//! are visited in decreasing order. Swap-removal then only ever backfills
//! a hole with a particle whose mover was already consumed, or with one
//! that has no mover at all.

use crate::warning::ExchangeWarning;
use rankhop_core::{InputError, MoverList, Particle, ParticleStore};

/// Check capacities and mover ordering before the first pass.
///
/// With `reject_unordered` unset an unordered list is sorted and
/// deduplicated in place and a warning is returned. Out-of-range indices
/// are always fatal, as is a moving particle outside the rank's
/// `local_cells` cells.
pub fn validate_inputs(
    particles: &ParticleStore,
    movers: &mut MoverList,
    reject_unordered: bool,
    rank: usize,
    local_cells: usize,
) -> Result<Option<ExchangeWarning>, InputError> {
    if particles.len() > particles.capacity() {
        return Err(InputError::OverCapacity {
            what: "particles",
            len: particles.len(),
            capacity: particles.capacity(),
        });
    }
    if movers.len() > movers.capacity() {
        return Err(InputError::OverCapacity {
            what: "movers",
            len: movers.len(),
            capacity: movers.capacity(),
        });
    }
    let warning = match movers.check_order(particles.len()) {
        Ok(()) => None,
        Err(InputError::UnorderedMovers { .. }) if !reject_unordered => {
            let removed = movers.normalize_order();
            movers.check_order(particles.len())?;
            Some(ExchangeWarning::UnorderedMovers { rank, removed })
        }
        Err(e) => return Err(e),
    };
    for mover in movers.as_slice() {
        let Some(particle) = particles.get(mover.index as usize) else {
            continue;
        };
        if particle.cell as usize >= local_cells {
            return Err(InputError::ParticleCellOutOfRange {
                index: mover.index,
                cell: particle.cell,
                cells: local_cells,
            });
        }
    }
    Ok(warning)
}

/// Remove the particle at `index`, backfilling with the last live one.
///
/// Returns `None` if `index` is not live.
pub fn remove(particles: &mut ParticleStore, index: usize) -> Option<Particle> {
    if index >= particles.len() {
        return None;
    }
    Some(particles.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rankhop_core::Mover;

    fn store(n: usize) -> ParticleStore {
        let particles = (0..n)
            .map(|i| Particle {
                weight: i as f32,
                ..Default::default()
            })
            .collect();
        ParticleStore::from_particles(particles, n + 4)
    }

    fn movers(indices: &[u32]) -> MoverList {
        MoverList::from_movers(indices.iter().map(|&i| Mover::new(i, [0.0; 3])).collect(), 16)
    }

    #[test]
    fn ordered_movers_pass() {
        let ps = store(5);
        let mut ms = movers(&[0, 2, 4]);
        assert_eq!(validate_inputs(&ps, &mut ms, true, 0, 8), Ok(None));
    }

    #[test]
    fn unordered_movers_rejected_by_default() {
        let ps = store(5);
        let mut ms = movers(&[3, 1]);
        match validate_inputs(&ps, &mut ms, true, 0, 8) {
            Err(InputError::UnorderedMovers {
                position: 1,
                previous: 3,
                index: 1,
            }) => {}
            other => panic!("expected UnorderedMovers, got {other:?}"),
        }
    }

    #[test]
    fn unordered_movers_repaired_when_allowed() {
        let ps = store(5);
        let mut ms = movers(&[3, 1, 3]);
        let w = validate_inputs(&ps, &mut ms, false, 2, 8).unwrap();
        assert_eq!(
            w,
            Some(ExchangeWarning::UnorderedMovers {
                rank: 2,
                removed: 1
            })
        );
        let idx: Vec<u32> = ms.as_slice().iter().map(|m| m.index).collect();
        assert_eq!(idx, vec![1, 3]);
    }

    #[test]
    fn out_of_range_is_always_fatal() {
        let ps = store(2);
        let mut ms = movers(&[5, 0]);
        assert!(matches!(
            validate_inputs(&ps, &mut ms, false, 0, 8),
            Err(InputError::MoverIndexOutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn over_capacity_store_is_fatal() {
        let ps = ParticleStore::from_particles(vec![Particle::default(); 3], 2);
        let mut ms = movers(&[]);
        assert!(matches!(
            validate_inputs(&ps, &mut ms, true, 0, 8),
            Err(InputError::OverCapacity {
                what: "particles",
                ..
            })
        ));
    }

    #[test]
    fn moving_particle_outside_local_cells_is_fatal() {
        let particles = vec![
            Particle::default(),
            Particle {
                cell: 8,
                ..Default::default()
            },
        ];
        let ps = ParticleStore::from_particles(particles, 4);
        let mut ms = movers(&[0, 1]);
        assert_eq!(
            validate_inputs(&ps, &mut ms, true, 0, 8),
            Err(InputError::ParticleCellOutOfRange {
                index: 1,
                cell: 8,
                cells: 8,
            })
        );
        let mut resting = movers(&[0]);
        assert_eq!(validate_inputs(&ps, &mut resting, true, 0, 8), Ok(None));
    }

    #[test]
    fn remove_backfills_from_the_end() {
        let mut ps = store(4);
        assert_eq!(remove(&mut ps, 1).map(|p| p.weight), Some(1.0));
        let w: Vec<f32> = ps.iter().map(|p| p.weight).collect();
        assert_eq!(w, vec![0.0, 3.0, 2.0]);
        assert!(remove(&mut ps, 3).is_none());
    }

    proptest! {
        #[test]
        fn reverse_order_removal_takes_exactly_the_movers(
            n in 1usize..64,
            picks in prop::collection::btree_set(0usize..64, 0..32),
        ) {
            let mut ps = store(n);
            let chosen: Vec<usize> = picks.into_iter().filter(|&i| i < n).collect();
            let mut removed = Vec::new();
            for &i in chosen.iter().rev() {
                removed.push(remove(&mut ps, i).unwrap().weight as usize);
            }
            removed.sort_unstable();
            prop_assert_eq!(&removed, &chosen);
            prop_assert_eq!(ps.len(), n - chosen.len());
            let mut survivors: Vec<usize> = ps.iter().map(|p| p.weight as usize).collect();
            survivors.sort_unstable();
            let expected: Vec<usize> = (0..n).filter(|i| !chosen.contains(i)).collect();
            prop_assert_eq!(survivors, expected);
        }
    }
}
