//! Materializing injector records in the local particle store.

use crate::walk::{Completion, MoverCompletion};
use rankhop_core::{InjectorRecord, Mover, MoverList, ParticleStore};
use rankhop_grid::GridTopology;

/// Why a record was not injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectError {
    /// The particle store or the mover list is at capacity.
    NoRoom,
    /// The record targets a cell this rank does not own.
    InvalidCell {
        /// The offending cell.
        cell: i32,
    },
}

/// Appends records to the store, re-enqueueing unfinished movers.
pub struct Injector<'a> {
    particles: &'a mut ParticleStore,
    movers: &'a mut MoverList,
    grid: &'a GridTopology,
    completion: &'a dyn MoverCompletion,
}

impl<'a> Injector<'a> {
    /// Injector over one rank's store and mover list.
    pub fn new(
        particles: &'a mut ParticleStore,
        movers: &'a mut MoverList,
        grid: &'a GridTopology,
        completion: &'a dyn MoverCompletion,
    ) -> Self {
        Self {
            particles,
            movers,
            grid,
            completion,
        }
    }

    /// `true` if another record could be injected.
    pub fn has_room(&self) -> bool {
        !self.particles.is_full() && !self.movers.is_full()
    }

    /// Live particles.
    pub fn np(&self) -> usize {
        self.particles.len()
    }

    /// Particle capacity.
    pub fn max_np(&self) -> usize {
        self.particles.capacity()
    }

    /// Movers currently queued.
    pub fn nm(&self) -> usize {
        self.movers.len()
    }

    /// Mover capacity.
    pub fn max_nm(&self) -> usize {
        self.movers.capacity()
    }

    /// Materialize `record` at index `np()`.
    ///
    /// Room for both a particle and a mover is required even when the
    /// record has no residual displacement. On error nothing changes.
    pub fn inject(&mut self, record: &InjectorRecord) -> Result<(), InjectError> {
        if !self.has_room() {
            return Err(InjectError::NoRoom);
        }
        let mut particle = record
            .to_particle()
            .filter(|p| (p.cell as usize) < self.grid.local_cell_count())
            .ok_or(InjectError::InvalidCell { cell: record.cell })?;
        let index = self.particles.len() as u32;
        let mut mover = Mover::new(index, record.disp);
        let keep = record.has_residual()
            && matches!(
                self.completion.complete(&mut particle, &mut mover, self.grid),
                Completion::AtBoundary(_)
            );
        self.particles
            .push(particle)
            .map_err(|_| InjectError::NoRoom)?;
        if keep {
            // Room was checked above.
            let _ = self.movers.push(mover);
        }
        Ok(())
    }
}
