//! Particle injector records.
//!
//! An injector describes a particle to be (re)created, either on another
//! rank after a network hop or locally after a wraparound or a custom
//! boundary handler. Records live for at most one exchange pass.

use crate::mover::Mover;
use crate::particle::Particle;

/// A particle waiting to be materialized in a particle store.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct InjectorRecord {
    /// Normalized position within the target cell.
    pub offset: [f32; 3],
    /// Normalized momentum.
    pub momentum: [f32; 3],
    /// Charge weight.
    pub weight: f32,
    /// Target cell, already local to the receiving rank.
    pub cell: i32,
    /// Residual displacement still to be applied after injection.
    pub disp: [f32; 3],
}

impl InjectorRecord {
    /// Record that recreates `particle` unchanged, carrying `mover`'s residual.
    ///
    /// A cell index past `i32::MAX` becomes `-1`, which no rank owns.
    pub fn from_particle(particle: &Particle, mover: &Mover) -> Self {
        Self {
            offset: particle.offset,
            momentum: particle.momentum,
            weight: particle.weight,
            cell: i32::try_from(particle.cell).unwrap_or(-1),
            disp: mover.disp,
        }
    }

    /// `true` if the record still has displacement to apply.
    pub fn has_residual(&self) -> bool {
        self.disp.iter().any(|&d| d != 0.0)
    }

    /// The particle this record describes, or `None` for a negative cell.
    pub fn to_particle(&self) -> Option<Particle> {
        let cell = u32::try_from(self.cell).ok()?;
        Some(Particle {
            offset: self.offset,
            cell,
            momentum: self.momentum,
            weight: self.weight,
        })
    }
}
