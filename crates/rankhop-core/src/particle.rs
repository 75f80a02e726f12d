//! Particles and the dense per-rank particle array.

use crate::face::Face;

/// A simulation particle owned by exactly one rank.
///
/// Positions are stored as a normalized offset in `[-1, 1]` on each axis
/// relative to the owning cell, so a particle sitting exactly on a face
/// has `offset[axis] == face.sign()`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Particle {
    /// Normalized position within the cell, one component per axis.
    pub offset: [f32; 3],
    /// Local index of the owning cell.
    pub cell: u32,
    /// Normalized momentum.
    pub momentum: [f32; 3],
    /// Charge weight.
    pub weight: f32,
}

impl Particle {
    /// `true` if the particle sits on `face` and moves outward through it.
    pub fn is_leaving_through(&self, face: Face) -> bool {
        let a = face.axis().index();
        let outward = if face.is_negative() {
            self.momentum[a] < 0.0
        } else {
            self.momentum[a] > 0.0
        };
        self.offset[a] == face.sign() && outward
    }
}

/// Dense particle array with a fixed capacity.
///
/// Live particles occupy `0..len()` with no tombstones. Removal is by
/// swap-with-last, so the index of a particle is not stable across
/// removals.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticleStore {
    /// Create an empty store that will never hold more than `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a store from existing particles.
    ///
    /// `capacity` may be smaller than `particles.len()`; the exchange
    /// rejects such a store as malformed input rather than truncating it.
    pub fn from_particles(particles: Vec<Particle>, capacity: usize) -> Self {
        Self {
            particles,
            capacity,
        }
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` if no particles are live.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Maximum number of live particles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` if no further particle can be appended.
    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    /// Append a particle. Returns it back if the store is full.
    pub fn push(&mut self, particle: Particle) -> Result<(), Particle> {
        if self.is_full() {
            return Err(particle);
        }
        self.particles.push(particle);
        Ok(())
    }

    /// Remove the particle at `index` by overwriting it with the last live one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn swap_remove(&mut self, index: usize) -> Particle {
        self.particles.swap_remove(index)
    }

    /// Particle at `index`, if live.
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Mutable particle at `index`, if live.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    /// Live particles as a slice.
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterate over live particles.
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Sum of the weights of all live particles.
    pub fn total_weight(&self) -> f64 {
        self.particles.iter().map(|p| p.weight as f64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, ux: f32) -> Particle {
        Particle {
            offset: [x, 0.0, 0.0],
            momentum: [ux, 0.0, 0.0],
            weight: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn leaving_requires_face_and_outward_momentum() {
        assert!(at(-1.0, -0.5).is_leaving_through(Face::NegX));
        assert!(!at(-1.0, 0.5).is_leaving_through(Face::NegX));
        assert!(!at(-0.99, -0.5).is_leaving_through(Face::NegX));
        assert!(at(1.0, 0.5).is_leaving_through(Face::PosX));
        assert!(!at(1.0, 0.0).is_leaving_through(Face::PosX));
    }

    #[test]
    fn push_respects_capacity() {
        let mut store = ParticleStore::with_capacity(1);
        assert!(store.push(at(0.0, 0.0)).is_ok());
        assert!(store.is_full());
        assert!(store.push(at(0.5, 0.0)).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn swap_remove_backfills_with_last() {
        let mut store = ParticleStore::with_capacity(4);
        for x in [0.1, 0.2, 0.3] {
            store.push(at(x, 0.0)).unwrap();
        }
        let removed = store.swap_remove(0);
        assert_eq!(removed.offset[0], 0.1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().offset[0], 0.3);
        assert_eq!(store.get(1).unwrap().offset[0], 0.2);
    }

    #[test]
    fn total_weight_sums_live_particles() {
        let mut store = ParticleStore::with_capacity(4);
        store.push(at(0.0, 0.0)).unwrap();
        store.push(at(0.0, 0.0)).unwrap();
        assert_eq!(store.total_weight(), 2.0);
    }
}
