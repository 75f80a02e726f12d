//! Movers: pending boundary crossings produced by the advance step.

use crate::error::InputError;

/// A particle that stopped on a cell face with displacement left over.
///
/// `index` refers to a live slot in the [`ParticleStore`](crate::ParticleStore).
/// `disp` is the residual sub-step displacement in normalized cell units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Mover {
    /// Residual displacement still to be applied.
    pub disp: [f32; 3],
    /// Index of the particle in the local particle array.
    pub index: u32,
}

impl Mover {
    /// Mover for particle `index` with residual displacement `disp`.
    pub fn new(index: u32, disp: [f32; 3]) -> Self {
        Self { disp, index }
    }

    /// `true` if any displacement component is nonzero.
    pub fn has_residual(&self) -> bool {
        self.disp.iter().any(|&d| d != 0.0)
    }
}

/// Bounded list of movers.
///
/// The exchange consumes movers from the back, which together with
/// strictly increasing indices makes swap-with-last compaction safe: the
/// particle that backfills a removed slot never belongs to a mover that
/// is still pending.
#[derive(Clone, Debug)]
pub struct MoverList {
    movers: Vec<Mover>,
    capacity: usize,
}

impl MoverList {
    /// Create an empty list that will never hold more than `capacity` movers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            movers: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a list from existing movers.
    pub fn from_movers(movers: Vec<Mover>, capacity: usize) -> Self {
        Self { movers, capacity }
    }

    /// Number of pending movers.
    pub fn len(&self) -> usize {
        self.movers.len()
    }

    /// `true` if no movers are pending.
    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }

    /// Maximum number of pending movers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` if no further mover can be appended.
    pub fn is_full(&self) -> bool {
        self.movers.len() >= self.capacity
    }

    /// Append a mover. Returns it back if the list is full.
    pub fn push(&mut self, mover: Mover) -> Result<(), Mover> {
        if self.is_full() {
            return Err(mover);
        }
        self.movers.push(mover);
        Ok(())
    }

    /// Remove and return the last mover.
    pub fn pop(&mut self) -> Option<Mover> {
        self.movers.pop()
    }

    /// Mutable access to the last mover.
    pub fn last_mut(&mut self) -> Option<&mut Mover> {
        self.movers.last_mut()
    }

    /// Pending movers as a slice.
    pub fn as_slice(&self) -> &[Mover] {
        &self.movers
    }

    /// Drop every pending mover.
    pub fn clear(&mut self) {
        self.movers.clear();
    }

    /// Check that indices are strictly increasing and all below `live`.
    pub fn check_order(&self, live: usize) -> Result<(), InputError> {
        let mut previous: Option<u32> = None;
        for (position, mover) in self.movers.iter().enumerate() {
            if mover.index as usize >= live {
                return Err(InputError::MoverIndexOutOfRange {
                    position,
                    index: mover.index,
                    live,
                });
            }
            if let Some(prev) = previous {
                if mover.index <= prev {
                    return Err(InputError::UnorderedMovers {
                        position,
                        previous: prev,
                        index: mover.index,
                    });
                }
            }
            previous = Some(mover.index);
        }
        Ok(())
    }

    /// Sort by particle index and drop duplicate entries, keeping the first.
    ///
    /// Returns the number of duplicates removed.
    pub fn normalize_order(&mut self) -> usize {
        let before = self.movers.len();
        self.movers.sort_by_key(|m| m.index);
        self.movers.dedup_by_key(|m| m.index);
        before - self.movers.len()
    }
}
