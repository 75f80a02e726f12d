//! Execution context passed to boundary handlers.

use rand_chacha::ChaCha8Rng;
use rankhop_core::{CellBuffer, Species};
use rankhop_grid::GridTopology;

/// What a [`BoundaryHandler`](crate::BoundaryHandler) may touch while
/// resolving one incident.
///
/// Field and accumulator buffers are opaque to the exchange; handlers
/// read and write them under their own layout conventions. The RNG is
/// the caller's seeded stream, so handler draws are reproducible for a
/// fixed seed and mover order.
pub struct HandlerContext<'a> {
    fields: &'a mut CellBuffer,
    accumulators: &'a mut CellBuffer,
    grid: &'a GridTopology,
    species: &'a Species,
    rng: &'a mut ChaCha8Rng,
    pass: usize,
}

impl<'a> HandlerContext<'a> {
    /// Construct a handler context.
    ///
    /// Typically called by the exchange, not by handlers directly.
    pub fn new(
        fields: &'a mut CellBuffer,
        accumulators: &'a mut CellBuffer,
        grid: &'a GridTopology,
        species: &'a Species,
        rng: &'a mut ChaCha8Rng,
        pass: usize,
    ) -> Self {
        Self {
            fields,
            accumulators,
            grid,
            species,
            rng,
            pass,
        }
    }

    /// Electromagnetic field buffer.
    pub fn fields(&mut self) -> &mut CellBuffer {
        self.fields
    }

    /// Current/charge accumulator buffer.
    pub fn accumulators(&mut self) -> &mut CellBuffer {
        self.accumulators
    }

    /// This rank's grid topology.
    pub fn grid(&self) -> &GridTopology {
        self.grid
    }

    /// Species of the incident particle.
    pub fn species(&self) -> &Species {
        self.species
    }

    /// Seeded random stream.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        self.rng
    }

    /// Zero-based exchange pass the incident occurred in.
    pub fn pass(&self) -> usize {
        self.pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rankhop_grid::{BoxDecomposition, GlobalBoundary};

    #[test]
    fn context_exposes_buffers_and_metadata() {
        let grid = BoxDecomposition::new([2, 1, 1], [1, 1, 1], [GlobalBoundary::Absorb; 6])
            .unwrap()
            .topology(0)
            .unwrap();
        let mut fields = CellBuffer::zeroed(2, 3);
        let mut acc = CellBuffer::zeroed(2, 4);
        let species = Species::new(7, "electron", -1.0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut ctx = HandlerContext::new(&mut fields, &mut acc, &grid, &species, &mut rng, 2);
        ctx.accumulators().cell_mut(1).unwrap()[0] = 5.0;
        ctx.fields().as_mut_slice()[0] = 1.5;
        let _: f64 = ctx.rng().random();
        assert_eq!(ctx.species().id, 7);
        assert_eq!(ctx.grid().local_cell_count(), 2);
        assert_eq!(ctx.pass(), 2);

        assert_eq!(acc.cell(1).unwrap()[0], 5.0);
        assert_eq!(fields.as_slice()[0], 1.5);
    }
}
