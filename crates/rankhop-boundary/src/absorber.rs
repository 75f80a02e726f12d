//! Absorbing wall that tallies what it absorbs.

use crate::context::HandlerContext;
use crate::handler::{BoundaryHandler, Incident};
use rankhop_core::InjectorRecord;

/// Destroys incident particles, adding their weight to one accumulator
/// component of the cell they were in.
///
/// With `slot: None` it is a plain absorber. If the accumulator has no
/// such cell or component the tally is skipped.
#[derive(Clone, Debug, Default)]
pub struct Absorber {
    slot: Option<usize>,
}

impl Absorber {
    /// Absorber that records nothing.
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Absorber that adds absorbed weight into accumulator component `slot`.
    pub fn tallying(slot: usize) -> Self {
        Self { slot: Some(slot) }
    }
}

impl BoundaryHandler for Absorber {
    fn name(&self) -> &str {
        "absorber"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, incident: &Incident) -> Option<InjectorRecord> {
        if let Some(slot) = self.slot {
            let cell = incident.particle.cell as usize;
            if let Some(v) = ctx
                .accumulators()
                .cell_mut(cell)
                .and_then(|c| c.get_mut(slot))
            {
                *v += incident.particle.weight;
            }
        }
        None
    }
}
