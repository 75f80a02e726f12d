//! Reusable boundary handler fixtures.
//!
//! - [`CountingHandler`]: absorbs and counts calls.
//! - [`FixedEmitter`]: re-emits a fixed record into the incident cell.
//! - [`StrayEmitter`]: emits into a cell no rank owns.

use rankhop_boundary::{BoundaryHandler, HandlerContext, Incident};
use rankhop_core::InjectorRecord;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared call counter, readable after the handler moved into a table.
#[derive(Clone, Debug, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Absorbs every incident and counts how often it was called.
pub struct CountingHandler {
    name: String,
    calls: CallCounter,
}

impl CountingHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: CallCounter::default(),
        }
    }

    /// Handle to the call count.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl BoundaryHandler for CountingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, _ctx: &mut HandlerContext<'_>, _incident: &Incident) -> Option<InjectorRecord> {
        self.calls.bump();
        None
    }
}

/// Replaces each incident with `template`, placed in the incident's cell.
///
/// Offset and momentum come from the template, so a template moving
/// inward produces a particle that stays put, and one with residual
/// displacement exercises the walk after injection.
pub struct FixedEmitter {
    template: InjectorRecord,
    calls: CallCounter,
}

impl FixedEmitter {
    pub fn new(template: InjectorRecord) -> Self {
        Self {
            template,
            calls: CallCounter::default(),
        }
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl BoundaryHandler for FixedEmitter {
    fn name(&self) -> &str {
        "fixed_emitter"
    }

    fn handle(&self, _ctx: &mut HandlerContext<'_>, incident: &Incident) -> Option<InjectorRecord> {
        self.calls.bump();
        Some(InjectorRecord {
            cell: i32::try_from(incident.particle.cell).ok()?,
            ..self.template
        })
    }
}

/// Emits into a cell outside the local grid.
pub struct StrayEmitter;

impl BoundaryHandler for StrayEmitter {
    fn name(&self) -> &str {
        "stray_emitter"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, incident: &Incident) -> Option<InjectorRecord> {
        Some(InjectorRecord {
            cell: ctx.grid().local_cell_count() as i32 + 7,
            weight: incident.particle.weight,
            ..Default::default()
        })
    }
}
