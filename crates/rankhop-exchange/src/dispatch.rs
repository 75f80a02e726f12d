//! Custom boundary dispatch.

use rankhop_boundary::{HandlerContext, HandlerTable, Incident};
use rankhop_core::InjectorRecord;

/// Run handler `index` on `incident`.
///
/// Returns the replacement record, if any. An index with no handler
/// emits nothing; the classifier never routes to one.
pub fn dispatch(
    handlers: &HandlerTable,
    index: usize,
    ctx: &mut HandlerContext<'_>,
    incident: &Incident,
) -> Option<InjectorRecord> {
    let handler = handlers.get(index)?;
    let emitted = handler.handle(ctx, incident);
    tracing::trace!(
        handler = handler.name(),
        face = %incident.face,
        cell = incident.particle.cell,
        emitted = emitted.is_some(),
        "custom boundary"
    );
    emitted
}
