//! The [`BoundaryHandler`] trait and the [`Incident`] it resolves.

use crate::context::HandlerContext;
use rankhop_core::{Face, InjectorRecord, Mover, Particle};

/// A particle that reached a custom boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Incident {
    /// The particle as it sits on the face, before removal.
    pub particle: Particle,
    /// Its mover, carrying the residual displacement.
    pub mover: Mover,
    /// The face it is leaving through.
    pub face: Face,
}

/// User-pluggable boundary physics for one custom neighbor code.
///
/// # Contract
///
/// - The incident particle is destroyed whatever the handler returns.
/// - Returning `Some(record)` emits exactly one replacement particle,
///   injected into this rank's particle store. `record.cell` must be a
///   local cell index. A record with residual displacement is walked
///   further by the exchange.
/// - Emitting more than one particle per incident is not supported.
/// - `&self`: handlers are stateless; mutable state goes through the
///   buffers in [`HandlerContext`].
///
/// # Object safety
///
/// This trait is object-safe; [`HandlerTable`](crate::HandlerTable)
/// stores handlers as `Box<dyn BoundaryHandler>`.
///
/// # Examples
///
/// A handler that re-emits the particle at the cell center, at rest:
///
/// ```
/// use rankhop_boundary::{BoundaryHandler, HandlerContext, Incident};
/// use rankhop_core::InjectorRecord;
///
/// struct Stop;
///
/// impl BoundaryHandler for Stop {
///     fn name(&self) -> &str { "stop" }
///
///     fn handle(&self, _ctx: &mut HandlerContext<'_>, incident: &Incident) -> Option<InjectorRecord> {
///         Some(InjectorRecord {
///             cell: i32::try_from(incident.particle.cell).ok()?,
///             weight: incident.particle.weight,
///             ..Default::default()
///         })
///     }
/// }
///
/// assert_eq!(Stop.name(), "stop");
/// ```
pub trait BoundaryHandler: Send + 'static {
    /// Human-readable name, unique within a table.
    fn name(&self) -> &str;

    /// Resolve one incident, optionally emitting a replacement.
    fn handle(&self, ctx: &mut HandlerContext<'_>, incident: &Incident) -> Option<InjectorRecord>;
}
