//! Per-call exchange statistics.

use crate::warning::ExchangeWarning;

/// What one [`BoundaryExchange::run`](crate::BoundaryExchange::run) did.
///
/// Counts are totals over all passes. For any call,
/// `live_particles == initial - absorbed - sent - wrapped - custom_handled + injected`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExchangeReport {
    /// Passes executed.
    pub passes: usize,
    /// Particles destroyed: absorbing faces plus every warned anomaly.
    pub absorbed: usize,
    /// Particles shipped to other ranks.
    pub sent: usize,
    /// Records that arrived from other ranks.
    pub received: usize,
    /// Particles that wrapped onto a cell of this rank.
    pub wrapped: usize,
    /// Particles handed to custom boundary handlers.
    pub custom_handled: usize,
    /// Replacement records returned by custom boundary handlers.
    pub custom_emitted: usize,
    /// Particles materialized in the store from any source.
    pub injected: usize,
    /// Records discarded for lack of room or an invalid target cell.
    pub dropped: usize,
    /// Live particle count after the call.
    pub live_particles: usize,
    /// Movers left for the caller after the call.
    pub remaining_movers: usize,
    /// Anomalies raised, in order.
    pub warnings: Vec<ExchangeWarning>,
}

impl ExchangeReport {
    pub(crate) fn warn(&mut self, warning: ExchangeWarning) {
        self.warnings.push(warning.emit());
    }

    /// `true` if no warning was raised.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings of one [`kind`](ExchangeWarning::kind).
    pub fn warnings_of<'a>(
        &'a self,
        kind: &'a str,
    ) -> impl Iterator<Item = &'a ExchangeWarning> + 'a {
        self.warnings.iter().filter(move |w| w.kind() == kind)
    }
}
