//! The multi-pass boundary exchange.

use crate::classify::{classify, Route};
use crate::compact::{remove, validate_inputs};
use crate::config::{ConfigError, ExchangeConfig};
use crate::dispatch::dispatch;
use crate::error::ExchangeError;
use crate::inject::{InjectError, Injector};
use crate::protocol::{exchange_counts, exchange_payloads, size_send_buffers, RemoteFaces};
use crate::report::ExchangeReport;
use crate::scratch::InjectorScratch;
use crate::walk::{CellWalk, MoverCompletion};
use crate::warning::ExchangeWarning;
use rand_chacha::ChaCha8Rng;
use rankhop_boundary::{HandlerContext, HandlerTable, Incident};
use rankhop_comm::{Transport, TransportError};
use rankhop_core::{CellBuffer, InjectorRecord, InputError, MoverList, ParticleStore, Species};
use rankhop_grid::GridTopology;

/// Everything one exchange call reads or updates.
///
/// `particles` and `movers` are updated in place: on return the store
/// holds the surviving and newly arrived particles, and the mover list
/// holds whatever is left for the caller.
pub struct ExchangeContext<'a> {
    /// Dense local particle array.
    pub particles: &'a mut ParticleStore,
    /// Movers from the advance step, strictly increasing by index.
    pub movers: &'a mut MoverList,
    /// Field buffer, opaque to the exchange.
    pub fields: &'a mut CellBuffer,
    /// Accumulator buffer, opaque to the exchange.
    pub accumulators: &'a mut CellBuffer,
    /// This rank's topology.
    pub grid: &'a GridTopology,
    /// Species of every particle in `particles`.
    pub species: &'a Species,
    /// Custom boundary handlers.
    pub handlers: &'a HandlerTable,
    /// Connection to the other ranks.
    pub transport: &'a mut dyn Transport,
    /// Random stream for stochastic handlers.
    pub rng: &'a mut ChaCha8Rng,
}

/// Long-lived exchange state for one rank and species stream.
///
/// Owns the local injection scratch and the per-face outbound staging,
/// both reused across calls. `run` takes `&mut self`, so one exchange
/// object serves one call at a time.
///
/// # Termination
///
/// A call runs up to `max_passes` passes. A rank with no faces shared
/// with other ranks stops as soon as a pass begins with no movers. A rank
/// with remote faces always runs all `max_passes`, because its
/// neighbors expect a count message every pass.
pub struct BoundaryExchange {
    config: ExchangeConfig,
    scratch: InjectorScratch,
    outbound: [Vec<InjectorRecord>; 6],
    completion: Box<dyn MoverCompletion>,
}

impl BoundaryExchange {
    /// Exchange with a validated configuration and [`CellWalk`] completion.
    pub fn new(config: ExchangeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scratch: InjectorScratch::new(
                config.scratch_min_injectors,
                config.scratch_growth_factor,
            ),
            outbound: Default::default(),
            completion: Box::new(CellWalk),
            config,
        })
    }

    /// Replace how injected particles finish their residual move.
    pub fn with_completion(mut self, completion: impl MoverCompletion + 'static) -> Self {
        self.completion = Box::new(completion);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Current capacity of the local injection scratch, in records.
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Free the scratch and staging allocations.
    ///
    /// The next call reallocates them.
    pub fn release(&mut self) {
        self.scratch.release();
        self.outbound = Default::default();
    }

    /// Run one exchange.
    ///
    /// Every rank of a run must call this once per timestep with the
    /// same configuration, whether or not it has movers.
    pub fn run(&mut self, ctx: ExchangeContext<'_>) -> Result<ExchangeReport, ExchangeError> {
        let ExchangeContext {
            particles,
            movers,
            fields,
            accumulators,
            grid,
            species,
            handlers,
            transport,
            rng,
        } = ctx;

        let rank = grid.rank();
        if transport.rank() != rank {
            return Err(InputError::RankMismatch {
                grid: rank,
                transport: transport.rank(),
            }
            .into());
        }
        if transport.nproc() != grid.nproc() {
            return Err(InputError::ProcessCountMismatch {
                grid: grid.nproc(),
                transport: transport.nproc(),
            }
            .into());
        }

        let mut report = ExchangeReport::default();
        if let Some(w) = validate_inputs(
            particles,
            movers,
            self.config.reject_unordered_movers,
            rank,
            grid.local_cell_count(),
        )? {
            report.warn(w);
        }

        let initial = particles.len();
        let faces: RemoteFaces = grid.remote_faces();

        for pass in 0..self.config.max_passes {
            if movers.is_empty() && faces.is_empty() {
                break;
            }
            let nm = movers.len();
            self.scratch.ensure(nm)?;
            for staged in &mut self.outbound {
                staged.clear();
            }
            size_send_buffers(transport, &faces, nm, pass)?;

            // Classify and compact, last mover first.
            while let Some(mover) = movers.pop() {
                let index = mover.index as usize;
                let Some(&particle) = particles.get(index) else {
                    return Err(InputError::MoverIndexOutOfRange {
                        position: movers.len(),
                        index: mover.index,
                        live: particles.len(),
                    }
                    .into());
                };
                match classify(&particle, &mover, grid, handlers.len()) {
                    Route::Absorb => report.absorbed += 1,
                    Route::Send { face, record, .. } => {
                        self.outbound[face.index()].push(record);
                        report.sent += 1;
                    }
                    Route::Wrap { record } => {
                        stage(&mut self.scratch, record, rank, &mut report);
                        report.wrapped += 1;
                    }
                    Route::Custom { face, handler } => {
                        let mut hctx =
                            HandlerContext::new(fields, accumulators, grid, species, rng, pass);
                        let incident = Incident {
                            particle,
                            mover,
                            face,
                        };
                        report.custom_handled += 1;
                        if let Some(record) = dispatch(handlers, handler, &mut hctx, &incident) {
                            report.custom_emitted += 1;
                            let owned = usize::try_from(record.cell)
                                .is_ok_and(|c| c < grid.local_cell_count());
                            if owned {
                                stage(&mut self.scratch, record, rank, &mut report);
                            } else {
                                report.dropped += 1;
                                report.warn(ExchangeWarning::InvalidEmission {
                                    rank,
                                    handler,
                                    cell: record.cell,
                                });
                            }
                        }
                    }
                    Route::UnknownCode { face, code } => {
                        report.absorbed += 1;
                        report.warn(ExchangeWarning::UnknownBoundaryCode {
                            pass,
                            rank,
                            face,
                            code,
                        });
                    }
                    Route::PeerMismatch { face, cell, owner } => {
                        report.absorbed += 1;
                        report.warn(ExchangeWarning::PeerMismatch {
                            pass,
                            rank,
                            face,
                            cell,
                            owner,
                        });
                    }
                    Route::Unresolved => {
                        report.absorbed += 1;
                        report.warn(ExchangeWarning::UnresolvedMover {
                            pass,
                            species: species.id,
                            rank,
                            index: mover.index,
                        });
                    }
                }
                remove(particles, index);
            }

            // Remote exchange.
            if !faces.is_empty() {
                exchange_counts(transport, &faces, &self.outbound, pass)?;
                let mut injector = Injector::new(particles, movers, grid, self.completion.as_ref());
                exchange_payloads(transport, &faces, &self.outbound, pass, |port, reader| {
                    let arrived = reader.len();
                    report.received += arrived;
                    for (k, record) in reader.enumerate() {
                        match injector.inject(&record) {
                            Ok(()) => report.injected += 1,
                            Err(InjectError::NoRoom) => {
                                let left = arrived - k;
                                report.dropped += left;
                                report.warn(ExchangeWarning::RemoteInjectionOverflow {
                                    rank,
                                    face: port,
                                    left,
                                    np: injector.np(),
                                    max_np: injector.max_np(),
                                    nm: injector.nm(),
                                    max_nm: injector.max_nm(),
                                });
                                break;
                            }
                            Err(InjectError::InvalidCell { cell }) => {
                                return Err(ExchangeError::Transport {
                                    pass,
                                    face: port,
                                    source: TransportError::MalformedEnvelope {
                                        detail: format!(
                                            "record targets cell {cell} outside rank {rank}"
                                        ),
                                    },
                                });
                            }
                        }
                    }
                    Ok(())
                })?;
            }

            // Local injections, most recent first.
            let mut injector = Injector::new(particles, movers, grid, self.completion.as_ref());
            while let Some(record) = self.scratch.pop() {
                match injector.inject(&record) {
                    Ok(()) => report.injected += 1,
                    Err(InjectError::NoRoom) => {
                        let left = self.scratch.len() + 1;
                        report.dropped += left;
                        report.warn(ExchangeWarning::CustomInjectionOverflow { rank, left });
                        self.scratch.clear();
                        break;
                    }
                    Err(InjectError::InvalidCell { .. }) => report.dropped += 1,
                }
            }

            report.passes += 1;
            tracing::debug!(
                rank,
                pass,
                species = species.id,
                live = particles.len(),
                movers = movers.len(),
                "exchange pass complete"
            );
        }

        if !movers.is_empty() {
            report.warn(ExchangeWarning::UnprocessedMovers {
                rank,
                count: movers.len(),
            });
        }
        report.live_particles = particles.len();
        report.remaining_movers = movers.len();
        debug_assert_eq!(
            report.live_particles
                + report.absorbed
                + report.sent
                + report.wrapped
                + report.custom_handled,
            initial + report.injected
        );
        Ok(report)
    }
}

/// Queue a locally produced record for injection at the end of the pass.
///
/// The scratch holds one record per mover, so a full scratch means that
/// bound was broken; the record is dropped with a warning.
fn stage(
    scratch: &mut InjectorScratch,
    record: InjectorRecord,
    rank: usize,
    report: &mut ExchangeReport,
) {
    if scratch.push(record).is_err() {
        report.dropped += 1;
        report.warn(ExchangeWarning::CustomInjectionOverflow { rank, left: 1 });
    }
}

impl Default for BoundaryExchange {
    fn default() -> Self {
        let config = ExchangeConfig::default();
        Self {
            scratch: InjectorScratch::new(
                config.scratch_min_injectors,
                config.scratch_growth_factor,
            ),
            outbound: Default::default(),
            completion: Box::new(CellWalk),
            config,
        }
    }
}

impl std::fmt::Debug for BoundaryExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryExchange")
            .field("config", &self.config)
            .field("scratch", &self.scratch)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cell: i32) -> InjectorRecord {
        InjectorRecord {
            offset: [0.0; 3],
            momentum: [0.0; 3],
            weight: 1.0,
            cell,
            disp: [0.0; 3],
        }
    }

    #[test]
    fn staging_into_full_scratch_is_counted_as_dropped() {
        let mut scratch = InjectorScratch::new(1, 1.3125);
        scratch.ensure(1).unwrap();
        let mut report = ExchangeReport::default();

        stage(&mut scratch, record(0), 3, &mut report);
        assert_eq!(report.dropped, 0);
        assert!(report.is_clean());

        stage(&mut scratch, record(1), 3, &mut report);
        assert_eq!(report.dropped, 1);
        assert_eq!(scratch.len(), 1);
        match report.warnings_of("custom_injection_overflow").next() {
            Some(ExchangeWarning::CustomInjectionOverflow { rank: 3, left: 1 }) => {}
            other => panic!("expected CustomInjectionOverflow, got {other:?}"),
        };
    }
}
