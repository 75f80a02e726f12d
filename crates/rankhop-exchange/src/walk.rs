//! Finishing the sub-step of a freshly injected particle.
//!
//! A record that arrives with residual displacement has not completed
//! its move. The injector hands it to a [`MoverCompletion`], which
//! moves it through local cells until the displacement is spent or it
//! stops on a face that needs boundary resolution.

use rankhop_core::{Axis, Face, Mover, Particle};
use rankhop_grid::{GridTopology, NeighborCode};

/// Outcome of completing a mover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Displacement fully applied; the mover can be discarded.
    Finished,
    /// Stopped on `face` with displacement left; keep the mover.
    AtBoundary(Face),
}

/// Applies residual displacement to an injected particle.
///
/// Implementations update `particle` and `mover.disp` in place. Current
/// deposition and other physics belong to the caller's integrator.
pub trait MoverCompletion: Send {
    /// Move `particle` along `mover.disp`.
    fn complete(&self, particle: &mut Particle, mover: &mut Mover, grid: &GridTopology) -> Completion;
}

/// Straight-line walk through local cells.
///
/// Offsets span `[-1, 1]` per cell, so crossing a cell on one axis takes
/// a displacement of 2. The walk stops on any face whose neighbor is not
/// a cell of this rank, leaving the particle exactly on the face.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellWalk;

/// Hard ceiling on face crossings in one completion.
const MAX_CROSSINGS: usize = 1 << 16;

impl MoverCompletion for CellWalk {
    fn complete(&self, particle: &mut Particle, mover: &mut Mover, grid: &GridTopology) -> Completion {
        // Each crossing after the first on an axis spends a displacement
        // of 2, and up to three crossings per corner spend nothing.
        let budget = crossing_budget(&mover.disp);
        let mut crossings = 0;
        loop {
            if !mover.disp.iter().all(|d| d.is_finite()) {
                mover.disp = [0.0; 3];
                return Completion::Finished;
            }
            if !mover.has_residual() {
                return Completion::Finished;
            }

            // Fraction of the remaining displacement until each face is hit.
            let mut hit: Option<(f32, Face)> = None;
            for axis in Axis::ALL {
                let a = axis.index();
                let d = mover.disp[a];
                if d == 0.0 {
                    continue;
                }
                let face = Face::from_axis(axis, d > 0.0);
                let t = (face.sign() - particle.offset[a]) / d;
                if hit.is_none_or(|(best, _)| t < best) {
                    hit = Some((t, face));
                }
            }
            let Some((t, face)) = hit.filter(|&(t, _)| t < 1.0) else {
                for a in 0..3 {
                    particle.offset[a] += mover.disp[a];
                }
                mover.disp = [0.0; 3];
                return Completion::Finished;
            };

            let t = t.max(0.0);
            let before = mover.disp;
            for a in 0..3 {
                particle.offset[a] += t * mover.disp[a];
                mover.disp[a] *= 1.0 - t;
            }
            let a = face.axis().index();
            particle.offset[a] = face.sign();
            crossings += 1;
            if (t > 0.0 && mover.disp == before) || crossings > budget {
                tracing::warn!(
                    cell = particle.cell,
                    crossings,
                    residual = ?mover.disp,
                    "residual walk stalled, discarding the rest of the move"
                );
                mover.disp = [0.0; 3];
                return Completion::Finished;
            }

            let next = grid
                .neighbor(particle.cell, face)
                .map(NeighborCode::decode)
                .and_then(|code| match code {
                    NeighborCode::Cell(global) => grid.local_index(global),
                    _ => None,
                });
            match next {
                Some(cell) => {
                    particle.cell = cell;
                    particle.offset[a] = -face.sign();
                }
                None => return Completion::AtBoundary(face),
            }
        }
    }
}

/// Crossings a residual of `disp` can legitimately need.
fn crossing_budget(disp: &[f32; 3]) -> usize {
    let span: f32 = disp.iter().map(|d| d.abs()).sum();
    let needed = (span / 2.0).ceil();
    if needed >= MAX_CROSSINGS as f32 {
        MAX_CROSSINGS
    } else {
        needed as usize + 3
    }
}
