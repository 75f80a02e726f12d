//! Thermal reflux: diffuse re-emission from a wall at fixed temperature.
//!
//! The incident particle is replaced by one with the same position and
//! weight but a fresh momentum drawn from the flux-weighted Maxwellian
//! of a wall with thermal momentum `uth`:
//!
//! - tangential components: `uth * N(0,1)`
//! - normal component: `uth * sqrt(-2 ln U)` pointing back into the cell
//!
//! Gaussian draws use the Box-Muller transform on the caller's
//! `ChaCha8Rng`, so a fixed seed reproduces the same re-emission.

use crate::context::HandlerContext;
use crate::error::BoundaryError;
use crate::handler::{BoundaryHandler, Incident};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rankhop_core::{Axis, InjectorRecord};

/// A diffusely re-emitting wall.
///
/// Constructed via [`ThermalReflux::builder`].
#[derive(Clone, Debug)]
pub struct ThermalReflux {
    uth: f32,
}

/// Builder for [`ThermalReflux`].
pub struct ThermalRefluxBuilder {
    uth: Option<f32>,
}

impl ThermalReflux {
    /// Create a new builder.
    pub fn builder() -> ThermalRefluxBuilder {
        ThermalRefluxBuilder { uth: None }
    }

    /// Configured thermal momentum.
    pub fn thermal_momentum(&self) -> f32 {
        self.uth
    }

    fn box_muller(rng: &mut ChaCha8Rng) -> f64 {
        let u1: f64 = rng.random::<f64>().max(1e-300);
        let u2: f64 = rng.random();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    fn rayleigh(rng: &mut ChaCha8Rng) -> f64 {
        let u: f64 = rng.random::<f64>().max(1e-300);
        (-2.0 * u.ln()).sqrt()
    }
}

impl ThermalRefluxBuilder {
    /// Set the wall's thermal momentum (required, finite, >= 0).
    pub fn thermal_momentum(mut self, uth: f32) -> Self {
        self.uth = Some(uth);
        self
    }

    /// Build the handler, validating the configuration.
    pub fn build(self) -> Result<ThermalReflux, BoundaryError> {
        let uth = self.uth.ok_or_else(|| BoundaryError::InvalidParameter {
            handler: "thermal_reflux",
            reason: "thermal momentum is required".to_string(),
        })?;
        if !uth.is_finite() || uth < 0.0 {
            return Err(BoundaryError::InvalidParameter {
                handler: "thermal_reflux",
                reason: format!("thermal momentum must be finite and >= 0, got {uth}"),
            });
        }
        Ok(ThermalReflux { uth })
    }
}

impl BoundaryHandler for ThermalReflux {
    fn name(&self) -> &str {
        "thermal_reflux"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, incident: &Incident) -> Option<InjectorRecord> {
        let p = &incident.particle;
        let normal = incident.face.axis();
        let inward = -incident.face.sign();
        let uth = self.uth as f64;
        let rng = ctx.rng();

        let mut momentum = [0.0f32; 3];
        for axis in Axis::ALL {
            momentum[axis.index()] = if axis == normal {
                inward * (uth * Self::rayleigh(rng)) as f32
            } else {
                (uth * Self::box_muller(rng)) as f32
            };
        }
        Some(InjectorRecord {
            offset: p.offset,
            momentum,
            weight: p.weight,
            cell: i32::try_from(p.cell).ok()?,
            disp: [0.0; 3],
        })
    }
}
