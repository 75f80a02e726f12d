//! Specular reflection.

use crate::context::HandlerContext;
use crate::handler::{BoundaryHandler, Incident};
use rankhop_core::InjectorRecord;

/// Mirrors the momentum component normal to the crossed face and keeps
/// the particle in its cell, on the face.
///
/// The residual displacement is dropped: the reflected particle resumes
/// motion in the next advance step.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpecularReflector;

impl BoundaryHandler for SpecularReflector {
    fn name(&self) -> &str {
        "specular_reflector"
    }

    fn handle(&self, _ctx: &mut HandlerContext<'_>, incident: &Incident) -> Option<InjectorRecord> {
        let p = &incident.particle;
        let a = incident.face.axis().index();
        let mut momentum = p.momentum;
        momentum[a] = -momentum[a];
        Some(InjectorRecord {
            offset: p.offset,
            momentum,
            weight: p.weight,
            cell: i32::try_from(p.cell).ok()?,
            disp: [0.0; 3],
        })
    }
}
