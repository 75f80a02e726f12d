//! Species metadata handed to boundary handlers.

/// Identity and physical constants of a particle species.
#[derive(Clone, Debug, PartialEq)]
pub struct Species {
    /// Numeric species id, used in diagnostics.
    pub id: u32,
    /// Human-readable name.
    pub name: String,
    /// Charge per physical particle.
    pub charge: f32,
    /// Mass per physical particle.
    pub mass: f32,
}

impl Species {
    /// Create species metadata.
    pub fn new(id: u32, name: impl Into<String>, charge: f32, mass: f32) -> Self {
        Self {
            id,
            name: name.into(),
            charge,
            mass,
        }
    }
}
