//! Exchange configuration and validation.

use std::error::Error;
use std::fmt;

// ── ExchangeConfig ────────────────────────────────────────────────

/// Tuning knobs for [`BoundaryExchange`](crate::BoundaryExchange).
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeConfig {
    /// Upper bound on classify/exchange/inject passes per call. Default: 6.
    ///
    /// Every rank sharing faces with other ranks runs exactly this many
    /// passes, so all ranks of one run must agree on it.
    pub max_passes: usize,
    /// Smallest capacity, in records, of the local injection scratch on
    /// first allocation. Default: 16.
    pub scratch_min_injectors: usize,
    /// Factor applied to the mover count when the scratch must grow.
    /// Default: 1.3125.
    pub scratch_growth_factor: f64,
    /// Reject mover lists whose indices are not strictly increasing.
    /// When `false` they are sorted and deduplicated with a warning.
    /// Default: `true`.
    pub reject_unordered_movers: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            max_passes: 6,
            scratch_min_injectors: 16,
            scratch_growth_factor: 1.3125,
            reject_unordered_movers: true,
        }
    }
}

impl ExchangeConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_passes == 0 {
            return Err(ConfigError::ZeroPasses);
        }
        if self.scratch_min_injectors == 0 {
            return Err(ConfigError::ZeroScratchMinimum);
        }
        if !self.scratch_growth_factor.is_finite() || self.scratch_growth_factor < 1.0 {
            return Err(ConfigError::InvalidGrowthFactor {
                value: self.scratch_growth_factor,
            });
        }
        Ok(())
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors detected by [`ExchangeConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `max_passes` is zero.
    ZeroPasses,
    /// `scratch_min_injectors` is zero.
    ZeroScratchMinimum,
    /// `scratch_growth_factor` is NaN, infinite, or below 1.
    InvalidGrowthFactor {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPasses => write!(f, "max_passes must be at least 1"),
            Self::ZeroScratchMinimum => write!(f, "scratch_min_injectors must be at least 1"),
            Self::InvalidGrowthFactor { value } => {
                write!(f, "scratch_growth_factor must be finite and >= 1.0, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
