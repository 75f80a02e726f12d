//! Neighbor-table entry encoding.
//!
//! Non-negative entries are global cell ids. Negative entries are
//! boundary codes: `-1` reflects (resolved by the advance step), `-2`
//! absorbs, and `-(h + 3)` routes to custom boundary handler `h`.

/// Particles are specularly reflected by the advance step.
pub const REFLECT_PARTICLES: i64 = -1;

/// Particles are destroyed on contact.
pub const ABSORB_PARTICLES: i64 = -2;

/// Offset between a custom handler index and its negated code.
const CUSTOM_BASE: i64 = 3;

/// Decoded meaning of one neighbor-table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborCode {
    /// A global cell id.
    Cell(i64),
    /// Absorbing boundary.
    Absorb,
    /// Reflecting boundary.
    Reflect,
    /// Custom boundary handler index. Not checked against any table.
    Custom(usize),
}

impl NeighborCode {
    /// Decode a raw neighbor entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankhop_grid::NeighborCode;
    ///
    /// assert_eq!(NeighborCode::decode(12), NeighborCode::Cell(12));
    /// assert_eq!(NeighborCode::decode(-2), NeighborCode::Absorb);
    /// assert_eq!(NeighborCode::decode(-3), NeighborCode::Custom(0));
    /// assert_eq!(NeighborCode::decode(NeighborCode::Custom(4).encode()), NeighborCode::Custom(4));
    /// ```
    pub fn decode(raw: i64) -> NeighborCode {
        match raw {
            r if r >= 0 => Self::Cell(r),
            REFLECT_PARTICLES => Self::Reflect,
            ABSORB_PARTICLES => Self::Absorb,
            r => Self::Custom(usize::try_from(-(r + CUSTOM_BASE)).unwrap_or(usize::MAX)),
        }
    }

    /// Encode back into a raw neighbor entry.
    pub fn encode(self) -> i64 {
        match self {
            Self::Cell(c) => c,
            Self::Absorb => ABSORB_PARTICLES,
            Self::Reflect => REFLECT_PARTICLES,
            Self::Custom(h) => -(h as i64) - CUSTOM_BASE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sentinels_decode() {
        assert_eq!(NeighborCode::decode(-1), NeighborCode::Reflect);
        assert_eq!(NeighborCode::decode(-2), NeighborCode::Absorb);
        assert_eq!(NeighborCode::decode(0), NeighborCode::Cell(0));
    }

    #[test]
    fn custom_codes_start_at_minus_three() {
        assert_eq!(NeighborCode::Custom(0).encode(), -3);
        assert_eq!(NeighborCode::Custom(7).encode(), -10);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(raw in -1_000_000i64..1_000_000) {
            prop_assert_eq!(NeighborCode::decode(raw).encode(), raw);
        }
    }
}
