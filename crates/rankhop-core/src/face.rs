//! Cell faces and coordinate axes.
//!
//! Faces are numbered in the fixed classification priority
//! `-x, -y, -z, +x, +y, +z`. Face `k` and face `(k + 3) % 6` are
//! opposites, which lets one index serve both as "the face I leave
//! through" and "the port my neighbor receives on".

use std::fmt;

/// One of the three Cartesian axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (`0`, `1`, `2`) into `[f32; 3]` vectors.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// One of the six faces of a rectangular cell.
///
/// # Examples
///
/// ```
/// use rankhop_core::{Axis, Face};
///
/// assert_eq!(Face::NegX.opposite(), Face::PosX);
/// assert_eq!(Face::PosZ.axis(), Axis::Z);
/// assert_eq!(Face::NegY.sign(), -1.0);
/// assert_eq!(Face::from_index(4), Some(Face::PosY));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    /// Low-x face.
    NegX,
    /// Low-y face.
    NegY,
    /// Low-z face.
    NegZ,
    /// High-x face.
    PosX,
    /// High-y face.
    PosY,
    /// High-z face.
    PosZ,
}

impl Face {
    /// All faces in classification priority order.
    pub const ALL: [Face; 6] = [
        Face::NegX,
        Face::NegY,
        Face::NegZ,
        Face::PosX,
        Face::PosY,
        Face::PosZ,
    ];

    /// Face index in `0..6`.
    pub fn index(self) -> usize {
        match self {
            Self::NegX => 0,
            Self::NegY => 1,
            Self::NegZ => 2,
            Self::PosX => 3,
            Self::PosY => 4,
            Self::PosZ => 5,
        }
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<Face> {
        Self::ALL.get(index).copied()
    }

    /// Build a face from an axis and the sign of the outward normal.
    pub fn from_axis(axis: Axis, positive: bool) -> Face {
        match (axis, positive) {
            (Axis::X, false) => Self::NegX,
            (Axis::Y, false) => Self::NegY,
            (Axis::Z, false) => Self::NegZ,
            (Axis::X, true) => Self::PosX,
            (Axis::Y, true) => Self::PosY,
            (Axis::Z, true) => Self::PosZ,
        }
    }

    /// Axis normal to this face.
    pub fn axis(self) -> Axis {
        match self {
            Self::NegX | Self::PosX => Axis::X,
            Self::NegY | Self::PosY => Axis::Y,
            Self::NegZ | Self::PosZ => Axis::Z,
        }
    }

    /// `true` for the `-x`, `-y`, `-z` faces.
    pub fn is_negative(self) -> bool {
        self.index() < 3
    }

    /// Normalized in-cell coordinate of this face: `-1.0` or `+1.0`.
    pub fn sign(self) -> f32 {
        if self.is_negative() {
            -1.0
        } else {
            1.0
        }
    }

    /// The face on the other side of the cell.
    pub fn opposite(self) -> Face {
        Self::ALL[(self.index() + 3) % 6]
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { '-' } else { '+' };
        write!(f, "{sign}{}", self.axis())
    }
}
