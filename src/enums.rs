use std::fmt;
use std::str::FromStr;

/// Principal axis of the volume. Axis `X` is array axis 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub(crate) fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The pair of array axes spanning the rotation plane of this axis.
    pub(crate) fn rotation_plane(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (1, 0),
        }
    }
}

/// Mapping between the flat sample buffer and 3D indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryOrder {
    /// Row-major, last index varies fastest.
    #[default]
    C,
    /// Column-major, first index varies fastest.
    Fortran,
}

impl FromStr for MemoryOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" | "c" => Ok(MemoryOrder::C),
            "F" | "f" => Ok(MemoryOrder::Fortran),
            other => Err(format!("unknown memory order: {other}, expected C or F")),
        }
    }
}

impl fmt::Display for MemoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryOrder::C => write!(f, "C"),
            MemoryOrder::Fortran => write!(f, "F"),
        }
    }
}

/// Projection plane, named after the two axes it keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// The array axis summed away by the projection.
    pub(crate) fn sum_axis(self) -> usize {
        match self {
            Plane::XY => 2,
            Plane::XZ => 1,
            Plane::YZ => 0,
        }
    }
}
