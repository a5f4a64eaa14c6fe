//! The collaborator contract the search runs against.
use core::fmt;
use std::error::Error;

use crate::cell::{Cell, Coordinate};

/// Something that can be searched: a neighbour relation over [Cell]s plus a mapping of cells to
/// world space for reporting.
pub trait Field {
    /// Container returned for the neighbours of a cell.
    type Neighbours: IntoIterator<Item = Cell>;

    /// Returns the in-bounds, collision-free cells adjacent to `cell`. The order should be stable
    /// so that searches (and their expansion traces) are reproducible.
    fn neighbours_of(&self, cell: &Cell) -> Result<Self::Neighbours, FieldError>;

    /// Maps a grid cell to its world coordinate.
    fn to_world(&self, cell: &Cell) -> Result<Coordinate, FieldError>;
}

/// Misuse of a [Field], as opposed to a goal that simply cannot be reached.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The cell lies outside a grid of `width` columns and `height` rows.
    OutOfBounds {
        cell: Cell,
        width: usize,
        height: usize,
    },
    /// Neighbours were requested for an occupied cell.
    Blocked { cell: Cell },
    /// A world coordinate with a NaN or infinite component cannot be mapped to a cell.
    NonFinite { coordinate: Coordinate },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                cell,
                width,
                height,
            } => write!(f, "cell {cell} is outside the {width}x{height} grid"),
            Self::Blocked { cell } => write!(f, "cell {cell} is occupied"),
            Self::NonFinite { coordinate } => {
                write!(f, "world coordinate {coordinate} is not finite")
            }
        }
    }
}

impl Error for FieldError {}
