use core::fmt;

use crate::euclidean_distance;

/// Discrete grid position. Ordered by row first, then column, which is also the order used to
/// break ties between equally promising frontier entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Cell {
        Cell { row, col }
    }
    pub fn as_array(&self) -> [i32; 2] {
        [self.row, self.col]
    }
    /// Euclidean distance in grid units.
    pub fn distance(&self, other: &Cell) -> f64 {
        euclidean_distance(self.as_array(), other.as_array())
    }
    pub fn offset(&self, delta_row: i32, delta_col: i32) -> Cell {
        Cell::new(self.row + delta_row, self.col + delta_col)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Continuous world-space position, only used to report results.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Coordinate {
        Coordinate { x, y }
    }
    pub fn distance(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.x, self.y)
    }
}
