//! # grid_astar
//!
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search between two cells of a 2D
//! occupancy grid. Besides the path, every search reports the cells it expanded in the order
//! they were closed, which is useful for visualizing and debugging the search.
//!
//! The search itself only talks to a [Field], which enumerates collision-free neighbours and
//! maps cells to world coordinates. [OccupancyGrid] is a ready-made [Field] backed by a
//! [BoolGrid](grid_util::grid::BoolGrid).
//!
//! Edge costs and the heuristic are both the
//! [Euclidean distance](https://en.wikipedia.org/wiki/Euclidean_distance) between cells. In
//! [HeuristicMode::SpeedPrior] the accumulated cost is left out of the priority, which usually
//! finds *a* path with fewer expansions but gives up optimality.
pub mod astar;
pub mod cell;
pub mod field;
pub mod occupancy_grid;
pub mod search;

pub use astar::{astar_trace, Expansion, HeuristicMode, SearchTrace};
pub use cell::{Cell, Coordinate};
pub use field::{Field, FieldError};
pub use occupancy_grid::OccupancyGrid;
pub use search::{search, GridAstar, SearchResult};

/// Inline capacity of neighbour lists; a Moore neighbourhood never exceeds it.
pub const SMALLVEC_SIZE: usize = 8;
/// World-space size of a grid cell unless configured otherwise.
pub const DEFAULT_RESOLUTION: f64 = 1.0;

/// Euclidean norm of the difference between two integer coordinate vectors.
pub fn euclidean_distance<const D: usize>(a: [i32; D], b: [i32; D]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let delta = (*x as f64) - (*y as f64);
            delta * delta
        })
        .sum::<f64>()
        .sqrt()
}

/// Length of the shortest 8-connected path between two cells on an open grid, with unit cost for
/// straight moves and sqrt(2) for diagonal ones.
pub fn octile_distance(a: &Cell, b: &Cell) -> f64 {
    let delta_row = (a.row - b.row).abs();
    let delta_col = (a.col - b.col).abs();
    let diagonal = delta_row.min(delta_col) as f64;
    let straight = (delta_row - delta_col).abs() as f64;
    diagonal * std::f64::consts::SQRT_2 + straight
}
