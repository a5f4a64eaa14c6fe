use itertools::Itertools;
use log::info;

use crate::astar::{astar_trace, Expansion, HeuristicMode};
use crate::cell::{Cell, Coordinate};
use crate::field::{Field, FieldError};

/// A* planner over any [Field]. Moving between adjacent cells costs their Euclidean distance,
/// which is also the heuristic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridAstar {
    pub mode: HeuristicMode,
}

/// A path together with the expansion trace that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// World coordinates from start to goal.
    pub path: Vec<Coordinate>,
    /// World coordinate of every expanded cell, in expansion order.
    pub trace: Vec<Coordinate>,
    /// Cells from start to goal.
    pub cells: Vec<Cell>,
    /// Cost of the goal when it was expanded.
    pub cost: f64,
    /// Parent and cost of every expanded cell at the moment it was expanded.
    pub expansions: Vec<Expansion<Cell, f64>>,
}

impl SearchResult {
    /// Total world-space length of the path.
    pub fn path_length(&self) -> f64 {
        self.path
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance(b))
            .sum()
    }
    /// Length of the path in grid units.
    pub fn cell_path_length(&self) -> f64 {
        self.cells
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance(b))
            .sum()
    }
    pub fn expanded_cells(&self) -> Vec<Cell> {
        self.expansions.iter().map(|e| e.node).collect()
    }
}

impl GridAstar {
    pub fn new() -> GridAstar {
        GridAstar {
            mode: HeuristicMode::Optimal,
        }
    }
    /// Prioritizes by distance to the goal only.
    pub fn speed_prior() -> GridAstar {
        GridAstar {
            mode: HeuristicMode::SpeedPrior,
        }
    }

    /// Searches a path from `start` to `end`.
    ///
    /// Returns `Ok(None)` if `end` cannot be reached. Errors reported by `field`, such as an
    /// endpoint outside the grid, are passed on unchanged.
    pub fn search<F: Field>(
        &self,
        field: &F,
        start: Cell,
        end: Cell,
    ) -> Result<Option<SearchResult>, FieldError> {
        // Both endpoints have to map to the world, which also rejects endpoints the field does
        // not know about before any searching is done.
        field.to_world(&start)?;
        field.to_world(&end)?;
        info!("A* planning from {} to {} ({:?})", start, end, self.mode);
        let trace = astar_trace(
            &start,
            self.mode,
            |cell: &Cell| {
                let current = *cell;
                field.neighbours_of(cell).map(|neighbours| {
                    neighbours
                        .into_iter()
                        .map(move |n| (n, n.distance(&current)))
                })
            },
            |cell: &Cell| cell.distance(&end),
            |cell: &Cell| *cell == end,
        )?;
        let Some(trace) = trace else {
            info!("Finished A*, no path from {} to {}", start, end);
            return Ok(None);
        };
        let path = trace
            .path
            .iter()
            .map(|cell| field.to_world(cell))
            .collect::<Result<Vec<_>, _>>()?;
        let expanded = trace
            .expansions
            .iter()
            .map(|e| field.to_world(&e.node))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Finished A*, found path of {} cells after {} expansions",
            path.len(),
            expanded.len()
        );
        Ok(Some(SearchResult {
            path,
            trace: expanded,
            cells: trace.path,
            cost: trace.cost,
            expansions: trace.expansions,
        }))
    }
}

/// Searches a path from `start` to `end` on `field`, prioritizing by distance to the goal alone
/// if `speed_prior` is set. See [GridAstar::search].
pub fn search<F: Field>(
    field: &F,
    start: Cell,
    end: Cell,
    speed_prior: bool,
) -> Result<Option<SearchResult>, FieldError> {
    GridAstar {
        mode: speed_prior.into(),
    }
    .search(field, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{octile_distance, OccupancyGrid};
    use std::f64::consts::SQRT_2;

    const EPS: f64 = 1e-9;

    fn open_grid(n: usize) -> OccupancyGrid {
        OccupancyGrid::new(n, n, false)
    }

    /// Grid with row 5 blocked except for a gap at column 5.
    fn wall_with_gap() -> OccupancyGrid {
        let mut grid = open_grid(10);
        grid.set_rect(Cell::new(5, 0), Cell::new(5, 9), true);
        grid.set(Cell::new(5, 5), false).unwrap();
        grid
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        for speed_prior in [false, true] {
            let mut grid = open_grid(3);
            grid.resolution = 0.25;
            let c = Cell::new(1, 2);
            let result = search(&grid, c, c, speed_prior).unwrap().unwrap();
            assert_eq!(result.path, vec![grid.to_world(&c).unwrap()]);
            assert_eq!(result.trace, result.path);
            assert_eq!(result.cost, 0.0);
        }
    }

    #[test]
    fn open_grid_diagonal() {
        let grid = open_grid(10);
        let start = Cell::new(0, 0);
        let end = Cell::new(9, 9);
        let result = GridAstar::new().search(&grid, start, end).unwrap().unwrap();
        assert_eq!(result.cells.len(), 10);
        assert!(result
            .cells
            .iter()
            .enumerate()
            .all(|(i, c)| *c == Cell::new(i as i32, i as i32)));
        assert!((result.path_length() - 9.0 * SQRT_2).abs() < EPS);
        assert!((result.cost - 9.0 * SQRT_2).abs() < EPS);
        assert_eq!(result.trace.first(), result.path.first());
        assert_eq!(result.trace.last(), result.path.last());
    }

    /// Paths on an open grid are as long as the octile distance between the endpoints.
    #[test]
    fn open_grid_is_optimal() {
        let grid = open_grid(12);
        let start = Cell::new(2, 1);
        for end in [Cell::new(11, 3), Cell::new(0, 11), Cell::new(7, 7), Cell::new(2, 9)] {
            let result = GridAstar::new().search(&grid, start, end).unwrap().unwrap();
            assert!((result.path_length() - octile_distance(&start, &end)).abs() < EPS);
        }
    }

    #[test]
    fn routes_through_gap() {
        let grid = wall_with_gap();
        let result = GridAstar::new()
            .search(&grid, Cell::new(0, 0), Cell::new(9, 9))
            .unwrap()
            .unwrap();
        // Corners of the wall cannot be cut, so the gap is entered and left straight.
        for cell in [Cell::new(4, 5), Cell::new(5, 5), Cell::new(6, 5)] {
            assert!(result.cells.contains(&cell));
        }
        assert_eq!(result.cells.len(), 12);
        assert!((result.path_length() - (7.0 * SQRT_2 + 4.0)).abs() < EPS);
        assert!(result.path_length() > 9.0 * SQRT_2);
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut grid = open_grid(10);
        grid.set_rect(Cell::new(6, 6), Cell::new(8, 8), true);
        grid.set(Cell::new(7, 7), false).unwrap();
        for speed_prior in [false, true] {
            let result = search(&grid, Cell::new(0, 0), Cell::new(7, 7), speed_prior).unwrap();
            assert!(result.is_none());
        }
    }

    /// Counts the neighbour requests the planner makes, one per expanded cell that is not the goal.
    struct CountingField<'a> {
        grid: &'a OccupancyGrid,
        calls: std::cell::Cell<usize>,
    }

    impl Field for CountingField<'_> {
        type Neighbours = <OccupancyGrid as Field>::Neighbours;

        fn neighbours_of(&self, cell: &Cell) -> Result<Self::Neighbours, FieldError> {
            self.calls.set(self.calls.get() + 1);
            self.grid.neighbours_of(cell)
        }

        fn to_world(&self, cell: &Cell) -> Result<Coordinate, FieldError> {
            self.grid.to_world(cell)
        }
    }

    /// A failed search expands every cell of the start's component once and nothing else.
    #[test]
    fn failed_search_expands_each_reachable_cell_once() {
        let mut grid = open_grid(10);
        grid.set_rect(Cell::new(6, 6), Cell::new(8, 8), true);
        grid.set(Cell::new(7, 7), false).unwrap();
        grid.update();
        let start = Cell::new(0, 0);
        let end = Cell::new(7, 7);
        let component_size = (0..10)
            .flat_map(|row| (0..10).map(move |col| Cell::new(row, col)))
            .filter(|cell| !grid.is_blocked(cell) && grid.reachable(&start, cell))
            .count();
        assert_eq!(component_size, 91);
        for speed_prior in [false, true] {
            let field = CountingField {
                grid: &grid,
                calls: std::cell::Cell::new(0),
            };
            assert!(search(&field, start, end, speed_prior).unwrap().is_none());
            assert_eq!(field.calls.get(), component_size);
        }
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let grid = open_grid(4);
        let outside = Cell::new(0, 4);
        for (start, end) in [(Cell::new(0, 0), outside), (outside, Cell::new(0, 0))] {
            assert_eq!(
                GridAstar::new().search(&grid, start, end),
                Err(FieldError::OutOfBounds {
                    cell: outside,
                    width: 4,
                    height: 4
                })
            );
        }
    }

    #[test]
    fn blocked_start_is_an_error() {
        let mut grid = open_grid(4);
        grid.set(Cell::new(0, 0), true).unwrap();
        assert_eq!(
            search(&grid, Cell::new(0, 0), Cell::new(3, 3), false),
            Err(FieldError::Blocked {
                cell: Cell::new(0, 0)
            })
        );
    }

    /// In optimal mode each expanded cell carries its true shortest cost and the priority of
    /// expanded cells never decreases.
    #[test]
    fn optimal_expansions_are_monotone() {
        let grid = wall_with_gap();
        let end = Cell::new(9, 9);
        let result = GridAstar::new()
            .search(&grid, Cell::new(0, 0), end)
            .unwrap()
            .unwrap();
        let priorities: Vec<f64> = result
            .expansions
            .iter()
            .map(|e| e.cost + e.node.distance(&end))
            .collect();
        assert!(priorities.windows(2).all(|w| w[1] >= w[0] - EPS));
        assert!((result.cost - result.cell_path_length()).abs() < EPS);
    }

    /// Speed prior ignores the cost so far and runs into the wall before finding the gap.
    #[test]
    fn speed_prior_is_never_shorter() {
        let mut grid = open_grid(20);
        grid.set_rect(Cell::new(10, 2), Cell::new(10, 17), true);
        grid.set_rect(Cell::new(3, 17), Cell::new(10, 17), true);
        let start = Cell::new(4, 9);
        let end = Cell::new(16, 9);
        let optimal = search(&grid, start, end, false).unwrap().unwrap();
        let fast = search(&grid, start, end, true).unwrap().unwrap();
        assert!(fast.path_length() >= optimal.path_length() - EPS);
        assert_eq!(fast.cells.first(), Some(&start));
        assert_eq!(fast.cells.last(), Some(&end));
        assert!(fast
            .cells
            .iter()
            .tuple_windows()
            .all(|(a, b)| grid.can_move_to(*b, *a)));
    }

    #[test]
    fn world_path_is_scaled() {
        let mut grid = open_grid(5);
        grid.resolution = 0.5;
        grid.origin = Coordinate::new(-1.0, 3.0);
        let result = GridAstar::new()
            .search(&grid, Cell::new(0, 0), Cell::new(0, 4))
            .unwrap()
            .unwrap();
        assert_eq!(result.path.first(), Some(&Coordinate::new(-1.0, 3.0)));
        assert_eq!(result.path.last(), Some(&Coordinate::new(1.0, 3.0)));
        assert!((result.path_length() - 2.0).abs() < EPS);
        assert!((result.cell_path_length() - 4.0).abs() < EPS);
    }
}
