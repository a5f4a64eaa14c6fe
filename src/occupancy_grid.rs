use core::fmt;
use std::ops::RangeInclusive;

use fxhash::FxHashSet;
use grid_util::grid::{BoolGrid, ValueGrid};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, Coordinate};
use crate::field::{Field, FieldError};
use crate::{DEFAULT_RESOLUTION, SMALLVEC_SIZE};

const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const NEUMANN_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// [OccupancyGrid] is a [Field] over a [BoolGrid] in which a cell is occupied ([true]) or free
/// ([false]). Columns run along the world x axis and rows along the world y axis, scaled by
/// `resolution` and shifted by `origin`.
///
/// Connected components are tracked with a [UnionFind] so that reachability can be checked
/// without searching. Freeing cells joins components immediately, while blocking cells or
/// changing the neighbourhood settings through [set_allow_diagonal_move](Self::set_allow_diagonal_move)
/// and [set_allow_corner_cutting](Self::set_allow_corner_cutting) only marks them dirty; call
/// [update](Self::update) before relying on [reachable](Self::reachable) afterwards.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    pub grid: BoolGrid,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
    allow_diagonal_move: bool,
    allow_corner_cutting: bool,
    pub resolution: f64,
    pub origin: Coordinate,
}

impl Default for OccupancyGrid {
    fn default() -> OccupancyGrid {
        OccupancyGrid::new(0, 0, false)
    }
}

impl OccupancyGrid {
    /// Creates a grid of `width` columns and `height` rows with every cell set to `blocked`.
    pub fn new(width: usize, height: usize, blocked: bool) -> OccupancyGrid {
        let mut occupancy_grid = OccupancyGrid {
            grid: BoolGrid::new(width, height, blocked),
            components: UnionFind::new(width * height),
            components_dirty: false,
            allow_diagonal_move: true,
            allow_corner_cutting: false,
            resolution: DEFAULT_RESOLUTION,
            origin: Coordinate::default(),
        };
        occupancy_grid.generate_components();
        occupancy_grid
    }
    /// Whether the 8-neighbourhood is used instead of the 4-neighbourhood.
    pub fn allow_diagonal_move(&self) -> bool {
        self.allow_diagonal_move
    }
    /// Whether diagonal moves are allowed between two cells when one of the cells orthogonally
    /// adjacent to both is occupied.
    pub fn allow_corner_cutting(&self) -> bool {
        self.allow_corner_cutting
    }
    pub fn set_allow_diagonal_move(&mut self, allow: bool) {
        if self.allow_diagonal_move != allow {
            self.allow_diagonal_move = allow;
            self.components_dirty = true;
        }
    }
    pub fn set_allow_corner_cutting(&mut self, allow: bool) {
        if self.allow_corner_cutting != allow {
            self.allow_corner_cutting = allow;
            self.components_dirty = true;
        }
    }
    pub fn width(&self) -> usize {
        self.grid.width()
    }
    pub fn height(&self) -> usize {
        self.grid.height()
    }
    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.height()
            && (cell.col as usize) < self.width()
    }
    fn check_bounds(&self, cell: &Cell) -> Result<(), FieldError> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(FieldError::OutOfBounds {
                cell: *cell,
                width: self.width(),
                height: self.height(),
            })
        }
    }
    fn ix(&self, cell: &Cell) -> usize {
        cell.row as usize * self.width() + cell.col as usize
    }
    /// Cells outside the grid count as occupied.
    pub fn is_blocked(&self, cell: &Cell) -> bool {
        !self.in_bounds(cell) || self.grid.get(cell.col, cell.row)
    }
    /// Candidate neighbours of a cell, before any occupancy check.
    pub fn neighbourhood(&self, cell: &Cell) -> SmallVec<[Cell; SMALLVEC_SIZE]> {
        let offsets: &[(i32, i32)] = if self.allow_diagonal_move {
            &MOORE_OFFSETS
        } else {
            &NEUMANN_OFFSETS
        };
        offsets
            .iter()
            .map(|&(delta_row, delta_col)| cell.offset(delta_row, delta_col))
            .collect()
    }
    /// Checks whether a single step from `from` to the adjacent `to` is collision-free.
    pub fn can_move_to(&self, to: Cell, from: Cell) -> bool {
        if self.is_blocked(&to) {
            return false;
        }
        if self.allow_corner_cutting || to.row == from.row || to.col == from.col {
            return true;
        }
        debug_assert!((to.row - from.row).abs() <= 1 && (to.col - from.col).abs() <= 1);
        !self.is_blocked(&Cell::new(from.row, to.col))
            && !self.is_blocked(&Cell::new(to.row, from.col))
    }

    /// Updates a cell. Joins newly connected components and flags the components as dirty if
    /// components are (potentially) broken apart into multiple.
    pub fn set(&mut self, cell: Cell, blocked: bool) -> Result<(), FieldError> {
        self.check_bounds(&cell)?;
        self.set_in_bounds(cell, blocked);
        Ok(())
    }
    fn set_in_bounds(&mut self, cell: Cell, blocked: bool) {
        let was_blocked = self.grid.get(cell.col, cell.row);
        if blocked && !was_blocked {
            self.components_dirty = true;
        }
        self.grid.set(cell.col, cell.row, blocked);
        if was_blocked && !blocked {
            let ix = self.ix(&cell);
            for n in self.neighbourhood(&cell) {
                if self.can_move_to(n, cell) {
                    let n_ix = self.ix(&n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }
    fn fill(&mut self, rows: RangeInclusive<i32>, cols: RangeInclusive<i32>, blocked: bool) {
        let max_row = self.height() as i32 - 1;
        let max_col = self.width() as i32 - 1;
        for row in (*rows.start()).max(0)..=(*rows.end()).min(max_row) {
            for col in (*cols.start()).max(0)..=(*cols.end()).min(max_col) {
                self.set_in_bounds(Cell::new(row, col), blocked);
            }
        }
    }
    /// Sets every cell of the rectangle spanned by two corner cells (inclusive). Parts of the
    /// rectangle outside the grid are ignored.
    pub fn set_rect(&mut self, corner: Cell, opposite: Cell, blocked: bool) {
        self.fill(
            corner.row.min(opposite.row)..=corner.row.max(opposite.row),
            corner.col.min(opposite.col)..=corner.col.max(opposite.col),
            blocked,
        );
    }
    /// Blocks every cell whose world position lies inside the axis-aligned rectangle spanned by
    /// two world-space corners.
    pub fn add_obstacle_rectangle(&mut self, corner: Coordinate, opposite: Coordinate) {
        let to_index = |value: f64, origin: f64| (value - origin) / self.resolution;
        let cols = to_index(corner.x.min(opposite.x), self.origin.x).ceil() as i32
            ..=to_index(corner.x.max(opposite.x), self.origin.x).floor() as i32;
        let rows = to_index(corner.y.min(opposite.y), self.origin.y).ceil() as i32
            ..=to_index(corner.y.max(opposite.y), self.origin.y).floor() as i32;
        self.fill(rows, cols, true);
    }

    /// World position of a cell, without bounds checking.
    pub fn grid_to_world(&self, cell: &Cell) -> Coordinate {
        Coordinate::new(
            self.origin.x + cell.col as f64 * self.resolution,
            self.origin.y + cell.row as f64 * self.resolution,
        )
    }
    /// The cell closest to a world position.
    pub fn world_to_cell(&self, coordinate: &Coordinate) -> Result<Cell, FieldError> {
        let row = ((coordinate.y - self.origin.y) / self.resolution).round();
        let col = ((coordinate.x - self.origin.x) / self.resolution).round();
        if !row.is_finite() || !col.is_finite() {
            return Err(FieldError::NonFinite {
                coordinate: *coordinate,
            });
        }
        // Saturating casts; anything beyond i32 is out of bounds either way.
        let cell = Cell::new(row as i32, col as i32);
        self.check_bounds(&cell)?;
        Ok(cell)
    }

    /// Retrieves the component id a given [Cell] belongs to.
    pub fn get_component(&self, cell: &Cell) -> usize {
        self.components.find(self.ix(cell))
    }
    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Cell, goal: &Cell) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Cell, goal: &Cell) -> bool {
        if self.in_bounds(start) && self.in_bounds(goal) {
            !self.components.equiv(self.ix(start), self.ix(goal))
        } else {
            true
        }
    }
    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }
    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    pub fn generate_components(&mut self) {
        let width = self.width();
        let height = self.height();
        self.components = UnionFind::new(width * height);
        self.components_dirty = false;
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let cell = Cell::new(row, col);
                if self.is_blocked(&cell) {
                    continue;
                }
                let ix = self.ix(&cell);
                for n in self.neighbourhood(&cell) {
                    if self.can_move_to(n, cell) {
                        let n_ix = self.ix(&n);
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }

    /// Draws the grid with a path and the expanded cells on top: `S` and `G` mark the ends of the
    /// path, `*` the rest of it, `+` expanded cells, `#` obstacles and `.` free space.
    pub fn render(&self, path: &[Cell], expanded: &[Cell]) -> String {
        let on_path: FxHashSet<Cell> = path.iter().copied().collect();
        let was_expanded: FxHashSet<Cell> = expanded.iter().copied().collect();
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in 0..self.height() as i32 {
            for col in 0..self.width() as i32 {
                let cell = Cell::new(row, col);
                let symbol = if path.first() == Some(&cell) {
                    'S'
                } else if path.last() == Some(&cell) {
                    'G'
                } else if on_path.contains(&cell) {
                    '*'
                } else if was_expanded.contains(&cell) {
                    '+'
                } else if self.is_blocked(&cell) {
                    '#'
                } else {
                    '.'
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}

impl Field for OccupancyGrid {
    type Neighbours = SmallVec<[Cell; SMALLVEC_SIZE]>;

    fn neighbours_of(&self, cell: &Cell) -> Result<Self::Neighbours, FieldError> {
        self.check_bounds(cell)?;
        if self.is_blocked(cell) {
            return Err(FieldError::Blocked { cell: *cell });
        }
        Ok(self
            .neighbourhood(cell)
            .into_iter()
            .filter(|n| self.can_move_to(*n, *cell))
            .collect())
    }

    fn to_world(&self, cell: &Cell) -> Result<Coordinate, FieldError> {
        self.check_bounds(cell)?;
        Ok(self.grid_to_world(cell))
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for row in 0..self.height() as i32 {
            let values = (0..self.width() as i32)
                .map(|col| self.grid.get(col, row) as i32)
                .collect::<Vec<i32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}
