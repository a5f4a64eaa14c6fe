use grid_astar::{Cell, GridAstar, OccupancyGrid};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Cells have an 8-neighbourhood, but corners of obstacles cannot be cut

fn main() {
    let mut occupancy_grid = OccupancyGrid::new(3, 3, false);
    occupancy_grid.set(Cell::new(1, 1), true).unwrap();
    println!("{}", occupancy_grid);
    let start = Cell::new(0, 0);
    let end = Cell::new(2, 2);
    let result = GridAstar::new()
        .search(&occupancy_grid, start, end)
        .unwrap()
        .unwrap();
    println!("Path:");
    for p in &result.path {
        println!("{}", p);
    }
    println!("{}", occupancy_grid.render(&result.cells, &result.expanded_cells()));
}
