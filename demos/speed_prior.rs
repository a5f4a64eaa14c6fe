use grid_astar::{search, Cell, OccupancyGrid};

// Prioritizing by distance to the goal alone drives the search straight into the cup-shaped
// obstacle below. It usually expands fewer cells than A*, but the path it returns can be longer.

fn main() {
    const N: i32 = 30;
    let mut occupancy_grid = OccupancyGrid::new(N as usize, N as usize, false);
    occupancy_grid.set_rect(Cell::new(18, 6), Cell::new(18, 23), true);
    occupancy_grid.set_rect(Cell::new(8, 6), Cell::new(18, 6), true);
    occupancy_grid.set_rect(Cell::new(8, 23), Cell::new(18, 23), true);
    let start = Cell::new(10, 15);
    let end = Cell::new(N - 2, 15);
    for speed_prior in [false, true] {
        let result = search(&occupancy_grid, start, end, speed_prior)
            .unwrap()
            .unwrap();
        println!(
            "speed_prior = {}: length {:.3}, {} cells expanded",
            speed_prior,
            result.path_length(),
            result.trace.len()
        );
        println!("{}", occupancy_grid.render(&result.cells, &result.expanded_cells()));
    }
}
