use grid_astar::{Coordinate, GridAstar, OccupancyGrid};
use rand::prelude::*;

// Plans across a unit square discretized into 0.02 sized cells, with one fixed obstacle and two
// random rectangular ones placed in world coordinates.

fn main() {
    let mut occupancy_grid = OccupancyGrid::new(51, 51, false);
    occupancy_grid.resolution = 0.02;
    occupancy_grid.add_obstacle_rectangle(Coordinate::new(0.5, 0.5), Coordinate::new(0.6, 0.6));
    let mut rng = StdRng::seed_from_u64(285);
    for _ in 0..2 {
        let corner = Coordinate::new(rng.gen_range(0.2..0.6), rng.gen_range(0.2..0.6));
        let size = (rng.gen_range(0.05..0.3), rng.gen_range(0.05..0.3));
        occupancy_grid.add_obstacle_rectangle(
            corner,
            Coordinate::new(corner.x + size.0, corner.y + size.1),
        );
    }
    occupancy_grid.update();
    let start = occupancy_grid
        .world_to_cell(&Coordinate::new(0.2, 0.2))
        .unwrap();
    let end = occupancy_grid
        .world_to_cell(&Coordinate::new(0.8, 0.8))
        .unwrap();
    match GridAstar::new().search(&occupancy_grid, start, end) {
        Ok(Some(result)) => {
            println!(
                "Path of length {:.3} after {} expansions",
                result.path_length(),
                result.trace.len()
            );
            println!("{}", occupancy_grid.render(&result.cells, &result.expanded_cells()));
        }
        Ok(None) => println!("No path from {} to {}", start, end),
        Err(e) => println!("Invalid query: {}", e),
    }
}
