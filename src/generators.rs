use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::Grid;
use crate::grid_dimensions::MazeSize;
use crate::maze::Maze;

/// One progress notification from a generator.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Progress {
    /// Passages carved so far.
    pub carved: usize,
    /// Cells in the grid.
    pub total: usize,
}

impl Progress {
    /// `carved / total`, or 0.0 for an empty grid.
    ///
    /// As the start cell is never carved into this tops out at `(total - 1) / total`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.carved as f64 / self.total as f64
        }
    }
}

/// A fast, reproducible random source for maze generation.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

/// A random source seeded from the thread local generator. The seed is returned alongside it
/// so that the same maze can be generated again.
pub fn entropy_rng() -> (u64, XorShiftRng) {
    let seed = rand::thread_rng().gen::<u64>();
    (seed, seeded_rng(seed))
}

/// Generate a perfect maze without listening to progress.
pub fn generate<R: Rng + ?Sized>(size: MazeSize, rng: &mut R) -> Maze {
    recursive_backtracker(size, rng, |_| {})
}

/// Apply the recursive backtracker maze generation algorithm to a new grid of the given size.
///
/// A depth first walk carves from the south west start cell into a random unvisited neighbour
/// of the cell on top of the stack, and backtracks when a cell has none left. The walk is
/// iterative, with an explicit stack, so large grids cannot exhaust the call stack. Every cell
/// ends up visited and the passages form a spanning tree.
///
/// Before carving, the south wall of the start cell `(0, 0)` and the north wall of the end cell
/// `(width - 1, height - 1)` are removed as the entrance and exit.
///
/// The solution path is a copy of the stack, bottom to top, the first time the end cell is on
/// top of it. The stack always holds the tree path from the start to its top cell.
///
/// `on_progress` is called after every passage carved, with `carved` counting up from 1 to
/// `cells - 1` and `total` fixed at the cell count. A grid with fewer than two cells carves
/// nothing and so reports nothing. A grid with a zero dimension produces an empty maze with an
/// empty solution.
pub fn recursive_backtracker<R, F>(size: MazeSize, rng: &mut R, mut on_progress: F) -> Maze
    where R: Rng + ?Sized,
          F: FnMut(Progress)
{
    let mut grid = Grid::new(size);
    if size.is_empty() {
        debug!("Empty {} maze requested, nothing to carve", size);
        return Maze::new(grid, Vec::new());
    }

    let total = size.cells_count().0;
    let maze_start = Cartesian2DCoordinate::new(0, 0);
    let maze_end = Cartesian2DCoordinate::new((size.width().0 - 1) as u32,
                                              (size.height().0 - 1) as u32);
    debug!("Generating {} maze from {:?} to {:?}", size, maze_start, maze_end);

    grid.open_boundary(maze_start, CompassPrimary::South);
    grid.open_boundary(maze_end, CompassPrimary::North);

    let mut solution: Option<Vec<Cartesian2DCoordinate>> = None;
    let mut carved = 0;
    let mut stack = Vec::with_capacity(size.width().0 + size.height().0);

    grid.mark_visited(maze_start);
    stack.push(maze_start);

    while let Some(current) = stack.pop() {
        if current == maze_end && solution.is_none() {
            trace!("Reached the end cell with {} cells on the stack", stack.len() + 1);
            let mut path = Vec::with_capacity(stack.len() + 1);
            path.extend_from_slice(&stack);
            path.push(current);
            solution = Some(path);
        }

        let unvisited_neighbours = unvisited_neighbours(&grid, current);

        if !unvisited_neighbours.is_empty() {
            stack.push(current);

            let (direction, next) = unvisited_neighbours[rng.gen_range(0..unvisited_neighbours.len())];
            carve(&mut grid, current, next, direction);

            grid.mark_visited(next);
            stack.push(next);

            carved += 1;
            on_progress(Progress { carved, total });
        }
    }

    debug!("Carved {} passages in a {} maze", carved, size);
    Maze::new(grid, solution.unwrap_or_default())
}

/// In-grid neighbours not yet visited, with the side of `coord` each lies through, clockwise
/// from the north.
fn unvisited_neighbours(grid: &Grid,
                        coord: Cartesian2DCoordinate)
                        -> SmallVec<[(CompassPrimary, Cartesian2DCoordinate); 4]> {
    CompassPrimary::ALL
        .iter()
        .filter_map(|&dir| grid.neighbour_at_direction(coord, dir).map(|neighbour| (dir, neighbour)))
        .filter(|&(_, neighbour)| !grid.is_visited(neighbour))
        .collect()
}

fn carve(grid: &mut Grid,
         from: Cartesian2DCoordinate,
         to: Cartesian2DCoordinate,
         direction: CompassPrimary) {
    // The wall index comes from matching the coordinate delta against the clockwise offsets;
    // anything else means the neighbour search is broken.
    assert_eq!(from.direction_to(to),
               Some(direction),
               "carving between {:?} and {:?} which are not adjacent",
               from,
               to);
    if let Err(e) = grid.link(from, to) {
        panic!("failed to carve from {:?} to {:?}: {}", from, to, e);
    }
}
