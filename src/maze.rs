use crate::cells::Cartesian2DCoordinate;
use crate::grid::Grid;
use crate::grid_dimensions::MazeSize;

/// A generated maze: the carved grid and the path from its entrance to its exit.
///
/// Both are fixed once generation returns. Only shared access is handed out, so a `Maze` can be
/// read from any number of threads at once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Maze {
    grid: Grid,
    solution: Vec<Cartesian2DCoordinate>,
}

impl Maze {
    pub(crate) fn new(grid: Grid, solution: Vec<Cartesian2DCoordinate>) -> Maze {
        Maze { grid, solution }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cells from the start to the end inclusive, each adjacent to the next through an open
    /// wall. Empty only for an empty maze.
    #[inline]
    pub fn solution(&self) -> &[Cartesian2DCoordinate] {
        &self.solution
    }

    #[inline]
    pub fn size(&self) -> MazeSize {
        self.grid.dimensions()
    }

    /// The south west corner, entered through its south wall.
    pub fn start(&self) -> Option<Cartesian2DCoordinate> {
        if self.grid.is_empty() {
            None
        } else {
            Some(Cartesian2DCoordinate::new(0, 0))
        }
    }

    /// The north east corner, left through its north wall.
    pub fn end(&self) -> Option<Cartesian2DCoordinate> {
        if self.grid.is_empty() {
            None
        } else {
            Some(Cartesian2DCoordinate::new((self.grid.width().0 - 1) as u32,
                                            (self.grid.height().0 - 1) as u32))
        }
    }

    pub fn into_parts(self) -> (Grid, Vec<Cartesian2DCoordinate>) {
        (self.grid, self.solution)
    }
}
