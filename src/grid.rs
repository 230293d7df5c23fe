use std::error::Error;
use std::fmt;

use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, MazeCell};
use crate::grid_dimensions::MazeSize;
use crate::grid_iterators::{ChunkIter, RectBatchIter, RectGridCellIter};
use crate::units::{ChunkSize, Height, Width};

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<Cartesian2DCoordinate>; 4]>;

/// Undirected graph of carved passages: one node per cell in row-major order, weighted with
/// the cell's coordinate, and one edge per open wall between two cells.
pub type PassageGraph = Graph<Cartesian2DCoordinate, (), Undirected, u32>;

// Each internal wall is seen from exactly one of its cells when only looking north and east.
static FORWARD_DIRECTIONS: [CompassPrimary; 2] = [CompassPrimary::East, CompassPrimary::North];

/// A rectangular grid of maze cells stored row-major in one flat vector.
///
/// `(0, 0)` is the bottom left (south west) cell and `y` grows northwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    cells: Vec<MazeCell>,
    dimensions: MazeSize,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotAdjacent,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            CellLinkError::InvalidGridCoordinate => "coordinate outside the grid",
            CellLinkError::SelfLink => "a cell cannot be linked to itself",
            CellLinkError::NotAdjacent => "cells are not orthogonally adjacent",
        };
        f.write_str(msg)
    }
}

impl Error for CellLinkError {}

impl Grid {
    pub fn new(dimensions: MazeSize) -> Grid {
        let cells = vec![MazeCell::default(); dimensions.cells_count().0];
        Grid { cells, dimensions }
    }

    #[inline]
    pub fn dimensions(&self) -> MazeSize {
        self.dimensions
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.dimensions.width()
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.dimensions.height()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width().0 && (coord.y as usize) < self.height().0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width().0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<Cartesian2DCoordinate> {
        if index < self.size() {
            let Width(width) = self.width();
            Some(Cartesian2DCoordinate::new((index % width) as u32, (index / width) as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<&MazeCell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> Option<&mut MazeCell> {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => Some(&mut self.cells[index]),
            None => None,
        }
    }

    /// Does the cell at `coord` still have its wall on the given side?
    /// Returns None if the coordinate is invalid.
    #[inline]
    pub fn has_wall(&self, coord: Cartesian2DCoordinate, side: CompassPrimary) -> Option<bool> {
        self.cell(coord).map(|cell| cell.has_wall(side))
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    pub fn neighbours_at_directions(&self,
                                    coord: Cartesian2DCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    /// Cells to the North, East, South or West of a particular cell, in that order, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Is there an open passage from `coord` to the in-grid neighbour on side `direction`?
    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        match (self.cell(coord), self.neighbour_at_direction(coord, direction)) {
            (Some(cell), Some(neighbour_coord)) => {
                let neighbour_open = self.cell(neighbour_coord)
                    .map_or(false, |n| !n.has_wall(direction.opposite()));
                !cell.has_wall(direction) && neighbour_open
            }
            _ => false,
        }
    }

    /// Are two cells in the grid linked? The order of the arguments does not matter.
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        a.direction_to(b).map_or(false, |dir| self.is_neighbour_linked(a, dir))
    }

    /// Cells that are linked to a particular cell by a passage.
    /// Returns None if the coordinate is invalid.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        let linked = CompassPrimary::ALL
            .iter()
            .filter(|dir| self.is_neighbour_linked(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect();
        Some(linked)
    }

    /// Number of passages between cells, each counted once.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Every passage between two cells as a `(from, to)` pair, where `to` lies east or north of
    /// `from`. Pairs come in row-major order of `from`.
    pub fn iter_links(&self) -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + '_ {
        self.iter().flat_map(move |coord| {
            FORWARD_DIRECTIONS.iter().filter_map(move |dir| {
                if self.is_neighbour_linked(coord, *dir) {
                    self.neighbour_at_direction(coord, *dir).map(|neighbour| (coord, neighbour))
                } else {
                    None
                }
            })
        })
    }

    /// Is there a wall along the lattice segment running east from corner point `(i, j)`?
    ///
    /// Point `(i, j)` is the south west corner of cell `(i, j)`, so the segment is the south wall
    /// of that cell and the north wall of the cell below it. Either one counts.
    pub fn has_wall_east_of_point(&self, i: usize, j: usize) -> bool {
        let height = self.height().0;
        (j < height && self.has_wall_at(i, j, CompassPrimary::South)) ||
        (j > 0 && self.has_wall_at(i, j - 1, CompassPrimary::North))
    }

    /// Is there a wall along the lattice segment running north from corner point `(i, j)`?
    /// That is the west wall of cell `(i, j)` and the east wall of the cell left of it.
    pub fn has_wall_north_of_point(&self, i: usize, j: usize) -> bool {
        let width = self.width().0;
        (i < width && self.has_wall_at(i, j, CompassPrimary::West)) ||
        (i > 0 && self.has_wall_at(i - 1, j, CompassPrimary::East))
    }

    fn has_wall_at(&self, x: usize, y: usize, side: CompassPrimary) -> bool {
        if x > u32::MAX as usize || y > u32::MAX as usize {
            return false;
        }
        self.has_wall(Cartesian2DCoordinate::new(x as u32, y as u32), side).unwrap_or(false)
    }

    /// Outward facing walls that have been removed, i.e. the maze entrance and exit.
    pub fn open_boundary_walls(&self) -> Vec<(Cartesian2DCoordinate, CompassPrimary)> {
        self.iter()
            .flat_map(|coord| (0..4).map(move |i| (coord, CompassPrimary::from_index(i))))
            .filter(|&(coord, dir)| {
                self.neighbour_at_direction(coord, dir).is_none() &&
                self.has_wall(coord, dir) == Some(false)
            })
            .collect()
    }

    /// Carve a passage between two adjacent cells, removing the facing wall on both of them.
    pub(crate) fn link(&mut self,
                       a: Cartesian2DCoordinate,
                       b: Cartesian2DCoordinate)
                       -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return Err(CellLinkError::InvalidGridCoordinate);
        }
        let direction = a.direction_to(b).ok_or(CellLinkError::NotAdjacent)?;

        if let Some(cell) = self.cell_mut(a) {
            cell.remove_wall(direction);
        }
        if let Some(cell) = self.cell_mut(b) {
            cell.remove_wall(direction.opposite());
        }
        Ok(())
    }

    /// Remove the wall on one side of one cell only, e.g. an entrance through the grid boundary.
    /// Returns false if the coordinate is invalid.
    pub(crate) fn open_boundary(&mut self, coord: Cartesian2DCoordinate, side: CompassPrimary) -> bool {
        match self.cell_mut(coord) {
            Some(cell) => {
                cell.remove_wall(side);
                true
            }
            None => false,
        }
    }

    /// Returns false if the coordinate is invalid.
    pub(crate) fn mark_visited(&mut self, coord: Cartesian2DCoordinate) -> bool {
        match self.cell_mut(coord) {
            Some(cell) => {
                cell.mark_visited();
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_visited(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell(coord).map_or(false, MazeCell::is_visited)
    }

    #[inline]
    pub fn iter(&self) -> RectGridCellIter {
        RectGridCellIter::new(self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> RectBatchIter {
        RectBatchIter::rows(self.dimensions)
    }

    #[inline]
    pub fn iter_column(&self) -> RectBatchIter {
        RectBatchIter::columns(self.dimensions)
    }

    #[inline]
    pub fn iter_chunks(&self, chunk_size: ChunkSize) -> ChunkIter {
        ChunkIter::new(self.dimensions, chunk_size)
    }

    /// Build the passage graph of the maze.
    pub fn passage_graph(&self) -> PassageGraph {
        let links: Vec<_> = self.iter_links().collect();
        let mut graph = PassageGraph::with_capacity(self.size(), links.len());
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in links {
            if let (Some(a_index), Some(b_index)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use petgraph::algo::{connected_components, is_cyclic_undirected};

    use super::*;

    fn small_grid(w: i64, h: i64) -> Grid {
        Grid::new(MazeSize::new(w, h).expect("valid test grid size"))
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let node_indices: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected_indices: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(node_indices, expected_indices);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        // Outside the grid there are no neighbours at all
        assert!(g.neighbours(gc(10, 10)).is_empty());
    }

    #[test]
    fn neighbours_come_clockwise_from_north() {
        let g = small_grid(3, 3);
        assert_eq!(&*g.neighbours(gc(1, 1)), &[gc(1, 2), gc(2, 1), gc(1, 0), gc(0, 1)]);
    }

    #[test]
    fn neighbours_at_dirs() {
        let g = small_grid(2, 2);
        let check_neighbours =
            |coord, dirs: &[CompassPrimary], neighbour_opts: &[Option<Cartesian2DCoordinate>]| {
                assert_eq!(&*g.neighbours_at_directions(coord, dirs), neighbour_opts);
            };
        check_neighbours(gc(0, 0), &[], &[]);
        check_neighbours(gc(0, 0), &[CompassPrimary::South], &[None]);
        check_neighbours(gc(0, 0),
                         &[CompassPrimary::West, CompassPrimary::South],
                         &[None, None]);
        check_neighbours(gc(0, 0),
                         &[CompassPrimary::East, CompassPrimary::North],
                         &[Some(gc(1, 0)), Some(gc(0, 1))]);
        check_neighbours(gc(1, 1),
                         &[CompassPrimary::North, CompassPrimary::East],
                         &[None, None]);
        check_neighbours(gc(1, 1),
                         &[CompassPrimary::West, CompassPrimary::South],
                         &[Some(gc(0, 1)), Some(gc(1, 0))]);
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let coords = &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1), gc(0, 2),
                       gc(1, 2), gc(2, 2)];
        let indices: Vec<Option<usize>> = coords.iter()
            .map(|coord| g.grid_coordinate_to_index(*coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);

        for (index, coord) in coords.iter().enumerate() {
            assert_eq!(g.index_to_grid_coordinate(index), Some(*coord));
        }
        assert_eq!(g.index_to_grid_coordinate(9), None);
    }

    #[test]
    fn fresh_grid_is_all_walls() {
        let g = small_grid(3, 2);
        assert_eq!(g.size(), 6);
        for coord in g.iter() {
            let cell = g.cell(coord).expect("valid coordinate");
            assert_eq!(cell.walls_count(), 4);
            assert!(!cell.is_visited());
        }
        assert_eq!(g.links_count(), 0);
        assert!(g.open_boundary_walls().is_empty());
    }

    #[test]
    fn empty_grid() {
        let g = small_grid(0, 4);
        assert!(g.is_empty());
        assert_eq!(g.iter().count(), 0);
        assert!(g.cell(gc(0, 0)).is_none());
        assert_eq!(g.passage_graph().node_count(), 0);
    }

    #[test]
    fn linking_cells() {
        let mut g = small_grid(4, 4);
        let a = gc(0, 1);
        let b = gc(0, 2);
        let c = gc(0, 3);

        let links_sorted = |grid: &Grid, coord| -> Vec<Cartesian2DCoordinate> {
            grid.links(coord).expect("coordinate is invalid").iter().cloned().sorted().collect()
        };
        macro_rules! bi_check_linked {
            ($g:expr, $x:expr, $y:expr) => ($g.is_linked($x, $y) && $g.is_linked($y, $x))
        }

        assert!(!bi_check_linked!(g, a, b));
        assert!(links_sorted(&g, a).is_empty());

        g.link(a, b).expect("link failed");
        assert!(bi_check_linked!(g, a, b));
        assert_eq!(links_sorted(&g, a), vec![b]);
        assert_eq!(links_sorted(&g, b), vec![a]);
        assert!(g.is_neighbour_linked(a, CompassPrimary::North));
        assert!(g.is_neighbour_linked(b, CompassPrimary::South));
        assert_eq!(g.has_wall(a, CompassPrimary::North), Some(false));
        assert_eq!(g.has_wall(b, CompassPrimary::South), Some(false));

        g.link(b, c).expect("link failed");
        assert!(bi_check_linked!(g, b, c));
        assert!(!bi_check_linked!(g, a, c));
        assert_eq!(links_sorted(&g, b), vec![a, c]);
        assert_eq!(g.links_count(), 2);

        // linking again changes nothing
        g.link(c, b).expect("link failed");
        assert_eq!(g.links_count(), 2);
    }

    #[test]
    fn link_errors() {
        let mut g = small_grid(4, 4);
        assert_eq!(g.link(gc(0, 0), gc(0, 0)), Err(CellLinkError::SelfLink));
        assert_eq!(g.link(gc(0, 0), gc(100, 100)),
                   Err(CellLinkError::InvalidGridCoordinate));
        assert_eq!(g.link(gc(0, 0), gc(1, 1)), Err(CellLinkError::NotAdjacent));
        assert_eq!(g.link(gc(0, 0), gc(0, 2)), Err(CellLinkError::NotAdjacent));
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn boundary_openings_are_not_links() {
        let mut g = small_grid(2, 2);
        assert!(g.open_boundary(gc(0, 0), CompassPrimary::South));
        assert!(g.open_boundary(gc(1, 1), CompassPrimary::North));
        assert!(!g.open_boundary(gc(5, 5), CompassPrimary::North));
        assert_eq!(g.links_count(), 0);
        assert!(!g.is_neighbour_linked(gc(0, 0), CompassPrimary::South));
        assert_eq!(g.open_boundary_walls(),
                   vec![(gc(0, 0), CompassPrimary::South), (gc(1, 1), CompassPrimary::North)]);
    }

    #[test]
    fn lattice_segments() {
        let mut g = small_grid(2, 1);
        g.link(gc(0, 0), gc(1, 0)).unwrap();
        g.open_boundary(gc(1, 0), CompassPrimary::North);

        // bottom and top boundary
        assert!(g.has_wall_east_of_point(0, 0));
        assert!(g.has_wall_east_of_point(1, 0));
        assert!(g.has_wall_east_of_point(0, 1));
        assert!(!g.has_wall_east_of_point(1, 1));
        // west boundary, carved passage, east boundary
        assert!(g.has_wall_north_of_point(0, 0));
        assert!(!g.has_wall_north_of_point(1, 0));
        assert!(g.has_wall_north_of_point(2, 0));
        // off the grid
        assert!(!g.has_wall_east_of_point(5, 0));
        assert!(!g.has_wall_north_of_point(0, 3));
    }

    #[test]
    fn visiting_cells() {
        let mut g = small_grid(2, 2);
        assert!(!g.is_visited(gc(1, 0)));
        assert!(g.mark_visited(gc(1, 0)));
        assert!(g.is_visited(gc(1, 0)));
        assert!(!g.mark_visited(gc(2, 0)));
        assert!(!g.is_visited(gc(2, 0)));
    }

    #[test]
    fn links_iteration_order() {
        let mut g = small_grid(2, 2);
        g.link(gc(0, 1), gc(1, 1)).unwrap();
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(1, 0), gc(0, 0)).unwrap();
        assert_eq!(g.iter_links().collect::<Vec<_>>(),
                   vec![(gc(0, 0), gc(1, 0)), (gc(0, 0), gc(0, 1)), (gc(0, 1), gc(1, 1))]);
    }

    #[test]
    fn passage_graph_of_a_spanning_tree() {
        let mut g = small_grid(2, 2);
        g.link(gc(0, 0), gc(1, 0)).unwrap();
        g.link(gc(1, 0), gc(1, 1)).unwrap();
        g.link(gc(1, 1), gc(0, 1)).unwrap();

        let graph = g.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(connected_components(&graph), 1);
        assert!(!is_cyclic_undirected(&graph));
        assert_eq!(graph[NodeIndex::new(3)], gc(1, 1));

        g.link(gc(0, 1), gc(0, 0)).unwrap();
        assert!(is_cyclic_undirected(&g.passage_graph()));
    }
}
