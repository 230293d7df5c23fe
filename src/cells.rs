use std::convert::From;

/// The four sides of a square cell.
///
/// The discriminants run clockwise starting from the top of the cell, and the wall flags of a
/// `MazeCell` are stored in the same order. The carving step derives the wall to remove on both
/// cells from this order, so it must not change: the opposite side is always two steps round.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum CompassPrimary {
    /// Top, towards `y + 1`.
    North = 0,
    /// Right, towards `x + 1`.
    East = 1,
    /// Bottom, towards `y - 1`.
    South = 2,
    /// Left, towards `x - 1`.
    West = 3,
}

impl CompassPrimary {
    /// All sides, clockwise from the top.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The side at `index` in the clockwise order. Wraps around, so any index is valid.
    #[inline]
    pub fn from_index(index: usize) -> CompassPrimary {
        CompassPrimary::ALL[index % 4]
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        CompassPrimary::from_index(self.index() + 2)
    }

    /// The coordinate delta of one step through this side.
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            CompassPrimary::North => (0, 1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::South => (0, -1),
            CompassPrimary::West => (-1, 0),
        }
    }

    /// Match a coordinate delta against the fixed clockwise offsets.
    /// Returns None if the delta is not a single orthogonal step.
    pub fn from_offset(dx: i64, dy: i64) -> Option<CompassPrimary> {
        CompassPrimary::ALL.iter().cloned().find(|dir| dir.offset() == (dx, dy))
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// The coordinate one step away through the given side.
    /// Returns None if the result is not representable (below zero or past `u32::MAX`), it may
    /// still lie outside any particular grid.
    pub fn offset(self, dir: CompassPrimary) -> Option<Cartesian2DCoordinate> {
        let (dx, dy) = dir.offset();
        let x = i64::from(self.x) + dx;
        let y = i64::from(self.y) + dy;
        if x < 0 || y < 0 || x > i64::from(u32::MAX) || y > i64::from(u32::MAX) {
            None
        } else {
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        }
    }

    /// Which side of `self` faces `other`, if they are orthogonally adjacent.
    pub fn direction_to(self, other: Cartesian2DCoordinate) -> Option<CompassPrimary> {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        CompassPrimary::from_offset(dx, dy)
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// One grid position: a wall flag per side and whether the generator has visited it.
///
/// Walls are only ever removed and the visited flag only ever goes from false to true.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct MazeCell {
    walls: [bool; 4],
    visited: bool,
}

impl Default for MazeCell {
    fn default() -> MazeCell {
        MazeCell {
            walls: [true; 4],
            visited: false,
        }
    }
}

impl MazeCell {
    #[inline]
    pub fn has_wall(&self, side: CompassPrimary) -> bool {
        self.walls[side.index()]
    }

    #[inline]
    pub fn remove_wall(&mut self, side: CompassPrimary) {
        self.walls[side.index()] = false;
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    #[inline]
    pub fn mark_visited(&mut self) {
        self.visited = true;
    }

    pub fn walls_count(&self) -> usize {
        self.walls.iter().filter(|&&wall| wall).count()
    }

    /// Sides with the wall removed, clockwise from the top.
    pub fn open_sides(&self) -> impl Iterator<Item = CompassPrimary> + '_ {
        (0..4).map(CompassPrimary::from_index).filter(move |&side| !self.has_wall(side))
    }
}
