use std::fmt;

use fnv::FnvHashSet;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::{CoordinateSmallVec, Grid};
use crate::pathing::Distances;
use crate::units::{Height, Width};

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.start_coordinates.contains(&coord) {
            String::from(" S ")
        } else if self.end_coordinates.contains(&coord) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// A grid paired with the displayer that fills in its cell bodies, ready to format.
pub struct GridRendering<'a> {
    grid: &'a Grid,
    displayer: Option<&'a dyn GridDisplay>,
}

impl Grid {
    /// Format the grid with `displayer` rendering each cell body.
    pub fn display_with<'a>(&'a self, displayer: &'a dyn GridDisplay) -> GridRendering<'a> {
        GridRendering {
            grid: self,
            displayer: Some(displayer),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendering = GridRendering {
            grid: self,
            displayer: None,
        };
        fmt::Display::fmt(&rendering, f)
    }
}

impl<'a> GridRendering<'a> {
    fn corner(&self, i: usize, j: usize, width: usize, height: usize) -> &'static str {
        let left = i > 0 && self.grid.has_wall_east_of_point(i - 1, j);
        let right = i < width && self.grid.has_wall_east_of_point(i, j);
        let up = j < height && self.grid.has_wall_north_of_point(i, j);
        let down = j > 0 && self.grid.has_wall_north_of_point(i, j - 1);
        wall_junction(left, right, up, down)
    }

    fn cell_body(&self, x: usize, y: usize) -> String {
        let coord = Cartesian2DCoordinate::new(x as u32, y as u32);
        match self.displayer {
            Some(displayer) => displayer.render_cell_body(coord),
            None => String::from("   "),
        }
    }
}

fn wall_junction(left: bool, right: bool, up: bool, down: bool) -> &'static str {
    match (left, right, up, down) {
        (true, true, true, true) => "┼",
        (true, true, true, false) => "┴",
        (true, true, false, true) => "┬",
        (true, false, true, true) => "┤",
        (false, true, true, true) => "├",
        (true, true, false, false) => "─",
        (false, false, true, true) => "│",
        (false, true, true, false) => "└",
        (true, false, false, true) => "┐",
        (true, false, true, false) => "┘",
        (false, true, false, true) => "┌",
        (true, false, false, false) => "╴",
        (false, true, false, false) => "╶",
        (false, false, true, false) => "╵",
        (false, false, false, true) => "╷",
        (false, false, false, false) => " ",
    }
}

impl<'a> fmt::Display for GridRendering<'a> {
    /// Northernmost row first. Each row of cells is a line of cell bodies between vertical walls,
    /// with a line of horizontal walls and junctions above and below.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_LR_3: &str = "───";
        const WALL_UD: &str = "│";

        if self.grid.is_empty() {
            return Ok(());
        }
        let (Width(width), Height(height)) = (self.grid.width(), self.grid.height());

        let mut output = String::new();
        for j in (0..=height).rev() {

            for i in 0..=width {
                output.push_str(self.corner(i, j, width, height));
                if i < width {
                    output.push_str(if self.grid.has_wall_east_of_point(i, j) { WALL_LR_3 } else { "   " });
                }
            }
            output.push('\n');

            if j > 0 {
                let y = j - 1;
                for i in 0..=width {
                    output.push_str(if self.grid.has_wall_north_of_point(i, y) { WALL_UD } else { " " });
                    if i < width {
                        output.push_str(&self.cell_body(i, y));
                    }
                }
                output.push('\n');
            }
        }

        write!(f, "{}", output)
    }
}
