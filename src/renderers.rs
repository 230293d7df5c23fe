use std::cmp;
use std::path::Path;

use image::error::{LimitError, LimitErrorKind};
use image::{ImageError, ImageFormat, ImageResult, Rgb, RgbImage};
use log::debug;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::Grid;
use crate::pathing::Distances;
use crate::units::{Height, Width};

const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const PATH_RED: Rgb<u8> = Rgb([0xd6, 0x27, 0x28]);
const START_GREEN: Rgb<u8> = Rgb([0x2c, 0xa0, 0x2c]);
const END_BLUE: Rgb<u8> = Rgb([0x1f, 0x77, 0xb4]);

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    colour_distances: bool,
    mark_start_end: bool,
    show_path: bool,
    start: Option<Cartesian2DCoordinate>,
    end: Option<Cartesian2DCoordinate>,
    distances: Option<&'a Distances>,
    path: Option<&'a [Cartesian2DCoordinate]>,
    output_file: Option<&'a Path>,
    cell_side_pixels_length: u8,
    wall_colour: Rgb<u8>,
    background_colour: Rgb<u8>,
    path_colour: Rgb<u8>,
}

#[derive(Debug, Clone)]
pub struct RenderOptionsBuilder<'a> {
    options: RenderOptions<'a>,
}

impl<'a> Default for RenderOptionsBuilder<'a> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

impl<'a> RenderOptionsBuilder<'a> {
    pub fn new() -> RenderOptionsBuilder<'a> {
        RenderOptionsBuilder {
            options: RenderOptions {
                colour_distances: false,
                mark_start_end: false,
                show_path: false,
                start: None,
                end: None,
                distances: None,
                path: None,
                output_file: None,
                cell_side_pixels_length: 10,
                wall_colour: BLACK,
                background_colour: WHITE,
                path_colour: PATH_RED,
            },
        }
    }

    /// Shade each cell by its distance from the start of `distances`.
    pub fn colour_distances(mut self, on: bool) -> Self {
        self.options.colour_distances = on;
        self
    }
    pub fn mark_start_end(mut self, on: bool) -> Self {
        self.options.mark_start_end = on;
        self
    }
    pub fn show_path(mut self, on: bool) -> Self {
        self.options.show_path = on;
        self
    }
    pub fn start(mut self, start: Option<Cartesian2DCoordinate>) -> Self {
        self.options.start = start;
        self
    }
    pub fn end(mut self, end: Option<Cartesian2DCoordinate>) -> Self {
        self.options.end = end;
        self
    }
    pub fn distances(mut self, distances: Option<&'a Distances>) -> Self {
        self.options.distances = distances;
        self
    }
    pub fn path(mut self, path: Option<&'a [Cartesian2DCoordinate]>) -> Self {
        self.options.path = path;
        self
    }
    pub fn output_file(mut self, output_file: Option<&'a Path>) -> Self {
        self.options.output_file = output_file;
        self
    }
    /// Zero is treated as one pixel.
    pub fn cell_side_pixels_length(mut self, pixels: u8) -> Self {
        self.options.cell_side_pixels_length = cmp::max(1, pixels);
        self
    }
    pub fn wall_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.wall_colour = colour;
        self
    }
    pub fn background_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.background_colour = colour;
        self
    }
    pub fn path_colour(mut self, colour: Rgb<u8>) -> Self {
        self.options.path_colour = colour;
        self
    }
    pub fn build(self) -> RenderOptions<'a> {
        self.options
    }
}

/// Draw a grid into an image, and write it out as a PNG when the options name an output file.
pub fn render_to_file(grid: &Grid, options: &RenderOptions) -> ImageResult<RgbImage> {
    let image = render_to_image(grid, options)?;
    if let Some(file_path) = options.output_file {
        debug!("Writing {}x{} maze image to {}", image.width(), image.height(), file_path.display());
        image.save_with_format(file_path, ImageFormat::Png)?;
    }
    Ok(image)
}

/// Draw a grid with north at the top. Walls are one pixel wide and sit on the cell boundaries,
/// so the image is `width * cell_pixels + 1` pixels across. An empty grid is a single pixel.
///
/// Fails with a dimension limit error when the image would not fit in `u32` sides or in memory.
pub fn render_to_image(grid: &Grid, options: &RenderOptions) -> ImageResult<RgbImage> {
    let canvas = Canvas::new(grid, u32::from(options.cell_side_pixels_length));
    let (image_width, image_height) = canvas.image_dimensions().ok_or_else(|| {
        ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError))
    })?;
    let mut image = RgbImage::from_pixel(image_width, image_height, options.background_colour);

    if options.colour_distances {
        if let Some(distances) = options.distances {
            colour_cells_by_distance(&mut image, &canvas, grid, distances);
        }
    }

    if options.show_path {
        if let Some(path) = options.path {
            draw_path(&mut image, &canvas, path, options.path_colour);
        }
    }

    if options.mark_start_end {
        if let Some(start) = options.start {
            canvas.fill_cell_centre(&mut image, start, START_GREEN);
        }
        if let Some(end) = options.end {
            canvas.fill_cell_centre(&mut image, end, END_BLUE);
        }
    }

    draw_walls(&mut image, &canvas, grid, options.wall_colour);
    Ok(image)
}

/// Maps grid lattice points and cells to pixels.
struct Canvas {
    width: u32,
    height: u32,
    cell_pixels: u32,
}

impl Canvas {
    fn new(grid: &Grid, cell_pixels: u32) -> Canvas {
        let (Width(width), Height(height)) = if grid.is_empty() {
            (Width(0), Height(0))
        } else {
            (grid.width(), grid.height())
        };
        Canvas {
            width: width as u32,
            height: height as u32,
            cell_pixels,
        }
    }

    /// Image width and height, or None if either side overflows or the RGB buffer could not
    /// be allocated. Every lattice point lies within these once they are known to fit.
    fn image_dimensions(&self) -> Option<(u32, u32)> {
        let side = |cells: u32| cells.checked_mul(self.cell_pixels)?.checked_add(1);
        let (width, height) = (side(self.width)?, side(self.height)?);
        let bytes = u64::from(width).checked_mul(u64::from(height))?.checked_mul(3)?;
        if bytes > isize::MAX as u64 {
            return None;
        }
        Some((width, height))
    }

    /// Pixel position of lattice point `(i, j)`, the south west corner of cell `(i, j)`.
    fn point(&self, i: u32, j: u32) -> (u32, u32) {
        (i * self.cell_pixels, (self.height - j) * self.cell_pixels)
    }

    fn cell_centre(&self, coord: Cartesian2DCoordinate) -> (u32, u32) {
        let (left, bottom) = self.point(coord.x, coord.y);
        (left + self.cell_pixels / 2, bottom - self.cell_pixels / 2)
    }

    fn fill_rect(&self, image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, colour: Rgb<u8>) {
        let x_end = cmp::min(x1, image.width());
        let y_end = cmp::min(y1, image.height());
        for x in x0..x_end {
            for y in y0..y_end {
                image.put_pixel(x, y, colour);
            }
        }
    }

    fn fill_cell(&self, image: &mut RgbImage, coord: Cartesian2DCoordinate, colour: Rgb<u8>) {
        let (left, bottom) = self.point(coord.x, coord.y);
        let top = bottom - self.cell_pixels;
        self.fill_rect(image, left, top, left + self.cell_pixels, bottom, colour);
    }

    fn fill_cell_centre(&self, image: &mut RgbImage, coord: Cartesian2DCoordinate, colour: Rgb<u8>) {
        if coord.x >= self.width || coord.y >= self.height {
            return;
        }
        let (cx, cy) = self.cell_centre(coord);
        let half = cmp::max(1, self.cell_pixels / 4);
        self.fill_rect(image,
                       cx.saturating_sub(half),
                       cy.saturating_sub(half),
                       cx + half + 1,
                       cy + half + 1,
                       colour);
    }
}

fn colour_cells_by_distance(image: &mut RgbImage, canvas: &Canvas, grid: &Grid, distances: &Distances) {
    let max = cmp::max(1, distances.max());
    for coord in grid.iter() {
        if let Some(d) = distances.distance_from_start_to(coord) {
            // Nearer cells are brighter.
            let intensity = (f64::from(max - cmp::min(d, max)) / f64::from(max) * 255.0) as u8;
            let dark = intensity / 2;
            canvas.fill_cell(image, coord, Rgb([dark, intensity, dark]));
        }
    }
}

fn draw_path(image: &mut RgbImage, canvas: &Canvas, path: &[Cartesian2DCoordinate], colour: Rgb<u8>) {
    let half = cmp::max(1, canvas.cell_pixels / 8);
    let on_canvas = |c: &Cartesian2DCoordinate| c.x < canvas.width && c.y < canvas.height;

    for coord in path.iter().filter(|c| on_canvas(c)) {
        canvas.fill_cell_centre(image, *coord, colour);
    }
    for pair in path.windows(2).filter(|p| on_canvas(&p[0]) && on_canvas(&p[1])) {
        let (ax, ay) = canvas.cell_centre(pair[0]);
        let (bx, by) = canvas.cell_centre(pair[1]);
        let (x0, x1) = (cmp::min(ax, bx), cmp::max(ax, bx));
        let (y0, y1) = (cmp::min(ay, by), cmp::max(ay, by));
        canvas.fill_rect(image,
                         x0.saturating_sub(half),
                         y0.saturating_sub(half),
                         x1 + half + 1,
                         y1 + half + 1,
                         colour);
    }
}

fn draw_walls(image: &mut RgbImage, canvas: &Canvas, grid: &Grid, colour: Rgb<u8>) {
    let (width, height) = (canvas.width, canvas.height);
    if width == 0 || height == 0 {
        return;
    }
    let side = canvas.cell_pixels;
    for j in 0..=height {
        for i in 0..=width {
            let (px, py) = canvas.point(i, j);
            if i < width && grid.has_wall_east_of_point(i as usize, j as usize) {
                canvas.fill_rect(image, px, py, px + side + 1, py + 1, colour);
            }
            if j < height && grid.has_wall_north_of_point(i as usize, j as usize) {
                canvas.fill_rect(image, px, py - side, px + 1, py + 1, colour);
            }
        }
    }
}
