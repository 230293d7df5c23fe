use std::cmp;

use crate::cells::Cartesian2DCoordinate;
use crate::grid_dimensions::MazeSize;
use crate::units::{ChunkSize, Height, Width};

/// Iterates every coordinate of a grid in row-major order, southernmost row first.
#[derive(Debug, Copy, Clone)]
pub struct RectGridCellIter {
    width: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl RectGridCellIter {
    pub fn new(dimensions: MazeSize) -> RectGridCellIter {
        RectGridCellIter {
            width: dimensions.width().0,
            current_cell_number: 0,
            cells_count: dimensions.cells_count().0,
        }
    }
}

impl ExactSizeIterator for RectGridCellIter {} // default impl using size_hint()
impl Iterator for RectGridCellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let n = self.current_cell_number;
            let coord = Cartesian2DCoordinate::new((n % self.width) as u32, (n / self.width) as u32);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Iterates whole rows (south to north) or whole columns (west to east) of a grid.
#[derive(Debug, Copy, Clone)]
pub struct RectBatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    width: usize,
    height: usize,
}

impl RectBatchIter {
    pub fn rows(dimensions: MazeSize) -> RectBatchIter {
        RectBatchIter::new(BatchIterType::Row, dimensions)
    }

    pub fn columns(dimensions: MazeSize) -> RectBatchIter {
        RectBatchIter::new(BatchIterType::Column, dimensions)
    }

    fn new(iter_type: BatchIterType, dimensions: MazeSize) -> RectBatchIter {
        let (Width(width), Height(height)) = (dimensions.width(), dimensions.height());
        RectBatchIter {
            iter_type,
            current_index: 0,
            width,
            height,
        }
    }

    fn batches_count(&self) -> usize {
        // A row of zero cells is no row at all.
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        match self.iter_type {
            BatchIterType::Row => self.height,
            BatchIterType::Column => self.width,
        }
    }
}

impl ExactSizeIterator for RectBatchIter {} // default impl using size_hint()
impl Iterator for RectBatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count() {
            return None;
        }
        let index = self.current_index as u32;
        let coords = match self.iter_type {
            BatchIterType::Row => {
                (0..self.width as u32).map(|x| Cartesian2DCoordinate::new(x, index)).collect()
            }
            BatchIterType::Column => {
                (0..self.height as u32).map(|y| Cartesian2DCoordinate::new(index, y)).collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batches_count() - self.current_index;
        (remaining, Some(remaining))
    }
}

/// How a grid should be split into chunks for drawing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChunkOptions {
    /// Use this side length instead of the one derived from the grid size.
    pub custom_size: Option<usize>,
    /// Upper bound on the side length, whatever else is asked for.
    pub max_size: usize,
}

pub const DEFAULT_MAX_CHUNK_SIZE: usize = 32;

impl Default for ChunkOptions {
    fn default() -> ChunkOptions {
        ChunkOptions {
            custom_size: None,
            max_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

/// Pick a chunk side length for a grid.
///
/// The derived size is `ceil(sqrt(cells) / 10)`, so chunk counts grow slowly with the grid.
/// A custom size replaces it, the maximum caps it and the result is never below one cell.
pub fn chunk_size(dimensions: MazeSize, options: &ChunkOptions) -> ChunkSize {
    let cells = dimensions.cells_count().0 as f64;
    let derived = (cells.sqrt() / 10.0).ceil() as usize;
    let size = options.custom_size.unwrap_or(derived);
    ChunkSize(cmp::max(1, cmp::min(size, options.max_size)))
}

/// A square block of cells, clipped at the grid's north and east edges.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chunk {
    /// Chunk column and row.
    pub index: (usize, usize),
    /// Cells in the chunk, `x` outer and `y` inner.
    pub cells: Vec<Cartesian2DCoordinate>,
}

/// Iterates the chunks of a grid, chunk column outer and chunk row inner.
#[derive(Debug, Copy, Clone)]
pub struct ChunkIter {
    width: usize,
    height: usize,
    chunk_side: usize,
    x_chunks: usize,
    y_chunks: usize,
    current_chunk: usize,
}

impl ChunkIter {
    pub fn new(dimensions: MazeSize, chunk_size: ChunkSize) -> ChunkIter {
        let (Width(width), Height(height)) = (dimensions.width(), dimensions.height());
        let chunk_side = cmp::max(1, chunk_size.0);
        let (x_chunks, y_chunks) = if dimensions.is_empty() {
            (0, 0)
        } else {
            (div_ceil(width, chunk_side), div_ceil(height, chunk_side))
        };
        ChunkIter {
            width,
            height,
            chunk_side,
            x_chunks,
            y_chunks,
            current_chunk: 0,
        }
    }

    /// Number of chunks along x and along y.
    pub fn chunk_counts(&self) -> (usize, usize) {
        (self.x_chunks, self.y_chunks)
    }
}

fn div_ceil(n: usize, d: usize) -> usize {
    (n + d - 1) / d
}

impl ExactSizeIterator for ChunkIter {} // default impl using size_hint()
impl Iterator for ChunkIter {
    type Item = Chunk;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_chunk >= self.x_chunks * self.y_chunks {
            return None;
        }
        let cx = self.current_chunk / self.y_chunks;
        let cy = self.current_chunk % self.y_chunks;
        self.current_chunk += 1;

        let x_start = cx * self.chunk_side;
        let y_start = cy * self.chunk_side;
        let x_end = cmp::min(x_start + self.chunk_side, self.width);
        let y_end = cmp::min(y_start + self.chunk_side, self.height);

        let mut cells = Vec::with_capacity((x_end - x_start) * (y_end - y_start));
        for x in x_start..x_end {
            for y in y_start..y_end {
                cells.push(Cartesian2DCoordinate::new(x as u32, y as u32));
            }
        }
        Some(Chunk {
            index: (cx, cy),
            cells,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.x_chunks * self.y_chunks - self.current_chunk;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::grid::Grid;

    fn small_grid(w: i64, h: i64) -> Grid {
        Grid::new(MazeSize::new(w, h).expect("valid test grid size"))
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().len(), 4);
        assert_eq!(g.iter().collect::<Vec<_>>(),
                   &[gc(0, 0), gc(1, 0), gc(0, 1), gc(1, 1)]);
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter_row().collect::<Vec<Vec<_>>>(),
                   &[&[gc(0, 0), gc(1, 0)], &[gc(0, 1), gc(1, 1)]]);
    }

    #[test]
    fn column_iter() {
        let g = small_grid(3, 2);
        assert_eq!(g.iter_column().len(), 3);
        assert_eq!(g.iter_column().collect::<Vec<Vec<_>>>(),
                   &[&[gc(0, 0), gc(0, 1)], &[gc(1, 0), gc(1, 1)], &[gc(2, 0), gc(2, 1)]]);
    }

    #[test]
    fn empty_grid_iterators() {
        let g = small_grid(3, 0);
        assert_eq!(g.iter().count(), 0);
        assert_eq!(g.iter_row().count(), 0);
        assert_eq!(g.iter_column().count(), 0);
        assert_eq!(g.iter_chunks(ChunkSize(2)).count(), 0);
    }

    #[test]
    fn derived_chunk_sizes() {
        let options = ChunkOptions::default();
        let size = |w, h| chunk_size(MazeSize::new(w, h).unwrap(), &options);
        assert_eq!(size(1, 1), ChunkSize(1));
        assert_eq!(size(10, 10), ChunkSize(1));
        assert_eq!(size(11, 10), ChunkSize(2));
        assert_eq!(size(100, 100), ChunkSize(10));
        assert_eq!(size(1000, 1000), ChunkSize(DEFAULT_MAX_CHUNK_SIZE));
        assert_eq!(size(0, 0), ChunkSize(1));
    }

    #[test]
    fn custom_chunk_sizes_are_capped() {
        let dims = MazeSize::new(20, 20).unwrap();
        let custom = |custom_size, max_size| {
            chunk_size(dims, &ChunkOptions { custom_size, max_size })
        };
        assert_eq!(custom(Some(5), 32), ChunkSize(5));
        assert_eq!(custom(Some(50), 8), ChunkSize(8));
        assert_eq!(custom(Some(0), 8), ChunkSize(1));
        assert_eq!(custom(None, 1), ChunkSize(1));
    }

    #[test]
    fn chunks_cover_every_cell_once() {
        let g = small_grid(5, 3);
        let chunks = g.iter_chunks(ChunkSize(2)).collect::<Vec<_>>();
        assert_eq!(g.iter_chunks(ChunkSize(2)).chunk_counts(), (3, 2));
        assert_eq!(chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
                   vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);

        let mut covered = chunks.iter().flat_map(|c| c.cells.iter().cloned()).collect::<Vec<_>>();
        covered.sort();
        let mut all = g.iter().collect::<Vec<_>>();
        all.sort();
        assert_eq!(covered, all);
    }

    #[test]
    fn chunk_cells_are_clipped_at_the_edges() {
        let g = small_grid(3, 3);
        let chunks = g.iter_chunks(ChunkSize(2)).collect::<Vec<_>>();
        assert_eq!(chunks[0].cells, vec![gc(0, 0), gc(0, 1), gc(1, 0), gc(1, 1)]);
        assert_eq!(chunks[1].cells, vec![gc(0, 2), gc(1, 2)]);
        assert_eq!(chunks[3].cells, vec![gc(2, 2)]);
    }
}
