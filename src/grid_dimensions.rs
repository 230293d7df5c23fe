use std::cmp;
use std::error::Error;
use std::fmt;
use std::mem;

use crate::cells::{Cartesian2DCoordinate, MazeCell};
use crate::units::{CellsCount, Height, Width};

/// Why a requested maze size was rejected.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SizeError {
    NegativeWidth(i64),
    NegativeHeight(i64),
    TooLarge { width: i64, height: i64 },
}

impl fmt::Display for SizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SizeError::NegativeWidth(w) => write!(f, "maze width cannot be negative, got {}", w),
            SizeError::NegativeHeight(h) => write!(f, "maze height cannot be negative, got {}", h),
            SizeError::TooLarge { width, height } => {
                write!(f, "maze size {} x {} is too large", width, height)
            }
        }
    }
}

impl Error for SizeError {}

/// The width and height of a rectangular maze, checked before any grid is allocated.
///
/// A zero width or height is allowed and describes an empty maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct MazeSize {
    width: usize,
    height: usize,
}

impl MazeSize {
    /// Validate a caller supplied size.
    ///
    /// Negative dimensions are rejected rather than clamped. Each dimension has to fit a `u32`
    /// coordinate, and one cell or one coordinate per cell has to fit in a single allocation.
    pub fn new(width: i64, height: i64) -> Result<MazeSize, SizeError> {
        if width < 0 {
            return Err(SizeError::NegativeWidth(width));
        }
        if height < 0 {
            return Err(SizeError::NegativeHeight(height));
        }

        let too_large = SizeError::TooLarge { width, height };
        if width > i64::from(u32::MAX) || height > i64::from(u32::MAX) {
            return Err(too_large);
        }
        let (w, h) = (width as usize, height as usize);
        let bytes_per_cell = cmp::max(mem::size_of::<MazeCell>(), mem::size_of::<Cartesian2DCoordinate>());
        match w.checked_mul(h).and_then(|cells| cells.checked_mul(bytes_per_cell)) {
            Some(bytes) if bytes <= isize::MAX as usize => {}
            _ => return Err(too_large),
        }

        Ok(MazeSize { width: w, height: h })
    }

    pub fn square(side: u32) -> Result<MazeSize, SizeError> {
        MazeSize::new(i64::from(side), i64::from(side))
    }

    #[inline]
    pub fn width(&self) -> Width {
        Width(self.width)
    }

    #[inline]
    pub fn height(&self) -> Height {
        Height(self.height)
    }

    #[inline]
    pub fn cells_count(&self) -> CellsCount {
        CellsCount(self.width * self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for MazeSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn valid_sizes() {
        let size = MazeSize::new(4, 3).expect("valid size");
        assert_eq!(size.width(), Width(4));
        assert_eq!(size.height(), Height(3));
        assert_eq!(size.cells_count(), CellsCount(12));
        assert!(!size.is_empty());
        assert_eq!(MazeSize::square(5).unwrap().cells_count(), CellsCount(25));
    }

    #[test]
    fn zero_dimensions_are_empty() {
        for &(w, h) in &[(0, 0), (0, 5), (5, 0)] {
            let size = MazeSize::new(w, h).expect("zero dimensions are valid");
            assert!(size.is_empty());
            assert_eq!(size.cells_count(), CellsCount(0));
        }
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        assert_eq!(MazeSize::new(-1, 3), Err(SizeError::NegativeWidth(-1)));
        assert_eq!(MazeSize::new(3, -7), Err(SizeError::NegativeHeight(-7)));
        assert_eq!(MazeSize::new(-2, -2), Err(SizeError::NegativeWidth(-2)));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let huge = i64::from(u32::MAX) + 1;
        assert_eq!(MazeSize::new(huge, 1),
                   Err(SizeError::TooLarge { width: huge, height: 1 }));
        assert_eq!(MazeSize::new(1, huge),
                   Err(SizeError::TooLarge { width: 1, height: huge }));
    }

    #[test]
    fn unallocatable_cell_counts_are_rejected() {
        let side = i64::from(u32::MAX);
        assert_eq!(MazeSize::new(side, side),
                   Err(SizeError::TooLarge { width: side, height: side }));
        assert_eq!(MazeSize::new(side, 0).map(|size| size.is_empty()), Ok(true));
    }

    #[test]
    fn error_messages() {
        assert_eq!(SizeError::NegativeWidth(-3).to_string(),
                   "maze width cannot be negative, got -3");
        assert_eq!(MazeSize::new(3, 2).unwrap().to_string(), "3 x 2");
    }
}
