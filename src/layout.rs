//! Pure grid layout calculations.
//!
//! All functions here are pure and testable without any I/O or images.
//! The filmstrip builder ([`crate::filmstrip`]) plans every canvas with this
//! module before it touches a single pixel.
//!
//! A filmstrip is an n×n grid of uniform cells. The cell size is the maximum
//! width/height over the batch, so every image fits without cropping; images
//! smaller than the cell are centered inside it.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no images to arrange")]
    NoImages,
    #[error("grid size {side}x{side} is too small for {count} images")]
    GridTooSmall { side: u32, count: usize },
}

/// Smallest grid side `n` such that `n * n >= count`.
///
/// Perfect squares produce an exact fit; anything else rounds up, leaving
/// `n² − count` empty trailing cells.
///
/// ```
/// # use png_filmstrip::layout::auto_side;
/// assert_eq!(auto_side(9), 3);   // exact 3×3
/// assert_eq!(auto_side(10), 4);  // 4×4 with 6 empty cells
/// assert_eq!(auto_side(16), 4);
/// ```
pub fn auto_side(count: usize) -> u32 {
    let mut side = (count as f64).sqrt().floor() as u32;
    while (side as usize) * (side as usize) < count {
        side += 1;
    }
    side
}

/// Maximum width and height over a batch of image dimensions.
///
/// This is the uniform cell size: the smallest cell that fits every image in
/// the batch without cropping.
pub fn max_cell(dims: &[(u32, u32)]) -> (u32, u32) {
    dims.iter().fold((0, 0), |(w, h), &(iw, ih)| {
        (w.max(iw), h.max(ih))
    })
}

/// A fully resolved grid: side length, uniform cell size, and image count.
///
/// Invariant: `side² >= total`. The constructor rejects anything else, so a
/// `GridSpec` in hand is always a valid plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub side: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub total: usize,
}

/// Where one image lands on the canvas.
///
/// `x`/`y` are the final paste coordinates: cell origin plus the centering
/// offset. `row`/`col` and the offsets are kept separately so callers can
/// report grid positions without re-deriving them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: u32,
    pub col: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub x: u32,
    pub y: u32,
}

impl GridSpec {
    /// Resolve a grid for `count` images with the given uniform cell size.
    ///
    /// With no override the side is [`auto_side`]. A manual override is used
    /// as-is — including overrides larger than necessary, which just leave
    /// more empty cells — but fails if its capacity is below `count`.
    pub fn new(
        count: usize,
        cell: (u32, u32),
        override_side: Option<u32>,
    ) -> Result<Self, LayoutError> {
        if count == 0 {
            return Err(LayoutError::NoImages);
        }
        let side = match override_side {
            Some(side) if (side as usize) * (side as usize) < count => {
                return Err(LayoutError::GridTooSmall { side, count });
            }
            Some(side) => side,
            None => auto_side(count),
        };
        Ok(Self {
            side,
            cell_width: cell.0,
            cell_height: cell.1,
            total: count,
        })
    }

    pub fn canvas_width(&self) -> u32 {
        self.side * self.cell_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.side * self.cell_height
    }

    /// Number of grid cells without an image (`side² − total`).
    pub fn empty_cells(&self) -> usize {
        (self.side as usize) * (self.side as usize) - self.total
    }

    /// Placement for the image at `index` (row-major: left to right, top to
    /// bottom), centered within its cell.
    ///
    /// ```
    /// # use png_filmstrip::layout::GridSpec;
    /// let spec = GridSpec::new(5, (100, 80), None).unwrap();
    /// let p = spec.placement(4, 60, 80);
    /// assert_eq!((p.row, p.col), (1, 1));
    /// assert_eq!((p.offset_x, p.offset_y), (20, 0));
    /// assert_eq!((p.x, p.y), (120, 80));
    /// ```
    pub fn placement(&self, index: usize, width: u32, height: u32) -> Placement {
        let row = index as u32 / self.side;
        let col = index as u32 % self.side;
        let offset_x = self.cell_width.saturating_sub(width) / 2;
        let offset_y = self.cell_height.saturating_sub(height) / 2;
        Placement {
            row,
            col,
            offset_x,
            offset_y,
            x: col * self.cell_width + offset_x,
            y: row * self.cell_height + offset_y,
        }
    }
}
