//! Contact-sheet composition for the sampling pass.
//!
//! [`FrameGrid`] places scaled frames into the cells of a [`GridLayout`] in
//! row-major order, each with a `Frame: <index>` title band above it.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{GenericImage, Rgb, RgbImage, imageops::FilterType};
use imageproc::drawing::draw_text_mut;

use crate::error::InspectError;
use crate::source::Frame;

/// Height of the title band above each thumbnail, in pixels.
const TITLE_BAND_HEIGHT: u32 = 24;
const TITLE_SCALE: f32 = 18.0;
const TITLE_MARGIN: i32 = 4;
const TITLE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Dimensions of a frame grid in cells.
///
/// # Example
///
/// ```
/// use vidinspect::GridLayout;
///
/// let layout = GridLayout::for_capacity(100, 10);
/// assert_eq!((layout.columns, layout.rows), (10, 10));
///
/// let layout = GridLayout::for_capacity(250, 10);
/// assert_eq!((layout.columns, layout.rows), (10, 25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl GridLayout {
    /// Smallest layout with at most `max_columns` columns that holds
    /// `capacity` cells.
    ///
    /// A capacity of zero yields an empty layout. `max_columns` is clamped
    /// to at least 1.
    pub fn for_capacity(capacity: usize, max_columns: u32) -> Self {
        if capacity == 0 {
            return Self {
                columns: 0,
                rows: 0,
            };
        }
        let columns = (capacity as u64).min(max_columns.max(1) as u64) as u32;
        let rows = (capacity as u64).div_ceil(columns as u64) as u32;
        Self { columns, rows }
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// `(column, row)` of the cell at `index`, or `None` past the last cell.
    pub fn cell_position(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.cells() {
            return None;
        }
        let columns = self.columns as usize;
        Some(((index % columns) as u32, (index / columns) as u32))
    }
}

/// Fonts tried for cell titles when none is configured.
pub(crate) const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// First of `candidates` that exists as a file.
pub(crate) fn find_system_font<'a>(candidates: &[&'a str]) -> Option<&'a Path> {
    candidates
        .iter()
        .map(|candidate| Path::new(*candidate))
        .find(|path| path.is_file())
}

/// Load a TrueType/OpenType font for cell titles.
///
/// # Errors
///
/// Returns [`InspectError::IoError`] if the file cannot be read, or
/// [`InspectError::FontError`] if it is not a usable font.
pub fn load_title_font(path: &Path) -> Result<FontVec, InspectError> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|error| {
        InspectError::FontError(format!("{}: {error}", path.display()))
    })
}

/// A grid of titled frame thumbnails.
///
/// The canvas is allocated when the first frame is placed; the thumbnail
/// height is derived from that frame's aspect ratio. Cells that never
/// receive a frame stay blank.
pub struct FrameGrid {
    layout: GridLayout,
    thumbnail_width: u32,
    title_font: Option<FontVec>,
    canvas: Option<RgbImage>,
    thumbnail_height: u32,
    placed: Vec<u64>,
}

impl FrameGrid {
    /// Create an empty grid. `thumbnail_width` is clamped to at least 1.
    pub fn new(layout: GridLayout, thumbnail_width: u32) -> Self {
        Self {
            layout,
            thumbnail_width: thumbnail_width.max(1),
            title_font: None,
            canvas: None,
            thumbnail_height: 0,
            placed: Vec::new(),
        }
    }

    /// Draw cell titles with `font`.
    pub fn with_title_font(mut self, font: FontVec) -> Self {
        self.title_font = Some(font);
        self
    }

    /// Grid dimensions.
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Frame indices placed so far, in placement order.
    pub fn placed(&self) -> &[u64] {
        &self.placed
    }

    /// `true` when every cell holds a frame.
    pub fn is_full(&self) -> bool {
        self.placed.len() >= self.layout.cells()
    }

    /// The composed image, or `None` if nothing has been placed.
    pub fn image(&self) -> Option<&RgbImage> {
        self.canvas.as_ref()
    }

    /// Place `frame` into the next open cell.
    ///
    /// Returns `Ok(false)` without drawing when the grid is full.
    pub fn place(&mut self, frame: &Frame) -> Result<bool, InspectError> {
        let Some((column, row)) = self.layout.cell_position(self.placed.len()) else {
            return Ok(false);
        };

        if self.canvas.is_none() {
            let thumbnail_height =
                scaled_height(frame.image.width(), frame.image.height(), self.thumbnail_width);
            let (width, height) = self.canvas_size(thumbnail_height)?;
            self.thumbnail_height = thumbnail_height;
            self.canvas = Some(RgbImage::from_pixel(width, height, BACKGROUND));
            log::debug!(
                "Allocated {}x{} grid canvas ({}x{} thumbnails)",
                self.layout.columns,
                self.layout.rows,
                self.thumbnail_width,
                self.thumbnail_height,
            );
        }

        let thumbnail = frame
            .image
            .resize_exact(self.thumbnail_width, self.thumbnail_height, FilterType::Triangle)
            .to_rgb8();

        let x = column * self.thumbnail_width;
        let y = row * (self.thumbnail_height + TITLE_BAND_HEIGHT);

        if let Some(canvas) = self.canvas.as_mut() {
            canvas.copy_from(&thumbnail, x, y + TITLE_BAND_HEIGHT)?;
            if let Some(font) = &self.title_font {
                draw_text_mut(
                    canvas,
                    TITLE_COLOR,
                    x as i32 + TITLE_MARGIN,
                    y as i32 + TITLE_MARGIN,
                    PxScale::from(TITLE_SCALE),
                    font,
                    &format!("Frame: {}", frame.index),
                );
            }
        }

        self.placed.push(frame.index);
        Ok(true)
    }

    /// Canvas dimensions for thumbnails `thumbnail_height` pixels tall.
    fn canvas_size(&self, thumbnail_height: u32) -> Result<(u32, u32), InspectError> {
        let too_large = || InspectError::GridTooLarge {
            columns: self.layout.columns,
            rows: self.layout.rows,
            cell_width: self.thumbnail_width,
            cell_height: thumbnail_height.saturating_add(TITLE_BAND_HEIGHT),
        };
        let cell_height = thumbnail_height
            .checked_add(TITLE_BAND_HEIGHT)
            .ok_or_else(too_large)?;
        let width = self
            .thumbnail_width
            .checked_mul(self.layout.columns)
            .ok_or_else(too_large)?;
        let height = cell_height
            .checked_mul(self.layout.rows)
            .ok_or_else(too_large)?;
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(too_large)?;
        Ok((width, height))
    }
}

/// Height that preserves the `width`:`height` aspect at `target_width`.
fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 || height == 0 {
        return target_width;
    }
    let scale = target_width as f64 / width as f64;
    ((height as f64 * scale).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use image::DynamicImage;

    use super::*;

    fn solid_frame(index: u64, width: u32, height: u32) -> Frame {
        Frame {
            index,
            image: DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 10, 10]))),
        }
    }

    #[test]
    fn layout_defaults_to_ten_by_ten() {
        let layout = GridLayout::for_capacity(100, 10);
        assert_eq!(layout, GridLayout { columns: 10, rows: 10 });
        assert_eq!(layout.cells(), 100);
    }

    #[test]
    fn layout_grows_rows_past_one_hundred() {
        let layout = GridLayout::for_capacity(101, 10);
        assert_eq!((layout.columns, layout.rows), (10, 11));
        assert!(layout.cells() >= 101);
    }

    #[test]
    fn layout_small_capacity_uses_single_row() {
        let layout = GridLayout::for_capacity(3, 10);
        assert_eq!((layout.columns, layout.rows), (3, 1));
    }

    #[test]
    fn layout_zero_capacity_is_empty() {
        let layout = GridLayout::for_capacity(0, 10);
        assert_eq!(layout.cells(), 0);
        assert_eq!(layout.cell_position(0), None);
    }

    #[test]
    fn layout_clamps_zero_columns() {
        let layout = GridLayout::for_capacity(4, 0);
        assert_eq!((layout.columns, layout.rows), (1, 4));
    }

    #[test]
    fn cell_positions_are_row_major() {
        let layout = GridLayout::for_capacity(100, 10);
        assert_eq!(layout.cell_position(0), Some((0, 0)));
        assert_eq!(layout.cell_position(9), Some((9, 0)));
        assert_eq!(layout.cell_position(10), Some((0, 1)));
        assert_eq!(layout.cell_position(99), Some((9, 9)));
        assert_eq!(layout.cell_position(100), None);
    }

    #[test]
    fn canvas_size_follows_aspect_ratio() {
        let mut grid = FrameGrid::new(GridLayout::for_capacity(4, 2), 160);
        assert!(grid.image().is_none());

        assert!(grid.place(&solid_frame(0, 320, 180)).unwrap());
        let canvas = grid.image().unwrap();
        assert_eq!(canvas.width(), 320);
        assert_eq!(canvas.height(), 2 * (90 + TITLE_BAND_HEIGHT));
    }

    #[test]
    fn thumbnail_lands_below_title_band() {
        let mut grid = FrameGrid::new(GridLayout::for_capacity(2, 2), 16);
        grid.place(&solid_frame(0, 16, 16)).unwrap();
        grid.place(&solid_frame(10, 16, 16)).unwrap();

        let canvas = grid.image().unwrap();
        assert_eq!(*canvas.get_pixel(1, 1), BACKGROUND);
        assert_eq!(*canvas.get_pixel(8, TITLE_BAND_HEIGHT + 8), Rgb([200, 10, 10]));
        assert_eq!(*canvas.get_pixel(24, TITLE_BAND_HEIGHT + 8), Rgb([200, 10, 10]));
    }

    #[test]
    fn place_refuses_when_full() {
        let mut grid = FrameGrid::new(GridLayout::for_capacity(2, 10), 8);
        assert!(grid.place(&solid_frame(0, 8, 8)).unwrap());
        assert!(grid.place(&solid_frame(10, 8, 8)).unwrap());
        assert!(grid.is_full());
        assert!(!grid.place(&solid_frame(20, 8, 8)).unwrap());
        assert_eq!(grid.placed(), &[0, 10]);
    }

    #[test]
    fn oversized_grid_is_an_error() {
        let mut grid = FrameGrid::new(GridLayout::for_capacity(500_000_000, 10), 192);
        let result = grid.place(&solid_frame(0, 1920, 1080));
        assert!(matches!(result, Err(InspectError::GridTooLarge { rows: 50_000_000, .. })));
        assert!(grid.image().is_none());
        assert!(grid.placed().is_empty());
    }

    #[test]
    fn font_search_takes_first_existing_file() {
        let directory = tempfile::tempdir().unwrap();
        let present = directory.path().join("present.ttf");
        std::fs::write(&present, b"not really a font").unwrap();
        let present = present.to_str().unwrap();

        assert_eq!(
            find_system_font(&["no/such/font.ttf", present, "also/missing.ttf"]),
            Some(Path::new(present))
        );
        assert_eq!(find_system_font(&["no/such/font.ttf"]), None);
        assert_eq!(find_system_font(&[directory.path().to_str().unwrap()]), None);
    }

    #[test]
    fn missing_font_is_an_error() {
        let result = load_title_font(Path::new("no/such/font.ttf"));
        assert!(matches!(result, Err(InspectError::IoError(_))));
    }
}
