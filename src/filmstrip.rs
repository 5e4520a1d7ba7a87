//! Filmstrip assembly: composite a batch of images into one n×n grid.
//!
//! The build is two-pass to bound peak memory:
//!
//! 1. **Probe pass** reads only the dimensions of every input (no pixel
//!    decode) to size the uniform cell and resolve the grid.
//! 2. **Composite pass** decodes one image at a time and alpha-blends it
//!    onto the canvas at its computed placement, then drops it.
//!
//! At any moment only one decoded image plus the in-progress canvas are
//! resident. All grid arithmetic lives in [`crate::layout`]; this module
//! adds the I/O around it.
//!
//! ## Failure model
//!
//! Unreadable inputs are warned and dropped in the probe pass; a file that
//! probes fine but fails to decode in the composite pass is warned and its
//! cell stays transparent. The build fails outright only when the image set
//! ends up empty, the manual grid override is too small, or the output
//! cannot be written.

use crate::codec::{self, CodecError, Quality};
use crate::layout::{self, GridSpec, LayoutError};
use crate::output;
use image::{RgbaImage, imageops};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilmstripError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("no image files found in {0}")]
    NoImages(PathBuf),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for one filmstrip build, passed explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilmstripOptions {
    pub quality: Quality,
    /// Manual grid side override (`n` for an n×n grid). Must satisfy
    /// `n² >= image count`.
    pub grid_override: Option<u32>,
    /// Show a progress bar while compositing.
    pub progress: bool,
}

/// What one build produced.
#[derive(Debug)]
pub struct FilmstripSummary {
    pub spec: GridSpec,
    /// Images actually composited onto the canvas.
    pub placed: usize,
    /// Inputs skipped for decode failures (probe or composite pass).
    pub skipped: usize,
    pub output: PathBuf,
    pub output_bytes: u64,
}

/// Build a filmstrip from every supported image in `input_dir`, written to
/// the file at `output`.
///
/// Files are taken in lexicographic order, which fixes the left-to-right,
/// top-to-bottom cell assignment.
pub fn build_from_dir(
    input_dir: &Path,
    output: &Path,
    options: &FilmstripOptions,
) -> Result<FilmstripSummary, FilmstripError> {
    let files = codec::image_files(input_dir)?;
    if files.is_empty() {
        return Err(FilmstripError::NoImages(input_dir.to_path_buf()));
    }
    build(&files, output, options)
}

/// Build a filmstrip from an explicit, ordered list of image files.
pub fn build(
    files: &[PathBuf],
    output: &Path,
    options: &FilmstripOptions,
) -> Result<FilmstripSummary, FilmstripError> {
    // Probe pass: dimensions only. Unreadable files drop out here, so the
    // survivors occupy consecutive cells and the cell size reflects only
    // images that can actually be placed.
    let mut sized: Vec<(&PathBuf, (u32, u32))> = Vec::with_capacity(files.len());
    for file in files {
        match codec::dimensions(file) {
            Ok(dims) => sized.push((file, dims)),
            Err(err) => warn!("{err} (skipped)"),
        }
    }

    let dims: Vec<(u32, u32)> = sized.iter().map(|&(_, d)| d).collect();
    let spec = GridSpec::new(sized.len(), layout::max_cell(&dims), options.grid_override)?;
    debug!(
        "arranging {} images on a {}x{} grid of {}x{}px cells",
        spec.total, spec.side, spec.side, spec.cell_width, spec.cell_height
    );

    // Transparent background; unused trailing cells stay this way.
    let mut canvas = RgbaImage::new(spec.canvas_width(), spec.canvas_height());

    let bar = output::progress_bar(sized.len() as u64, options.progress);
    let mut placed = 0;
    let mut skipped = files.len() - sized.len();
    for (index, (file, _)) in sized.iter().enumerate() {
        match codec::decode(file) {
            Ok(decoded) => {
                let p = spec.placement(index, decoded.width(), decoded.height());
                imageops::overlay(&mut canvas, &decoded.to_rgba(), i64::from(p.x), i64::from(p.y));
                debug!("placed {} at ({}, {})", file.display(), p.row, p.col);
                placed += 1;
            }
            Err(err) => {
                warn!("{err} (cell left empty)");
                skipped += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if placed == 0 {
        return Err(FilmstripError::Layout(LayoutError::NoImages));
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| FilmstripError::OutputDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    codec::encode_webp_rgba(&canvas, output, options.quality)?;

    let output_bytes = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    info!(
        "filmstrip saved to {} ({}x{}px)",
        output.display(),
        spec.canvas_width(),
        spec.canvas_height()
    );
    Ok(FilmstripSummary {
        spec,
        placed,
        skipped,
        output: output.to_path_buf(),
        output_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::create_test_png;
    use tempfile::TempDir;

    fn lossless() -> FilmstripOptions {
        FilmstripOptions {
            quality: Quality::new(100),
            ..Default::default()
        }
    }

    /// Populate a directory with `count` uniform PNGs named `img_NN.png`.
    fn fill_dir(dir: &Path, count: usize, width: u32, height: u32) {
        std::fs::create_dir_all(dir).unwrap();
        for i in 0..count {
            create_test_png(&dir.join(format!("img_{i:02}.png")), width, height);
        }
    }

    fn alpha_at(canvas: &RgbaImage, x: u32, y: u32) -> u8 {
        canvas.get_pixel(x, y)[3]
    }

    // =========================================================================
    // Grid scenarios
    // =========================================================================

    #[test]
    fn nine_uniform_images_fill_a_three_by_three_grid() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 9, 100, 100);

        let out = tmp.path().join("strip.webp");
        let summary = build_from_dir(&input, &out, &lossless()).unwrap();

        assert_eq!(summary.spec.side, 3);
        assert_eq!(summary.placed, 9);
        assert_eq!(summary.spec.empty_cells(), 0);
        assert_eq!(codec::dimensions(&out).unwrap(), (300, 300));

        // Every cell center is covered
        let canvas = codec::decode(&out).unwrap().to_rgba();
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(alpha_at(&canvas, col * 100 + 50, row * 100 + 50), 255);
            }
        }
    }

    #[test]
    fn ten_images_round_up_to_four_by_four_with_transparent_tail() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 10, 100, 100);

        let out = tmp.path().join("strip.webp");
        let summary = build_from_dir(&input, &out, &lossless()).unwrap();

        assert_eq!(summary.spec.side, 4);
        assert_eq!(summary.placed, 10);
        assert_eq!(summary.spec.empty_cells(), 6);
        assert_eq!(codec::dimensions(&out).unwrap(), (400, 400));

        let canvas = codec::decode(&out).unwrap().to_rgba();
        // Cells 0-9 row-major are covered...
        assert_eq!(alpha_at(&canvas, 50, 50), 255); // cell 0
        assert_eq!(alpha_at(&canvas, 150, 250), 255); // cell 9 = (2, 1)
        // ...and the tail stays background
        assert_eq!(alpha_at(&canvas, 250, 250), 0); // cell 10 = (2, 2)
        assert_eq!(alpha_at(&canvas, 350, 350), 0); // cell 15 = (3, 3)
    }

    #[test]
    fn smaller_images_are_centered_in_their_cells() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        std::fs::create_dir(&input).unwrap();
        create_test_png(&input.join("a.png"), 100, 100);
        create_test_png(&input.join("b.png"), 50, 50);

        let out = tmp.path().join("strip.webp");
        let summary = build_from_dir(&input, &out, &lossless()).unwrap();

        // Cell is the batch max: 100x100, grid 2x2
        assert_eq!(summary.spec.side, 2);
        assert_eq!((summary.spec.cell_width, summary.spec.cell_height), (100, 100));

        let canvas = codec::decode(&out).unwrap().to_rgba();
        // b.png sits in cell (0, 1) with a 25px margin on every side
        assert_eq!(alpha_at(&canvas, 150, 50), 255); // inside the centered image
        assert_eq!(alpha_at(&canvas, 110, 50), 0); // inside the cell, outside the image
        assert_eq!(alpha_at(&canvas, 190, 50), 0);
    }

    // =========================================================================
    // Grid override
    // =========================================================================

    #[test]
    fn too_small_override_fails_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 5, 40, 40);

        let out = tmp.path().join("strip.webp");
        let options = FilmstripOptions {
            grid_override: Some(2),
            ..Default::default()
        };
        let err = build_from_dir(&input, &out, &options).unwrap_err();

        assert!(matches!(
            err,
            FilmstripError::Layout(LayoutError::GridTooSmall { side: 2, count: 5 })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn larger_override_is_honored() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 5, 40, 40);

        let out = tmp.path().join("strip.webp");
        let options = FilmstripOptions {
            grid_override: Some(4),
            ..Default::default()
        };
        let summary = build_from_dir(&input, &out, &options).unwrap();

        assert_eq!(summary.spec.side, 4);
        assert_eq!(codec::dimensions(&out).unwrap(), (160, 160));
    }

    // =========================================================================
    // Failure handling
    // =========================================================================

    #[test]
    fn corrupt_files_are_skipped_and_survivors_compact() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 3, 50, 50);
        std::fs::write(input.join("broken.png"), b"garbage").unwrap();

        let out = tmp.path().join("strip.webp");
        let summary = build_from_dir(&input, &out, &lossless()).unwrap();

        assert_eq!(summary.placed, 3);
        assert_eq!(summary.skipped, 1);
        // 3 readable images: 2x2 grid, cells 0-2 filled, cell 3 empty
        assert_eq!(summary.spec.side, 2);
        let canvas = codec::decode(&out).unwrap().to_rgba();
        assert_eq!(alpha_at(&canvas, 75, 75), 0);
    }

    #[test]
    fn empty_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("strip.webp");
        let result = build_from_dir(tmp.path(), &out, &FilmstripOptions::default());
        assert!(matches!(result, Err(FilmstripError::NoImages(_))));
    }

    #[test]
    fn all_corrupt_is_fatal_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("a.png"), b"nope").unwrap();

        let out = tmp.path().join("strip.webp");
        let result = build_from_dir(&input, &out, &FilmstripOptions::default());
        assert!(matches!(
            result,
            Err(FilmstripError::Layout(LayoutError::NoImages))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn unwritable_output_parent_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 1, 10, 10);

        // Output parent is a regular file, so it cannot become a directory
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let out = blocker.join("strip.webp");

        let result = build_from_dir(&input, &out, &FilmstripOptions::default());
        assert!(matches!(result, Err(FilmstripError::OutputDir { .. })));
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    #[test]
    fn repeated_builds_are_identical() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 7, 30, 20);

        let first = tmp.path().join("first.webp");
        let second = tmp.path().join("second.webp");
        build_from_dir(&input, &first, &lossless()).unwrap();
        build_from_dir(&input, &second, &lossless()).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn summary_reports_output_size() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fill_dir(&input, 2, 16, 16);

        let out = tmp.path().join("strip.webp");
        let summary = build_from_dir(&input, &out, &FilmstripOptions::default()).unwrap();
        assert_eq!(summary.output_bytes, std::fs::metadata(&out).unwrap().len());
        assert!(summary.output_bytes > 0);
    }
}
