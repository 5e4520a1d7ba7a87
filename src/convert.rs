//! Batch conversion of images to WebP.
//!
//! Walks a single input directory, re-encodes every supported image to WebP
//! at the configured quality, and writes the results into an output
//! directory under the same base filename with a `.webp` extension.
//!
//! ## Failure model
//!
//! A file that fails to decode or encode is logged as a warning and skipped;
//! the batch carries on. The batch as a whole fails only when there was
//! nothing to do: no supported files in the directory, or every single file
//! failed. Processing is sequential, one decoded image resident at a time.

use crate::codec::{self, CodecError, Quality};
use crate::output;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("no image files found in {0}")]
    NoImages(PathBuf),
    #[error("no images could be converted from {0}")]
    NothingConverted(PathBuf),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for one batch run, passed explicitly — no ambient state.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub quality: Quality,
    /// Show a progress bar while converting.
    pub progress: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            progress: false,
        }
    }
}

/// Result of a batch: the files written (in input order) and the skip count.
#[derive(Debug)]
pub struct BatchOutcome {
    pub outputs: Vec<PathBuf>,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn converted(&self) -> usize {
        self.outputs.len()
    }

    /// Number of input files considered (successes + failures).
    pub fn total(&self) -> usize {
        self.outputs.len() + self.failed
    }
}

/// Output path for a converted input: same stem, `.webp` extension, placed
/// in `output_dir`.
pub fn webp_target(output_dir: &Path, input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".webp");
    output_dir.join(name)
}

/// Convert a single file to WebP.
pub fn convert_file(input: &Path, output: &Path, quality: Quality) -> Result<(), CodecError> {
    let decoded = codec::decode(input)?;
    codec::encode_webp(&decoded, output, quality)
}

/// Convert every supported image in `input_dir` to WebP in `output_dir`.
///
/// Per-file failures are warned and skipped; the call fails only if the
/// directory holds no supported images or nothing converted successfully.
pub fn convert_dir(
    input_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<BatchOutcome, ConvertError> {
    let files = codec::image_files(input_dir)?;
    if files.is_empty() {
        return Err(ConvertError::NoImages(input_dir.to_path_buf()));
    }
    std::fs::create_dir_all(output_dir).map_err(|source| ConvertError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let bar = output::progress_bar(files.len() as u64, options.progress);
    let mut outputs = Vec::new();
    let mut failed = 0;
    for file in &files {
        let target = webp_target(output_dir, file);
        match convert_file(file, &target, options.quality) {
            Ok(()) => {
                debug!("converted {} -> {}", file.display(), target.display());
                outputs.push(target);
            }
            Err(err) => {
                warn!("{err} (skipped)");
                failed += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if outputs.is_empty() {
        return Err(ConvertError::NothingConverted(input_dir.to_path_buf()));
    }
    info!("converted {} of {} files", outputs.len(), files.len());
    Ok(BatchOutcome { outputs, failed })
}
