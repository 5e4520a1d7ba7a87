//! Decoding and WebP encoding — pure Rust, zero external dependencies.
//!
//! Everything is statically linked into the binary: no libwebp, no
//! ImageMagick, no system packages. The `image` crate provides every decoder
//! and the lossless VP8L WebP encoder.
//!
//! ## Lossy quality without libwebp
//!
//! `image` only ships a *lossless* WebP encoder. Rather than pull in C
//! bindings for VP8 lossy encoding, quality below 100 is implemented as a
//! perceptual RGB quantizer: color channels are snapped to a reduced palette
//! (alpha untouched) before lossless encoding, trading detail for
//! compressibility. Quality 100 skips quantization entirely and is exactly
//! lossless.
//!
//! ## Color modes
//!
//! Decoded images are classified into a closed [`ColorMode`] with one
//! conversion rule per mode: alpha-bearing modes (RGBA, grayscale+alpha)
//! encode as RGBA8 so transparency survives; everything else encodes as RGB8.

use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage, ExtendedColorType, ImageReader, RgbaImage};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Extensions accepted as conversion and filmstrip inputs.
///
/// PNG is the primary input; the rest are formats whose decoders are
/// compiled in.
pub const INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Whether a path has a supported input extension (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| INPUT_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

/// List the supported image files directly inside `dir`, sorted
/// lexicographically by path.
///
/// The sort is what makes every downstream operation deterministic: grid
/// placement is "left to right, top to bottom" in exactly this order.
pub fn image_files(dir: &Path) -> Result<Vec<PathBuf>, CodecError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CodecError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image_file(p))
        .collect();
    files.sort();
    Ok(files)
}

/// WebP quality setting (0-100, default 90). 100 denotes lossless.
///
/// ```
/// # use png_filmstrip::codec::Quality;
/// assert_eq!(Quality::new(150).value(), 100);
/// assert!(Quality::new(100).is_lossless());
/// assert!(!Quality::default().is_lossless());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_lossless(self) -> bool {
        self.0 == 100
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Color mode of a decoded image.
///
/// Closed set: every decodable input maps to exactly one variant, and each
/// variant has a fixed conversion rule into the canonical encoding form
/// (see [`ColorMode::has_alpha`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    GrayscaleAlpha,
    /// Anything else (plain grayscale, high-bit-depth exotics). Treated as
    /// opaque and encoded as RGB8.
    Other,
}

impl ColorMode {
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Self::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Self::Rgba,
            ColorType::La8 | ColorType::La16 => Self::GrayscaleAlpha,
            _ => Self::Other,
        }
    }

    /// Modes that carry transparency and must round-trip through RGBA8.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba | Self::GrayscaleAlpha)
    }
}

/// An image decoded into memory, ready to be re-encoded or composited.
///
/// Immutable once read: the pixel data is consumed by exactly one encode or
/// one paste, then dropped.
pub struct DecodedImage {
    pub path: PathBuf,
    pub mode: ColorMode,
    image: DynamicImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Promote to the canonical RGBA8 form used for compositing.
    pub fn to_rgba(&self) -> RgbaImage {
        self.image.to_rgba8()
    }
}

/// Decode an image file into memory.
pub fn decode(path: &Path) -> Result<DecodedImage, CodecError> {
    let image = ImageReader::open(path)
        .map_err(|source| CodecError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| CodecError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let mode = ColorMode::of(&image);
    Ok(DecodedImage {
        path: path.to_path_buf(),
        mode,
        image,
    })
}

/// Read only the dimensions of an image file, without decoding pixel data.
pub fn dimensions(path: &Path) -> Result<(u32, u32), CodecError> {
    image::image_dimensions(path).map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode a decoded image to WebP at `output`.
///
/// Alpha-bearing modes keep their alpha channel; everything else is written
/// as RGB8, mirroring the mode table on [`ColorMode`].
pub fn encode_webp(
    image: &DecodedImage,
    output: &Path,
    quality: Quality,
) -> Result<(), CodecError> {
    if image.mode.has_alpha() {
        let mut pixels = image.image.to_rgba8().into_raw();
        if !quality.is_lossless() {
            quantize_rgb(&mut pixels, 4, quality.value());
        }
        write_webp(
            output,
            &pixels,
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
    } else {
        let mut pixels = image.image.to_rgb8().into_raw();
        if !quality.is_lossless() {
            quantize_rgb(&mut pixels, 3, quality.value());
        }
        write_webp(
            output,
            &pixels,
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
    }
}

/// Encode an RGBA canvas (a composited filmstrip) to WebP at `output`.
pub fn encode_webp_rgba(
    canvas: &RgbaImage,
    output: &Path,
    quality: Quality,
) -> Result<(), CodecError> {
    let (width, height) = canvas.dimensions();
    if quality.is_lossless() {
        return write_webp(output, canvas.as_raw(), width, height, ExtendedColorType::Rgba8);
    }
    let mut pixels = canvas.as_raw().clone();
    quantize_rgb(&mut pixels, 4, quality.value());
    write_webp(output, &pixels, width, height, ExtendedColorType::Rgba8)
}

fn write_webp(
    output: &Path,
    data: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
) -> Result<(), CodecError> {
    let file = std::fs::File::create(output).map_err(|source| CodecError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    let encoder = WebPEncoder::new_lossless(BufWriter::new(file));
    encoder
        .encode(data, width, height, color)
        .map_err(|source| CodecError::Encode {
            path: output.to_path_buf(),
            source,
        })
}

/// Snap RGB channels to a reduced palette in place, leaving alpha untouched.
///
/// `channels` is the pixel stride (3 for RGB8, 4 for RGBA8); only the first
/// three channels of each pixel are quantized, so transparency stays crisp
/// while color detail becomes more compressible for the lossless encoder.
fn quantize_rgb(data: &mut [u8], channels: usize, quality: u32) {
    let levels = palette_levels(quality);
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (levels - 1) as f32;
    for pixel in data.chunks_exact_mut(channels) {
        for channel in pixel.iter_mut().take(3) {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Map the quality slider to a palette size: finer at high quality, and
/// aggressively coarse at the low end for size wins.
fn palette_levels(quality: u32) -> u32 {
    if quality >= 100 {
        return 256;
    }
    let normalized = quality as f32 / 100.0;
    (2.0 + normalized * normalized * 254.0).round() as u32
}
