//! # png-filmstrip
//!
//! Convert PNG (and other common raster) images to WebP and arrange a batch
//! of images into a single n×n grid "filmstrip" image.
//!
//! # Architecture
//!
//! Two independent operations share one codec layer:
//!
//! ```text
//! convert    directory  →  one .webp per input        (batch re-encode)
//! filmstrip  directory  →  one n×n composite .webp    (grid assembly)
//! process    directory  →  both, in one pass
//! ```
//!
//! The filmstrip build itself is two-pass: a cheap dimensions-only probe
//! sizes the grid, then images are decoded one at a time and composited.
//! Everything runs single-threaded and sequentially — peak memory is one
//! decoded image plus the in-progress canvas.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`codec`] | Decode/encode: supported formats, [`codec::ColorMode`], WebP output with a quality knob |
//! | [`layout`] | Pure grid math — side selection, uniform cell sizing, row-major placement with centering |
//! | [`convert`] | Batch conversion with per-file skip-on-error |
//! | [`filmstrip`] | Two-pass filmstrip assembly onto a transparent RGBA canvas |
//! | [`output`] | CLI summaries and progress bars |
//! | [`logging`] | `log` facade setup driven by the verbose flag |
//!
//! # Design Decisions
//!
//! ## Pure-Rust WebP (No libwebp)
//!
//! All pixel work goes through the `image` crate; the binary has zero system
//! dependencies. Since `image` only ships a lossless WebP encoder, quality
//! below 100 quantizes RGB channels to a reduced palette before lossless
//! encoding — detail traded for compressibility without C bindings. Quality
//! 100 is exactly lossless. See [`codec`] for details.
//!
//! ## Skip, Don't Abort
//!
//! One unreadable file never sinks a batch: it is logged as a warning and
//! skipped, and a run fails only when *nothing* could be processed, the
//! manual grid override is too small, or the output cannot be written. Every
//! fatal error names the offending path or value.
//!
//! ## Deterministic Placement
//!
//! Inputs are always taken in lexicographic filename order and assigned to
//! cells row-major (left to right, top to bottom), so the same directory
//! produces an identical grid on every run.

pub mod codec;
pub mod convert;
pub mod filmstrip;
pub mod layout;
pub mod logging;
pub mod output;
