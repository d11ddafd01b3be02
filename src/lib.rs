//! Memeband puts a caption band on top of images and animated GIFs.
//!
//! The pipeline for one request:
//!
//! 1. **Decode**: input bytes -> RGBA frame(s) + per-frame durations (`codec`)
//! 2. **Fit**: caption text -> wrapped lines that fit the image width (`fit`)
//! 3. **Band**: wrapped lines -> one white caption band raster (`band`)
//! 4. **Compose**: band stacked above every frame (`compose`)
//! 5. **Retime** (animations): durations adjusted for the requested speed,
//!    clamped to the GIF 20ms floor, dropping frames when clamping alone
//!    cannot reach the requested speed (`retime`)
//! 6. **Encode**: PNG/JPEG for stills, looping GIF for animations (`codec`)
//!
//! Everything is synchronous and CPU-bound; a request owns its buffers and
//! shares nothing with other requests.

#![forbid(unsafe_code)]

pub mod band;
pub mod codec;
pub mod compose;
pub mod error;
pub mod fit;
pub mod fonts;
pub mod pipeline;
pub mod retime;
pub mod text;

pub use band::{BandLayout, VERTICAL_PADDING_PX, layout_band, render_band};
pub use codec::{AnimationInput, decode_animation, decode_still, encode_gif, encode_still};
pub use compose::{flatten_opaque, stack_band};
pub use error::{CaptionError, CaptionResult};
pub use fit::{GlyphMetrics, LineExtent, SIDE_PADDING_PX, fit_lines};
pub use fonts::{FontChoice, font_size_for_width};
pub use pipeline::Captioner;
pub use retime::{LOWEST_VALID_DURATION_MS, Retimed, retime};
pub use text::{TextBrushRgba8, TextEngine};
