use std::path::PathBuf;

use image::RgbaImage;

use crate::band::render_band;
use crate::codec::{decode_animation, decode_still, encode_gif, encode_still};
use crate::compose::{flatten_opaque, stack_band};
use crate::error::{CaptionError, CaptionResult};
use crate::fit::fit_lines;
use crate::fonts::{FontChoice, font_size_for_width};
use crate::retime::retime;
use crate::text::{TextBrushRgba8, TextEngine};

/// The captioning entry point: owns the fonts root, nothing else.
///
/// Each call is a pure transform of input bytes to output bytes; decoded
/// frames, the caption band, and output buffers live only for the call.
#[derive(Clone, Debug)]
pub struct Captioner {
    fonts_root: PathBuf,
}

impl Captioner {
    /// Create a captioner loading font assets from `fonts_root`.
    pub fn new(fonts_root: impl Into<PathBuf>) -> Self {
        Self {
            fonts_root: fonts_root.into(),
        }
    }

    /// Caption a still image. Output is PNG when `transparency` is set,
    /// otherwise JPEG.
    #[tracing::instrument(skip(self, image_bytes), fields(input_len = image_bytes.len()))]
    pub fn add_caption_to_still(
        &self,
        image_bytes: &[u8],
        text: &str,
        font: FontChoice,
        transparency: bool,
    ) -> CaptionResult<Vec<u8>> {
        let input = decode_still(image_bytes)?;
        let band = self.build_band(input.width(), text, font)?;

        let mut merged = stack_band(&band, &input)?;
        if !transparency {
            flatten_opaque(&mut merged);
        }
        encode_still(merged, transparency)
    }

    /// Caption an animated GIF, retiming it by `speed`. Output is an
    /// indefinitely looping GIF.
    ///
    /// In transparency mode frames are stacked exactly as decoded, without
    /// flattening against a cleared background, so partially transparent
    /// animations can accumulate visual artifacts across frames.
    #[tracing::instrument(skip(self, image_bytes), fields(input_len = image_bytes.len()))]
    pub fn add_caption_to_animation(
        &self,
        image_bytes: &[u8],
        text: &str,
        font: FontChoice,
        transparency: bool,
        speed: f64,
    ) -> CaptionResult<Vec<u8>> {
        let input = decode_animation(image_bytes)?;
        let band = self.build_band(input.width(), text, font)?;

        let retimed = retime(&input.durations_ms, speed)?;

        // The band is computed once and merged onto every retained frame.
        let retained = retimed.retained_count(input.frames.len());
        let mut frames = Vec::with_capacity(retained);
        let mut durations_ms = Vec::with_capacity(retained);
        for (i, frame) in input.frames.into_iter().enumerate() {
            if i % retimed.drop_interval != 0 {
                continue;
            }
            let mut merged = stack_band(&band, &frame)?;
            if !transparency {
                flatten_opaque(&mut merged);
            }
            frames.push(merged);
            durations_ms.push(retimed.durations_ms[i]);
        }

        encode_gif(frames, &durations_ms)
    }

    fn build_band(&self, width: u32, text: &str, font: FontChoice) -> CaptionResult<RgbaImage> {
        // Font size is width / 10; anything narrower has no room for text.
        if width < 10 {
            return Err(CaptionError::validation(format!(
                "input image width {width}px is too narrow to caption (minimum 10px)"
            )));
        }
        let font_bytes = font.load_bytes(&self.fonts_root)?;
        let mut engine = TextEngine::new(font_bytes, font_size_for_width(width))?;
        let lines = fit_lines(text, width, &mut engine)?;
        render_band(&mut engine, &lines, width, TextBrushRgba8::BLACK)
    }
}
