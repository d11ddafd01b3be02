use std::io::Cursor;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder as _, Delay, DynamicImage, Frame, ImageFormat, RgbaImage};

use crate::error::{CaptionError, CaptionResult};

/// Decoded animated input: RGBA frames in original temporal order with their
/// original per-frame durations.
#[derive(Clone, Debug)]
pub struct AnimationInput {
    /// Frames as decoded, immutable once read.
    pub frames: Vec<RgbaImage>,
    /// Original display duration of each frame in milliseconds.
    pub durations_ms: Vec<u32>,
}

impl AnimationInput {
    /// Width shared by every frame.
    pub fn width(&self) -> u32 {
        self.frames.first().map(|f| f.width()).unwrap_or(0)
    }
}

/// Decode still image bytes into an RGBA buffer.
pub fn decode_still(bytes: &[u8]) -> CaptionResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CaptionError::decode(format!("load image from memory: {e}")))?;
    Ok(img.to_rgba8())
}

/// Decode animated GIF bytes into frames plus per-frame durations.
pub fn decode_animation(bytes: &[u8]) -> CaptionResult<AnimationInput> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| CaptionError::decode(format!("open gif decoder: {e}")))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| CaptionError::decode(format!("decode gif frames: {e}")))?;
    if frames.is_empty() {
        return Err(CaptionError::decode("animation contains no frames"));
    }

    let mut buffers = Vec::with_capacity(frames.len());
    let mut durations_ms = Vec::with_capacity(frames.len());
    for frame in frames {
        let (numer, denom) = frame.delay().numer_denom_ms();
        let ms = if denom == 0 {
            0
        } else {
            (f64::from(numer) / f64::from(denom)).round() as u32
        };
        durations_ms.push(ms);
        buffers.push(frame.into_buffer());
    }

    Ok(AnimationInput {
        frames: buffers,
        durations_ms,
    })
}

/// Encode a still: PNG when transparency is requested (RGBA), otherwise
/// JPEG (flattened to RGB).
pub fn encode_still(image: RgbaImage, transparency: bool) -> CaptionResult<Vec<u8>> {
    let mut out = Vec::new();
    if transparency {
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .map_err(|e| CaptionError::encode(format!("write png: {e}")))?;
    } else {
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .map_err(|e| CaptionError::encode(format!("write jpeg: {e}")))?;
    }
    Ok(out)
}

/// Encode frames as an indefinitely looping GIF with per-frame durations.
pub fn encode_gif(frames: Vec<RgbaImage>, durations_ms: &[u32]) -> CaptionResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(CaptionError::validation("gif output needs at least one frame"));
    }
    if frames.len() != durations_ms.len() {
        return Err(CaptionError::validation(format!(
            "frame count {} does not match duration count {}",
            frames.len(),
            durations_ms.len()
        )));
    }

    let mut out = Vec::new();
    {
        // Speed 10 trades palette precision for encode time, the usual
        // choice when the caller asked for optimized output.
        let mut encoder = GifEncoder::new_with_speed(&mut out, 10);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| CaptionError::encode(format!("set gif repeat: {e}")))?;
        for (buffer, &ms) in frames.into_iter().zip(durations_ms) {
            let frame = Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(ms, 1));
            encoder
                .encode_frame(frame)
                .map_err(|e| CaptionError::encode(format!("encode gif frame: {e}")))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn still_png_roundtrip_preserves_dimensions() {
        let bytes = encode_still(solid(32, 24, [10, 200, 30, 255]), true).unwrap();
        let back = decode_still(&bytes).unwrap();
        assert_eq!(back.dimensions(), (32, 24));
    }

    #[test]
    fn still_jpeg_roundtrip_preserves_dimensions() {
        let bytes = encode_still(solid(32, 24, [10, 200, 30, 255]), false).unwrap();
        let back = decode_still(&bytes).unwrap();
        assert_eq!(back.dimensions(), (32, 24));
    }

    #[test]
    fn garbage_bytes_fail_decode() {
        assert!(matches!(
            decode_still(b"not an image").unwrap_err(),
            CaptionError::Decode(_)
        ));
        assert!(matches!(
            decode_animation(b"not a gif").unwrap_err(),
            CaptionError::Decode(_)
        ));
    }

    #[test]
    fn gif_roundtrip_preserves_frames_and_durations() {
        let frames = vec![
            solid(16, 16, [255, 0, 0, 255]),
            solid(16, 16, [0, 255, 0, 255]),
            solid(16, 16, [0, 0, 255, 255]),
        ];
        // 50ms is exactly 5 gif centiseconds, so it survives the roundtrip
        let bytes = encode_gif(frames, &[50, 50, 50]).unwrap();
        let back = decode_animation(&bytes).unwrap();
        assert_eq!(back.frames.len(), 3);
        assert_eq!(back.width(), 16);
        assert_eq!(back.durations_ms, vec![50, 50, 50]);
    }

    #[test]
    fn gif_encode_validates_inputs() {
        assert!(matches!(
            encode_gif(vec![], &[]).unwrap_err(),
            CaptionError::Validation(_)
        ));
        assert!(matches!(
            encode_gif(vec![solid(4, 4, [0, 0, 0, 255])], &[50, 50]).unwrap_err(),
            CaptionError::Validation(_)
        ));
    }
}
