use image::{RgbaImage, imageops};

use crate::error::{CaptionError, CaptionResult};

/// Stack the caption band above a frame at identical horizontal alignment.
///
/// The band and frame widths must match; the output is
/// `width x (band.height + frame.height)`.
pub fn stack_band(band: &RgbaImage, frame: &RgbaImage) -> CaptionResult<RgbaImage> {
    if band.width() != frame.width() {
        return Err(CaptionError::validation(format!(
            "caption band width {} does not match frame width {}",
            band.width(),
            frame.width()
        )));
    }

    let mut out = RgbaImage::new(band.width(), band.height() + frame.height());
    imageops::replace(&mut out, band, 0, 0);
    imageops::replace(&mut out, frame, 0, i64::from(band.height()));
    Ok(out)
}

/// Force every pixel opaque, discarding any alpha the source carried.
pub fn flatten_opaque(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        px.0[3] = 255;
    }
}
