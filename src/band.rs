use image::RgbaImage;

use crate::error::{CaptionError, CaptionResult};
use crate::fit::{GlyphMetrics as _, LineExtent};
use crate::text::{TextBrushRgba8, TextEngine};

/// Vertical margin above the first line and below the last (20px each).
pub const VERTICAL_PADDING_PX: u32 = 20;

/// Pure band geometry: overall height and per-line draw origins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandLayout {
    /// Band height in pixels.
    pub height: u32,
    /// Height of the tallest line; every line advances the cursor by this.
    pub max_line_height: u32,
    /// Top-left draw origin of each line. X can be negative when a line
    /// overflows the band width.
    pub origins: Vec<(i64, i64)>,
    /// True when the cursor after the last line exceeded the band height
    /// (a height-estimate miss, reported as a diagnostic only).
    pub overflow: bool,
}

/// Compute band geometry for the given line extents.
///
/// Band height is `max(lineHeights) * lineCount + 2 * VERTICAL_PADDING_PX`.
/// Lines are centered horizontally and spaced uniformly by the tallest
/// line's height; short lines get extra whitespace. The vertical cursor
/// starts at `20 - maxLineHeight / 16`, a nudge that counteracts font
/// ascent bias.
pub fn layout_band(extents: &[LineExtent], target_width: u32) -> CaptionResult<BandLayout> {
    if extents.is_empty() {
        return Err(CaptionError::validation(
            "caption band needs at least one line",
        ));
    }

    let max_line_height = extents.iter().map(|e| e.height_px).max().unwrap_or(1);
    let height = max_line_height * extents.len() as u32 + 2 * VERTICAL_PADDING_PX;

    let mut y = i64::from(VERTICAL_PADDING_PX) - i64::from(max_line_height / 16);
    let mut origins = Vec::with_capacity(extents.len());
    for extent in extents {
        let x = (i64::from(target_width) - i64::from(extent.width_px)) / 2;
        origins.push((x, y));
        y += i64::from(max_line_height);
    }
    let overflow = y > i64::from(height);

    Ok(BandLayout {
        height,
        max_line_height,
        origins,
        overflow,
    })
}

/// Rasterize the caption band: white background, centered `lines` drawn in
/// `color`, stacked with uniform spacing.
pub fn render_band(
    engine: &mut TextEngine,
    lines: &[String],
    target_width: u32,
    color: TextBrushRgba8,
) -> CaptionResult<RgbaImage> {
    let mut extents = Vec::with_capacity(lines.len());
    for line in lines {
        extents.push(engine.line_extent(line)?);
    }
    let layout = layout_band(&extents, target_width)?;
    if layout.overflow {
        tracing::warn!(
            target_width,
            ?lines,
            band_height = layout.height,
            "drawn text exceeded the computed band height"
        );
    }

    let w: u16 = target_width
        .try_into()
        .map_err(|_| CaptionError::validation("caption band width exceeds u16"))?;
    let h: u16 = layout
        .height
        .try_into()
        .map_err(|_| CaptionError::validation("caption band height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(target_width),
        f64::from(layout.height),
    ));

    for (line, &(x, y)) in lines.iter().zip(&layout.origins) {
        let line_layout = engine.layout_line(line, color);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x as f64, y as f64)));
        for l in line_layout.lines() {
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(engine.font_data())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let mut bytes = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut bytes);
    RgbaImage::from_raw(target_width, layout.height, bytes)
        .ok_or_else(|| CaptionError::encode("caption band pixel buffer size mismatch"))
}

// Pixmap pixels are premultiplied; the band background is opaque so this is
// a near-noop, but partially covered glyph edges still need it.
fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(width_px: u32, height_px: u32) -> LineExtent {
        LineExtent {
            width_px,
            height_px,
        }
    }

    #[test]
    fn band_height_is_max_line_height_times_count_plus_padding() {
        let layout = layout_band(&[extent(100, 30), extent(80, 24)], 200).unwrap();
        assert_eq!(layout.max_line_height, 30);
        assert_eq!(layout.height, 30 * 2 + 40);
    }

    #[test]
    fn lines_are_horizontally_centered() {
        let layout = layout_band(&[extent(100, 30), extent(60, 30)], 200).unwrap();
        assert_eq!(layout.origins[0].0, 50);
        assert_eq!(layout.origins[1].0, 70);
    }

    #[test]
    fn cursor_starts_nudged_and_advances_uniformly() {
        let layout = layout_band(&[extent(10, 32), extent(10, 16)], 100).unwrap();
        // 20 - 32/16 = 18, then +32 per line regardless of the line's own height
        assert_eq!(layout.origins[0].1, 18);
        assert_eq!(layout.origins[1].1, 50);
    }

    #[test]
    fn overwide_line_gets_negative_origin() {
        let layout = layout_band(&[extent(300, 30)], 200).unwrap();
        assert_eq!(layout.origins[0].0, -50);
    }

    #[test]
    fn final_cursor_never_exceeds_height_for_this_formula() {
        // start + n*max = 20 - max/16 + n*max <= n*max + 40, so no overflow;
        // the flag exists as a diagnostic for future geometry changes.
        for n in 1..6 {
            let extents: Vec<_> = (0..n).map(|_| extent(10, 33)).collect();
            assert!(!layout_band(&extents, 100).unwrap().overflow);
        }
    }

    #[test]
    fn empty_lines_are_rejected() {
        assert!(matches!(
            layout_band(&[], 100).unwrap_err(),
            CaptionError::Validation(_)
        ));
    }

    #[test]
    fn unpremultiply_restores_straight_alpha() {
        // 50% alpha, premultiplied 100 -> straight 199 (rounded)
        let mut px = [100u8, 0, 0, 128];
        unpremultiply_rgba8_in_place(&mut px);
        assert_eq!(px[3], 128);
        assert!((198..=200).contains(&px[0]));
    }
}
