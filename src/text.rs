use std::borrow::Cow;

use crate::error::{CaptionError, CaptionResult};
use crate::fit::{GlyphMetrics, LineExtent};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    /// Opaque black, the default caption text color.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Stateful helper for shaping and measuring caption text with Parley,
/// bound to one font at one pixel size for the lifetime of a request.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
    size_px: f32,
}

impl TextEngine {
    /// Register `font_bytes` and bind the engine to `size_px`.
    pub fn new(font_bytes: Vec<u8>, size_px: f32) -> CaptionResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CaptionError::validation(
                "font size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CaptionError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CaptionError::validation("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_data,
            size_px,
        })
    }

    /// Primary family name detected from the registered font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Pixel size the engine is bound to.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Font data handle for glyph rasterization.
    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    /// Shape one caption line into a layout without wrapping it.
    pub fn layout_line(
        &mut self,
        line: &str,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(line);
        layout.break_all_lines(None);
        layout
    }
}

impl GlyphMetrics for TextEngine {
    fn line_extent(&mut self, line: &str) -> CaptionResult<LineExtent> {
        let layout = self.layout_line(line, TextBrushRgba8::default());
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for l in layout.lines() {
            let m = l.metrics();
            width = width.max(m.advance);
            height += m.ascent + m.descent;
        }
        Ok(LineExtent {
            width_px: width.ceil() as u32,
            height_px: height.ceil().max(1.0) as u32,
        })
    }
}
