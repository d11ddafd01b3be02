use crate::error::{CaptionError, CaptionResult};

/// Total horizontal margin reserved when fitting text (10px each side).
pub const SIDE_PADDING_PX: u32 = 20;

/// Pixel bounding box of a single laid-out line of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineExtent {
    /// Advance width in pixels.
    pub width_px: u32,
    /// Ascent + descent in pixels.
    pub height_px: u32,
}

/// Measures the pixel bounding box of one line of text in a fixed font/size.
///
/// Production callers use [`crate::TextEngine`]; tests substitute fakes.
pub trait GlyphMetrics {
    /// Measure `line` without wrapping it.
    fn line_extent(&mut self, line: &str) -> CaptionResult<LineExtent>;
}

/// Wrap caption text into lines whose rendered width fits `target_width`
/// minus the side padding.
///
/// The wrap is character-budget based, not pixel-exact: the provisional
/// budget starts at the full text length (one line) and, while the widest
/// wrapped line is too wide, shrinks to the character length of the text
/// with the last `n` tokens removed, `n` growing by one per failed round.
/// Tokens are never split; a token longer than the budget gets its own line.
///
/// Fails with [`CaptionError::Unfittable`] when the budget runs out of
/// tokens to drop without satisfying the width constraint, which happens
/// exactly when some single token is wider than the available width.
pub fn fit_lines(
    text: &str,
    target_width: u32,
    metrics: &mut dyn GlyphMetrics,
) -> CaptionResult<Vec<String>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(CaptionError::validation(
            "caption text must contain at least one word",
        ));
    }

    let mut budget = joined_char_len(&tokens);
    let mut removed = 0usize;
    loop {
        let lines = wrap_by_chars(&tokens, budget);

        let mut widest = 0u32;
        for line in &lines {
            widest = widest.max(metrics.line_extent(line)?.width_px);
        }
        if widest + SIDE_PADDING_PX <= target_width {
            return Ok(lines);
        }

        if removed >= tokens.len() {
            return Err(CaptionError::unfittable(format!(
                "no line wrap of {:?} fits width {target_width}px (widest line {widest}px + {SIDE_PADDING_PX}px padding)",
                text
            )));
        }
        // Shrink the budget to the text with the last `removed` tokens
        // dropped. The first failed round recomputes with zero tokens
        // dropped, leaving the budget unchanged once.
        budget = joined_char_len(&tokens[..tokens.len() - removed]);
        removed += 1;
    }
}

fn joined_char_len(tokens: &[&str]) -> usize {
    let chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
    chars + tokens.len().saturating_sub(1)
}

/// Greedy wrap at token boundaries, never exceeding `budget` characters per
/// line except for a single token that is itself longer than the budget.
fn wrap_by_chars(tokens: &[&str], budget: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for token in tokens {
        let token_chars = token.chars().count();
        if current.is_empty() {
            current.push_str(token);
            current_chars = token_chars;
        } else if current_chars + 1 + token_chars <= budget {
            current.push(' ');
            current.push_str(token);
            current_chars += 1 + token_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(token);
            current_chars = token_chars;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
