use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::error::{CaptionError, CaptionResult};

/// The enumerated set of fonts the captioner ships with.
///
/// Each choice maps to a family label and an on-disk asset filename under the
/// captioner's fonts root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontChoice {
    /// Futura, the classic caption face.
    #[default]
    Default,
    /// Comic Sans, for when the meme demands it.
    ComicSans,
}

impl FontChoice {
    /// Parse a string key into a font choice; unknown keys are rejected.
    pub fn from_key(key: &str) -> CaptionResult<Self> {
        match key {
            "default" => Ok(Self::Default),
            "comic_sans" => Ok(Self::ComicSans),
            other => Err(CaptionError::invalid_font(format!(
                "'{other}' (expected one of: default, comic_sans)"
            ))),
        }
    }

    /// Human-readable family label.
    pub fn family_label(self) -> &'static str {
        match self {
            Self::Default => "Futura",
            Self::ComicSans => "Comic Sans",
        }
    }

    /// Filename of the bundled font asset, relative to the fonts root.
    pub fn asset_filename(self) -> &'static str {
        match self {
            Self::Default => "caption.otf",
            Self::ComicSans => "Comic Sans MS Bold.ttf",
        }
    }

    /// Read this font's bytes from `fonts_root`.
    pub fn load_bytes(self, fonts_root: &Path) -> CaptionResult<Vec<u8>> {
        let path: PathBuf = fonts_root.join(self.asset_filename());
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read font asset '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// Caption font size in pixels for a given input image width.
///
/// Integer division, matching the band proportions the renderer was tuned for.
pub fn font_size_for_width(image_width: u32) -> f32 {
    (image_width / 10) as f32
}
