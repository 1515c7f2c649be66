use std::sync::OnceLock;

use crate::models::ECLevel;

fn parse_env_level(name: &str, default: ECLevel) -> ECLevel {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<ECLevel>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static DEFAULT_LEVEL: OnceLock<ECLevel> = OnceLock::new();

/// Level used by [`EncodeOptions::default`] (`QR_DEFAULT_LEVEL`, default M)
pub(crate) fn default_level() -> ECLevel {
    *DEFAULT_LEVEL.get_or_init(|| parse_env_level("QR_DEFAULT_LEVEL", ECLevel::M))
}

static AUTO_KANJI: OnceLock<bool> = OnceLock::new();

/// Whether automatic segmentation may emit Kanji (`QR_AUTO_KANJI`, default 0)
pub(crate) fn auto_kanji() -> bool {
    *AUTO_KANJI.get_or_init(|| parse_env_bool_u8("QR_AUTO_KANJI", false))
}

/// Per-call encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Error correction level
    pub level: ECLevel,
    /// Mask index; `None` selects automatically (rMQR ignores it)
    pub mask: Option<u8>,
    /// Let automatic segmentation use Kanji mode for Shift-JIS pairs
    pub kanji: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            level: default_level(),
            mask: None,
            kanji: auto_kanji(),
        }
    }
}

impl EncodeOptions {
    /// Options with an explicit level and process defaults otherwise
    pub fn with_level(level: ECLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Fix the mask instead of selecting it
    pub fn mask(mut self, mask: u8) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Allow or forbid Kanji segments during automatic segmentation
    pub fn kanji(mut self, kanji: bool) -> Self {
        self.kanji = kanji;
        self
    }
}
