//! Design tokens: brand colours, typography and canvas geometry.
//!
//! Everything here is a compile-time constant. Positions and sizes are in
//! inches on a 10 × 12.5 in canvas, which maps to 1080 × 1350 px at 108 DPI
//! (the 4:5 portrait format used for social carousels).

/// Brand colours as six-digit RGB hex (no leading `#`), the form OOXML expects.
pub mod colors {
    pub const BURGUNDY_DEEP: &str = "3B0510";
    pub const BURGUNDY_MID: &str = "5A1025";
    pub const BURGUNDY_LIGHT: &str = "7A2040";
    pub const CREAM: &str = "F4F4F1";
    pub const GOLD: &str = "D4B896";
    pub const CLAY: &str = "E1DBD7";
    pub const WARM_ACCENT: &str = "A0674B";
    pub const GLASS_BORDER: &str = "F4F4F1";
    /// Outer stop of the background gradient.
    pub const NEAR_BLACK: &str = "1A0308";
}

/// Typefaces.
pub mod fonts {
    pub const DISPLAY: &str = "Georgia";
    pub const BODY: &str = "Georgia";
    pub const BRAND: &str = "Arial";
}

/// Canvas width in inches.
pub const W: f64 = 10.0;
/// Canvas height in inches.
pub const H: f64 = 12.5;
/// Side padding in inches.
pub const PAD: f64 = 0.7;
/// Usable text width between the side paddings.
pub const CONTENT_W: f64 = W - PAD * 2.0;

/// Pixel size of the rendered background (and of the posted images).
pub const PIXEL_W: u32 = 1080;
pub const PIXEL_H: u32 = 1350;

/// EMUs (English Metric Units) per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Wordmark placed at the top of every slide.
pub const BRAND_WORDMARK: &str = "SNEHA";
/// Author recorded in the presentation's core properties.
pub const AUTHOR: &str = "Sneha";
/// Glyph run signalling "swipe for more".
pub const SWIPE_GLYPH: &str = "\u{203A}\u{203A}\u{203A}\u{203A}\u{203A}";

/// Glass card defaults.
pub const GLASS_FILL_TRANSPARENCY: u8 = 92;
pub const GLASS_BORDER_TRANSPARENCY: u8 = 80;
pub const GLASS_BORDER_WIDTH_PT: f64 = 1.0;
pub const GLASS_RECT_RADIUS: f64 = 0.1;

/// Convert inches to EMUs, rounding to the nearest unit.
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}
