//! Reusable slide furniture: brand header, swipe cue and glass cards.

use crate::design::{self, colors, fonts, H, PAD, W};
use crate::pptx::{Align, Canvas, Fill, Frame, Geometry, Line, ShapeOptions, TextOptions};

/// Options for [`add_glass_card`].
#[derive(Debug, Clone, PartialEq)]
pub struct GlassCardOptions {
    pub fill_transparency: u8,
    pub border_transparency: u8,
    /// Corner radius in inches.
    pub rect_radius: f64,
    /// Draw a thin vertical bar along the card's left edge.
    pub left_accent: bool,
    pub accent_color: String,
}

impl Default for GlassCardOptions {
    fn default() -> Self {
        Self {
            fill_transparency: design::GLASS_FILL_TRANSPARENCY,
            border_transparency: design::GLASS_BORDER_TRANSPARENCY,
            rect_radius: design::GLASS_RECT_RADIUS,
            left_accent: false,
            accent_color: colors::CREAM.to_string(),
        }
    }
}

/// Centered wordmark across the top of the slide.
pub fn add_brand_header(slide: &mut impl Canvas) {
    slide.add_text(
        design::BRAND_WORDMARK,
        Frame::new(0.0, 0.35, W, 0.4),
        TextOptions::new(18.0, colors::CREAM)
            .font(fonts::BRAND)
            .bold()
            .align(Align::Center)
            .char_spacing(4.0),
    );
}

/// Faded chevrons in the bottom-right corner.
pub fn add_swipe_cue(slide: &mut impl Canvas) {
    slide.add_text(
        design::SWIPE_GLYPH,
        Frame::new(W - PAD - 1.0, H - 0.8, 1.0, 0.4),
        TextOptions::new(22.0, colors::CLAY)
            .font(fonts::BRAND)
            .bold()
            .align(Align::Right)
            .transparency(50),
    );
}

/// Translucent rounded rectangle with a hairline border.
pub fn add_glass_card(
    slide: &mut impl Canvas,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    opts: &GlassCardOptions,
) {
    slide.add_shape(
        Geometry::RoundRect,
        Frame::new(x, y, w, h),
        ShapeOptions {
            fill: Some(Fill::solid(colors::CREAM).with_transparency(opts.fill_transparency)),
            line: Some(Line {
                color: colors::GLASS_BORDER.to_string(),
                width_pt: design::GLASS_BORDER_WIDTH_PT,
                transparency: opts.border_transparency,
            }),
            rect_radius: Some(opts.rect_radius),
            rotate: None,
        },
    );

    if opts.left_accent {
        slide.add_shape(
            Geometry::Rect,
            Frame::new(x, y + 0.1, 0.04, h - 0.2),
            ShapeOptions {
                fill: Some(Fill::solid(opts.accent_color.clone()).with_transparency(70)),
                ..Default::default()
            },
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Canvas double that records calls in order.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub texts: Vec<(String, Frame, TextOptions)>,
        pub shapes: Vec<(Geometry, Frame, ShapeOptions)>,
    }

    impl Canvas for Recorder {
        fn add_text(&mut self, text: &str, frame: Frame, opts: TextOptions) {
            self.texts.push((text.to_string(), frame, opts));
        }

        fn add_shape(&mut self, geometry: Geometry, frame: Frame, opts: ShapeOptions) {
            self.shapes.push((geometry, frame, opts));
        }
    }

    #[test]
    fn brand_header_spans_width() {
        let mut r = Recorder::default();
        add_brand_header(&mut r);
        let (text, frame, opts) = &r.texts[0];
        assert_eq!(text, "SNEHA");
        assert_eq!(*frame, Frame::new(0.0, 0.35, 10.0, 0.4));
        assert_eq!(opts.font_face.as_deref(), Some("Arial"));
        assert_eq!(opts.char_spacing, Some(4.0));
        assert_eq!(opts.align, Align::Center);
        assert!(opts.bold);
    }

    #[test]
    fn swipe_cue_sits_bottom_right() {
        let mut r = Recorder::default();
        add_swipe_cue(&mut r);
        let (text, frame, opts) = &r.texts[0];
        assert_eq!(text.chars().count(), 5);
        assert!((frame.x - 8.3).abs() < 1e-9);
        assert!((frame.y - 11.7).abs() < 1e-9);
        assert_eq!(opts.transparency, 50);
        assert_eq!(opts.align, Align::Right);
        assert_eq!(opts.color, colors::CLAY);
    }

    #[test]
    fn glass_card_defaults() {
        let mut r = Recorder::default();
        add_glass_card(&mut r, 1.0, 2.0, 3.0, 1.0, &GlassCardOptions::default());
        assert_eq!(r.shapes.len(), 1);
        let (geom, _, opts) = &r.shapes[0];
        assert_eq!(*geom, Geometry::RoundRect);
        assert_eq!(opts.fill.as_ref().map(|f| f.transparency), Some(92));
        assert_eq!(opts.line.as_ref().map(|l| l.transparency), Some(80));
        assert_eq!(opts.rect_radius, Some(0.1));
    }

    #[test]
    fn glass_card_left_accent_inset() {
        let mut r = Recorder::default();
        let opts = GlassCardOptions {
            left_accent: true,
            ..Default::default()
        };
        add_glass_card(&mut r, 0.7, 7.0, 7.74, 1.2, &opts);
        assert_eq!(r.shapes.len(), 2);
        let (geom, frame, accent) = &r.shapes[1];
        assert_eq!(*geom, Geometry::Rect);
        assert!((frame.y - 7.1).abs() < 1e-9);
        assert!((frame.h - 1.0).abs() < 1e-9);
        assert!((frame.w - 0.04).abs() < 1e-9);
        assert_eq!(accent.fill.as_ref().map(|f| f.transparency), Some(70));
        assert!(accent.line.is_none());
    }
}
