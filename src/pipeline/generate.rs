//! Carousel deck generation: input model → branded [`Presentation`] → `.pptx`.
//!
//! ## Deck shape
//!
//! ```text
//! slide 1        cover: wordmark, wrapped title, pillar pill, preview card
//! slide 2..=N+1  one per input slide: wordmark, "i/N", title, text lines,
//!                rotating accent shape
//! ```
//!
//! Every slide shares one background PNG. [`build_deck`] is pure and
//! synchronous; [`generate_carousel`] adds the background render and the
//! file write.

use crate::design::{self, colors, fonts, CONTENT_W, H, PAD, W};
use crate::error::CarouselError;
use crate::model::{CarouselInput, SlideInput};
use crate::pipeline::background::{self, BackgroundImage};
use crate::pipeline::components::{add_brand_header, add_glass_card, add_swipe_cue, GlassCardOptions};
use crate::pipeline::layout::{
    self, cover_title_font_size, pillar_label, plan_content_lines, slide_title_font_size,
    split_title, truncate_text,
};
use crate::pptx::{
    Align, Canvas, Fill, Frame, Geometry, Presentation, ShapeOptions, TextOptions, VAlign,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PILL_W: f64 = 3.0;
const PILL_H: f64 = 0.5;
const PILL_Y: f64 = 6.0;

/// Build the full deck in memory.
pub fn build_deck(data: &CarouselInput, background: &BackgroundImage) -> Presentation {
    let mut pres = Presentation::new(W, H);
    pres.set_author(design::AUTHOR);
    pres.set_title(data.title.clone());

    build_cover_slide(&mut pres, background, data);

    let total = data.slides.len();
    for (index, slide) in data.slides.iter().enumerate() {
        build_content_slide(&mut pres, background, slide, index, total);
    }

    debug!("Built deck with {} slides", pres.slide_count());
    pres
}

/// Render the background, build the deck and write it to `output_path`.
///
/// Parent directories are created as needed and the file is replaced
/// atomically, so a crash never leaves a truncated `.pptx` behind.
pub async fn generate_carousel(
    data: &CarouselInput,
    output_path: impl AsRef<Path>,
) -> Result<PathBuf, CarouselError> {
    let output_path = output_path.as_ref();
    let background = background::render_background().await?;
    let pres = build_deck(data, &background);
    write_deck(&pres, output_path).await?;
    info!("Carousel generated: {}", output_path.display());
    Ok(output_path.to_path_buf())
}

/// Serialise `pres` and write it to `path` via a temp file + rename.
pub async fn write_deck(pres: &Presentation, path: &Path) -> Result<(), CarouselError> {
    let bytes = pres.to_bytes()?;

    let write_err = |e: std::io::Error| CarouselError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pptx.tmp");
    tokio::fs::write(&tmp_path, &bytes).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

// ── Slide builders ───────────────────────────────────────────────────────

fn build_cover_slide(pres: &mut Presentation, background: &BackgroundImage, data: &CarouselInput) {
    let slide = pres.add_slide();
    slide.set_background(background.png().clone());
    add_brand_header(slide);

    let title_lines = split_title(&data.title);
    slide.add_text(
        &title_lines.join("\n"),
        Frame::new(PAD, 1.2, CONTENT_W, 4.2),
        TextOptions::new(cover_title_font_size(title_lines.len()), colors::GOLD)
            .font(fonts::DISPLAY)
            .bold()
            .line_spacing(0.85),
    );

    let pill = Frame::new((W - PILL_W) / 2.0, PILL_Y, PILL_W, PILL_H);
    slide.add_shape(
        Geometry::RoundRect,
        pill,
        ShapeOptions {
            fill: Some(Fill::solid(colors::CREAM)),
            line: None,
            rect_radius: Some(0.25),
            rotate: None,
        },
    );
    slide.add_text(
        pillar_label(data.pillar.as_deref()),
        pill,
        TextOptions::new(14.0, colors::BURGUNDY_DEEP)
            .bold()
            .align(Align::Center)
            .valign(VAlign::Middle),
    );

    if let Some(first_line) = data.preview_line() {
        let card_w = CONTENT_W * 0.9;
        add_glass_card(
            slide,
            PAD,
            7.0,
            card_w,
            1.2,
            &GlassCardOptions {
                left_accent: true,
                ..Default::default()
            },
        );
        slide.add_text(
            &truncate_text(first_line, layout::PREVIEW_CHARS),
            Frame::new(PAD + 0.35, 7.1, card_w - 0.7, 1.0),
            TextOptions::new(20.0, colors::CREAM)
                .font(fonts::BODY)
                .valign(VAlign::Middle),
        );
    }

    add_swipe_cue(slide);
}

fn build_content_slide(
    pres: &mut Presentation,
    background: &BackgroundImage,
    data: &SlideInput,
    index: usize,
    total: usize,
) {
    let slide = pres.add_slide();
    slide.set_background(background.png().clone());
    add_brand_header(slide);

    slide.add_text(
        &format!("{}/{}", index + 1, total),
        Frame::new(PAD, 0.8, 2.0, 0.3),
        TextOptions::new(12.0, colors::CLAY),
    );

    let mut start_y = layout::CONTENT_START;
    if let Some(title) = data.title.as_deref().filter(|t| !t.is_empty()) {
        slide.add_text(
            title,
            Frame::new(PAD, 1.2, CONTENT_W, 1.0),
            TextOptions::new(slide_title_font_size(title), colors::GOLD)
                .font(fonts::DISPLAY)
                .bold()
                .line_spacing(1.1),
        );
        start_y = layout::CONTENT_START_WITH_TITLE;
    }

    for line in plan_content_lines(&data.text_lines, start_y) {
        slide.add_text(
            line.text,
            Frame::new(PAD, line.y, CONTENT_W, line.advance),
            TextOptions::new(line.font_size, colors::CREAM)
                .font(fonts::BODY)
                .line_spacing(1.3),
        );
    }

    add_accent(slide, index);
    add_swipe_cue(slide);
}

/// Decorative shape, cycling through three variants.
fn add_accent(slide: &mut impl Canvas, index: usize) {
    match index % 3 {
        0 => slide.add_shape(
            Geometry::Rect,
            Frame::new(7.5, 1.5, 2.0, 1.2),
            ShapeOptions {
                fill: Some(Fill::solid(colors::CREAM).with_transparency(90)),
                line: None,
                rect_radius: None,
                rotate: Some(5.0),
            },
        ),
        1 => slide.add_shape(
            Geometry::RoundRect,
            Frame::new(0.3, H - 2.5, 2.5, 0.5),
            ShapeOptions {
                fill: Some(Fill::solid(colors::WARM_ACCENT).with_transparency(85)),
                line: None,
                rect_radius: Some(0.25),
                rotate: None,
            },
        ),
        _ => {}
    }
}
