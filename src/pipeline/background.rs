//! Background rendering: the burgundy radial gradient behind every slide.
//!
//! ## Why rasterise instead of using a gradient fill?
//!
//! Office renderers disagree on how they draw DrawingML radial gradients
//! (LibreOffice in particular flattens the focal point). A pre-rendered PNG
//! looks the same in every viewer and in the final JPEGs, so the gradient is
//! described once as SVG, rasterised with resvg, and embedded as a picture
//! fill. The PNG is built once per run and shared by all slides.

use crate::design::{colors, PIXEL_H, PIXEL_W};
use crate::error::CarouselError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Rendered background, shareable across slides.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    png: Arc<[u8]>,
}

impl BackgroundImage {
    /// Encoded PNG bytes. Cloning the `Arc` keeps every slide pointing at the
    /// same buffer, which the packager stores as a single media part.
    pub fn png(&self) -> &Arc<[u8]> {
        &self.png
    }

    /// `image/png;base64,<data>`, the form presentation tools accept for
    /// inline image data.
    pub fn data_uri(&self) -> String {
        format!("image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// SVG source for the gradient at the target pixel size.
pub fn gradient_svg() -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <defs>
    <radialGradient id="bg" cx="50%" cy="38%" r="70%">
      <stop offset="0%" stop-color="#{mid}"/>
      <stop offset="55%" stop-color="#{deep}"/>
      <stop offset="100%" stop-color="#{outer}"/>
    </radialGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="url(#bg)"/>
</svg>"##,
        w = PIXEL_W,
        h = PIXEL_H,
        mid = colors::BURGUNDY_MID,
        deep = colors::BURGUNDY_DEEP,
        outer = colors::NEAR_BLACK,
    )
}

/// Render the background on the blocking pool.
pub async fn render_background() -> Result<BackgroundImage, CarouselError> {
    tokio::task::spawn_blocking(render_background_blocking)
        .await
        .map_err(|e| CarouselError::Internal(format!("Background task panicked: {}", e)))?
}

/// Synchronous render: SVG → pixmap → PNG.
pub fn render_background_blocking() -> Result<BackgroundImage, CarouselError> {
    let svg = gradient_svg();
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
        .map_err(|e| CarouselError::BackgroundRender(format!("SVG parse failed: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(PIXEL_W, PIXEL_H)
        .ok_or_else(|| CarouselError::BackgroundRender("failed to allocate pixmap".into()))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    // Every pixel is opaque, so premultiplied RGBA equals straight RGBA.
    let rgba = RgbaImage::from_raw(PIXEL_W, PIXEL_H, pixmap.take())
        .ok_or_else(|| CarouselError::BackgroundRender("pixmap size mismatch".into()))?;

    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CarouselError::BackgroundRender(format!("PNG encode failed: {e}")))?;

    debug!("Rendered background {}x{} → {} bytes PNG", PIXEL_W, PIXEL_H, buf.len());
    Ok(BackgroundImage {
        png: Arc::from(buf.into_boxed_slice()),
    })
}
