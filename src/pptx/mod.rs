//! Minimal PresentationML writer.
//!
//! Only what a carousel deck needs: a custom page size, slides with a shared
//! picture background, text boxes, and rectangle / rounded-rectangle shapes.
//! [`Presentation::to_bytes`] packages everything into a `.pptx` (OOXML zip)
//! that LibreOffice and PowerPoint both open.
//!
//! Slide content is added through the [`Canvas`] trait so layout helpers do
//! not depend on the concrete slide type.

pub mod package;
pub mod shape;

pub use shape::{Align, Fill, Frame, Geometry, Line, Shape, ShapeOptions, TextOptions, VAlign};

use crate::error::CarouselError;
use std::sync::Arc;

/// Builder seam for placing content on a slide.
pub trait Canvas {
    /// Place a text box. `\n` in `text` starts a new paragraph.
    fn add_text(&mut self, text: &str, frame: Frame, opts: TextOptions);

    /// Place a rectangle or rounded rectangle.
    fn add_shape(&mut self, geometry: Geometry, frame: Frame, opts: ShapeOptions);
}

/// One slide: an optional background picture plus shapes in z-order.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    background: Option<Arc<[u8]>>,
    shapes: Vec<Shape>,
}

impl Slide {
    /// Stretch a PNG over the whole slide. Slides sharing the same `Arc`
    /// share a single media part in the package.
    pub fn set_background(&mut self, png: Arc<[u8]>) {
        self.background = Some(png);
    }

    pub fn background(&self) -> Option<&Arc<[u8]>> {
        self.background.as_ref()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// All text-box contents in z-order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(Shape::text)
    }

    // Shape id 1 is the slide's root group.
    fn next_id(&self) -> u32 {
        self.shapes.len() as u32 + 2
    }
}

impl Canvas for Slide {
    fn add_text(&mut self, text: &str, frame: Frame, opts: TextOptions) {
        let id = self.next_id();
        self.shapes.push(Shape::Text {
            id,
            text: text.to_string(),
            frame,
            opts,
        });
    }

    fn add_shape(&mut self, geometry: Geometry, frame: Frame, opts: ShapeOptions) {
        let id = self.next_id();
        self.shapes.push(Shape::Geometry {
            id,
            geometry,
            frame,
            opts,
        });
    }
}

/// An in-memory presentation.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Page width in inches.
    width: f64,
    /// Page height in inches.
    height: f64,
    author: Option<String>,
    title: Option<String>,
    slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with a custom page size in inches.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            author: None,
            title: None,
            slides: Vec::new(),
        }
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = Some(author.into());
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Append a blank slide and return it for population.
    pub fn add_slide(&mut self) -> &mut Slide {
        self.slides.push(Slide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Serialise to `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CarouselError> {
        package::write_package(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_ids_start_after_root_group() {
        let mut pres = Presentation::new(10.0, 12.5);
        let slide = pres.add_slide();
        slide.add_text("A", Frame::new(0.0, 0.0, 1.0, 1.0), TextOptions::new(12.0, "000000"));
        slide.add_shape(
            Geometry::Rect,
            Frame::new(0.0, 0.0, 1.0, 1.0),
            ShapeOptions::default(),
        );
        let ids: Vec<u32> = pres.slides()[0].shapes().iter().map(Shape::id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn texts_skip_geometry() {
        let mut slide = Slide::default();
        slide.add_shape(
            Geometry::RoundRect,
            Frame::new(0.0, 0.0, 1.0, 1.0),
            ShapeOptions::default(),
        );
        slide.add_text("hello", Frame::new(0.0, 0.0, 1.0, 1.0), TextOptions::new(12.0, "000000"));
        assert_eq!(slide.texts().collect::<Vec<_>>(), vec!["hello"]);
    }

    #[test]
    fn metadata_round_trips() {
        let mut pres = Presentation::new(10.0, 12.5);
        pres.set_author("Sneha");
        pres.set_title("Deck");
        assert_eq!(pres.author(), Some("Sneha"));
        assert_eq!(pres.title(), Some("Deck"));
        assert_eq!(pres.slide_count(), 0);
    }
}
