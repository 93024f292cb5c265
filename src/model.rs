//! Carousel input model as produced by the content pipeline.

use serde::{Deserialize, Serialize};

/// A carousel post: a cover title plus ordered content slides.
///
/// Fields beyond these (`created_at`, `total_slides`, `source_research`, …)
/// are written by upstream tooling and ignored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselInput {
    pub title: String,

    /// Editorial pillar id such as `"pillar_02"`; picks the cover label.
    #[serde(default)]
    pub pillar: Option<String>,

    /// Content slides in reading order. A missing array means no content slides.
    #[serde(default)]
    pub slides: Vec<SlideInput>,
}

/// One content slide.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlideInput {
    #[serde(default)]
    pub title: Option<String>,

    /// Paragraphs, top to bottom.
    #[serde(default)]
    pub text_lines: Vec<String>,

    /// 1-based position assigned upstream; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl CarouselInput {
    /// Number of slides the rendered deck will contain (cover included).
    pub fn deck_len(&self) -> usize {
        self.slides.len() + 1
    }

    /// First line of the first content slide, if it is non-empty.
    pub fn preview_line(&self) -> Option<&str> {
        self.slides
            .first()
            .and_then(|s| s.text_lines.first())
            .map(String::as_str)
            .filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pipeline_output_with_extra_fields() {
        let json = r#"{
            "title": "Growth loops are changing",
            "pillar": "pillar_01",
            "total_slides": 2,
            "created_at": "2025-01-04T10:00:00",
            "slides": [
                {"index": 1, "title": "Hook", "text_lines": ["one", "two"]},
                {"index": 2, "text_lines": ["three"]}
            ]
        }"#;
        let c: CarouselInput = serde_json::from_str(json).unwrap();
        assert_eq!(c.slides.len(), 2);
        assert_eq!(c.deck_len(), 3);
        assert_eq!(c.slides[0].title.as_deref(), Some("Hook"));
        assert_eq!(c.slides[1].title, None);
        assert_eq!(c.preview_line(), Some("one"));
    }

    #[test]
    fn missing_slides_means_cover_only() {
        let c: CarouselInput = serde_json::from_str(r#"{"title": "Solo"}"#).unwrap();
        assert!(c.slides.is_empty());
        assert_eq!(c.deck_len(), 1);
        assert_eq!(c.pillar, None);
        assert_eq!(c.preview_line(), None);
    }

    #[test]
    fn missing_title_is_an_error() {
        let r = serde_json::from_str::<CarouselInput>(r#"{"slides": []}"#);
        assert!(r.is_err());
    }

    #[test]
    fn empty_first_line_has_no_preview() {
        let c = CarouselInput {
            title: "T".into(),
            pillar: None,
            slides: vec![SlideInput {
                text_lines: vec![String::new(), "later".into()],
                ..Default::default()
            }],
        };
        assert_eq!(c.preview_line(), None);
    }
}
