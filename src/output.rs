//! Result types returned by the `generate_*` entry points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// The carousel JSON that was read.
    pub input: PathBuf,
    /// The generated deck.
    pub pptx_path: PathBuf,
    pub output_dir: PathBuf,
    /// Slides in the deck, cover included.
    pub slide_count: usize,
    /// JPEGs in page order. Empty for PPTX-only runs.
    pub images: Vec<PathBuf>,
    pub stats: PipelineStats,
}

/// Wall-clock timings per stage, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub load_duration_ms: u64,
    pub background_duration_ms: u64,
    pub build_duration_ms: u64,
    pub write_duration_ms: u64,
    /// PPTX → PDF → JPEG, including tool probes and cleanup. Zero for
    /// PPTX-only runs.
    pub convert_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_to_json() {
        let out = PipelineOutput {
            input: "data/post.json".into(),
            pptx_path: "carousel_images/post.pptx".into(),
            output_dir: "carousel_images".into(),
            slide_count: 3,
            images: vec!["carousel_images/post-1.jpg".into()],
            stats: PipelineStats {
                total_duration_ms: 42,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["slide_count"], 3);
        assert_eq!(json["images"][0], "carousel_images/post-1.jpg");
        assert_eq!(json["stats"]["total_duration_ms"], 42);

        let back: PipelineOutput = serde_json::from_value(json).unwrap();
        assert_eq!(back, out);
    }
}
