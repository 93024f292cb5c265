//! End-to-end entry points: carousel JSON in, deck (and images) out.
//!
//! ## Two entry points
//!
//! [`generate_pptx`] stops after writing the deck, for machines without
//! LibreOffice or when the deck needs manual review before export.
//! [`generate_images`] continues through the external converters and checks
//! that exactly one image per slide came back.

use crate::config::PipelineConfig;
use crate::error::CarouselError;
use crate::output::{PipelineOutput, PipelineStats};
use crate::pipeline::{background, convert, generate, input};
use crate::progress::Stage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Load the carousel and write its deck. No external tools are run.
pub async fn generate_pptx(
    input_path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<PipelineOutput, CarouselError> {
    let total_start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_start(Stage::DECK.len());
    }

    let mut output = write_deck_stages(input_path.as_ref(), config).await?;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_complete(&output);
    }
    Ok(output)
}

/// Full pipeline: deck, then one JPEG per slide.
///
/// # Errors
/// Any stage failure aborts the run. Besides the converter's own errors,
/// [`CarouselError::PageCountMismatch`] is returned when the rasterizer
/// produced a different number of images than the deck has slides.
pub async fn generate_images(
    input_path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<PipelineOutput, CarouselError> {
    let total_start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_start(Stage::DECK.len() + Stage::CONVERT.len());
    }

    let mut output = write_deck_stages(input_path.as_ref(), config).await?;

    let convert_start = Instant::now();
    let images = convert::convert_pptx_to_images(
        &output.pptx_path,
        Some(&output.output_dir),
        config,
    )
    .await?;
    output.stats.convert_duration_ms = convert_start.elapsed().as_millis() as u64;

    if images.len() != output.slide_count {
        return Err(CarouselError::PageCountMismatch {
            expected: output.slide_count,
            found: images.len(),
        });
    }

    output.images = images;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Pipeline complete: {} images in {}ms",
        output.images.len(),
        output.stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_complete(&output);
    }
    Ok(output)
}

/// Synchronous wrapper around [`generate_images`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_images_sync(
    input_path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<PipelineOutput, CarouselError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CarouselError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate_images(input_path, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Load → background → build → write, timing each stage.
async fn write_deck_stages(
    input_path: &Path,
    config: &PipelineConfig,
) -> Result<PipelineOutput, CarouselError> {
    let cb = config.progress_callback.as_deref();
    let mut stats = PipelineStats::default();

    // ── Step 1: Load input ───────────────────────────────────────────────
    if let Some(cb) = cb {
        cb.on_stage_start(Stage::LoadInput);
    }
    let start = Instant::now();
    let carousel = input::load_carousel(input_path).await?;
    stats.load_duration_ms = start.elapsed().as_millis() as u64;
    if let Some(cb) = cb {
        cb.on_stage_complete(
            Stage::LoadInput,
            &format!("\"{}\" ({} slides)", carousel.title, carousel.deck_len()),
        );
    }

    let output_dir: PathBuf = config
        .output_dir
        .clone()
        .unwrap_or_else(|| input::output_dir_for(input_path));
    let pptx_path = input::deck_path_for(input_path, &output_dir);

    // ── Step 2: Background ───────────────────────────────────────────────
    if let Some(cb) = cb {
        cb.on_stage_start(Stage::RenderBackground);
    }
    let start = Instant::now();
    let bg = background::render_background().await?;
    stats.background_duration_ms = start.elapsed().as_millis() as u64;
    if let Some(cb) = cb {
        cb.on_stage_complete(Stage::RenderBackground, &format!("{} bytes PNG", bg.png().len()));
    }

    // ── Step 3: Build slides ─────────────────────────────────────────────
    if let Some(cb) = cb {
        cb.on_stage_start(Stage::BuildDeck);
    }
    let start = Instant::now();
    let deck = generate::build_deck(&carousel, &bg);
    stats.build_duration_ms = start.elapsed().as_millis() as u64;
    let slide_count = deck.slide_count();
    if let Some(cb) = cb {
        cb.on_stage_complete(Stage::BuildDeck, &format!("{slide_count} slides"));
    }

    // ── Step 4: Write PPTX ───────────────────────────────────────────────
    if let Some(cb) = cb {
        cb.on_stage_start(Stage::WritePptx);
    }
    let start = Instant::now();
    generate::write_deck(&deck, &pptx_path).await?;
    stats.write_duration_ms = start.elapsed().as_millis() as u64;
    info!("PPTX generated: {}", pptx_path.display());
    if let Some(cb) = cb {
        cb.on_stage_complete(Stage::WritePptx, &pptx_path.display().to_string());
    }

    Ok(PipelineOutput {
        input: input_path.to_path_buf(),
        pptx_path,
        output_dir,
        slide_count,
        images: Vec::new(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::PipelineProgressCallback;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        total: Mutex<Option<usize>>,
        completed: Mutex<Vec<Stage>>,
        finished: Mutex<bool>,
    }

    impl PipelineProgressCallback for Recorder {
        fn on_pipeline_start(&self, total_stages: usize) {
            *self.total.lock().unwrap() = Some(total_stages);
        }

        fn on_stage_complete(&self, stage: Stage, _detail: &str) {
            self.completed.lock().unwrap().push(stage);
        }

        fn on_pipeline_complete(&self, _output: &PipelineOutput) {
            *self.finished.lock().unwrap() = true;
        }
    }

    #[tokio::test]
    async fn pptx_only_run_reports_deck_stages() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("carousel_outputs");
        std::fs::create_dir_all(&input_dir).unwrap();
        let input_path = input_dir.join("post.json");
        std::fs::write(
            &input_path,
            r#"{"title": "Loops", "slides": [{"text_lines": ["a"]}, {"text_lines": ["b"]}]}"#,
        )
        .unwrap();

        let recorder = Arc::new(Recorder::default());
        let config = PipelineConfig::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();
        let out = generate_pptx(&input_path, &config).await.unwrap();

        assert_eq!(out.slide_count, 3);
        assert!(out.images.is_empty());
        assert_eq!(out.pptx_path, input_dir.join("../carousel_images/post.pptx"));
        assert!(out.pptx_path.exists());

        assert_eq!(*recorder.total.lock().unwrap(), Some(4));
        assert_eq!(*recorder.completed.lock().unwrap(), Stage::DECK.to_vec());
        assert!(*recorder.finished.lock().unwrap());
    }

    #[tokio::test]
    async fn configured_output_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("post.json");
        std::fs::write(&input_path, r#"{"title": "Solo"}"#).unwrap();
        let out_dir = dir.path().join("decks");

        let config = PipelineConfig::builder().output_dir(&out_dir).build().unwrap();
        let out = generate_pptx(&input_path, &config).await.unwrap();
        assert_eq!(out.pptx_path, out_dir.join("post.pptx"));
        assert_eq!(out.slide_count, 1);
    }

    #[tokio::test]
    async fn missing_input_fails_fast() {
        let config = PipelineConfig::default();
        let err = generate_images("/nope/post.json", &config).await.unwrap_err();
        assert!(matches!(err, CarouselError::InputNotFound { .. }));
    }
}
