//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to be told when
//! each stage starts and finishes, and when an external tool prints warnings.
//!
//! # Why callbacks instead of channels?
//!
//! The pipeline is strictly sequential, so a plain method call per event is
//! enough. Callers can still forward events to a channel, a log file or a
//! terminal spinner without the library knowing how the host communicates.
//!
//! # Example
//!
//! ```rust
//! use carousel_forge::{PipelineConfig, PipelineProgressCallback, Stage};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct StageLog(Mutex<Vec<Stage>>);
//!
//! impl PipelineProgressCallback for StageLog {
//!     fn on_stage_complete(&self, stage: Stage, _detail: &str) {
//!         self.0.lock().unwrap().push(stage);
//!     }
//! }
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(Arc::new(StageLog::default()) as Arc<dyn PipelineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::PipelineOutput;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LoadInput,
    RenderBackground,
    BuildDeck,
    WritePptx,
    CheckOfficeTool,
    ConvertToPdf,
    CheckRasterizer,
    RasterizePdf,
    CollectImages,
    Cleanup,
}

impl Stage {
    /// Stages run by the PPTX-only entry point.
    pub const DECK: [Stage; 4] = [
        Stage::LoadInput,
        Stage::RenderBackground,
        Stage::BuildDeck,
        Stage::WritePptx,
    ];

    /// Stages run by the image converter.
    pub const CONVERT: [Stage; 6] = [
        Stage::CheckOfficeTool,
        Stage::ConvertToPdf,
        Stage::CheckRasterizer,
        Stage::RasterizePdf,
        Stage::CollectImages,
        Stage::Cleanup,
    ];

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::LoadInput => "Loading carousel data",
            Stage::RenderBackground => "Rendering background",
            Stage::BuildDeck => "Building slides",
            Stage::WritePptx => "Writing PPTX",
            Stage::CheckOfficeTool => "Checking LibreOffice installation",
            Stage::ConvertToPdf => "Converting PPTX → PDF",
            Stage::CheckRasterizer => "Checking pdftoppm installation",
            Stage::RasterizePdf => "Converting PDF → JPG images",
            Stage::CollectImages => "Collecting images",
            Stage::Cleanup => "Cleaning up intermediate PDF",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Called by the pipeline as it moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive from whichever thread drives the
/// pipeline future, hence `Send + Sync`.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once before the first stage.
    ///
    /// # Arguments
    /// * `total_stages`: number of stages this run will go through
    fn on_pipeline_start(&self, total_stages: usize) {
        let _ = total_stages;
    }

    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    ///
    /// # Arguments
    /// * `stage` : the finished stage
    /// * `detail`: short summary, e.g. the file written or the image count
    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        let _ = (stage, detail);
    }

    /// Non-fatal diagnostics, typically stderr from an external tool.
    fn on_warning(&self, stage: Stage, message: &str) {
        let _ = (stage, message);
    }

    /// Called once after the last stage of a successful run.
    fn on_pipeline_complete(&self, output: &PipelineOutput) {
        let _ = output;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        total: AtomicUsize,
        started: Mutex<Vec<Stage>>,
        warnings: AtomicUsize,
    }

    impl PipelineProgressCallback for TrackingCallback {
        fn on_pipeline_start(&self, total_stages: usize) {
            self.total.store(total_stages, Ordering::SeqCst);
        }

        fn on_stage_start(&self, stage: Stage) {
            self.started.lock().unwrap().push(stage);
        }

        fn on_warning(&self, _stage: Stage, _message: &str) {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_pipeline_start(10);
        cb.on_stage_start(Stage::LoadInput);
        cb.on_stage_complete(Stage::LoadInput, "ok");
        cb.on_warning(Stage::ConvertToPdf, "stderr noise");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback::default();
        cb.on_pipeline_start(Stage::DECK.len());
        for stage in Stage::DECK {
            cb.on_stage_start(stage);
        }
        cb.on_warning(Stage::RasterizePdf, "Syntax Warning");

        assert_eq!(cb.total.load(Ordering::SeqCst), 4);
        assert_eq!(*cb.started.lock().unwrap(), Stage::DECK.to_vec());
        assert_eq!(cb.warnings.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_stage_start(Stage::Cleanup);
    }

    #[test]
    fn stage_labels_and_serialisation() {
        assert_eq!(Stage::ConvertToPdf.to_string(), "Converting PPTX → PDF");
        assert_eq!(
            serde_json::to_string(&Stage::RasterizePdf).unwrap(),
            "\"rasterize_pdf\""
        );
    }
}
