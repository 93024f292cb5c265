//! # carousel-forge
//!
//! Turn a carousel post described as JSON into a branded PPTX deck and a set
//! of high-resolution JPEG slides ready for posting.
//!
//! ## Why go through PPTX?
//!
//! The deck is the editable artefact: designers can open it, nudge a line and
//! re-export. Images are then produced by LibreOffice and poppler, so what is
//! posted is exactly what the deck shows. Layout decisions (title wrapping,
//! how many lines fit) are made by deterministic character-count rules, so the
//! same JSON always yields the same deck.
//!
//! ## Pipeline Overview
//!
//! ```text
//! carousel.json
//!  │
//!  ├─ 1. Input       parse JSON, derive ../carousel_images/<name>.pptx
//!  ├─ 2. Background  radial gradient SVG → PNG (resvg, spawn_blocking)
//!  ├─ 3. Deck        cover + one slide per entry, shared background
//!  ├─ 4. PPTX        OOXML zip, written atomically
//!  ├─ 5. PDF         soffice --headless --convert-to pdf
//!  └─ 6. JPEG        pdftoppm -jpeg -r 300, collect <name>-N.jpg, drop PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carousel_forge::{generate_images, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!     let output = generate_images("data/carousel_outputs/post.json", &config).await?;
//!     for img in &output.images {
//!         println!("{}", img.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `carousel` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! carousel-forge = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod design;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod pptx;
pub mod progress;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::CarouselError;
pub use model::{CarouselInput, SlideInput};
pub use output::{PipelineOutput, PipelineStats};
pub use pipeline::background::{render_background, BackgroundImage};
pub use pipeline::convert::convert_pptx_to_images;
pub use pipeline::generate::{build_deck, generate_carousel};
pub use pipeline::input::{deck_path_for, load_carousel, output_dir_for};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback, Stage};
pub use run::{generate_images, generate_images_sync, generate_pptx};
