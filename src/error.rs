//! Error type for the carousel-forge library.
//!
//! Every failure is fatal to the run: there is no partial-success mode and no
//! retry. A failed stage surfaces as a [`CarouselError`] from whichever
//! `generate_*` entry point was called, and the CLI maps it to exit code 1.
//!
//! Variants are grouped by pipeline stage so that callers matching on them can
//! tell "your input is wrong" apart from "your machine is missing a tool"
//! apart from "the tool ran and failed".

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the carousel-forge library.
#[derive(Debug, Error)]
pub enum CarouselError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input file (carousel JSON or PPTX source) does not exist.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the input file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input exists but could not be read (e.g. it is a directory).
    #[error("Failed to read input '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The carousel JSON is malformed or lacks a required field.
    #[error("Invalid carousel JSON in '{path}': {source}")]
    InputParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── External tool errors ──────────────────────────────────────────────
    /// A required external binary could not be launched.
    #[error("{tool} not installed or not on PATH.\n{hint}")]
    ToolMissing { tool: String, hint: String },

    /// An external converter exited non-zero, could not be spawned, or timed out.
    #[error("Failed to convert {stage}: {detail}")]
    ConversionFailed { stage: String, detail: String },

    /// The rasterizer ran but no `<prefix>-N.jpg` files appeared.
    #[error("No images were generated in '{dir}' for prefix '{prefix}'. Check pdftoppm output.")]
    NoOutput { dir: PathBuf, prefix: String },

    /// The rasterizer produced a different number of pages than the deck has slides.
    #[error("Expected {expected} images (one per slide) but found {found}")]
    PageCountMismatch { expected: usize, found: usize },

    // ── Rendering / packaging errors ──────────────────────────────────────
    /// The gradient background could not be rendered or encoded.
    #[error("Background rendering failed: {0}")]
    BackgroundRender(String),

    /// Writing the OOXML zip container failed.
    #[error("PPTX packaging failed: {0}")]
    Package(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write the presentation file.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<zip::result::ZipError> for CarouselError {
    fn from(e: zip::result::ZipError) -> Self {
        CarouselError::Package(e.to_string())
    }
}

/// Install guidance for an external tool, tailored to the build target.
pub(crate) fn install_hint(tool: &str) -> String {
    let (mac, linux) = match tool {
        "pdftoppm" => ("brew install poppler", "apt-get install poppler-utils"),
        _ => (
            "brew install --cask libreoffice",
            "apt-get install libreoffice",
        ),
    };
    if cfg!(target_os = "macos") {
        format!("Install with: {mac}")
    } else if cfg!(target_os = "linux") {
        format!("Install with: {linux}")
    } else {
        format!("Install with: {mac} (macOS) or {linux} (Linux)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_missing_display_includes_hint() {
        let e = CarouselError::ToolMissing {
            tool: "LibreOffice".into(),
            hint: install_hint("soffice"),
        };
        let msg = e.to_string();
        assert!(msg.contains("LibreOffice"), "got: {msg}");
        assert!(msg.contains("libreoffice"), "got: {msg}");
    }

    #[test]
    fn pdftoppm_hint_names_poppler() {
        assert!(install_hint("pdftoppm").contains("poppler"));
    }

    #[test]
    fn conversion_failed_display() {
        let e = CarouselError::ConversionFailed {
            stage: "PPTX → PDF".into(),
            detail: "timed out after 120s".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("PPTX → PDF"));
        assert!(msg.contains("120s"));
    }

    #[test]
    fn page_count_mismatch_display() {
        let e = CarouselError::PageCountMismatch {
            expected: 6,
            found: 5,
        };
        assert!(e.to_string().contains("6"));
        assert!(e.to_string().contains("5"));
    }

    #[test]
    fn input_parse_keeps_source() {
        use std::error::Error as _;
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = CarouselError::InputParse {
            path: "deck.json".into(),
            source,
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("deck.json"));
    }
}
