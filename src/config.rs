//! Configuration for the carousel pipeline.
//!
//! Everything the pipeline needs from the outside world lives in
//! [`PipelineConfig`]: which external binaries to run, how long to wait for
//! them, the rasterisation DPI and where output goes. The deck design itself
//! is fixed (see [`crate::design`]) and is not configurable.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest, and gives one place to validate.

use crate::error::CarouselError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Lowest and highest accepted rasterisation DPI.
pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 600;

/// Configuration for a carousel run.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use carousel_forge::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .dpi(150)
///     .office_bin("/Applications/LibreOffice.app/Contents/MacOS/soffice")
///     .tool_timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Office renderer used for PPTX → PDF. Default: `soffice`.
    ///
    /// Any binary accepting `--headless --convert-to pdf <file> --outdir <dir>`
    /// works; set a full path when LibreOffice is not on `PATH` (the macOS app
    /// bundle, for instance).
    pub office_bin: String,

    /// PDF rasteriser. Default: `pdftoppm`.
    ///
    /// Must accept `-jpeg -r <dpi> <pdf> <prefix>` and write
    /// `<prefix>-<page>.jpg`.
    pub rasterizer_bin: String,

    /// Rasterisation DPI. Range: 72–600. Default: 300.
    ///
    /// A 10 × 12.5 in slide at 300 DPI is 3000 × 3750 px, comfortably above
    /// what social platforms downscale to.
    pub dpi: u32,

    /// Per-invocation timeout for each external converter, in seconds.
    /// Default: 120. Must be ≥ 1.
    pub tool_timeout_secs: u64,

    /// Where decks and images go. `None` derives `<input dir>/../carousel_images`.
    pub output_dir: Option<PathBuf>,

    /// Receives stage events. `None` means no reporting.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            office_bin: "soffice".to_string(),
            rasterizer_bin: "pdftoppm".to_string(),
            dpi: 300,
            tool_timeout_secs: 120,
            output_dir: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("office_bin", &self.office_bin)
            .field("rasterizer_bin", &self.rasterizer_bin)
            .field("dpi", &self.dpi)
            .field("tool_timeout_secs", &self.tool_timeout_secs)
            .field("output_dir", &self.output_dir)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn office_bin(mut self, bin: impl Into<String>) -> Self {
        self.config.office_bin = bin.into();
        self
    }

    pub fn rasterizer_bin(mut self, bin: impl Into<String>) -> Self {
        self.config.rasterizer_bin = bin.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn tool_timeout_secs(mut self, secs: u64) -> Self {
        self.config.tool_timeout_secs = secs;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, CarouselError> {
        let c = &self.config;
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(CarouselError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.tool_timeout_secs == 0 {
            return Err(CarouselError::InvalidConfig(
                "Tool timeout must be ≥ 1 second".into(),
            ));
        }
        if c.office_bin.trim().is_empty() {
            return Err(CarouselError::InvalidConfig(
                "Office renderer binary must not be empty".into(),
            ));
        }
        if c.rasterizer_bin.trim().is_empty() {
            return Err(CarouselError::InvalidConfig(
                "Rasterizer binary must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Arc;

    #[test]
    fn defaults() {
        let c = PipelineConfig::default();
        assert_eq!(c.office_bin, "soffice");
        assert_eq!(c.rasterizer_bin, "pdftoppm");
        assert_eq!(c.dpi, 300);
        assert_eq!(c.tool_timeout(), Duration::from_secs(120));
        assert!(c.output_dir.is_none());
    }

    #[test]
    fn dpi_is_clamped() {
        let c = PipelineConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.dpi, 72);
        let c = PipelineConfig::builder().dpi(9000).build().unwrap();
        assert_eq!(c.dpi, 600);
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = PipelineConfig::builder()
            .tool_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CarouselError::InvalidConfig(_)));
    }

    #[test]
    fn empty_binary_rejected() {
        assert!(PipelineConfig::builder().office_bin(" ").build().is_err());
        assert!(PipelineConfig::builder().rasterizer_bin("").build().is_err());
    }

    #[test]
    fn debug_hides_callback() {
        let c = PipelineConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .output_dir("/tmp/out")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn PipelineProgressCallback>"));
        assert!(dbg.contains("/tmp/out"));
    }
}
