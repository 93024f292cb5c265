//! PPTX → PDF → JPEG conversion through external tools.
//!
//! ## Why shell out?
//!
//! Laying out text with real font metrics is what office suites are for.
//! LibreOffice renders the deck to PDF exactly as a viewer would show it, and
//! poppler's `pdftoppm` turns each PDF page into a JPEG. Both are invoked via
//! `tokio::process` so a hung converter can be bounded by a timeout; children
//! are spawned with `kill_on_drop`, so abandoning the wait also kills them.
//!
//! ## Stages
//!
//! ```text
//! probe office ─▶ PPTX→PDF ─▶ probe rasterizer ─▶ PDF→JPEG ─▶ collect ─▶ delete PDF
//! ```
//!
//! The intermediate PDF is removed only when images were produced, so a
//! failed rasterisation leaves it behind for inspection.

use crate::config::PipelineConfig;
use crate::error::{install_hint, CarouselError};
use crate::progress::{PipelineProgressCallback, Stage};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub const PDF_STAGE: &str = "PPTX → PDF";
pub const JPEG_STAGE: &str = "PDF → JPEG";

/// Convert a `.pptx` into one JPEG per slide.
///
/// `output_dir` defaults to the source's directory. Images are named
/// `<basename>-<page>.jpg` by the rasterizer and returned in lexicographic
/// order.
pub async fn convert_pptx_to_images(
    source: &Path,
    output_dir: Option<&Path>,
    config: &PipelineConfig,
) -> Result<Vec<PathBuf>, CarouselError> {
    if !source.exists() {
        return Err(CarouselError::InputNotFound {
            path: source.to_path_buf(),
        });
    }

    let dir = match output_dir {
        Some(d) => d.to_path_buf(),
        None => source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| CarouselError::OutputWriteFailed {
            path: dir.clone(),
            source: e,
        })?;

    let basename = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| CarouselError::Internal(format!("no file name in {}", source.display())))?;
    let pdf_path = dir.join(format!("{basename}.pdf"));
    let prefix = dir.join(&basename);
    let tool_timeout = config.tool_timeout();

    info!("Converting {} → images in {}", source.display(), dir.display());

    // ── Step 1: Office renderer present? ────────────────────────────────
    stage_start(config, Stage::CheckOfficeTool);
    probe_tool(&config.office_bin, "--version", "soffice", tool_timeout).await?;
    stage_complete(config, Stage::CheckOfficeTool, &config.office_bin);

    // ── Step 2: PPTX → PDF ──────────────────────────────────────────────
    stage_start(config, Stage::ConvertToPdf);
    let office_args: [&OsStr; 6] = [
        OsStr::new("--headless"),
        OsStr::new("--convert-to"),
        OsStr::new("pdf"),
        source.as_os_str(),
        OsStr::new("--outdir"),
        dir.as_os_str(),
    ];
    let stderr = run_tool(&config.office_bin, &office_args, tool_timeout, PDF_STAGE).await?;
    // LibreOffice prints a harmless "terminate called…" on some platforms.
    if !stderr.trim().is_empty() && !stderr.contains("terminate") {
        report_warning(config, Stage::ConvertToPdf, stderr.trim());
    }
    info!("PDF created: {}", pdf_path.display());
    stage_complete(config, Stage::ConvertToPdf, &pdf_path.display().to_string());

    // ── Step 3: Rasterizer present? ─────────────────────────────────────
    stage_start(config, Stage::CheckRasterizer);
    probe_tool(&config.rasterizer_bin, "-v", "pdftoppm", tool_timeout).await?;
    stage_complete(config, Stage::CheckRasterizer, &config.rasterizer_bin);

    // ── Step 4: PDF → JPEG ──────────────────────────────────────────────
    stage_start(config, Stage::RasterizePdf);
    let dpi = config.dpi.to_string();
    let raster_args: [&OsStr; 5] = [
        OsStr::new("-jpeg"),
        OsStr::new("-r"),
        OsStr::new(&dpi),
        pdf_path.as_os_str(),
        prefix.as_os_str(),
    ];
    let stderr = run_tool(&config.rasterizer_bin, &raster_args, tool_timeout, JPEG_STAGE).await?;
    if !stderr.trim().is_empty() {
        report_warning(config, Stage::RasterizePdf, stderr.trim());
    }
    stage_complete(config, Stage::RasterizePdf, &format!("{} DPI", config.dpi));

    // ── Step 5: Collect images ──────────────────────────────────────────
    stage_start(config, Stage::CollectImages);
    let images = collect_images(&dir, &basename).await?;
    if images.is_empty() {
        return Err(CarouselError::NoOutput {
            dir,
            prefix: basename,
        });
    }
    info!("Generated {} images", images.len());
    stage_complete(config, Stage::CollectImages, &format!("{} images", images.len()));

    // ── Step 6: Remove the intermediate PDF ─────────────────────────────
    stage_start(config, Stage::Cleanup);
    if pdf_path.exists() {
        match tokio::fs::remove_file(&pdf_path).await {
            Ok(()) => debug!("Removed {}", pdf_path.display()),
            Err(e) => {
                let msg = format!("could not remove {}: {e}", pdf_path.display());
                report_warning(config, Stage::Cleanup, &msg);
            }
        }
    }
    stage_complete(config, Stage::Cleanup, "");

    for (idx, img) in images.iter().enumerate() {
        debug!("  {}. {}", idx + 1, img.display());
    }
    Ok(images)
}

/// List `<basename>-N.jpg` files in `dir`, in page order.
pub async fn collect_images(dir: &Path, basename: &str) -> Result<Vec<PathBuf>, CarouselError> {
    let list_err = |e: std::io::Error| CarouselError::ConversionFailed {
        stage: JPEG_STAGE.to_string(),
        detail: format!("could not list {}: {e}", dir.display()),
    };

    let mut pages = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(page) = page_number(&name, basename) {
            pages.push((page, name));
        }
    }
    pages.sort();
    Ok(pages.into_iter().map(|(_, n)| dir.join(n)).collect())
}

/// Page number of a rasterizer output named `<basename>-<digits>.jpg`.
fn page_number(name: &str, basename: &str) -> Option<u64> {
    let digits = name
        .strip_prefix(basename)?
        .strip_prefix('-')?
        .strip_suffix(".jpg")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// ── Process helpers ──────────────────────────────────────────────────────

/// Check that `bin` can be launched. The exit status is ignored: some tools
/// (older pdftoppm builds) exit non-zero for their version flag.
async fn probe_tool(
    bin: &str,
    flag: &str,
    role: &str,
    limit: Duration,
) -> Result<(), CarouselError> {
    let mut child = Command::new(bin)
        .arg(flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            debug!("Probe of {bin} failed: {e}");
            CarouselError::ToolMissing {
                tool: bin.to_string(),
                hint: install_hint(role),
            }
        })?;

    match timeout(limit, child.wait()).await {
        Ok(Ok(status)) => debug!("{bin} {flag} → {status}"),
        Ok(Err(e)) => debug!("{bin} {flag}: wait failed: {e}"),
        Err(_) => warn!("{bin} {flag} did not exit within {}s", limit.as_secs()),
    }
    info!("{bin} found");
    Ok(())
}

/// Run `bin args…` under `limit`, returning its stderr on success.
async fn run_tool(
    bin: &str,
    args: &[&OsStr],
    limit: Duration,
    stage: &str,
) -> Result<String, CarouselError> {
    let failed = |detail: String| CarouselError::ConversionFailed {
        stage: stage.to_string(),
        detail,
    };

    debug!("Running {bin} {:?}", args);
    let child = Command::new(bin)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| failed(format!("could not start {bin}: {e}")))?;

    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(failed(format!("{bin} failed: {e}"))),
        Err(_) => {
            return Err(failed(format!(
                "{bin} timed out after {}s",
                limit.as_secs()
            )))
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        let mut detail = format!("{bin} exited with {}", output.status);
        if !stderr.trim().is_empty() {
            detail.push_str(": ");
            detail.push_str(stderr.trim());
        }
        return Err(failed(detail));
    }
    Ok(stderr)
}

// ── Progress helpers ─────────────────────────────────────────────────────

fn callback(config: &PipelineConfig) -> Option<&dyn PipelineProgressCallback> {
    config.progress_callback.as_deref()
}

fn stage_start(config: &PipelineConfig, stage: Stage) {
    info!("{stage}...");
    if let Some(cb) = callback(config) {
        cb.on_stage_start(stage);
    }
}

fn stage_complete(config: &PipelineConfig, stage: Stage, detail: &str) {
    if let Some(cb) = callback(config) {
        cb.on_stage_complete(stage, detail);
    }
}

fn report_warning(config: &PipelineConfig, stage: Stage, message: &str) {
    warn!("{stage}: {message}");
    if let Some(cb) = callback(config) {
        cb.on_warning(stage, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_source_fails_before_any_tool_runs() {
        let config = PipelineConfig::builder()
            .office_bin("/nonexistent/soffice")
            .build()
            .unwrap();
        let err = convert_pptx_to_images(Path::new("/no/such/deck.pptx"), None, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, CarouselError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn unspawnable_office_tool_is_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("deck.pptx");
        std::fs::write(&source, b"PK").unwrap();
        let config = PipelineConfig::builder()
            .office_bin("/nonexistent/bin/soffice-carousel-test")
            .build()
            .unwrap();
        let err = convert_pptx_to_images(&source, None, &config).await.unwrap_err();
        match err {
            CarouselError::ToolMissing { tool, hint } => {
                assert!(tool.contains("soffice-carousel-test"));
                assert!(hint.contains("libreoffice"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn collect_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "post-2.jpg",
            "post-1.jpg",
            "post.pdf",
            "other-1.jpg",
            "post-3.png",
            "post_v2-1.jpg",
            "post_v2-2.jpg",
            "poster-1.jpg",
            "post-.jpg",
            "post-x1.jpg",
        ] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let images = collect_images(dir.path(), "post").await.unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["post-1.jpg", "post-2.jpg"]);
    }

    #[tokio::test]
    async fn collect_images_orders_by_page_number() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["deck-10.jpg", "deck-9.jpg", "deck-01.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let images = collect_images(dir.path(), "deck").await.unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["deck-01.jpg", "deck-9.jpg", "deck-10.jpg"]);
    }
}
