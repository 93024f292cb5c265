//! Input resolution: load the carousel JSON and derive output locations.
//!
//! ## Why check existence and permissions up front?
//!
//! `serde_json` only sees a byte stream, so an unreadable file would surface
//! as a generic I/O failure halfway through the run. Distinguishing "missing"
//! from "not readable" from "not valid carousel JSON" before any rendering
//! work starts gives the CLI a precise message and keeps partial output
//! (half-written decks, stray PDFs) from ever being produced.

use crate::error::CarouselError;
use crate::model::CarouselInput;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name, next to the input's parent, that receives decks and images.
pub const OUTPUT_DIR_NAME: &str = "carousel_images";

/// Read and parse a carousel JSON file.
pub async fn load_carousel(path: impl AsRef<Path>) -> Result<CarouselInput, CarouselError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CarouselError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(CarouselError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(CarouselError::InputRead {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let carousel: CarouselInput =
        serde_json::from_slice(&bytes).map_err(|e| CarouselError::InputParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(
        "Loaded carousel \"{}\" with {} slides",
        carousel.title,
        carousel.slides.len()
    );
    Ok(carousel)
}

/// Default output directory: `<input dir>/../carousel_images`.
pub fn output_dir_for(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    parent.join("..").join(OUTPUT_DIR_NAME)
}

/// Deck path inside `dir`, named after the input file without `.json`.
pub fn deck_path_for(input: &Path, dir: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "carousel".to_string());
    let stem = name.strip_suffix(".json").unwrap_or(&name);
    let path = dir.join(format!("{stem}.pptx"));
    debug!("Deck path for {}: {}", input.display(), path.display());
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_is_sibling_of_input_dir() {
        let dir = output_dir_for(Path::new("data/carousel_outputs/post.json"));
        assert_eq!(dir, PathBuf::from("data/carousel_outputs/../carousel_images"));
    }

    #[test]
    fn output_dir_for_bare_filename() {
        assert_eq!(
            output_dir_for(Path::new("post.json")),
            PathBuf::from("../carousel_images")
        );
    }

    #[test]
    fn deck_path_strips_json_only() {
        let dir = Path::new("/out");
        assert_eq!(
            deck_path_for(Path::new("/in/Superhuman_pillar_01.json"), dir),
            PathBuf::from("/out/Superhuman_pillar_01.pptx")
        );
        assert_eq!(
            deck_path_for(Path::new("/in/notes.v2.txt"), dir),
            PathBuf::from("/out/notes.v2.txt.pptx")
        );
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = load_carousel("/definitely/not/here.json").await.unwrap_err();
        assert!(matches!(err, CarouselError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn directory_is_read_error_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_carousel(dir.path()).await.unwrap_err();
        assert!(matches!(err, CarouselError::InputRead { .. }), "{err:?}");
        assert!(!err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_carousel(&path).await.unwrap_err();
        assert!(matches!(err, CarouselError::InputParse { .. }));
    }

    #[tokio::test]
    async fn missing_title_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("untitled.json");
        std::fs::write(&path, r#"{"slides": []}"#).unwrap();
        let err = load_carousel(&path).await.unwrap_err();
        assert!(matches!(err, CarouselError::InputParse { .. }));
    }

    #[tokio::test]
    async fn loads_valid_carousel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.json");
        std::fs::write(
            &path,
            r#"{"title": "Hi", "slides": [{"text_lines": ["a"]}], "framework_used": "PAS"}"#,
        )
        .unwrap();
        let c = load_carousel(&path).await.unwrap();
        assert_eq!(c.title, "Hi");
        assert_eq!(c.deck_len(), 2);
    }
}
