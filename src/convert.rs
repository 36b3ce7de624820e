//! Conversion entry points.
//!
//! [`convert_str`] is the core: a Markdown string in, slides plus a
//! [`ConversionReport`] out. [`convert_file`] adds reading the document from
//! disk (and resolves relative image paths next to it), [`convert_to_file`]
//! adds writing the slide list as JSON. Fetching documents from the network
//! is deliberately not offered; callers hand in text they already hold.

use crate::config::ConversionConfig;
use crate::error::Md2SlidesError;
use crate::output::{ConversionOutput, ConversionReport};
use crate::pipeline::{self, images::StandardResolver};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Convert a Markdown string into slides.
///
/// # Errors
/// Returns `Err(Md2SlidesError)` only when the image resolver cannot be set
/// up. Unresolvable images and missing titles never fail a conversion.
pub fn convert_str(
    markdown: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2SlidesError> {
    let start = Instant::now();
    info!("Starting conversion: {} bytes of Markdown", markdown.len());

    let resolver = StandardResolver::new(config)?;
    let parsed = pipeline::parse_document(markdown, &resolver, config.progress_callback.as_deref());

    if !parsed.skipped_images.is_empty() {
        warn!("{} image(s) could not be resolved", parsed.skipped_images.len());
    }

    let report = ConversionReport {
        slide_count: parsed.slides.len(),
        block_count: parsed.slides.iter().map(|s| s.blocks.len()).sum(),
        fallback_titles: parsed.fallback_titles,
        downloaded_images: parsed.downloaded_images,
        skipped_images: parsed.skipped_images,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} slides, {} blocks, {}ms",
        report.slide_count, report.block_count, report.duration_ms
    );

    Ok(ConversionOutput {
        slides: parsed.slides,
        report,
    })
}

/// Read a Markdown file (or stdin for `-`) and convert it.
///
/// Unless the config already names a base directory, relative image paths
/// resolve against the file's directory.
pub fn convert_file(
    input: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2SlidesError> {
    let input = input.as_ref();
    let markdown = read_input(input)?;

    if config.base_dir.is_none() && input != "-" {
        if let Some(parent) = Path::new(input).parent() {
            let mut config = config.clone();
            config.base_dir = Some(parent.to_path_buf());
            return convert_str(&markdown, &config);
        }
    }
    convert_str(&markdown, config)
}

/// Convert a Markdown file and write the slide list as pretty JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn convert_to_file(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Md2SlidesError> {
    let output = convert_file(input, config)?;
    let json = serde_json::to_string_pretty(&output.slides)?;
    write_atomic(output_path.as_ref(), json.as_bytes())?;
    Ok(output.report)
}

/// Read the document text from a path, or from stdin when `input` is `-`.
pub fn read_input(input: &str) -> Result<String, Md2SlidesError> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| Md2SlidesError::InvalidInput {
                input: input.to_string(),
                reason: format!("could not read stdin: {e}"),
            })?;
        return Ok(buf);
    }

    let path = PathBuf::from(input);
    match std::fs::read(&path) {
        Ok(bytes) => String::from_utf8(bytes).map_err(|_| Md2SlidesError::InvalidUtf8 { path }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Md2SlidesError::FileNotFound { path })
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Md2SlidesError::PermissionDenied { path })
        }
        Err(e) => Err(Md2SlidesError::InvalidInput {
            input: input.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Write `contents` to `path` via a sibling temp file and a rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Md2SlidesError> {
    let write_err = |source: std::io::Error| Md2SlidesError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, contents).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> ConversionConfig {
        ConversionConfig::builder()
            .download_images(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_convert_str_report() {
        let md = "# A\n- x\n---\nno title\n\n![r](https://example.com/r.png)";
        let out = convert_str(md, &offline()).unwrap();
        assert_eq!(out.report.slide_count, 2);
        assert_eq!(out.report.block_count, 2);
        assert_eq!(out.report.fallback_titles, 1);
        assert_eq!(out.report.skipped_images.len(), 1);
        assert!(out.report.downloaded_images.is_empty());
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input("/definitely/not/a/deck.md").unwrap_err();
        assert!(matches!(err, Md2SlidesError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_input_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.md");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = read_input(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Md2SlidesError::InvalidUtf8 { .. }));
    }

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        write_atomic(&path, b"[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(!path.with_extension("tmp").exists());
    }
}
