//! Error types for the md2slides library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2SlidesError`] — **Fatal**: the conversion cannot proceed at all
//!   (input file missing, not UTF-8, bad configuration, output not writable).
//!   Returned as `Err(Md2SlidesError)` from the top-level `convert*` functions.
//!
//! * [`ImageError`] — **Non-fatal**: a single image reference could not be
//!   resolved (download failed, file missing) but every other image and every
//!   slide is fine. The image is dropped from its slide and the reason is
//!   recorded in [`crate::output::SkippedImage`] so callers can see what was
//!   lost instead of it vanishing silently.
//!
//! Nothing inside the per-segment pipeline returns `Md2SlidesError`; a parse
//! of a valid string always yields a slide list.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2slides library.
///
/// Image-level failures use [`ImageError`] and are stored in
/// [`crate::output::ConversionReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Md2SlidesError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but its contents are not valid UTF-8.
    #[error("File '{path}' is not valid UTF-8 text")]
    InvalidUtf8 { path: PathBuf },

    /// The input string is neither a readable path nor `-` (stdin).
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    // ── Image resolver setup ──────────────────────────────────────────────
    /// The HTTP client used for remote images could not be constructed.
    #[error("Failed to initialise HTTP client: {0}")]
    HttpClient(String),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slide list could not be serialised.
    #[error("Failed to serialise slides: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single image reference.
///
/// The image is skipped; the slide it belonged to is still produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ImageError {
    /// Network-level failure while downloading (DNS, connect, body read).
    #[error("download of '{url}' failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Server answered with a non-success status code.
    #[error("download of '{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The download did not finish within the configured bound.
    #[error("download of '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// Remote download is disabled in the configuration.
    #[error("remote image '{url}' skipped: downloads are disabled")]
    DownloadsDisabled { url: String },

    /// A local image path does not exist.
    #[error("image not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Downloaded bytes could not be written to a temp file.
    #[error("could not store image from '{url}': {reason}")]
    PersistFailed { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = Md2SlidesError::FileNotFound {
            path: PathBuf::from("deck.md"),
        };
        assert!(e.to_string().contains("deck.md"));
    }

    // No wildcard arm, so a new variant has to be listed here.
    #[test]
    fn every_fatal_error_names_its_cause() {
        let io = || std::io::Error::other("disk full");
        let cases = [
            Md2SlidesError::FileNotFound { path: "a.md".into() },
            Md2SlidesError::PermissionDenied { path: "a.md".into() },
            Md2SlidesError::InvalidUtf8 { path: "a.md".into() },
            Md2SlidesError::InvalidInput {
                input: "a.md".into(),
                reason: "is a directory".into(),
            },
            Md2SlidesError::HttpClient("tls".into()),
            Md2SlidesError::OutputWriteFailed {
                path: "out.json".into(),
                source: io(),
            },
            Md2SlidesError::InvalidConfig("timeout".into()),
        ];
        for e in cases {
            let needle = match &e {
                Md2SlidesError::FileNotFound { .. }
                | Md2SlidesError::PermissionDenied { .. }
                | Md2SlidesError::InvalidUtf8 { .. }
                | Md2SlidesError::InvalidInput { .. } => "a.md",
                Md2SlidesError::HttpClient(_) => "tls",
                Md2SlidesError::OutputWriteFailed { .. } => "out.json",
                Md2SlidesError::Serialization(_) => continue,
                Md2SlidesError::InvalidConfig(_) => "timeout",
            };
            assert!(e.to_string().contains(needle), "got: {e}");
        }
    }

    #[test]
    fn http_status_display() {
        let e = ImageError::HttpStatus {
            url: "https://host/a.png".into(),
            status: 404,
        };
        let msg = e.to_string();
        assert!(msg.contains("HTTP 404"), "got: {msg}");
        assert!(msg.contains("https://host/a.png"));
    }

    #[test]
    fn timeout_display() {
        let e = ImageError::Timeout {
            url: "https://slow/img.jpg".into(),
            secs: 10,
        };
        assert!(e.to_string().contains("10s"));
    }

    #[test]
    fn image_error_serialises() {
        let e = ImageError::NotFound {
            path: PathBuf::from("img/missing.png"),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("NotFound"), "got: {json}");
        let back: ImageError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
