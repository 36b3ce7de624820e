//! Image resolution: turn an image `src` into a local file a renderer can open.
//!
//! The structurer never touches the network or the file system directly; it
//! asks an [`ImageResolver`]. Tests substitute a fake, the library and CLI use
//! [`StandardResolver`].
//!
//! ## Why keep downloaded files?
//!
//! The slide list outlives the parse: a deck builder opens each `src` later,
//! possibly in another process. Downloads are therefore persisted with
//! [`tempfile::NamedTempFile::keep`] and reported back as
//! [`ResolvedImage::Downloaded`] so the caller owns their cleanup (see
//! [`crate::output::ConversionReport::cleanup`]).

use crate::config::ConversionConfig;
use crate::error::{ImageError, Md2SlidesError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Resolves an image reference to a local path.
pub trait ImageResolver {
    /// Resolve `src` as written in the Markdown. An `Err` means the image is
    /// skipped; it never aborts the slide.
    fn resolve(&self, src: &str) -> Result<ResolvedImage, ImageError>;
}

/// A successfully resolved image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// The reference was already a local file.
    Local(PathBuf),
    /// The reference was a URL; the bytes now live in a kept temp file.
    Downloaded(PathBuf),
}

impl ResolvedImage {
    /// Get the local path regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedImage::Local(p) => p,
            ResolvedImage::Downloaded(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            ResolvedImage::Local(p) | ResolvedImage::Downloaded(p) => p,
        }
    }
}

/// Check if the image source is an absolute HTTP(S) URL.
pub fn is_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Default resolver: one blocking HTTP attempt per remote image, existence
/// check for local paths.
pub struct StandardResolver {
    /// `None` when remote downloads are disabled.
    client: Option<reqwest::blocking::Client>,
    timeout_secs: u64,
    base_dir: Option<PathBuf>,
    image_dir: Option<PathBuf>,
}

impl StandardResolver {
    /// Build a resolver from the conversion settings.
    pub fn new(config: &ConversionConfig) -> Result<Self, Md2SlidesError> {
        let client = if config.download_images {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.image_timeout_secs))
                .user_agent(concat!("md2slides/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| Md2SlidesError::HttpClient(e.to_string()))?;
            Some(client)
        } else {
            None
        };

        Ok(Self {
            client,
            timeout_secs: config.image_timeout_secs,
            base_dir: config.base_dir.clone(),
            image_dir: config.image_dir.clone(),
        })
    }

    /// Resolve a local path, joining relative paths onto the base directory.
    fn resolve_local(&self, src: &str) -> Result<ResolvedImage, ImageError> {
        let path = PathBuf::from(src);
        let path = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        };

        if !path.exists() {
            return Err(ImageError::NotFound { path });
        }

        debug!("Resolved local image: {}", path.display());
        Ok(ResolvedImage::Local(path))
    }

    /// Download a URL into a kept temp file whose suffix matches the URL.
    fn download(
        &self,
        client: &reqwest::blocking::Client,
        url: &str,
    ) -> Result<ResolvedImage, ImageError> {
        info!("Downloading image from: {}", url);

        let request_error = |e: reqwest::Error| {
            if e.is_timeout() {
                ImageError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                ImageError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let response = client.get(url).send().map_err(request_error)?;

        if !response.status().is_success() {
            return Err(ImageError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().map_err(request_error)?;

        let persist_error = |e: std::io::Error| ImageError::PersistFailed {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let suffix = image_suffix(url);
        let mut builder = tempfile::Builder::new();
        builder.prefix("md2slides-").suffix(suffix.as_str());
        let mut file = match &self.image_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(persist_error)?;

        file.write_all(&bytes).map_err(persist_error)?;
        let (_, path) = file.keep().map_err(|e| persist_error(e.error))?;

        info!("Downloaded {} bytes to: {}", bytes.len(), path.display());
        Ok(ResolvedImage::Downloaded(path))
    }
}

impl ImageResolver for StandardResolver {
    fn resolve(&self, src: &str) -> Result<ResolvedImage, ImageError> {
        if !is_url(src) {
            return self.resolve_local(src);
        }
        match &self.client {
            Some(client) => self.download(client, src),
            None => Err(ImageError::DownloadsDisabled {
                url: src.to_string(),
            }),
        }
    }
}

/// File suffix for a downloaded image, taken from the URL path's extension.
///
/// Query strings and fragments are ignored; a URL without an extension gets
/// `.img`.
fn image_suffix(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if let Some(ext) = Path::new(last).extension().and_then(|e| e.to_str()) {
                    if !ext.is_empty() {
                        return format!(".{ext}");
                    }
                }
            }
        }
    }

    ".img".to_string()
}
