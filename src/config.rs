//! Configuration types for Markdown-to-slide conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The parsing rules themselves are fixed
//! (the `---` separator and the title markers are a contract with whoever
//! writes the document); only the image side of the pipeline is tunable.

use crate::error::Md2SlidesError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for a Markdown-to-slide conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2slides::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .image_timeout_secs(5)
///     .download_images(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Bound on each remote image download, in seconds. Default: 10.
    ///
    /// Downloads run one at a time and block the whole conversion, so a slow
    /// host delays every later slide. There is no retry: a timeout drops the
    /// image.
    pub image_timeout_secs: u64,

    /// Download `http://` / `https://` images. Default: true.
    ///
    /// When false every remote image is skipped and reported, which keeps a
    /// conversion fully offline.
    pub download_images: bool,

    /// Directory for downloaded images. Default: the system temp directory.
    pub image_dir: Option<PathBuf>,

    /// Directory that relative local image paths resolve against.
    /// Default: None (relative to the working directory).
    pub base_dir: Option<PathBuf>,

    /// Optional per-slide progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            image_timeout_secs: 10,
            download_images: true,
            image_dir: None,
            base_dir: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("download_images", &self.download_images)
            .field("image_dir", &self.image_dir)
            .field("base_dir", &self.base_dir)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs;
        self
    }

    pub fn download_images(mut self, v: bool) -> Self {
        self.config.download_images = v;
        self
    }

    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.image_dir = Some(dir.into());
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2SlidesError> {
        let c = &self.config;
        if c.image_timeout_secs == 0 {
            return Err(Md2SlidesError::InvalidConfig(
                "Image timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(dir) = &c.image_dir {
            if !dir.is_dir() {
                return Err(Md2SlidesError::InvalidConfig(format!(
                    "Image directory '{}' does not exist",
                    dir.display()
                )));
            }
        }
        Ok(self.config)
    }
}
