//! # Output Configuration
//!
//! Canvas size, output location and encoding settings. Every field has a
//! default, so an empty JSON object (or no config file at all) yields a
//! working 1080×1350 JPEG setup writing to `generated_templates/`.
//!
//! ```json
//! {
//!   "width": 1080,
//!   "height": 1350,
//!   "output_dir": "generated_templates",
//!   "format": "png",
//!   "jpeg_quality": 90
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::CardError;

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// JPEG quality, 1..=100. Ignored for PNG.
    pub jpeg_quality: u8,
    /// Size of the gray stand-in used when a source image can't be loaded.
    pub placeholder_size: (u32, u32),
    /// Downloaded images are thumbnailed to fit inside this box.
    pub max_source_size: (u32, u32),
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1350,
            output_dir: PathBuf::from("generated_templates"),
            format: OutputFormat::Jpeg,
            jpeg_quality: 90,
            placeholder_size: (800, 800),
            max_source_size: (800, 800),
        }
    }
}

impl CardConfig {
    /// Load from a JSON file, or return defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, CardError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    CardError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                debug!(path = %path.display(), "loaded config");
                serde_json::from_str(&text)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.width == 0 || self.height == 0 {
            return Err(CardError::Config(format!(
                "canvas size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CardError::Config(format!(
                "jpeg_quality must be 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.placeholder_size.0 == 0 || self.placeholder_size.1 == 0 {
            return Err(CardError::Config("placeholder_size must be non-zero".into()));
        }
        Ok(())
    }

    /// `card_<index>.<ext>` inside the output directory.
    pub fn card_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("card_{}.{}", index, self.format.extension()))
    }
}
