//! Encoding and persisting finished canvases.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::info;

use super::composer::Composer;
use crate::CardError;
use crate::config::{CardConfig, OutputFormat};
use crate::preset::Preset;

/// Encode a canvas to bytes in the configured format.
pub fn encode(canvas: &RgbImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>, CardError> {
    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => canvas.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, jpeg_quality)),
        OutputFormat::Png => canvas.write_with_encoder(PngEncoder::new(&mut bytes)),
    };
    result.map_err(|e| CardError::Image(format!("encode failed: {}", e)))?;
    Ok(bytes)
}

/// Write encoded bytes to `path`, creating parent directories.
pub fn write_card(path: &Path, bytes: &[u8]) -> Result<(), CardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "card written");
    Ok(())
}

impl Composer {
    /// Compose `preset`, encode it, and write it to `config.output_dir/filename`.
    pub fn save(&self, preset: &Preset, filename: &str, config: &CardConfig) -> Result<PathBuf, CardError> {
        let canvas = self.compose(preset)?;
        let bytes = encode(&canvas, config.format, config.jpeg_quality)?;
        let path = config.output_dir.join(filename);
        write_card(&path, &bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_png_roundtrip_is_lossless() {
        let canvas = RgbImage::from_pixel(4, 3, Rgb([12, 34, 56]));
        let bytes = encode(&canvas, OutputFormat::Png, 90).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, canvas);
    }

    #[test]
    fn test_jpeg_has_magic() {
        let canvas = RgbImage::from_pixel(16, 16, Rgb([200, 10, 10]));
        let bytes = encode(&canvas, OutputFormat::Jpeg, 80).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_save_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = CardConfig {
            output_dir: dir.path().join("nested/out"),
            format: OutputFormat::Png,
            width: 10,
            height: 10,
            ..CardConfig::default()
        };
        let composer = Composer::from_config(&config).unwrap();
        let path = composer
            .save(&Preset::new(Color::rgb(1, 2, 3)), "card.png", &config)
            .unwrap();
        assert!(path.exists());
        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(*decoded.get_pixel(5, 5), Rgb([1, 2, 3]));
    }
}
