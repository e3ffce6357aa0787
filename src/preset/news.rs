//! The news card layout: title banner, source line, photo, fade, logo.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   ████ TITLE ON BLUE ████    │  (80, 100)
//! │  Source: … | date | Photo    │  (70, auto)
//! │ ┌──────────────────────────┐ │
//! │ │         photo            │ │  (0, auto), canvas width
//! │ │                          │ │
//! │ │▓▓▓▓▓▓▓▓ fade ▓▓▓▓▓▓▓▓▓▓▓▓│ │  bottom 500 rows
//! │ └──────────────────────────┘ │
//! │  [logo]                      │  (70, 1200)
//! └──────────────────────────────┘
//! ```

use chrono::Local;
use image::DynamicImage;
use std::sync::Arc;

use super::{ImageLayer, Preset, TextboxLayer};
use crate::assets::shrink_to_fit;
use crate::style::{BgType, Color, Position, Spacing};
use crate::text::FontRef;

/// Format the line shown under the title.
///
/// `publish_date` is used verbatim; without one, today's date is rendered as
/// e.g. `18 October 2026`.
pub fn source_line(source: &str, publish_date: Option<&str>) -> String {
    let date = match publish_date {
        Some(date) => date.to_string(),
        None => Local::now().format("%d %B %Y").to_string(),
    };
    format!("Source: {} | {} | Photo: Generated", source, date)
}

#[derive(Debug, Clone)]
pub struct NewsTemplate {
    pub title_font: FontRef,
    pub small_font: FontRef,
    pub logo: Option<Arc<DynamicImage>>,
}

impl NewsTemplate {
    pub const BACKGROUND: Color = Color::rgb(244, 244, 244);
    pub const TITLE_BANNER: Color = Color::rgb(0, 71, 171);
    pub const SOURCE_TEXT: Color = Color::rgb(200, 200, 200);
    pub const FADE_HEIGHT: u32 = 500;
    pub const LOGO_SIZE: (u32, u32) = (100, 100);

    pub fn new(title_font: FontRef, small_font: FontRef) -> Self {
        Self {
            title_font,
            small_font,
            logo: None,
        }
    }

    /// Attach a logo, shrunk to fit [`LOGO_SIZE`](Self::LOGO_SIZE).
    pub fn with_logo(mut self, logo: DynamicImage) -> Self {
        self.logo = Some(Arc::new(shrink_to_fit(logo, Some(Self::LOGO_SIZE))));
        self
    }

    /// Build the preset for one story.
    pub fn build(&self, title: &str, source_text: &str, image: Arc<DynamicImage>) -> Preset {
        let title = TextboxLayer {
            bg_type: BgType::Solid,
            bg_fill: Some(Self::TITLE_BANNER),
            text_fill: Color::WHITE,
            padding: Spacing {
                top: 10,
                bottom: 10,
                left: 10,
                right: 10,
            },
            ..TextboxLayer::new(title, self.title_font.clone(), Position::at(80, 100), 920)
        };
        let source = TextboxLayer::new(source_text, self.small_font.clone(), Position::auto(70), 960)
            .text_fill(Self::SOURCE_TEXT)
            .auto_y_padding(10);
        let photo = ImageLayer::new(image, Position::auto(0))
            .resize_to_width()
            .auto_y_padding(10);

        let mut preset = Preset::new(Self::BACKGROUND)
            .layer(title)
            .layer(source)
            .layer(photo)
            .black_fade(Self::FADE_HEIGHT);
        if let Some(logo) = &self.logo {
            preset.push(ImageLayer::new(logo.clone(), Position::at(70, 1200)));
        }
        preset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Layer;
    use crate::text::BlockFont;
    use image::RgbImage;
    use pretty_assertions::assert_eq;

    fn template() -> NewsTemplate {
        NewsTemplate::new(Arc::new(BlockFont::TITLE), Arc::new(BlockFont::SMALL))
    }

    fn photo() -> Arc<DynamicImage> {
        Arc::new(DynamicImage::ImageRgb8(RgbImage::new(800, 600)))
    }

    #[test]
    fn test_source_line_with_date() {
        assert_eq!(
            source_line("Reuters", Some("01 May 2025")),
            "Source: Reuters | 01 May 2025 | Photo: Generated"
        );
    }

    #[test]
    fn test_source_line_defaults_to_today() {
        let today = Local::now().format("%d %B %Y").to_string();
        let line = source_line("AP", None);
        assert!(line.contains(&today), "{}", line);
        assert!(line.starts_with("Source: AP | "));
    }

    #[test]
    fn test_layout_without_logo() {
        let preset = template().build("Title", "Source: x", photo());
        let kinds: Vec<_> = preset.layers.iter().map(Layer::kind).collect();
        assert_eq!(kinds, vec!["textbox", "textbox", "image", "black_fade"]);
        assert_eq!(preset.bg_color, NewsTemplate::BACKGROUND);

        match &preset.layers[0] {
            Layer::Textbox(title) => {
                assert_eq!(title.position, Position::at(80, 100));
                assert_eq!(title.max_width, 920);
                assert_eq!(title.bg_type, BgType::Solid);
                assert_eq!(title.padding, Spacing::uniform(10).unwrap());
            }
            other => panic!("expected title textbox, got {:?}", other),
        }
        match &preset.layers[1] {
            Layer::Textbox(source) => {
                assert_eq!(source.position, Position::auto(70));
                assert_eq!(source.auto_y_padding, 10);
                assert_eq!(source.text_fill, NewsTemplate::SOURCE_TEXT);
            }
            other => panic!("expected source textbox, got {:?}", other),
        }
    }

    #[test]
    fn test_logo_is_last_and_shrunk() {
        let logo = DynamicImage::ImageRgb8(RgbImage::new(400, 200));
        let preset = template().with_logo(logo).build("Title", "src", photo());
        match preset.layers.last() {
            Some(Layer::Image(layer)) => {
                assert_eq!(layer.position, Position::at(70, 1200));
                assert_eq!((layer.image.width(), layer.image.height()), (100, 50));
            }
            other => panic!("expected logo image, got {:?}", other),
        }
    }
}
