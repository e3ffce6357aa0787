//! # cardpress - Layered Image Card Compositor
//!
//! cardpress renders fixed-size promotional cards (news tiles, social posts)
//! from an ordered list of layers. It provides:
//!
//! - **Flow layout**: layers placed at `y = auto` stack below the previous one
//! - **Text boxes**: greedy word wrap with optional solid per-line backgrounds
//! - **Image layers**: canvas-relative resizing, bottom anchoring, center crop
//! - **Fades**: bottom-anchored black gradients for text legibility
//! - **Batch pipeline**: fetch, compose and deliver a feed of news items
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use cardpress::{
//!     preset::{ImageLayer, Preset, TextboxLayer},
//!     render::Composer,
//!     style::{Color, Position},
//!     text::BlockFont,
//! };
//! use image::{DynamicImage, RgbImage};
//!
//! let photo = Arc::new(DynamicImage::ImageRgb8(RgbImage::new(800, 600)));
//! let preset = Preset::new(Color::rgb(244, 244, 244))
//!     .layer(
//!         TextboxLayer::new("Breaking news", Arc::new(BlockFont::TITLE), Position::at(80, 100), 920)
//!             .text_fill(Color::WHITE)
//!             .background(Color::rgb(0, 71, 171))
//!             .padding(10)?,
//!     )
//!     .layer(ImageLayer::new(photo, Position::auto(0)).resize_to_width().auto_y_padding(10))
//!     .black_fade(500);
//!
//! let canvas = Composer::default().compose(&preset)?;
//! assert_eq!(canvas.dimensions(), (1080, 1350));
//! # Ok::<(), cardpress::CardError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`style`] | Colors, padding, positions |
//! | [`text`] | Font seam, word wrap, text boxes |
//! | [`layers`] | Image and fade renderers |
//! | [`preset`] | Layer model, JSON presets, news template |
//! | [`render`] | Composer, encoding, saving |
//! | [`assets`] | Named font and image store |
//! | [`fetch`] | Image download with placeholder fallback |
//! | [`batch`] | News feed batch pipeline |
//! | [`config`] | Output configuration |
//! | [`error`] | Error types |

pub mod assets;
pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod layers;
pub mod paint;
pub mod preset;
pub mod render;
pub mod style;
pub mod text;

// Re-exports for convenience
pub use config::CardConfig;
pub use error::CardError;
pub use preset::{Layer, Preset};
pub use render::Composer;
