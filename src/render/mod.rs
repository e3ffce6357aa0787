//! # Rendering Module
//!
//! Turns a [`Preset`](crate::preset::Preset) into pixels and pixels into files.
//!
//! ## Modules
//!
//! - [`composer`]: the layer loop and cursor threading
//! - [`output`]: JPEG/PNG encoding and writing cards to disk
//!
//! ## Usage Example
//!
//! ```
//! use cardpress::render::Composer;
//! use cardpress::preset::Preset;
//! use cardpress::style::Color;
//!
//! let composer = Composer::new(108, 135).unwrap();
//! let canvas = composer.compose(&Preset::new(Color::rgb(244, 244, 244)).black_fade(30)).unwrap();
//! assert_eq!(canvas.dimensions(), (108, 135));
//! ```

pub mod composer;
pub mod output;

pub use composer::{Composer, Cursor};
pub use output::{encode, write_card};
