//! # Layer Renderers
//!
//! - [`image`]: resize, position and paste image layers
//! - [`fade`]: bottom-anchored black gradient
//!
//! Text boxes live in [`crate::text::textbox`].

pub mod fade;
pub mod image;

pub use fade::{fade_alpha, render_black_fade};
pub use image::{PlacedImage, ResizeMode, render_image_layer};
