//! # Text
//!
//! Measurement, word wrapping and text block rendering.
//!
//! ## Modules
//!
//! - [`font`]: the [`TextFont`] seam plus TTF and block-cell implementations
//! - [`wrap`]: greedy word wrap against pixel widths
//! - [`textbox`]: wrapped blocks with optional solid backgrounds

pub mod font;
pub mod textbox;
pub mod wrap;

pub use font::{BlockFont, FontRef, TextBounds, TextFont, TtfFont};
pub use textbox::{BlockSize, TextBox, TextLine};
pub use wrap::{wrap_text, wrap_with_font};
