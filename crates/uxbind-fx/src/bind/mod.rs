//! Converters for toolkit types with a raw construction protocol.
//!
//! Types without one (nodes, controls, panes, views) are served by the
//! registry's synthesized wrapper converters.

mod image_converter;

pub use image_converter::ImageConverter;
