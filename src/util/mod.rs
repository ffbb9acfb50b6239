//! Utility types and functions for artrack.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Image`] - Typed 2-D buffers for depth, confidence, color and cubemap faces
//! - [`Pixel`] / [`PixelFormat`] - Pixel storage types
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam plus [`Intrinsics`]

mod error;
mod image;
mod math;
mod pixel;

pub use error::*;
pub use image::*;
pub use math::*;
pub use pixel::*;
