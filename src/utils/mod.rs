//! Utility types for symbol construction
//!
//! - Bit buffer (MSB-first bit stream with QR padding rules)
//! - Image export (bitmap to `image::GrayImage`)

/// MSB-first bit stream
pub mod bit_buffer;
/// Bitmap to image conversion
pub mod export;

pub use bit_buffer::BitBuffer;
