//! rust_qrgen - QR Code, Micro QR and rMQR encoder
//!
//! A pure Rust encoder for the three QR symbol families: standard QR
//! (versions 1-40), Micro QR (M1-M4) and Rectangular Micro QR (32 shapes).
//! Every family goes through the same pipeline: segment packing, padding,
//! Reed-Solomon parity, interleaving, zigzag placement, masking and format
//! information. The output is a packed monochrome [`Bitmap`] without a quiet
//! zone; [`utils::export::to_gray_image`] turns it into an image.
//!
//! # Example
//! ```
//! use rust_qrgen::{ECLevel, QrCode};
//!
//! let code = QrCode::new("HELLO WORLD", ECLevel::M).unwrap();
//! let bitmap = code.encode().unwrap();
//! assert_eq!(bitmap.width(), 21);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

mod debug;
/// Encoding pipeline (error correction, placement, masking, family orchestrators)
pub mod encoder;
/// Core data structures (Bitmap, versions, levels, masks, segments)
pub mod models;
/// Utility types (bit buffer, image export)
pub mod utils;

pub use encoder::config::EncodeOptions;
pub use encoder::error::EncodeError;
pub use encoder::micro::MicroQrCode;
pub use encoder::qr::QrCode;
pub use encoder::rmqr::RmqrCode;
pub use models::{
    Bitmap, ECLevel, MaskPattern, MicroMask, MicroVersion, Mode, Rect, RmqrVersion, Segment,
    Version,
};
pub use utils::BitBuffer;

use rayon::prelude::*;

/// Encode `data` as the smallest standard QR symbol at `level`
pub fn encode(data: impl AsRef<[u8]>, level: ECLevel) -> Result<Bitmap, EncodeError> {
    QrCode::new(data, level)?.encode()
}

/// Encode `data` as the smallest Micro QR symbol offering `level`
pub fn encode_micro(data: impl AsRef<[u8]>, level: ECLevel) -> Result<Bitmap, EncodeError> {
    MicroQrCode::new(data, level)?.encode()
}

/// Encode `data` as the first rMQR shape (in version indicator order) that holds it
pub fn encode_rmqr(data: impl AsRef<[u8]>, level: ECLevel) -> Result<Bitmap, EncodeError> {
    RmqrCode::new(data, level)?.encode()
}

/// Encode many payloads as standard QR symbols in parallel.
///
/// Results are returned in input order; each payload fails or succeeds on
/// its own.
pub fn encode_many<T>(payloads: &[T], options: &EncodeOptions) -> Vec<Result<Bitmap, EncodeError>>
where
    T: AsRef<[u8]> + Sync,
{
    payloads
        .par_iter()
        .map(|data| QrCode::new_with(data, options)?.encode())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_families() {
        assert_eq!(encode("HELLO WORLD", ECLevel::Q).unwrap().width(), 21);
        assert_eq!(encode_micro("12345", ECLevel::L).unwrap().width(), 11);
        let rmqr = encode_rmqr("123456789012", ECLevel::M).unwrap();
        assert_eq!((rmqr.width(), rmqr.height()), (43, 7));
    }

    #[test]
    fn test_encode_many_preserves_order() {
        let payloads = ["1", "HELLO", "hello world", ""];
        let options = EncodeOptions::with_level(ECLevel::L);
        let results = encode_many(&payloads, &options);
        assert_eq!(results.len(), payloads.len());
        for (payload, result) in payloads.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap(), &encode(payload, ECLevel::L).unwrap());
        }
    }

    #[test]
    fn test_encode_many_reports_failures() {
        let options = EncodeOptions::with_level(ECLevel::H);
        let payloads = vec![vec![0u8; 10], vec![0u8; 5000]];
        let results = encode_many(&payloads, &options);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(EncodeError::DataTooLong { .. })));
    }
}
