/// Packed module grids
pub mod bitmap;
/// Versions, error correction levels and masks
pub mod qr_code;
/// The 32 rMQR shapes
pub mod rmqr_version;
/// Data modes and payload segments
pub mod segment;

pub use bitmap::{Bitmap, Rect};
pub use qr_code::{ECLevel, MaskPattern, MicroMask, MicroVersion, Version};
pub use rmqr_version::RmqrVersion;
pub use segment::{Mode, Segment};
