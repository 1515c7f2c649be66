//! Conversion of finished symbols to raster images

use image::{GrayImage, Luma};

use crate::models::Bitmap;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Render `bitmap` as a grayscale image.
///
/// Each module becomes a `module_px` x `module_px` square (at least 1) and a
/// light border of `quiet_zone` modules is added on every side.
pub fn to_gray_image(bitmap: &Bitmap, module_px: u32, quiet_zone: u32) -> GrayImage {
    let scale = module_px.max(1);
    let (w, h) = (bitmap.width() as u32, bitmap.height() as u32);
    let mut img = GrayImage::from_pixel((w + 2 * quiet_zone) * scale, (h + 2 * quiet_zone) * scale, LIGHT);

    let rect = bitmap.rect();
    for y in 0..h {
        for x in 0..w {
            if !bitmap.get(rect.min_x + x as i32, rect.min_y + y as i32) {
                continue;
            }
            let px = (x + quiet_zone) * scale;
            let py = (y + quiet_zone) * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(px + dx, py + dy, DARK);
                }
            }
        }
    }
    img
}
