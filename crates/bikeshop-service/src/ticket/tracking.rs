//! Public tracking codes and their QR labels.

use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::{Color, QrCode};

use bikeshop_core::error::{AppError, ErrorKind};
use bikeshop_core::result::AppResult;

/// Modules of white border around the symbol.
const QUIET_ZONE: usize = 4;
/// Pixels per QR module.
const MODULE_PIXELS: usize = 8;

/// A fresh tracking code: 4 random bytes as 8 lowercase hex characters.
pub fn generate_tracking_code() -> String {
    hex::encode(rand::random::<[u8; 4]>())
}

/// Encode `data` as a black-on-white QR code PNG.
pub fn render_qr_png(data: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to encode QR code", e))?;
    let width = code.width();
    let colors = code.to_colors();
    let side = ((width + 2 * QUIET_ZONE) * MODULE_PIXELS) as u32;

    let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_fn(side, side, |x, y| {
        let mx = (x as usize / MODULE_PIXELS).checked_sub(QUIET_ZONE);
        let my = (y as usize / MODULE_PIXELS).checked_sub(QUIET_ZONE);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < width && my < width => {
                if colors[my * width + mx] == Color::Dark {
                    Luma([0u8])
                } else {
                    Luma([255u8])
                }
            }
            _ => Luma([255u8]),
        }
    });

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to write QR PNG", e))?;
    Ok(png)
}
