use log::debug;

use crate::gesture::snapshot::GestureSnapshot;
use crate::image_pipeline::buffer::PixelBuffer;
use crate::EditError;

/// Maps the snapshot's luma through `contrast * y + brightness` into `current`.
///
/// Chroma is taken from `current`, not the snapshot. Results outside
/// `[0, 255]` saturate. Calling this twice with the same arguments yields the
/// same buffer.
pub fn apply_brightness_contrast(
    current: &mut PixelBuffer,
    snapshot: &GestureSnapshot,
    contrast: f64,
    brightness: f64,
) -> Result<(), EditError> {
    current.ensure_same_dimensions(snapshot.buffer())?;
    ensure_finite("contrast", contrast)?;
    ensure_finite("brightness", brightness)?;

    debug!("adjust brightness = {brightness:.3}, contrast = {contrast:.3}");

    let pixels = current
        .pixels()
        .iter()
        .zip(snapshot.pixels())
        .map(|(dst, src)| dst.with_luma(linear_luma(src.y, contrast, brightness)))
        .collect();

    current.commit(pixels);
    Ok(())
}

fn linear_luma(y: u8, contrast: f64, brightness: f64) -> u8 {
    let value = contrast * f64::from(y) + brightness;
    value.clamp(0.0, 255.0) as u8
}

fn ensure_finite(name: &'static str, value: f64) -> Result<(), EditError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EditError::InvalidParameter { name, value })
    }
}
