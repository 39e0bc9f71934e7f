use log::debug;

use crate::gesture::snapshot::GestureSnapshot;
use crate::image_pipeline::buffer::PixelBuffer;
use crate::EditError;

/// Size of the scaled image inside a canvas of `width` x `height`.
///
/// Halves round to even, so a 5-pixel edge scaled by 0.5 covers 2 pixels.
pub fn scaled_extent(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let scale = |edge: u32| (factor * f64::from(edge)).round_ties_even().max(0.0) as u32;
    (scale(width), scale(height))
}

/// Resamples the snapshot into `current` at `factor`, about the origin.
///
/// The canvas keeps its dimensions: magnification crops whatever falls past
/// the far edges, minification fills the exposed border with the snapshot's
/// origin pixel. Each destination pixel is fetched from the source by
/// backward projection.
pub fn apply_scale(
    current: &mut PixelBuffer,
    snapshot: &GestureSnapshot,
    factor: f64,
) -> Result<(), EditError> {
    current.ensure_same_dimensions(snapshot.buffer())?;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(EditError::InvalidScaleFactor(factor));
    }

    let (width, height) = snapshot.dimensions();
    let (scaled_width, scaled_height) = if factor >= 1.0 {
        (width, height)
    } else {
        scaled_extent(width, height, factor)
    };
    debug!(
        "scale {width}x{height} by {factor:.3} (scaled extent {scaled_width}x{scaled_height})"
    );

    let source = snapshot.pixels();
    let fill = snapshot.origin();
    let columns: Vec<Option<usize>> =
        (0..width).map(|i| project(i, scaled_width, width, factor)).collect();

    let mut pixels = Vec::with_capacity(source.len());
    for j in 0..height {
        let row = project(j, scaled_height, height, factor);
        for column in &columns {
            let pixel = match (*column, row) {
                (Some(x), Some(y)) => source[y * width as usize + x],
                _ => fill,
            };
            pixels.push(pixel);
        }
    }

    current.commit(pixels);
    Ok(())
}

/// Source index for destination coordinate `dst`, or `None` when it lies in
/// the exposed border.
fn project(dst: u32, extent: u32, edge: u32, factor: f64) -> Option<usize> {
    if dst >= extent {
        return None;
    }
    let src = (f64::from(dst) / factor).floor() as u32;
    Some(src.min(edge - 1) as usize)
}
