use std::ops::Range;

use log::debug;

use crate::image_pipeline::buffer::PixelBuffer;
use crate::EditError;

const LEVELS: usize = 256;

/// Luma counts over one neighbourhood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaHistogram {
    bins: [u32; LEVELS],
}

impl LumaHistogram {
    /// Counts luma values of a row-major plane inside the given window.
    pub fn from_window(luma: &[u8], width: usize, window: &Window) -> Self {
        let mut bins = [0u32; LEVELS];
        for row in window.rows.clone() {
            let line = &luma[row * width..(row + 1) * width];
            for &value in &line[window.columns.clone()] {
                bins[value as usize] += 1;
            }
        }
        Self { bins }
    }

    pub fn bins(&self) -> &[u32; LEVELS] {
        &self.bins
    }

    pub fn cumulative(&self) -> [u32; LEVELS] {
        let mut sums = [0u32; LEVELS];
        let mut running = 0u32;
        for (sum, count) in sums.iter_mut().zip(self.bins.iter()) {
            running += count;
            *sum = running;
        }
        sums
    }
}

/// Old-luma to new-luma mapping derived from one neighbourhood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistogramLookupTable {
    entries: [u8; LEVELS],
}

impl HistogramLookupTable {
    /// `lookup[y] = floor(256 * cumsum[y] / ((2r + 1) * 2r)) + 1`, clamped to 255.
    ///
    /// The denominator is the nominal window area for `radius` even when the
    /// window was cut short by an image edge.
    pub fn from_histogram(histogram: &LumaHistogram, radius: u32) -> Self {
        let radius = u128::from(radius);
        let area = (2 * radius + 1) * (2 * radius);
        let mut entries = [0u8; LEVELS];
        for (entry, sum) in entries.iter_mut().zip(histogram.cumulative()) {
            let level = (LEVELS as u128 * u128::from(sum)) / area + 1;
            *entry = level.min(255) as u8;
        }
        Self { entries }
    }

    pub fn map(&self, luma: u8) -> u8 {
        self.entries[luma as usize]
    }

    pub fn entries(&self) -> &[u8; LEVELS] {
        &self.entries
    }
}

/// Chessboard neighbourhood of a pixel, clamped to the buffer on each axis
/// independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Window {
    pub columns: Range<usize>,
    pub rows: Range<usize>,
}

impl Window {
    pub fn around(x: usize, y: usize, radius: usize, width: usize, height: usize) -> Self {
        Self { columns: clamp_span(x, radius, width), rows: clamp_span(y, radius, height) }
    }
}

fn clamp_span(center: usize, radius: usize, len: usize) -> Range<usize> {
    center.saturating_sub(radius)..center.saturating_add(radius).saturating_add(1).min(len)
}

/// Local histogram equalization of the luma channel.
///
/// Every pixel's neighbourhood histogram is taken from the buffer as it was
/// before the call, so processing order does not leak into the result.
pub fn equalize_local_histogram(buffer: &mut PixelBuffer, radius: u32) -> Result<(), EditError> {
    if radius < 1 {
        return Err(EditError::InvalidRadius(radius));
    }

    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    debug!("local histogram equalization of {width}x{height} with radius {radius}");

    let luma = buffer.luma();
    let span = radius as usize;
    let mut pixels = Vec::with_capacity(luma.len());
    for y in 0..height {
        for x in 0..width {
            let window = Window::around(x, y, span, width, height);
            let histogram = LumaHistogram::from_window(&luma, width, &window);
            let lookup = HistogramLookupTable::from_histogram(&histogram, radius);

            let pixel = buffer.pixels()[y * width + x];
            pixels.push(pixel.with_luma(lookup.map(pixel.y)));
        }
    }

    buffer.commit(pixels);
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::image_pipeline::buffer::YccPixel;

    #[test]
    fn two_by_two_matches_hand_computed_cumulative_histogram() {
        let mut buffer = PixelBuffer::from_luma(2, 2, &[10, 20, 30, 40]).unwrap();

        let window = Window::around(0, 0, 1, 2, 2);
        assert_eq!(window, Window { columns: 0..2, rows: 0..2 });

        let histogram = LumaHistogram::from_window(&buffer.luma(), 2, &window);
        let lookup = HistogramLookupTable::from_histogram(&histogram, 1);
        // Denominator is 3 * 2 = 6.
        assert_eq!(lookup.map(0), 1);
        assert_eq!(lookup.map(10), 43);
        assert_eq!(lookup.map(19), 43);
        assert_eq!(lookup.map(20), 86);
        assert_eq!(lookup.map(30), 129);
        assert_eq!(lookup.map(40), 171);
        assert_eq!(lookup.map(255), 171);

        equalize_local_histogram(&mut buffer, 1).unwrap();

        assert_eq!(buffer.luma(), vec![43, 86, 129, 171]);
    }

    #[test]
    fn edge_windows_keep_the_nominal_denominator() {
        let mut buffer = PixelBuffer::from_luma(3, 3, &[50; 9]).unwrap();

        equalize_local_histogram(&mut buffer, 1).unwrap();

        // Corners see 4 pixels: 256 * 4 / 6 + 1 = 171. Others saturate.
        assert_eq!(buffer.luma(), vec![171, 255, 171, 255, 255, 255, 171, 255, 171]);
    }

    #[test]
    fn windows_clamp_each_axis_independently() {
        assert_eq!(Window::around(0, 4, 2, 3, 5), Window { columns: 0..3, rows: 2..5 });
        assert_eq!(Window::around(5, 5, 2, 10, 10), Window { columns: 3..8, rows: 3..8 });
        assert_eq!(Window::around(9, 0, 3, 10, 1), Window { columns: 6..10, rows: 0..1 });
    }

    #[test]
    fn chroma_is_preserved() {
        let mut buffer = PixelBuffer::new(3, 2, YccPixel::new(90, 12, 240)).unwrap();

        equalize_local_histogram(&mut buffer, 2).unwrap();

        assert!(buffer.pixels().iter().all(|pixel| pixel.cb == 12 && pixel.cr == 240));
    }

    #[test]
    fn zero_radius_is_rejected() {
        let mut buffer = PixelBuffer::from_luma(1, 1, &[7]).unwrap();
        assert!(matches!(
            equalize_local_histogram(&mut buffer, 0),
            Err(EditError::InvalidRadius(0))
        ));
        assert_eq!(buffer.luma(), vec![7]);
    }

    #[test]
    fn huge_radius_does_not_overflow() {
        let mut buffer = PixelBuffer::from_luma(2, 1, &[0, 255]).unwrap();
        equalize_local_histogram(&mut buffer, u32::MAX).unwrap();
        assert_eq!(buffer.luma(), vec![1, 1]);
    }

    #[test]
    fn lookup_is_non_decreasing() {
        let mut rng = StdRng::seed_from_u64(7);
        let luma: Vec<u8> = (0..24 * 18).map(|_| rng.gen()).collect();

        for radius in 1..5 {
            for _ in 0..20 {
                let (x, y) = (rng.gen_range(0..24), rng.gen_range(0..18));
                let window = Window::around(x, y, radius, 24, 18);
                let histogram = LumaHistogram::from_window(&luma, 24, &window);
                let lookup = HistogramLookupTable::from_histogram(&histogram, radius as u32);

                assert!(lookup.entries().windows(2).all(|pair| pair[0] <= pair[1]));
                assert_eq!(
                    histogram.cumulative()[255] as usize,
                    window.columns.len() * window.rows.len()
                );
            }
        }
    }
}
