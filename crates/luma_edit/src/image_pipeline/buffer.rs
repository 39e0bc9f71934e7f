use crate::EditError;

/// One pixel in the luma/chroma model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct YccPixel {
    /// Luma.
    pub y: u8,
    /// Blue-difference chroma.
    pub cb: u8,
    /// Red-difference chroma.
    pub cr: u8,
}

impl YccPixel {
    pub const fn new(y: u8, cb: u8, cr: u8) -> Self {
        Self { y, cb, cr }
    }

    /// Neutral grey of the given luma.
    pub const fn gray(y: u8) -> Self {
        Self { y, cb: 128, cr: 128 }
    }

    pub fn with_luma(self, y: u8) -> Self {
        Self { y, ..self }
    }
}

/// Row-major grid of [`YccPixel`]s.
///
/// `x` addresses columns in `[0, width)` and `y` addresses rows in
/// `[0, height)`. Row 0 is the visual bottom of the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<YccPixel>,
}

impl PixelBuffer {
    /// Creates a buffer filled with a single pixel value.
    pub fn new(width: u32, height: u32, fill: YccPixel) -> Result<Self, EditError> {
        let len = checked_len(width, height)?;
        Ok(Self { width, height, pixels: vec![fill; len] })
    }

    /// Bulk load from row-major pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<YccPixel>) -> Result<Self, EditError> {
        let len = checked_len(width, height)?;
        if pixels.len() != len {
            return Err(EditError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, pixels })
    }

    /// Builds a neutral-chroma buffer from row-major luma values.
    pub fn from_luma(width: u32, height: u32, luma: &[u8]) -> Result<Self, EditError> {
        let pixels = luma.iter().copied().map(YccPixel::gray).collect();
        Self::from_pixels(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Result<YccPixel, EditError> {
        let idx = self.index_of(x, y)?;
        Ok(self.pixels[idx])
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: YccPixel) -> Result<(), EditError> {
        let idx = self.index_of(x, y)?;
        self.pixels[idx] = pixel;
        Ok(())
    }

    /// Bulk store: the row-major pixel data.
    pub fn pixels(&self) -> &[YccPixel] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<YccPixel> {
        self.pixels
    }

    /// Row-major luma channel.
    pub fn luma(&self) -> Vec<u8> {
        self.pixels.iter().map(|pixel| pixel.y).collect()
    }

    pub fn ensure_same_dimensions(&self, other: &PixelBuffer) -> Result<(), EditError> {
        if self.dimensions() != other.dimensions() {
            return Err(EditError::DimensionMismatch {
                expected: other.dimensions(),
                found: self.dimensions(),
            });
        }
        Ok(())
    }

    /// Replaces every pixel at once. Callers build `pixels` from a validated
    /// source of the same dimensions.
    pub(crate) fn commit(&mut self, pixels: Vec<YccPixel>) {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        self.pixels = pixels;
    }

    fn index_of(&self, x: u32, y: u32) -> Result<usize, EditError> {
        if x >= self.width || y >= self.height {
            return Err(EditError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }
}

fn checked_len(width: u32, height: u32) -> Result<usize, EditError> {
    if width == 0 || height == 0 {
        return Err(EditError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(EditError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 3, YccPixel::default()),
            Err(EditError::InvalidDimensions { width: 0, height: 3 })
        ));
        assert!(PixelBuffer::from_luma(2, 2, &[1, 2, 3]).is_err());
    }

    #[test]
    fn get_and_set_are_row_major() {
        let mut buffer = PixelBuffer::from_luma(3, 2, &[0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(buffer.get(2, 0).unwrap().y, 2);
        assert_eq!(buffer.get(0, 1).unwrap().y, 3);

        buffer.set(1, 1, YccPixel::new(9, 10, 11)).unwrap();
        assert_eq!(buffer.pixels()[4], YccPixel::new(9, 10, 11));
    }

    #[test]
    fn out_of_bounds_access_is_reported() {
        let mut buffer = PixelBuffer::new(2, 2, YccPixel::gray(0)).unwrap();
        assert!(matches!(buffer.get(2, 0), Err(EditError::OutOfBounds { x: 2, y: 0, .. })));
        assert!(matches!(
            buffer.set(0, 5, YccPixel::gray(1)),
            Err(EditError::OutOfBounds { x: 0, y: 5, .. })
        ));
        assert_eq!(buffer.luma(), vec![0; 4]);
    }

    #[test]
    fn dimension_check_reports_both_sizes() {
        let a = PixelBuffer::new(2, 3, YccPixel::default()).unwrap();
        let b = PixelBuffer::new(3, 2, YccPixel::default()).unwrap();
        assert!(a.ensure_same_dimensions(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_dimensions(&b),
            Err(EditError::DimensionMismatch { expected: (3, 2), found: (2, 3) })
        ));
    }
}
