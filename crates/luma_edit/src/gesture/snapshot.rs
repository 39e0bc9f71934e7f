use crate::image_pipeline::buffer::{PixelBuffer, YccPixel};

/// Read-only copy of the buffer taken when a gesture starts.
///
/// Every edit made during the gesture is recomputed from this copy, so the
/// snapshot never shares storage with the live buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureSnapshot {
    source: PixelBuffer,
}

impl GestureSnapshot {
    pub fn capture(buffer: &PixelBuffer) -> Self {
        Self { source: buffer.clone() }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    pub fn pixels(&self) -> &[YccPixel] {
        self.source.pixels()
    }

    /// The pixel at the origin, used to fill borders exposed by minification.
    pub fn origin(&self) -> YccPixel {
        self.source.pixels()[0]
    }
}

impl From<PixelBuffer> for GestureSnapshot {
    fn from(source: PixelBuffer) -> Self {
        Self { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_is_independent_of_later_edits() {
        let mut live = PixelBuffer::from_luma(2, 1, &[10, 20]).unwrap();
        let snapshot = GestureSnapshot::capture(&live);

        live.set(0, 0, YccPixel::gray(99)).unwrap();

        assert_eq!(snapshot.pixels()[0].y, 10);
        assert_eq!(snapshot.origin(), YccPixel::gray(10));
        assert_eq!(live.get(0, 0).unwrap().y, 99);
    }
}
