use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};

use crate::image_pipeline::buffer::{PixelBuffer, YccPixel};
use crate::EditError;

/// Source of pixel buffers. Row 0 of a loaded buffer is the visual bottom.
pub trait Decoder {
    fn load(&self, path: &Path) -> Result<PixelBuffer, EditError>;
}

/// Sink for pixel buffers, written top-down in a displayable color model.
pub trait Encoder {
    fn save(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), EditError>;
}

/// Codec backed by the `image` crate. The output format follows the file
/// extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn decode(&self, image: &DynamicImage) -> Result<PixelBuffer, EditError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in (0..height).rev() {
            for column in 0..width {
                pixels.push(rgb_to_ycc(*rgb.get_pixel(column, row)));
            }
        }
        PixelBuffer::from_pixels(width, height, pixels)
    }
}

impl Decoder for ImageCodec {
    fn load(&self, path: &Path) -> Result<PixelBuffer, EditError> {
        let image = image::open(path)?;
        self.decode(&image)
    }
}

impl Encoder for ImageCodec {
    fn save(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), EditError> {
        to_rgb_image(buffer).save(path)?;
        Ok(())
    }
}

/// Top-down RGB rendition of the buffer.
pub fn to_rgb_image(buffer: &PixelBuffer) -> RgbImage {
    let (width, height) = buffer.dimensions();
    let pixels = buffer.pixels();
    RgbImage::from_fn(width, height, |column, row| {
        let source_row = (height - 1 - row) as usize;
        ycc_to_rgb(pixels[source_row * width as usize + column as usize])
    })
}

fn rgb_to_ycc(Rgb([r, g, b]): Rgb<u8>) -> YccPixel {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    YccPixel::new(to_channel(y), to_channel(cb), to_channel(cr))
}

fn ycc_to_rgb(pixel: YccPixel) -> Rgb<u8> {
    let y = f32::from(pixel.y);
    let cb = f32::from(pixel.cb) - 128.0;
    let cr = f32::from(pixel.cr) - 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.344_136 * cb - 0.714_136 * cr;
    let b = y + 1.772 * cb;
    Rgb([to_channel(r), to_channel(g), to_channel(b)])
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
