mod editor;
mod gesture;
mod image_pipeline;

pub use editor::{Editor, EditorOptions, InputEvent, Presenter, Response, ESCAPE_KEY};
pub use gesture::{
    controller::{GestureController, GestureState, MouseButton, Viewport},
    snapshot::GestureSnapshot,
};
pub use image_pipeline::{
    adjust::apply_brightness_contrast,
    buffer::{PixelBuffer, YccPixel},
    equalize::{equalize_local_histogram, HistogramLookupTable, LumaHistogram, Window},
    loader::{to_rgb_image, Decoder, Encoder, ImageCodec},
    resize::{apply_scale, scaled_extent},
};

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("failed to decode or encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("buffer is {found:?} but the snapshot is {expected:?}")]
    DimensionMismatch { expected: (u32, u32), found: (u32, u32) },
    #[error("scale factor must be finite and greater than zero, got {0}")]
    InvalidScaleFactor(f64),
    #[error("equalization radius must be at least 1, got {0}")]
    InvalidRadius(u32),
    #[error("{name} must be finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("invalid buffer dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}
