use std::path::PathBuf;

use luma_edit::{to_rgb_image, EditError, PixelBuffer, Presenter};

/// Writes every presented buffer as `frame_NNNN.png`, or just counts frames
/// when no directory is set.
#[derive(Debug, Default)]
pub struct FrameWriter {
    dir: Option<PathBuf>,
    frames: usize,
}

impl FrameWriter {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir, frames: 0 }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Presenter for FrameWriter {
    fn present(&mut self, buffer: &PixelBuffer) -> Result<(), EditError> {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("frame_{:04}.png", self.frames));
            to_rgb_image(buffer).save(&path)?;
        }
        self.frames += 1;
        Ok(())
    }
}
