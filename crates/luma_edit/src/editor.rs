use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::gesture::controller::{GestureController, MouseButton, Viewport};
use crate::image_pipeline::buffer::PixelBuffer;
use crate::image_pipeline::equalize;
use crate::image_pipeline::loader::{Decoder, Encoder};
use crate::EditError;

pub const ESCAPE_KEY: char = '\u{1b}';

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Window width in screen pixels, used to scale gesture deltas.
    pub window_width: u32,
    /// Window height in screen pixels, used to scale gesture deltas.
    pub window_height: u32,
    /// Neighbourhood radius for local histogram equalization.
    pub histogram_radius: u32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self { window_width: 600, window_height: 800, histogram_radius: 5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Press { button: MouseButton, x: i32, y: i32 },
    Release,
    Motion { x: i32, y: i32 },
    Key(char),
    Reshape { width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// The buffer or the window changed and should be presented again.
    Redraw,
    Unchanged,
    Exit,
}

/// Displays a buffer, e.g. by blitting it to a window.
pub trait Presenter {
    fn present(&mut self, buffer: &PixelBuffer) -> Result<(), EditError>;
}

/// The single live image plus the gesture and keyboard state acting on it.
#[derive(Debug)]
pub struct Editor {
    current: PixelBuffer,
    gestures: GestureController,
    radius: u32,
}

impl Editor {
    pub fn new(current: PixelBuffer, options: &EditorOptions) -> Result<Self, EditError> {
        if options.histogram_radius < 1 {
            return Err(EditError::InvalidRadius(options.histogram_radius));
        }
        let viewport = Viewport::new(options.window_width, options.window_height)?;
        Ok(Self {
            current,
            gestures: GestureController::new(viewport),
            radius: options.histogram_radius,
        })
    }

    pub fn open<D: Decoder>(
        decoder: &D,
        path: &Path,
        options: &EditorOptions,
    ) -> Result<Self, EditError> {
        let buffer = decoder.load(path)?;
        info!("loaded {} ({}x{})", path.display(), buffer.width(), buffer.height());
        Self::new(buffer, options)
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.current
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.current
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<Response, EditError> {
        match event {
            InputEvent::Press { button, x, y } => {
                self.gestures.press(button, x, y, &self.current);
                Ok(Response::Unchanged)
            },
            InputEvent::Release => {
                self.gestures.release();
                Ok(Response::Unchanged)
            },
            InputEvent::Motion { x, y } => {
                let changed = self.gestures.motion(x, y, &mut self.current)?;
                Ok(if changed { Response::Redraw } else { Response::Unchanged })
            },
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Reshape { width, height } => {
                self.gestures.set_viewport(Viewport::new(width, height)?);
                Ok(Response::Redraw)
            },
        }
    }

    /// Handles `event` and presents the buffer whenever it needs redrawing.
    pub fn dispatch<P: Presenter>(
        &mut self,
        event: InputEvent,
        presenter: &mut P,
    ) -> Result<Response, EditError> {
        let response = self.handle(event)?;
        if response == Response::Redraw {
            presenter.present(&self.current)?;
        }
        Ok(response)
    }

    pub fn equalize(&mut self) -> Result<(), EditError> {
        info!("perform local histogram equalization with radius {}", self.radius);
        equalize::equalize_local_histogram(&mut self.current, self.radius)
    }

    /// Replaces the live buffer, abandoning any gesture in progress.
    pub fn load<D: Decoder>(&mut self, decoder: &D, path: &Path) -> Result<(), EditError> {
        let buffer = decoder.load(path)?;
        info!("loaded {} ({}x{})", path.display(), buffer.width(), buffer.height());
        self.gestures.cancel();
        self.current = buffer;
        Ok(())
    }

    pub fn save<E: Encoder>(&self, encoder: &E, path: &Path) -> Result<(), EditError> {
        encoder.save(&self.current, path)?;
        info!("saved {}", path.display());
        Ok(())
    }

    fn handle_key(&mut self, key: char) -> Result<Response, EditError> {
        match key {
            ESCAPE_KEY => Ok(Response::Exit),
            'h' => {
                self.equalize()?;
                Ok(Response::Redraw)
            },
            '+' | '=' => {
                self.radius = self.radius.saturating_add(1);
                info!("radius = {}", self.radius);
                Ok(Response::Unchanged)
            },
            '-' | '_' => {
                self.radius = self.radius.saturating_sub(1).max(1);
                info!("radius = {}", self.radius);
                Ok(Response::Unchanged)
            },
            _ => {
                warn!("key = {key:?}");
                Ok(Response::Unchanged)
            },
        }
    }
}
