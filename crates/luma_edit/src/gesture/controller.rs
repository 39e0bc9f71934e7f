use log::debug;

use crate::gesture::snapshot::GestureSnapshot;
use crate::image_pipeline::buffer::PixelBuffer;
use crate::image_pipeline::{adjust, resize};
use crate::EditError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Drags adjust brightness and contrast.
    Primary,
    /// Drags scale about the origin.
    Secondary,
    /// Any other button. Holds a gesture but edits nothing.
    Other,
}

/// Window size in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, EditError> {
        if width == 0 || height == 0 {
            return Err(EditError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    fn distance_from_center(&self, x: i32, y: i32) -> f64 {
        let (cx, cy) = self.center();
        (f64::from(x) - cx).hypot(f64::from(y) - cy)
    }
}

/// The gesture in progress.
#[derive(Clone, Debug)]
pub struct GestureState {
    pub button: MouseButton,
    pub init_x: i32,
    pub init_y: i32,
    snapshot: GestureSnapshot,
}

impl GestureState {
    pub fn snapshot(&self) -> &GestureSnapshot {
        &self.snapshot
    }
}

/// Routes mouse gestures to the pixel operations.
///
/// A press captures a snapshot of the live buffer. Every motion recomputes
/// the whole live buffer from that snapshot, never from the previous
/// motion's output. A release drops the snapshot and keeps the edited buffer.
#[derive(Debug)]
pub struct GestureController {
    viewport: Viewport,
    state: Option<GestureState>,
}

impl GestureController {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, state: None }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn state(&self) -> Option<&GestureState> {
        self.state.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    /// Starts a gesture. A press during a gesture restarts it from `current`.
    pub fn press(&mut self, button: MouseButton, x: i32, y: i32, current: &PixelBuffer) {
        if self.state.is_some() {
            debug!("restarting gesture on {button:?} press");
        }
        self.state = Some(GestureState {
            button,
            init_x: x,
            init_y: y,
            snapshot: GestureSnapshot::capture(current),
        });
    }

    /// Ends the gesture. Returns whether one was active.
    pub fn release(&mut self) -> bool {
        self.state.take().is_some()
    }

    /// Drops the gesture without touching any buffer, e.g. when the live
    /// buffer is replaced.
    pub fn cancel(&mut self) {
        self.state = None;
    }

    /// Applies the active gesture for a cursor at `(x, y)`. Returns whether
    /// `current` was rewritten.
    pub fn motion(&self, x: i32, y: i32, current: &mut PixelBuffer) -> Result<bool, EditError> {
        let Some(state) = &self.state else {
            return Ok(false);
        };

        match state.button {
            MouseButton::Primary => {
                let (contrast, brightness) = self.adjust_parameters(state, x, y);
                adjust::apply_brightness_contrast(current, &state.snapshot, contrast, brightness)?;
                Ok(true)
            },
            MouseButton::Secondary => {
                let factor = self.scale_factor(state, x, y);
                resize::apply_scale(current, &state.snapshot, factor)?;
                Ok(true)
            },
            MouseButton::Other => Ok(false),
        }
    }

    /// `(contrast, brightness)` for a primary drag to `(x, y)`.
    pub fn adjust_parameters(&self, state: &GestureState, x: i32, y: i32) -> (f64, f64) {
        let dx = f64::from(x) - f64::from(state.init_x);
        let dy = f64::from(y) - f64::from(state.init_y);
        let contrast = 1.0 + dy / f64::from(self.viewport.height);
        let brightness = 255.0 * dx / f64::from(self.viewport.width);
        (contrast, brightness)
    }

    /// Ratio of the cursor's distance from the window center to the press
    /// position's distance. A press exactly at the center counts as 1 pixel
    /// away.
    pub fn scale_factor(&self, state: &GestureState, x: i32, y: i32) -> f64 {
        let mut initial = self.viewport.distance_from_center(state.init_x, state.init_y);
        if initial == 0.0 {
            initial = 1.0;
        }
        self.viewport.distance_from_center(x, y) / initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::buffer::YccPixel;

    fn controller() -> GestureController {
        GestureController::new(Viewport::new(200, 100).unwrap())
    }

    #[test]
    fn motion_while_idle_is_a_no_op() {
        let controller = controller();
        let mut buffer = PixelBuffer::from_luma(2, 2, &[1, 2, 3, 4]).unwrap();

        assert!(!controller.motion(50, 50, &mut buffer).unwrap());
        assert_eq!(buffer.luma(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn primary_drag_maps_deltas_to_contrast_and_brightness() {
        let mut controller = controller();
        let buffer = PixelBuffer::new(1, 1, YccPixel::gray(0)).unwrap();
        controller.press(MouseButton::Primary, 100, 50, &buffer);
        let state = controller.state().unwrap().clone();

        assert_eq!(controller.adjust_parameters(&state, 100, 50), (1.0, 0.0));
        assert_eq!(controller.adjust_parameters(&state, 140, 100), (1.5, 51.0));
        assert_eq!(controller.adjust_parameters(&state, 0, 0), (0.5, -127.5));
    }

    #[test]
    fn motion_recomputes_from_the_snapshot() {
        let mut controller = controller();
        let mut buffer = PixelBuffer::new(2, 2, YccPixel::gray(100)).unwrap();
        controller.press(MouseButton::Primary, 0, 0, &buffer);

        // Brightness +51 twice in a row must not accumulate.
        assert!(controller.motion(40, 0, &mut buffer).unwrap());
        assert!(controller.motion(40, 0, &mut buffer).unwrap());
        assert_eq!(buffer.luma(), vec![151; 4]);

        controller.motion(0, 0, &mut buffer).unwrap();
        assert_eq!(buffer.luma(), vec![100; 4]);
    }

    #[test]
    fn secondary_drag_uses_radial_distance() {
        let mut controller = controller();
        let buffer = PixelBuffer::new(1, 1, YccPixel::gray(0)).unwrap();
        controller.press(MouseButton::Secondary, 130, 90, &buffer);
        let state = controller.state().unwrap().clone();

        // Center is (100, 50); the press is 50 pixels away.
        assert_eq!(controller.scale_factor(&state, 130, 90), 1.0);
        assert_eq!(controller.scale_factor(&state, 160, 130), 2.0);
        assert_eq!(controller.scale_factor(&state, 115, 70), 0.5);
    }

    #[test]
    fn press_at_center_floors_initial_distance() {
        let mut controller = controller();
        let buffer = PixelBuffer::new(1, 1, YccPixel::gray(0)).unwrap();
        controller.press(MouseButton::Secondary, 100, 50, &buffer);
        let state = controller.state().unwrap().clone();

        assert_eq!(controller.scale_factor(&state, 103, 54), 5.0);
    }

    #[test]
    fn cursor_at_center_is_an_invalid_scale() {
        let mut controller = controller();
        let mut buffer = PixelBuffer::from_luma(2, 1, &[8, 9]).unwrap();
        controller.press(MouseButton::Secondary, 150, 50, &buffer);

        let err = controller.motion(100, 50, &mut buffer).unwrap_err();

        assert!(matches!(err, EditError::InvalidScaleFactor(factor) if factor == 0.0));
        assert_eq!(buffer.luma(), vec![8, 9]);
    }

    #[test]
    fn other_buttons_hold_a_gesture_without_editing() {
        let mut controller = controller();
        let mut buffer = PixelBuffer::from_luma(1, 1, &[42]).unwrap();
        controller.press(MouseButton::Other, 10, 10, &buffer);

        assert!(controller.is_dragging());
        assert!(!controller.motion(90, 90, &mut buffer).unwrap());
        assert!(controller.release());
        assert!(!controller.release());
    }

    #[test]
    fn release_keeps_the_edited_buffer() {
        let mut controller = controller();
        let mut buffer = PixelBuffer::new(1, 1, YccPixel::gray(10)).unwrap();
        controller.press(MouseButton::Primary, 0, 0, &buffer);
        controller.motion(0, 100, &mut buffer).unwrap();
        controller.release();

        assert!(controller.state().is_none());
        assert_eq!(buffer.luma(), vec![20]);
    }

    #[test]
    fn zero_sized_viewport_is_rejected() {
        assert!(Viewport::new(0, 10).is_err());
        assert!(Viewport::new(10, 0).is_err());
    }
}
