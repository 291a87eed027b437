//! Pan/zoom transform of the schematic and resizable side panels.

use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 4.0;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const BUTTON_ZOOM_OUT: f64 = 0.8;
pub const BUTTON_ZOOM_IN: f64 = 1.2;

pub const DEFAULT_LEFT_PANEL_WIDTH: f64 = 224.0;
pub const DEFAULT_RIGHT_PANEL_WIDTH: f64 = 384.0;
pub const MIN_LEFT_PANEL_WIDTH: f64 = 150.0;
pub const MAX_LEFT_PANEL_WIDTH: f64 = 400.0;
pub const MIN_RIGHT_PANEL_WIDTH: f64 = 200.0;
pub const MAX_RIGHT_PANEL_WIDTH: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl ViewTransform {
    pub fn zoom_by(&mut self, factor: f64) {
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// One wheel tick; positive delta zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        self.zoom_by(if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN });
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// CSS transform applied to the schematic container.
    pub fn css(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.offset_x, self.offset_y, self.scale)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelWidths {
    pub left: f64,
    pub right: f64,
}

impl Default for PanelWidths {
    fn default() -> Self {
        Self { left: DEFAULT_LEFT_PANEL_WIDTH, right: DEFAULT_RIGHT_PANEL_WIDTH }
    }
}

impl PanelWidths {
    pub fn get(&self, side: PanelSide) -> f64 {
        match side {
            PanelSide::Left => self.left,
            PanelSide::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Panning { grab_x: f64, grab_y: f64 },
    Resizing(PanelSide),
}

/// Owns the transform, the panel widths and the single active pointer gesture.
///
/// Panning and resizing are mutually exclusive; releasing the pointer anywhere
/// ends whichever gesture is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewController {
    pub transform: ViewTransform,
    pub widths: PanelWidths,
    gesture: Gesture,
}

impl ViewController {
    pub fn new(widths: PanelWidths) -> Self {
        Self { widths, ..Self::default() }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn resizing(&self) -> Option<PanelSide> {
        match self.gesture {
            Gesture::Resizing(side) => Some(side),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn begin_pan(&mut self, x: f64, y: f64) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.gesture = Gesture::Panning {
            grab_x: x - self.transform.offset_x,
            grab_y: y - self.transform.offset_y,
        };
        true
    }

    pub fn begin_resize(&mut self, side: PanelSide) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.gesture = Gesture::Resizing(side);
        true
    }

    /// Applies a pointer position to the active gesture. Returns whether anything moved.
    pub fn pointer_moved(&mut self, x: f64, y: f64, window_width: f64) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Panning { grab_x, grab_y } => {
                self.transform.offset_x = x - grab_x;
                self.transform.offset_y = y - grab_y;
                true
            }
            Gesture::Resizing(PanelSide::Left) => {
                self.widths.left = x.clamp(MIN_LEFT_PANEL_WIDTH, MAX_LEFT_PANEL_WIDTH);
                true
            }
            Gesture::Resizing(PanelSide::Right) => {
                self.widths.right =
                    (window_width - x).clamp(MIN_RIGHT_PANEL_WIDTH, MAX_RIGHT_PANEL_WIDTH);
                true
            }
        }
    }

    /// Ends any gesture and reports a finished resize so its width can be persisted.
    pub fn pointer_released(&mut self) -> Option<PanelSide> {
        let finished = self.resizing();
        self.gesture = Gesture::Idle;
        finished
    }

    pub fn reset(&mut self) {
        self.transform = ViewTransform::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_zoom_is_clamped() {
        let mut transform = ViewTransform::default();
        for _ in 0..100 {
            transform.wheel(1.0);
        }
        assert_eq!(transform.scale, MIN_SCALE);
        for _ in 0..100 {
            transform.wheel(-1.0);
        }
        assert_eq!(transform.scale, MAX_SCALE);
    }

    #[test]
    fn pan_follows_pointer_from_grab_point() {
        let mut view = ViewController::default();
        view.transform.offset_x = 10.0;
        assert!(view.begin_pan(100.0, 100.0));
        view.pointer_moved(150.0, 80.0, 1000.0);
        assert_eq!((view.transform.offset_x, view.transform.offset_y), (60.0, -20.0));
        assert_eq!(view.pointer_released(), None);
        assert!(!view.pointer_moved(0.0, 0.0, 1000.0));
    }

    #[test]
    fn gestures_are_exclusive() {
        let mut view = ViewController::default();
        assert!(view.begin_resize(PanelSide::Left));
        assert!(!view.begin_pan(0.0, 0.0));
        assert!(!view.begin_resize(PanelSide::Right));
        assert_eq!(view.pointer_released(), Some(PanelSide::Left));
        assert!(view.begin_pan(0.0, 0.0));
        assert!(!view.begin_resize(PanelSide::Left));
    }

    #[test]
    fn resize_widths_are_clamped() {
        let mut view = ViewController::default();
        view.begin_resize(PanelSide::Left);
        view.pointer_moved(20.0, 0.0, 1200.0);
        assert_eq!(view.widths.left, MIN_LEFT_PANEL_WIDTH);
        view.pointer_released();

        view.begin_resize(PanelSide::Right);
        view.pointer_moved(900.0, 0.0, 1200.0);
        assert_eq!(view.widths.right, 300.0);
        view.pointer_moved(100.0, 0.0, 1200.0);
        assert_eq!(view.widths.right, MAX_RIGHT_PANEL_WIDTH);
    }

    #[test]
    fn reset_keeps_widths() {
        let mut view = ViewController::new(PanelWidths { left: 300.0, right: 250.0 });
        view.transform.zoom_by(2.0);
        view.transform.offset_x = 40.0;
        view.reset();
        assert_eq!(view.transform, ViewTransform::default());
        assert_eq!(view.widths.left, 300.0);
    }
}
