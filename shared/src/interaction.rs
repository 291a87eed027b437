//! Pointer routing for the rendered schematic.

use crate::view::ViewController;

/// Marker attributes found on the element under the pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMarkers {
    pub valve_id: Option<String>,
    pub gas_source: Option<String>,
    pub pipe_id: Option<String>,
    pub pipe_path: Option<String>,
}

impl HitMarkers {
    pub fn is_toggle_target(&self) -> bool {
        self.valve_id.is_some() || self.gas_source.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Down { hit: HitMarkers, x: f64, y: f64 },
    Move { hit: HitMarkers, x: f64, y: f64 },
    Up,
    Leave,
    ContextMenu { hit: HitMarkers },
    Wheel { delta_y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverState {
    Idle,
    Valve { id: String, x: f64, y: f64 },
    Pipe { label: String, x: f64, y: f64 },
    Dragging,
}

impl HoverState {
    /// Text and client position of the tooltip to show, if any.
    pub fn tooltip(&self) -> Option<(String, f64, f64)> {
        match self {
            HoverState::Valve { id, x, y } => Some((id.clone(), *x, *y)),
            HoverState::Pipe { label, x, y } => Some((label.clone(), *x, *y)),
            HoverState::Idle | HoverState::Dragging => None,
        }
    }
}

/// What the caller has to do in response to an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Nothing,
    ToggleValve(String),
    ToggleGasSource(String),
    CopyPipePath(String),
    /// Transform or hover changed; only a redraw is needed.
    Redraw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionDispatcher {
    state: HoverState,
}

impl Default for InteractionDispatcher {
    fn default() -> Self {
        Self { state: HoverState::Idle }
    }
}

impl InteractionDispatcher {
    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn handle(
        &mut self,
        input: PointerInput,
        view: &mut ViewController,
        pipe_labels: bool,
    ) -> Dispatch {
        match input {
            PointerInput::Down { hit, x, y } => {
                if let Some(id) = hit.valve_id {
                    return Dispatch::ToggleValve(id);
                }
                if let Some(gas) = hit.gas_source {
                    return Dispatch::ToggleGasSource(gas);
                }
                if view.begin_pan(x, y) {
                    self.state = HoverState::Dragging;
                    return Dispatch::Redraw;
                }
                Dispatch::Nothing
            }
            PointerInput::Move { hit, x, y } => {
                if view.is_panning() {
                    view.pointer_moved(x, y, 0.0);
                    return Dispatch::Redraw;
                }
                if view.resizing().is_some() {
                    return Dispatch::Nothing;
                }
                let next = match (hit.valve_id, hit.pipe_id, hit.pipe_path) {
                    (Some(id), _, _) => HoverState::Valve { id, x, y },
                    (None, Some(pipe_id), Some(path)) if pipe_labels => HoverState::Pipe {
                        label: format!("{pipe_id}: {path}"),
                        x,
                        y,
                    },
                    _ => HoverState::Idle,
                };
                if next == self.state {
                    return Dispatch::Nothing;
                }
                self.state = next;
                Dispatch::Redraw
            }
            PointerInput::Up => self.end_drag(view),
            PointerInput::Leave => {
                let ended = self.end_drag(view);
                if self.state != HoverState::Idle {
                    self.state = HoverState::Idle;
                    return Dispatch::Redraw;
                }
                ended
            }
            PointerInput::ContextMenu { hit } => match hit.pipe_path {
                Some(path) if pipe_labels => Dispatch::CopyPipePath(path),
                _ => Dispatch::Nothing,
            },
            PointerInput::Wheel { delta_y } => {
                view.transform.wheel(delta_y);
                Dispatch::Redraw
            }
        }
    }

    fn end_drag(&mut self, view: &mut ViewController) -> Dispatch {
        if !view.is_panning() {
            return Dispatch::Nothing;
        }
        view.pointer_released();
        self.state = HoverState::Idle;
        Dispatch::Redraw
    }
}

/// Whether the browser's own context menu must be suppressed for this hit.
pub fn suppresses_context_menu(hit: &HitMarkers, pipe_labels: bool) -> bool {
    pipe_labels && hit.pipe_path.is_some()
}
