//! Pan, zoom, hover and panel resizing.
//!
//! Data flows: pointer events → view actor → (transform, hover, widths)
//! signals, plus panel commands for toggles, copies and finished resizes.

use futures::{StreamExt, select};
use shared::{
    Dispatch, HoverState, InteractionDispatcher, PanelCommand, PanelSide, PanelWidths,
    PointerInput, ViewController, ViewTransform,
};
use zoon::*;

use crate::clipboard::Clipboard;
use crate::control_panel::ControlPanel;
use crate::dataflow::{Actor, Relay, relay};

#[derive(Clone, Debug, PartialEq, Default)]
struct ViewState {
    controller: ViewController,
    dispatcher: InteractionDispatcher,
}

/// Pointer position in client coordinates plus the window width it was measured in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalPointer {
    pub x: f64,
    pub y: f64,
    pub window_width: f64,
}

#[derive(Clone)]
pub struct ViewSystem {
    state: Actor<ViewState>,

    /// Pointer events that happened over the schematic.
    pub pointer_input_relay: Relay<PointerInput>,
    /// A divider was grabbed.
    pub resize_started_relay: Relay<PanelSide>,
    /// Document-wide pointer moves; drive resizing.
    pub pointer_moved_relay: Relay<GlobalPointer>,
    /// Document-wide pointer release; ends any gesture.
    pub pointer_released_relay: Relay,
    /// Zoom buttons, carrying the zoom factor.
    pub zoom_clicked_relay: Relay<f64>,
    pub reset_clicked_relay: Relay,
}

impl ViewSystem {
    pub fn new(control_panel: ControlPanel, clipboard: Clipboard, widths: PanelWidths) -> Self {
        let (pointer_input_relay, mut pointer_input_stream) = relay::<PointerInput>();
        let (resize_started_relay, mut resize_started_stream) = relay::<PanelSide>();
        let (pointer_moved_relay, mut pointer_moved_stream) = relay::<GlobalPointer>();
        let (pointer_released_relay, mut pointer_released_stream) = relay::<()>();
        let (zoom_clicked_relay, mut zoom_clicked_stream) = relay::<f64>();
        let (reset_clicked_relay, mut reset_clicked_stream) = relay::<()>();

        let initial = ViewState { controller: ViewController::new(widths), ..ViewState::default() };

        let state = Actor::new(initial, async move |state| {
            // Cached so pointer handling never waits on the store.
            let mut pipe_labels = false;
            let mut pipe_labels_stream = control_panel.pipe_labels_signal().to_stream().fuse();

            loop {
                select! {
                    labels = pipe_labels_stream.next() => match labels {
                        Some(labels) => pipe_labels = labels,
                        None => break,
                    },
                    input = pointer_input_stream.next() => match input {
                        Some(input) => {
                            let dispatch = {
                                let mut view = state.lock_mut();
                                let ViewState { controller, dispatcher } = &mut *view;
                                dispatcher.handle(input, controller, pipe_labels)
                            };
                            match dispatch {
                                Dispatch::ToggleValve(id) => {
                                    control_panel.send(PanelCommand::ToggleValve(id))
                                }
                                Dispatch::ToggleGasSource(gas) => {
                                    control_panel.send(PanelCommand::ToggleGasSource(gas))
                                }
                                Dispatch::CopyPipePath(path) => {
                                    clipboard.copy_requested_relay.send(path)
                                }
                                Dispatch::Nothing | Dispatch::Redraw => {}
                            }
                        }
                        None => break,
                    },
                    side = resize_started_stream.next() => match side {
                        Some(side) => {
                            state.lock_mut().controller.begin_resize(side);
                        }
                        None => break,
                    },
                    pointer = pointer_moved_stream.next() => match pointer {
                        Some(pointer) => {
                            let mut view = state.lock_mut();
                            if view.controller.resizing().is_some() {
                                let GlobalPointer { x, y, window_width } = pointer;
                                view.controller.pointer_moved(x, y, window_width);
                            }
                        }
                        None => break,
                    },
                    released = pointer_released_stream.next() => match released {
                        Some(()) => {
                            let finished = {
                                let mut view = state.lock_mut();
                                let ViewState { controller, dispatcher } = &mut *view;
                                if controller.is_panning() {
                                    dispatcher.handle(PointerInput::Up, controller, pipe_labels);
                                    None
                                } else {
                                    controller.pointer_released().map(|_| controller.widths)
                                }
                            };
                            if let Some(widths) = finished {
                                control_panel.send(PanelCommand::SetPanelWidths(widths));
                            }
                        }
                        None => break,
                    },
                    factor = zoom_clicked_stream.next() => match factor {
                        Some(factor) => state.lock_mut().controller.transform.zoom_by(factor),
                        None => break,
                    },
                    reset = reset_clicked_stream.next() => match reset {
                        Some(()) => {
                            state.lock_mut().controller.reset();
                            control_panel.log_system("View reset");
                        }
                        None => break,
                    },
                }
            }
        });

        Self {
            state,
            pointer_input_relay,
            resize_started_relay,
            pointer_moved_relay,
            pointer_released_relay,
            zoom_clicked_relay,
            reset_clicked_relay,
        }
    }

    pub fn transform_signal(&self) -> impl Signal<Item = ViewTransform> + use<> {
        self.state.signal_ref(|view| view.controller.transform)
    }

    pub fn width_signal(&self, side: PanelSide) -> impl Signal<Item = f64> + use<> {
        self.state.signal_ref(move |view| view.controller.widths.get(side))
    }

    pub fn hover_signal(&self) -> impl Signal<Item = HoverState> + use<> {
        self.state.signal_ref(|view| view.dispatcher.state().clone())
    }

    pub fn is_panning_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.state.signal_ref(|view| view.controller.is_panning())
    }

    pub fn resizing_signal(&self) -> impl Signal<Item = Option<PanelSide>> + use<> {
        self.state.signal_ref(|view| view.controller.resizing())
    }
}
