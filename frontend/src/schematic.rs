//! The annotated valve schematic with its pan/zoom surface and toolbar.

use futures::StreamExt;
use shared::interaction::suppresses_context_menu;
use shared::{HitMarkers, PanelCommand, PointerInput, SCHEMATIC_URL, annotate};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use zoon::events::{
    ContextMenu, MouseButton, PointerDown, PointerLeave, PointerMove, PointerUp, Wheel,
};
use zoon::*;

use crate::browser;
use crate::control_panel::ControlPanel;
use crate::dataflow::{Actor, relay};
use crate::view_system::ViewSystem;

/// Raw schematic text, empty until the fetch completes or if it fails.
#[derive(Clone)]
pub struct Schematic {
    raw: Actor<String>,
}

impl Schematic {
    pub fn load(control_panel: &ControlPanel) -> Self {
        let (diagram_loaded_relay, mut diagram_loaded_stream) = relay::<String>();

        let raw = Actor::new(String::new(), async move |state| {
            while let Some(text) = diagram_loaded_stream.next().await {
                state.set(text);
            }
        });

        let control_panel = control_panel.clone();
        spawn_local(async move {
            match browser::fetch_text(SCHEMATIC_URL).await {
                Ok(text) => {
                    diagram_loaded_relay.send(text);
                    control_panel.log_system("Schematic loaded");
                }
                Err(error) => zoon::eprintln!("Failed to load schematic: {error}"),
            }
        });

        Self { raw }
    }

    fn annotated_signal(&self, control_panel: &ControlPanel) -> impl Signal<Item = String> + use<> {
        map_ref! {
            let raw = self.raw.signal(),
            let visual = control_panel.visual_state_signal() =>
            annotate(raw, visual)
        }
    }
}

fn hit_markers(target: Option<web_sys::EventTarget>) -> HitMarkers {
    let Some(element) = target.and_then(|target| target.dyn_into::<web_sys::Element>().ok()) else {
        return HitMarkers::default();
    };
    HitMarkers {
        valve_id: element.get_attribute("data-valve-id"),
        gas_source: element.get_attribute("data-gas-source"),
        pipe_id: element.get_attribute("data-pipe-id"),
        pipe_path: element.get_attribute("data-pipe-path"),
    }
}

pub fn schematic_panel(
    schematic: &Schematic,
    control_panel: &ControlPanel,
    view: &ViewSystem,
) -> impl Element {
    Stack::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Clip::both())
        .s(Background::new().color("#f8fafc"))
        .layer(schematic_surface(schematic, control_panel, view))
        .layer(toolbar(control_panel, view))
        .layer_signal(view.hover_signal().map(|hover| {
            hover.tooltip().map(|(text, x, y)| tooltip(text, x, y))
        }))
}

fn schematic_surface(
    schematic: &Schematic,
    control_panel: &ControlPanel,
    view: &ViewSystem,
) -> impl Element {
    let pointer_input_relay = view.pointer_input_relay.clone();
    let store = control_panel.store.clone();

    El::new()
        .s(Width::fill())
        .s(Height::fill())
        .update_raw_el({
            let is_panning = view.is_panning_signal();
            move |raw_el| {
                raw_el
                    .style("touch-action", "none")
                    .style("user-select", "none")
                    .style_signal("cursor", is_panning.map_bool(|| "grabbing", || "grab"))
                    .event_handler({
                        let relay = pointer_input_relay.clone();
                        move |event: PointerDown| {
                            if event.button() != MouseButton::Left {
                                return;
                            }
                            relay.send(PointerInput::Down {
                                hit: hit_markers(event.target()),
                                x: event.x() as f64,
                                y: event.y() as f64,
                            });
                        }
                    })
                    .event_handler({
                        let relay = pointer_input_relay.clone();
                        move |event: PointerMove| {
                            relay.send(PointerInput::Move {
                                hit: hit_markers(event.target()),
                                x: event.x() as f64,
                                y: event.y() as f64,
                            });
                        }
                    })
                    .event_handler({
                        let relay = pointer_input_relay.clone();
                        move |_: PointerUp| relay.send(PointerInput::Up)
                    })
                    .event_handler({
                        let relay = pointer_input_relay.clone();
                        move |_: PointerLeave| relay.send(PointerInput::Leave)
                    })
                    .event_handler_with_options(EventOptions::preventable(), {
                        let relay = pointer_input_relay.clone();
                        move |event: ContextMenu| {
                            let hit = hit_markers(event.target());
                            let pipe_labels = store.read(|store| store.pipe_labels);
                            if suppresses_context_menu(&hit, pipe_labels) {
                                event.prevent_default();
                            }
                            relay.send(PointerInput::ContextMenu { hit });
                        }
                    })
                    .event_handler_with_options(EventOptions::preventable(), {
                        let relay = pointer_input_relay.clone();
                        move |event: Wheel| {
                            event.prevent_default();
                            relay.send(PointerInput::Wheel { delta_y: event.delta_y() });
                        }
                    })
            }
        })
        .child(
            El::new()
                .s(Width::fill())
                .s(Height::fill())
                .update_raw_el({
                    let transform = view.transform_signal();
                    move |raw_el| {
                        raw_el
                            .style("transform-origin", "center center")
                            .style_signal("transform", transform.map(|transform| transform.css()))
                    }
                })
                .child_signal(schematic.annotated_signal(control_panel).map(|markup| {
                    RawHtmlEl::new("div")
                        .style("width", "100%")
                        .style("height", "100%")
                        .inner_markup(&markup)
                        .into_element()
                })),
        )
}

fn toolbar(control_panel: &ControlPanel, view: &ViewSystem) -> impl Element {
    Row::new()
        .s(Align::new().top().right())
        .s(Padding::all(8))
        .s(Gap::new().x(6))
        .item(tool_button("−", {
            let relay = view.zoom_clicked_relay.clone();
            move || relay.send(shared::view::BUTTON_ZOOM_OUT)
        }))
        .item(
            El::new()
                .s(Width::exact(48))
                .s(Font::new().center().size(13))
                .child_signal(
                    view.transform_signal()
                        .map(|transform| format!("{}%", transform.zoom_percent())),
                ),
        )
        .item(tool_button("+", {
            let relay = view.zoom_clicked_relay.clone();
            move || relay.send(shared::view::BUTTON_ZOOM_IN)
        }))
        .item(tool_button("Reset", {
            let relay = view.reset_clicked_relay.clone();
            move || relay.send(())
        }))
        .item(
            Button::new()
                .s(Padding::new().x(10).y(4))
                .s(RoundedCorners::all(4))
                .s(Background::new().color_signal(
                    control_panel.pipe_labels_signal().map_bool(|| "#fde68a", || "#e2e8f0"),
                ))
                .label("Pipe labels")
                .on_press({
                    let control_panel = control_panel.clone();
                    move || control_panel.send(PanelCommand::TogglePipeLabels)
                }),
        )
}

fn tool_button(label: &'static str, on_press: impl FnMut() + 'static) -> impl Element {
    Button::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all(4))
        .s(Background::new().color("#e2e8f0"))
        .label(label)
        .on_press(on_press)
}

fn tooltip(text: String, x: f64, y: f64) -> impl Element {
    El::new()
        .s(Padding::new().x(8).y(4))
        .s(RoundedCorners::all(4))
        .s(Background::new().color("rgba(15, 23, 42, 0.9)"))
        .s(Font::new().color("#ffffff").size(12))
        .update_raw_el(move |raw_el| {
            raw_el
                .style("position", "fixed")
                .style("left", &format!("{}px", x + 12.0))
                .style("top", &format!("{}px", y + 12.0))
                .style("pointer-events", "none")
                .style("z-index", "20")
        })
        .child(text)
}
