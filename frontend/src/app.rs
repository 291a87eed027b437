//! ValvePanelApp - wiring of the panel's actors and the root layout

use shared::PanelSide;
use shared::valves::{THREE_WAY_VALVES, TWO_WAY_VALVES};
use zoon::events::{PointerMove, PointerUp};
use zoon::*;

use crate::browser;
use crate::clipboard::Clipboard;
use crate::connection::LogMirror;
use crate::control_panel::ControlPanel;
use crate::dialogs::{MeasurementForm, confirmation_dialog, measurement_dialog};
use crate::instruments_panel::{instruments_panel, pressure_panel};
use crate::log_panel::log_panel;
use crate::schematic::{Schematic, schematic_panel};
use crate::view_system::{GlobalPointer, ViewSystem};
use crate::widgets::divider;

pub struct ValvePanelApp {
    /// Store actor and its command relay
    pub control_panel: ControlPanel,

    /// Pan, zoom, hover and panel widths
    pub view: ViewSystem,

    pub schematic: Schematic,

    pub measurement_form: MeasurementForm,

    // Kept alive for the clipboard actor.
    _clipboard: Clipboard,
}

impl ValvePanelApp {
    pub async fn new() -> Self {
        let control_panel = ControlPanel::load(LogMirror::new());
        let clipboard = Clipboard::new(control_panel.clone());
        let widths = control_panel.store.read(|store| store.panel_widths);
        let view = ViewSystem::new(control_panel.clone(), clipboard.clone(), widths);
        let schematic = Schematic::load(&control_panel);

        ValvePanelApp {
            control_panel,
            view,
            schematic,
            measurement_form: MeasurementForm::new(),
            _clipboard: clipboard,
        }
    }

    pub fn root(&self) -> impl Element {
        Stack::new()
            .s(Height::screen())
            .s(Width::fill())
            .s(Font::new().family([
                FontFamily::new("Inter"),
                FontFamily::new("system-ui"),
                FontFamily::new("Segoe UI"),
                FontFamily::new("Arial"),
                FontFamily::SansSerif,
            ]))
            .update_raw_el({
                let pointer_moved_relay = self.view.pointer_moved_relay.clone();
                let pointer_released_relay = self.view.pointer_released_relay.clone();
                move |raw_el| {
                    raw_el
                        .global_event_handler(move |event: PointerMove| {
                            pointer_moved_relay.send(GlobalPointer {
                                x: event.x() as f64,
                                y: event.y() as f64,
                                window_width: browser::window_width(),
                            })
                        })
                        .global_event_handler(move |_: PointerUp| pointer_released_relay.send(()))
                }
            })
            .layer(self.main_layout())
            .layer_signal(self.measurement_form.open.signal().map_true({
                let form = self.measurement_form.clone();
                let control_panel = self.control_panel.clone();
                move || measurement_dialog(&form, &control_panel)
            }))
            .layer_signal(confirmation_dialog(&self.control_panel))
    }

    fn main_layout(&self) -> impl Element {
        Row::new()
            .s(Width::fill())
            .s(Height::fill())
            .item(
                Column::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .item(self.header())
                    .item(
                        Row::new()
                            .s(Width::fill())
                            .s(Height::fill())
                            .item(self.sidebar(
                                PanelSide::Left,
                                instruments_panel(&self.control_panel, &self.measurement_form.open),
                            ))
                            .item(self.divider(PanelSide::Left))
                            .item(
                                Stack::new()
                                    .s(Width::fill())
                                    .s(Height::fill())
                                    .layer(schematic_panel(
                                        &self.schematic,
                                        &self.control_panel,
                                        &self.view,
                                    ))
                                    .layer(pressure_panel(&self.control_panel)),
                            ),
                    )
                    .item(footer()),
            )
            .item(self.divider(PanelSide::Right))
            .item(self.sidebar(PanelSide::Right, log_panel(&self.control_panel)))
    }

    fn sidebar(&self, side: PanelSide, content: impl Element) -> impl Element {
        El::new()
            .s(Height::fill())
            .s(Width::exact_signal(self.view.width_signal(side).map(|width| width as u32)))
            .child(content)
    }

    fn divider(&self, side: PanelSide) -> impl Element {
        let resize_started_relay = self.view.resize_started_relay.clone();
        divider(
            self.view.resizing_signal().map(move |resizing| resizing == Some(side)),
            move || resize_started_relay.send(side),
        )
    }

    fn header(&self) -> impl Element {
        Row::new()
            .s(Width::fill())
            .s(Padding::new().x(16).y(10))
            .s(Gap::new().x(12))
            .s(Borders::new().bottom(Border::new().width(1).color("#e2e8f0")))
            .item(
                Column::new()
                    .item(
                        El::new()
                            .s(Font::new().size(20).weight(FontWeight::Bold).color("#0f172a"))
                            .child("Valve Schematic Control"),
                    )
                    .item(El::new().s(Font::new().size(12).color("#64748b")).child(format!(
                        "{} two-way valves • {} three-way valves",
                        TWO_WAY_VALVES.len(),
                        THREE_WAY_VALVES.len()
                    ))),
            )
            .item_signal(self.control_panel.store.signal_ref(|store| store.active_gas).map(|gas| {
                gas.map(|gas| {
                    El::new()
                        .s(Align::new().right())
                        .s(Padding::new().x(10).y(4))
                        .s(RoundedCorners::all(12))
                        .s(Font::new().size(13).color("#ffffff"))
                        .s(Background::new().color(gas.color()))
                        .child(format!("Gas: {}", gas.name()))
                })
            }))
    }
}

fn footer() -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Padding::all(6))
        .s(Font::new().size(11).color("#94a3b8").center())
        .child("Scroll to zoom • Drag to pan • Hover for valve names • Click to toggle")
}
