//! Modal dialogs: pending confirmations and the measurement form.

use shared::{Confirmation, Measurement, PanelCommand};
use zoon::events::{Click, KeyDown};
use zoon::*;

use crate::control_panel::ControlPanel;
use crate::dataflow::Atom;
use crate::widgets::{NEUTRAL_COLOR, plain_button};

/// Centered card over a dimmed backdrop; Escape dismisses it.
fn modal(content: impl Element, mut on_escape: impl FnMut() + 'static) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Background::new().color("rgba(15, 23, 42, 0.45)"))
        .update_raw_el(move |raw_el| {
            raw_el
                .style("display", "flex")
                .style("justify-content", "center")
                .style("align-items", "center")
                .style("z-index", "30")
                .global_event_handler(move |event: KeyDown| {
                    if event.key() == "Escape" {
                        on_escape();
                    }
                })
        })
        .child(
            El::new()
                .s(Padding::all(24))
                .s(RoundedCorners::all(8))
                .s(Background::new().color("#ffffff"))
                .s(Width::fill().min(320).max(420))
                .update_raw_el(|raw_el| {
                    raw_el.event_handler(|event: Click| event.stop_propagation())
                })
                .child(content),
        )
}

fn title(text: String) -> impl Element {
    El::new()
        .s(Font::new().size(18).weight(FontWeight::SemiBold).color("#1e293b"))
        .child(text)
}

fn buttons(decline: impl Element, accept: impl Element) -> impl Element {
    Row::new().s(Align::new().right()).s(Gap::new().x(8)).item(decline).item(accept)
}

/// The store's pending confirmation, if any, as a dialog.
pub fn confirmation_dialog(
    control_panel: &ControlPanel,
) -> impl Signal<Item = Option<impl Element>> + use<> {
    let control_panel = control_panel.clone();
    control_panel.store.signal_ref(|store| store.pending).map(move |pending| {
        pending.map(|confirmation| confirmation_content(&control_panel, confirmation))
    })
}

fn confirmation_content(control_panel: &ControlPanel, confirmation: Confirmation) -> impl Element {
    let answer = |accepted: bool| {
        let control_panel = control_panel.clone();
        move || control_panel.send(PanelCommand::Confirm(accepted))
    };
    modal(
        Column::new()
            .s(Gap::new().y(16))
            .item(title(confirmation.title().to_string()))
            .item(
                confirmation
                    .message()
                    .map(|message| {
                        Paragraph::new().s(Font::new().size(14).color("#475569")).content(message)
                    }),
            )
            .item(buttons(
                plain_button(confirmation.decline_label(), NEUTRAL_COLOR, answer(false)),
                plain_button(confirmation.accept_label(), "#93c5fd", answer(true)),
            )),
        answer(false),
    )
}

/// Form fields of the measurement dialog.
#[derive(Clone)]
pub struct MeasurementForm {
    pub open: Atom<bool>,
    file_name: Atom<String>,
    amplitude: Atom<String>,
    position: Atom<String>,
}

impl MeasurementForm {
    pub fn new() -> Self {
        Self {
            open: Atom::new(false),
            file_name: Atom::default(),
            amplitude: Atom::default(),
            position: Atom::default(),
        }
    }

    fn measurement(&self) -> Measurement {
        Measurement {
            file_name: self.file_name.get_cloned(),
            amplitude: self.amplitude.get_cloned(),
            position: self.position.get_cloned(),
        }
    }

    fn reset(&self) {
        self.file_name.set(String::new());
        self.amplitude.set(String::new());
        self.position.set(String::new());
        self.open.set(false);
    }
}

pub fn measurement_dialog(form: &MeasurementForm, control_panel: &ControlPanel) -> impl Element {
    let next_number = control_panel.store.signal_ref(|store| store.measurement_count + 1);
    modal(
        Column::new()
            .s(Gap::new().y(12))
            .item(
                El::new()
                    .child_signal(next_number.map(|number| title(format!("Messung {number}")))),
            )
            .item(form_field("Dateiname", &form.file_name))
            .item(form_field("Amplitude", &form.amplitude))
            .item(form_field("Position", &form.position))
            .item(buttons(
                plain_button("Abbrechen", NEUTRAL_COLOR, {
                    let form = form.clone();
                    move || form.open.set(false)
                }),
                plain_button("Speichern", "#93c5fd", {
                    let form = form.clone();
                    let control_panel = control_panel.clone();
                    move || {
                        control_panel.send(PanelCommand::SubmitMeasurement(form.measurement()));
                        form.reset();
                    }
                }),
            )),
        {
            let form = form.clone();
            move || form.open.set(false)
        },
    )
}

fn form_field(label: &'static str, value: &Atom<String>) -> impl Element {
    Column::new()
        .s(Gap::new().y(4))
        .item(El::new().s(Font::new().size(13).color("#475569")).child(label))
        .item(
            TextInput::new()
                .s(Width::fill())
                .s(Padding::new().x(8).y(6))
                .s(Borders::all(Border::new().width(1).color("#cbd5e1")))
                .s(RoundedCorners::all(4))
                .label_hidden(label)
                .text_signal(value.signal())
                .on_change({
                    let value = value.clone();
                    move |text| value.set(text)
                }),
        )
}
