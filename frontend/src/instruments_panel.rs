//! Left sidebar with the instrument switches, plus the pressure overlay.

use shared::instruments::{
    CryoRouting, HeatingZone, PressureGauge, ProbePosition, SpectrometerFill, Switch,
    TemperatureProbe,
};
use shared::{InstrumentCommand, PanelCommand, PanelStore};
use zoon::*;

use crate::control_panel::ControlPanel;
use crate::dataflow::{Actor, Atom};
use crate::widgets::{
    NEUTRAL_COLOR, OFF_COLOR, ON_COLOR, labelled_reading, plain_button, reading_input,
    section_title, state_button,
};

fn on_off_color(on: &bool) -> &'static str {
    if *on { ON_COLOR } else { OFF_COLOR }
}

fn instrument(control_panel: &ControlPanel, command: InstrumentCommand) -> impl FnMut() + 'static {
    let control_panel = control_panel.clone();
    move || control_panel.send(PanelCommand::Instrument(command.clone()))
}

fn instrument_text(
    control_panel: &ControlPanel,
    command: impl Fn(String) -> InstrumentCommand + 'static,
) -> impl FnMut(String) + 'static {
    let control_panel = control_panel.clone();
    move |text| control_panel.send(PanelCommand::Instrument(command(text)))
}

pub fn instruments_panel(
    control_panel: &ControlPanel,
    measurement_dialog_open: &Atom<bool>,
) -> impl Element {
    let store = &control_panel.store;
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Padding::all(12))
        .s(Gap::new().y(8))
        .s(Scrollbars::y_and_clip_x())
        .s(Background::new().color("#f1f5f9"))
        .item(valve_counts(control_panel))
        .item(plain_button("Messung", "#c7d2fe", {
            let measurement_dialog_open = measurement_dialog_open.clone();
            move || measurement_dialog_open.set(true)
        }))
        .item(switch_button(control_panel, Switch::Cryo, "Cryo"))
        .item(
            Column::new()
                .s(Gap::new().y(4))
                .item(temperature_reading(control_panel, TemperatureProbe::CryoT1, "T1:"))
                .item(temperature_reading(control_panel, TemperatureProbe::CryoT2, "T2:")),
        )
        .item(state_button(
            store.signal_ref(|store| store.instruments.probe_position),
            |position| position.label().to_string(),
            |position| match position {
                ProbePosition::Cryo => "#3b82f6",
                ProbePosition::Schleuse => "#a855f7",
            },
            instrument(control_panel, InstrumentCommand::ToggleProbePosition),
        ))
        .item(state_button(
            store.signal_ref(|store| store.instruments.cryo_routing),
            |routing| routing.label().to_string(),
            |routing| match routing {
                CryoRouting::Spektrometer => "#06b6d4",
                CryoRouting::Schleuse => "#f97316",
            },
            instrument(control_panel, InstrumentCommand::ToggleCryoRouting),
        ))
        .item(state_button(
            store.signal_ref(|store| store.instruments.spectrometer_fill),
            |fill| fill.label().to_string(),
            |fill| match fill {
                SpectrometerFill::Leer => "#6b7280",
                SpectrometerFill::N2 => "#14b8a6",
            },
            instrument(control_panel, InstrumentCommand::ToggleSpectrometerFill),
        ))
        .item(switch_button(control_panel, Switch::Tec, "TEC"))
        .item_signal(switched_on(store, Switch::Tec).map_true({
            let control_panel = control_panel.clone();
            move || temperature_reading(&control_panel, TemperatureProbe::Tec, "")
        }))
        .item(state_button(
            store.signal_ref(|store| store.instruments.kuehlfalle),
            |on| format!("Kühlfalle {}", if *on { "ja" } else { "nein" }),
            on_off_color,
            instrument(control_panel, InstrumentCommand::ToggleKuehlfalle),
        ))
        .item(switch_button(control_panel, Switch::Mfc, "MFC"))
        .item_signal(switched_on(store, Switch::Mfc).map_true({
            let control_panel = control_panel.clone();
            move || mfc_setpoint(&control_panel)
        }))
        .item(switch_button(control_panel, Switch::CryoHeater, "Cryo Heater"))
        .item_signal(switched_on(store, Switch::CryoHeater).map_true({
            let control_panel = control_panel.clone();
            move || temperature_reading(&control_panel, TemperatureProbe::CryoHeater, "")
        }))
        .item(switch_button(control_panel, Switch::HighVoltage, "HV"))
        .item(heating_wires(control_panel))
        .item(
            El::new()
                .s(Padding::new().top(8))
                .s(Width::fill())
                .child(plain_button("Close All Valves", "#fecaca", {
                    let control_panel = control_panel.clone();
                    move || control_panel.send(PanelCommand::CloseAllValves)
                })),
        )
}

fn switched_on(store: &Actor<PanelStore>, switch: Switch) -> impl Signal<Item = bool> + use<> {
    store.signal_ref(move |store| store.instruments.switch(switch))
}

fn switch_button(control_panel: &ControlPanel, switch: Switch, name: &'static str) -> impl Element {
    state_button(
        switched_on(&control_panel.store, switch),
        move |on| format!("{name} {}", if *on { "on" } else { "off" }),
        on_off_color,
        instrument(control_panel, InstrumentCommand::Toggle(switch)),
    )
}

fn valve_counts(control_panel: &ControlPanel) -> impl Element {
    let counts = control_panel
        .store
        .signal_ref(|store| (store.valves.open_count(), store.valves.closed_count()))
        .broadcast();
    Row::new()
        .s(Gap::new().x(12))
        .s(Font::new().size(13))
        .item(
            El::new()
                .s(Font::new().color("#16a34a"))
                .child_signal(counts.signal_ref(|(open, _)| format!("● {open} Open"))),
        )
        .item(
            El::new()
                .s(Font::new().color("#dc2626"))
                .child_signal(counts.signal_ref(|(_, closed)| format!("● {closed} Closed"))),
        )
}

fn temperature_reading(
    control_panel: &ControlPanel,
    probe: TemperatureProbe,
    label: &'static str,
) -> impl Element {
    let input = reading_input(
        probe.component(),
        "Temp",
        64,
        control_panel
            .store
            .signal_ref(move |store| store.instruments.temperatures.get(probe).to_string()),
        instrument_text(control_panel, move |text| InstrumentCommand::SetTemperature(probe, text)),
        instrument(control_panel, InstrumentCommand::SubmitTemperature(probe)),
    );
    labelled_reading(label, Some(probe.unit()), input)
}

fn mfc_setpoint(control_panel: &ControlPanel) -> impl Element {
    reading_input(
        "MFC",
        "0",
        96,
        control_panel.store.signal_ref(|store| store.instruments.mfc_value.clone()),
        instrument_text(control_panel, InstrumentCommand::SetMfcValue),
        instrument(control_panel, InstrumentCommand::SubmitMfcValue),
    )
}

fn heating_wires(control_panel: &ControlPanel) -> impl Element {
    let expanded = control_panel
        .store
        .signal_ref(|store| store.instruments.show_heating_wires)
        .broadcast();
    Column::new()
        .s(Gap::new().y(4))
        .item(
            Button::new()
                .s(Width::fill())
                .s(Padding::new().x(12).y(8))
                .s(RoundedCorners::all(4))
                .s(Background::new().color(NEUTRAL_COLOR))
                .label_signal(expanded.signal_ref(|expanded| {
                    format!("Heizdrähte {}", if *expanded { "▲" } else { "▼" })
                }))
                .on_press(instrument(control_panel, InstrumentCommand::ToggleHeatingWirePanel)),
        )
        .item_signal(expanded.signal().map_true({
            let control_panel = control_panel.clone();
            move || {
                Column::new()
                    .s(Padding::new().left(8))
                    .s(Gap::new().y(4))
                    .items(
                        HeatingZone::ALL
                            .into_iter()
                            .map(|zone| heating_wire_button(&control_panel, zone)),
                    )
            }
        }))
}

fn heating_wire_button(control_panel: &ControlPanel, zone: HeatingZone) -> impl Element {
    state_button(
        control_panel.store.signal_ref(move |store| store.instruments.heating_wires.get(zone)),
        move |on| format!("{} {}", zone.name(), if *on { "on" } else { "off" }),
        on_off_color,
        instrument(control_panel, InstrumentCommand::ToggleHeatingWire(zone)),
    )
}

/// Pressure gauges, floating over the top-left corner of the schematic.
pub fn pressure_panel(control_panel: &ControlPanel) -> impl Element {
    Column::new()
        .s(Align::new().top().left())
        .s(Padding::all(8))
        .s(Gap::new().y(4))
        .s(RoundedCorners::all(6))
        .s(Background::new().color("rgba(255, 255, 255, 0.92)"))
        .s(Borders::all(Border::new().width(1).color("#e2e8f0")))
        .update_raw_el(|raw_el| raw_el.style("margin", "8px"))
        .item(section_title("Pressure Sensors (mbar)"))
        .items(PressureGauge::ALL.into_iter().map(|gauge| pressure_reading(control_panel, gauge)))
}

fn pressure_reading(control_panel: &ControlPanel, gauge: PressureGauge) -> impl Element {
    let (placeholder, width) = if gauge.is_scientific() { ("1.0e-5", 80) } else { ("0", 64) };
    let input = reading_input(
        gauge.label(),
        placeholder,
        width,
        control_panel
            .store
            .signal_ref(move |store| store.instruments.pressures.get(gauge).to_string()),
        instrument_text(control_panel, move |text| InstrumentCommand::SetPressure(gauge, text)),
        instrument(control_panel, InstrumentCommand::SubmitPressure(gauge)),
    );
    labelled_reading(gauge.label(), None, input)
}
