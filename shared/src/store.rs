//! In-memory state of the control panel.
//!
//! Every operator command goes through [`PanelStore::apply`], which mutates the
//! state, appends the matching activity log entries and reports them back as
//! [`Effects`] so the caller can mirror them to the log file.

use chrono::{DateTime, Utc};

use crate::activity_log::{ActivityLog, LogEntry, LogId};
use crate::annotator::VisualState;
use crate::error::{PanelError, SnapshotError};
use crate::gas::GasSource;
use crate::instruments::{
    CryoRouting, HeatingZone, InstrumentState, PressureGauge, ProbePosition, Switch,
    TemperatureProbe, format_scientific, on_off,
};
use crate::snapshot::PersistedSnapshot;
use crate::valves::{ValveKind, ValveStates, find_valve, link_for};
use crate::view::PanelWidths;

pub const SYSTEM_COMPONENT: &str = "System";
pub const USER_COMPONENT: &str = "User";

/// Guarded transitions waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    ProbeIntoCryo,
    CryoToSpectrometer,
    TecRestart,
}

impl Confirmation {
    pub fn title(self) -> &'static str {
        match self {
            Confirmation::TecRestart => "TEC neustarten?",
            Confirmation::ProbeIntoCryo | Confirmation::CryoToSpectrometer => "Warnung",
        }
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            Confirmation::ProbeIntoCryo => {
                Some("Cryo ist zum Spektrometer gerichtet. Wirklich fortfahren?")
            }
            Confirmation::CryoToSpectrometer => {
                Some("Schliffchen ist im Cryo. Wirklich fortfahren?")
            }
            Confirmation::TecRestart => None,
        }
    }

    pub fn decline_label(self) -> &'static str {
        match self {
            Confirmation::TecRestart => "Nein",
            _ => "Abbrechen",
        }
    }

    pub fn accept_label(self) -> &'static str {
        match self {
            Confirmation::TecRestart => "Ja",
            _ => "Fortfahren",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Confirmation::ProbeIntoCryo => "probe into cryostat",
            Confirmation::CryoToSpectrometer => "cryo routing to spectrometer",
            Confirmation::TecRestart => "TEC restart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentCommand {
    Toggle(Switch),
    ToggleKuehlfalle,
    ToggleHeatingWire(HeatingZone),
    ToggleHeatingWirePanel,
    ToggleProbePosition,
    ToggleCryoRouting,
    ToggleSpectrometerFill,
    SetMfcValue(String),
    SubmitMfcValue,
    SetPressure(PressureGauge, String),
    SubmitPressure(PressureGauge),
    SetTemperature(TemperatureProbe, String),
    SubmitTemperature(TemperatureProbe),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    pub file_name: String,
    pub amplitude: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    ToggleValve(String),
    ToggleGasSource(String),
    CloseAllValves,
    Instrument(InstrumentCommand),
    Confirm(bool),
    SubmitMeasurement(Measurement),
    AddNote(String),
    DeleteLogEntry(LogId),
    ClearLog,
    LogSystem(String),
    TogglePipeLabels,
    SetPanelWidths(PanelWidths),
}

impl PanelCommand {
    /// Commands an open confirmation dialog keeps the operator from issuing.
    fn blocked_while_confirming(&self) -> bool {
        !matches!(
            self,
            PanelCommand::Confirm(_) | PanelCommand::LogSystem(_) | PanelCommand::SetPanelWidths(_)
        )
    }
}

/// Side effects of one command for the log file mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    /// The file must be emptied before `appended` is written.
    pub truncate_log_file: bool,
    pub appended: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelStore {
    pub valves: ValveStates,
    pub active_gas: Option<GasSource>,
    pub instruments: InstrumentState,
    pub pipe_labels: bool,
    pub measurement_count: u32,
    pub panel_widths: PanelWidths,
    pub log: ActivityLog,
    pub pending: Option<Confirmation>,
}

impl Default for PanelStore {
    fn default() -> Self {
        Self {
            valves: ValveStates::default(),
            active_gas: None,
            instruments: InstrumentState::default(),
            pipe_labels: false,
            measurement_count: 0,
            panel_widths: PanelWidths::default(),
            log: ActivityLog::default(),
            pending: None,
        }
    }
}

impl PanelStore {
    /// Restores the store from persisted text. Missing or malformed data falls
    /// back to defaults field by field.
    pub fn load_snapshot(text: Option<&str>) -> Self {
        text.map(PersistedSnapshot::from_json)
            .map(Self::from_snapshot)
            .unwrap_or_default()
    }

    pub fn save_snapshot(&self) -> Result<String, SnapshotError> {
        self.snapshot().to_json()
    }

    pub fn from_snapshot(snapshot: PersistedSnapshot) -> Self {
        snapshot.into_store()
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::from_store(self)
    }

    pub fn visual_state(&self) -> VisualState {
        VisualState {
            valves: self.valves.clone(),
            active_gas: self.active_gas,
            probe_position: self.instruments.probe_position,
            cryo_routing: self.instruments.cryo_routing,
            spectrometer_fill: self.instruments.spectrometer_fill,
            pipe_labels: self.pipe_labels,
        }
    }

    pub fn apply(
        &mut self,
        command: PanelCommand,
        now: DateTime<Utc>,
    ) -> Result<Effects, PanelError> {
        if let Some(pending) = self.pending
            && command.blocked_while_confirming()
        {
            return Err(PanelError::ConfirmationPending(pending.describe()));
        }
        match command {
            PanelCommand::ToggleValve(id) => self.toggle_valve(&id, now),
            PanelCommand::ToggleGasSource(name) => {
                let gas = GasSource::from_name(&name).ok_or(PanelError::UnknownGasSource(name))?;
                Ok(self.toggle_gas_source(gas, now))
            }
            PanelCommand::CloseAllValves => Ok(self.close_all_valves(now)),
            PanelCommand::Instrument(command) => Ok(self.set_instrument_field(command, now)),
            PanelCommand::Confirm(accepted) => self.confirm(accepted, now),
            PanelCommand::SubmitMeasurement(measurement) => {
                Ok(self.submit_measurement(measurement, now))
            }
            PanelCommand::AddNote(note) => Ok(self.add_note(&note, now)),
            PanelCommand::DeleteLogEntry(id) => {
                self.log.delete(id);
                Ok(Effects::default())
            }
            PanelCommand::ClearLog => Ok(self.clear_log(now)),
            PanelCommand::LogSystem(action) => Ok(self.log_system(action, now)),
            PanelCommand::TogglePipeLabels => {
                self.pipe_labels = !self.pipe_labels;
                Ok(Effects::default())
            }
            PanelCommand::SetPanelWidths(widths) => {
                self.panel_widths = widths;
                Ok(Effects::default())
            }
        }
    }

    fn append(
        &mut self,
        effects: &mut Effects,
        component: &str,
        action: &str,
        state: Option<&str>,
        now: DateTime<Utc>,
    ) {
        let entry = self.log.append(component, action, state, now);
        effects.appended.push(entry);
    }

    fn single(
        &mut self,
        component: &str,
        action: &str,
        state: Option<&str>,
        now: DateTime<Utc>,
    ) -> Effects {
        let mut effects = Effects::default();
        self.append(&mut effects, component, action, state, now);
        effects
    }

    pub fn toggle_valve(&mut self, id: &str, now: DateTime<Utc>) -> Result<Effects, PanelError> {
        let valve = find_valve(id).ok_or_else(|| PanelError::UnknownValve(id.to_string()))?;
        let open = !self.valves.is_open(valve.id);

        let effects = match (valve.kind, link_for(valve.id)) {
            (ValveKind::ThreeWay, Some(link)) => {
                for member in link.members {
                    self.valves.set(member, open);
                }
                let (action, state) = if open { ("in", "IN") } else { ("out", "OUT") };
                self.single(link.name, action, Some(state), now)
            }
            _ => {
                self.valves.set(valve.id, open);
                let (action, state) = if open { ("OPENED", "OPEN") } else { ("CLOSED", "CLOSED") };
                self.single(&format!("{} Ventil", valve.id), action, Some(state), now)
            }
        };
        Ok(effects)
    }

    pub fn toggle_gas_source(&mut self, gas: GasSource, now: DateTime<Utc>) -> Effects {
        let mut effects = Effects::default();
        let previous = self.active_gas.take();
        if let Some(previous) = previous {
            self.append(&mut effects, previous.name(), "Gas bottle closed", Some("CLOSED"), now);
        }
        if previous != Some(gas) {
            self.active_gas = Some(gas);
            self.append(&mut effects, gas.name(), "Gas bottle opened", Some("OPEN"), now);
        }
        effects
    }

    pub fn close_all_valves(&mut self, now: DateTime<Utc>) -> Effects {
        let open = self.valves.open_count();
        if open == 0 {
            return Effects::default();
        }
        self.valves.close_all();
        self.single(SYSTEM_COMPONENT, &format!("Closed all valves ({open})"), Some("CLOSED"), now)
    }

    pub fn set_instrument_field(
        &mut self,
        command: InstrumentCommand,
        now: DateTime<Utc>,
    ) -> Effects {
        let instruments = &mut self.instruments;
        match command {
            InstrumentCommand::Toggle(switch) => {
                let slot = instruments.switch_slot(switch);
                *slot = !*slot;
                let on = *slot;
                if switch == Switch::Mfc && !on {
                    instruments.mfc_value.clear();
                }
                self.single(switch.component(), on_off(on), Some(on_off(on)), now)
            }
            InstrumentCommand::ToggleKuehlfalle => {
                instruments.kuehlfalle = !instruments.kuehlfalle;
                let action = if instruments.kuehlfalle { "ja" } else { "nein" };
                self.single("Kühlfalle", action, None, now)
            }
            InstrumentCommand::ToggleHeatingWire(zone) => {
                let slot = instruments.heating_wires.slot(zone);
                *slot = !*slot;
                let on = *slot;
                let component = format!("Heizdrähte {}", zone.name());
                self.single(&component, on_off(on), Some(on_off(on)), now)
            }
            InstrumentCommand::ToggleHeatingWirePanel => {
                instruments.show_heating_wires = !instruments.show_heating_wires;
                Effects::default()
            }
            InstrumentCommand::ToggleProbePosition => {
                let target = instruments.probe_position.toggled();
                if target == ProbePosition::Cryo
                    && instruments.cryo_routing == CryoRouting::Spektrometer
                {
                    self.pending = Some(Confirmation::ProbeIntoCryo);
                    return Effects::default();
                }
                self.move_probe(target, now)
            }
            InstrumentCommand::ToggleCryoRouting => {
                let target = instruments.cryo_routing.toggled();
                if target == CryoRouting::Spektrometer
                    && instruments.probe_position == ProbePosition::Cryo
                {
                    self.pending = Some(Confirmation::CryoToSpectrometer);
                    return Effects::default();
                }
                self.route_cryo(target, now)
            }
            InstrumentCommand::ToggleSpectrometerFill => {
                instruments.spectrometer_fill = instruments.spectrometer_fill.toggled();
                let action = instruments.spectrometer_fill.log_action();
                self.single("Spektrometer", action, None, now)
            }
            InstrumentCommand::SetMfcValue(value) => {
                instruments.mfc_value = value;
                Effects::default()
            }
            InstrumentCommand::SubmitMfcValue => {
                let value = instruments.mfc_value.trim().to_string();
                if value.is_empty() {
                    return Effects::default();
                }
                self.single(Switch::Mfc.component(), &value, None, now)
            }
            InstrumentCommand::SetPressure(gauge, value) => {
                *instruments.pressures.slot(gauge) = value;
                Effects::default()
            }
            InstrumentCommand::SubmitPressure(gauge) => {
                let value = instruments.pressures.get(gauge);
                if value.trim().is_empty() {
                    return Effects::default();
                }
                let rendered = if gauge.is_scientific() {
                    format_scientific(value)
                } else {
                    value.to_string()
                };
                self.single(gauge.label(), &format!("{rendered} mbar"), None, now)
            }
            InstrumentCommand::SetTemperature(probe, value) => {
                *instruments.temperatures.slot(probe) = value;
                Effects::default()
            }
            InstrumentCommand::SubmitTemperature(probe) => {
                let value = instruments.temperatures.get(probe);
                if value.trim().is_empty() {
                    return Effects::default();
                }
                let action = format!("{} {}", value, probe.unit());
                self.single(probe.component(), &action, None, now)
            }
        }
    }

    fn move_probe(&mut self, target: ProbePosition, now: DateTime<Utc>) -> Effects {
        self.instruments.probe_position = target;
        let effects = self.single("Schliffchen", target.log_action(), None, now);
        if self.instruments.tec_on {
            self.pending = Some(Confirmation::TecRestart);
        }
        effects
    }

    fn route_cryo(&mut self, target: CryoRouting, now: DateTime<Utc>) -> Effects {
        self.instruments.cryo_routing = target;
        self.single("Cryo", target.log_action(), None, now)
    }

    /// Answers the pending confirmation. Declining leaves state and log untouched.
    pub fn confirm(&mut self, accepted: bool, now: DateTime<Utc>) -> Result<Effects, PanelError> {
        let pending = self.pending.take().ok_or(PanelError::NoPendingConfirmation)?;
        if !accepted {
            return Ok(Effects::default());
        }
        Ok(match pending {
            Confirmation::ProbeIntoCryo => self.move_probe(ProbePosition::Cryo, now),
            Confirmation::CryoToSpectrometer => self.route_cryo(CryoRouting::Spektrometer, now),
            Confirmation::TecRestart => {
                self.single(Switch::Tec.component(), "restarted", None, now)
            }
        })
    }

    pub fn submit_measurement(&mut self, measurement: Measurement, now: DateTime<Utc>) -> Effects {
        self.measurement_count = self.measurement_count.saturating_add(1);
        let Measurement { file_name, amplitude, position } = measurement;
        let component = format!("Messung {}", self.measurement_count);
        let action =
            format!("Dateiname: {file_name}, Amplitude: {amplitude}, Position: {position}");
        self.single(&component, &action, None, now)
    }

    pub fn add_note(&mut self, note: &str, now: DateTime<Utc>) -> Effects {
        let note = note.trim();
        if note.is_empty() {
            return Effects::default();
        }
        self.single(USER_COMPONENT, note, None, now)
    }

    pub fn clear_log(&mut self, now: DateTime<Utc>) -> Effects {
        self.log.clear();
        self.measurement_count = 0;
        let mut effects = self.single(SYSTEM_COMPONENT, "Logs cleared", None, now);
        effects.truncate_log_file = true;
        effects
    }

    pub fn log_system(&mut self, action: impl Into<String>, now: DateTime<Utc>) -> Effects {
        self.single(SYSTEM_COMPONENT, &action.into(), None, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valves::{THREE_WAY_VALVES, VALVE_LINKS, all_valves};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn apply(store: &mut PanelStore, command: PanelCommand) -> Effects {
        store.apply(command, now()).unwrap()
    }

    fn instrument(store: &mut PanelStore, command: InstrumentCommand) -> Effects {
        apply(store, PanelCommand::Instrument(command))
    }

    fn texts(effects: &Effects) -> Vec<String> {
        effects
            .appended
            .iter()
            .map(|entry| match &entry.state {
                Some(state) => format!("{}: {} ({})", entry.component, entry.action, state),
                None => format!("{}: {}", entry.component, entry.action),
            })
            .collect()
    }

    #[test]
    fn toggling_twice_restores_every_valve() {
        for valve in all_valves() {
            let mut store = PanelStore::default();
            let before = store.valves.clone();

            let first = apply(&mut store, PanelCommand::ToggleValve(valve.id.to_string()));
            let second = apply(&mut store, PanelCommand::ToggleValve(valve.id.to_string()));

            assert_eq!(store.valves, before, "{}", valve.id);
            assert_eq!(store.log.len(), 2);
            assert_ne!(first.appended[0].state, second.appended[0].state);
        }
    }

    #[test]
    fn two_way_valve_logs_ventil() {
        let mut store = PanelStore::default();
        let effects = apply(&mut store, PanelCommand::ToggleValve("VacR".into()));
        assert!(store.valves.is_open("VacR"));
        assert_eq!(texts(&effects), ["VacR Ventil: OPENED (OPEN)"]);
    }

    #[test]
    fn linked_valves_switch_together_and_groups_are_independent() {
        let mut store = PanelStore::default();
        let effects = apply(&mut store, PanelCommand::ToggleValve("V25".into()));

        assert!(store.valves.is_open("V24") && store.valves.is_open("V25"));
        assert!(!store.valves.is_open("V23") && !store.valves.is_open("V26"));
        assert_eq!(texts(&effects), ["Turbo Cryo: in (IN)"]);

        let effects = apply(&mut store, PanelCommand::ToggleValve("V26".into()));
        assert_eq!(texts(&effects), ["Turbo: in (IN)"]);

        for link in VALVE_LINKS {
            let [a, b] = link.members;
            assert_eq!(store.valves.is_open(a), store.valves.is_open(b));
        }
        assert_eq!(THREE_WAY_VALVES.iter().filter(|v| store.valves.is_open(v.id)).count(), 4);
    }

    #[test]
    fn unknown_valve_is_rejected_without_change() {
        let mut store = PanelStore::default();
        let before = store.clone();
        let result = store.apply(PanelCommand::ToggleValve("V99".into()), now());
        assert_eq!(result, Err(PanelError::UnknownValve("V99".into())));
        assert_eq!(store, before);
    }

    #[test]
    fn switching_gas_closes_previous_first() {
        let mut store = PanelStore::default();
        apply(&mut store, PanelCommand::ToggleGasSource("Neon".into()));
        let effects = apply(&mut store, PanelCommand::ToggleGasSource("Argon".into()));

        assert_eq!(store.active_gas, Some(GasSource::Argon));
        assert_eq!(
            texts(&effects),
            [
                "Neon: Gas bottle closed (CLOSED)",
                "Argon: Gas bottle opened (OPEN)",
            ]
        );

        let effects = apply(&mut store, PanelCommand::ToggleGasSource("Argon".into()));
        assert_eq!(store.active_gas, None);
        assert_eq!(texts(&effects), ["Argon: Gas bottle closed (CLOSED)"]);
    }

    #[test]
    fn unknown_gas_source_is_rejected() {
        let mut store = PanelStore::default();
        let result = store.apply(PanelCommand::ToggleGasSource("Xenon".into()), now());
        assert_eq!(result, Err(PanelError::UnknownGasSource("Xenon".into())));
        assert!(store.log.is_empty());
    }

    #[test]
    fn close_all_is_idempotent() {
        let mut store = PanelStore::default();
        apply(&mut store, PanelCommand::ToggleValve("CH1".into()));
        apply(&mut store, PanelCommand::ToggleValve("V23".into()));

        let first = apply(&mut store, PanelCommand::CloseAllValves);
        let second = apply(&mut store, PanelCommand::CloseAllValves);

        assert_eq!(texts(&first), ["System: Closed all valves (3) (CLOSED)"]);
        assert!(second.appended.is_empty());
        assert_eq!(store.valves.open_count(), 0);
    }

    #[test]
    fn declining_probe_warning_changes_nothing() {
        let mut store = PanelStore::default();
        instrument(&mut store, InstrumentCommand::ToggleProbePosition);
        assert_eq!(store.instruments.probe_position, ProbePosition::Schleuse);
        let before = store.clone();

        let effects = instrument(&mut store, InstrumentCommand::ToggleProbePosition);
        assert!(effects.appended.is_empty());
        assert_eq!(store.pending, Some(Confirmation::ProbeIntoCryo));
        assert_eq!(store.instruments.probe_position, ProbePosition::Schleuse);

        apply(&mut store, PanelCommand::Confirm(false));
        assert_eq!(store, before);
    }

    #[test]
    fn accepting_probe_warning_moves_probe() {
        let mut store = PanelStore::default();
        store.instruments.probe_position = ProbePosition::Schleuse;

        instrument(&mut store, InstrumentCommand::ToggleProbePosition);
        let effects = apply(&mut store, PanelCommand::Confirm(true));

        assert_eq!(store.instruments.probe_position, ProbePosition::Cryo);
        assert_eq!(texts(&effects), ["Schliffchen: in Cryo"]);
        assert_eq!(store.pending, None);
    }

    #[test]
    fn cryo_routing_to_spectrometer_needs_confirmation() {
        let mut store = PanelStore::default();
        instrument(&mut store, InstrumentCommand::ToggleCryoRouting);
        assert_eq!(store.instruments.cryo_routing, CryoRouting::Schleuse);

        instrument(&mut store, InstrumentCommand::ToggleCryoRouting);
        assert_eq!(store.pending, Some(Confirmation::CryoToSpectrometer));

        let effects = apply(&mut store, PanelCommand::Confirm(true));
        assert_eq!(store.instruments.cryo_routing, CryoRouting::Spektrometer);
        assert_eq!(texts(&effects), ["Cryo: Zum Spektrometer"]);
    }

    #[test]
    fn probe_move_with_tec_on_offers_restart() {
        let mut store = PanelStore::default();
        instrument(&mut store, InstrumentCommand::Toggle(Switch::Tec));
        instrument(&mut store, InstrumentCommand::ToggleProbePosition);
        assert_eq!(store.pending, Some(Confirmation::TecRestart));

        let effects = apply(&mut store, PanelCommand::Confirm(true));
        assert_eq!(texts(&effects), ["TEC: restarted"]);
    }

    #[test]
    fn pending_confirmation_blocks_other_commands() {
        let mut store = PanelStore::default();
        store.instruments.probe_position = ProbePosition::Schleuse;
        instrument(&mut store, InstrumentCommand::ToggleProbePosition);
        let before = store.clone();

        let result = store.apply(PanelCommand::ToggleValve("VacR".into()), now());
        assert!(matches!(result, Err(PanelError::ConfirmationPending(_))));
        let toggle_routing = PanelCommand::Instrument(InstrumentCommand::ToggleCryoRouting);
        let result = store.apply(toggle_routing, now());
        assert!(matches!(result, Err(PanelError::ConfirmationPending(_))));
        assert_eq!(store, before);

        assert_eq!(store.apply(PanelCommand::Confirm(false), now()), Ok(Effects::default()));
        assert_eq!(
            store.apply(PanelCommand::Confirm(true), now()),
            Err(PanelError::NoPendingConfirmation)
        );
    }

    #[test]
    fn switches_log_on_off_and_mfc_off_clears_set_point() {
        let mut store = PanelStore::default();
        instrument(&mut store, InstrumentCommand::Toggle(Switch::Mfc));
        instrument(&mut store, InstrumentCommand::SetMfcValue(" 12.5 ".into()));
        let submitted = instrument(&mut store, InstrumentCommand::SubmitMfcValue);
        assert_eq!(texts(&submitted), ["MFC: 12.5"]);

        let off = instrument(&mut store, InstrumentCommand::Toggle(Switch::Mfc));
        assert_eq!(texts(&off), ["MFC: OFF (OFF)"]);
        assert!(store.instruments.mfc_value.is_empty());

        let hv = instrument(&mut store, InstrumentCommand::Toggle(Switch::HighVoltage));
        assert_eq!(texts(&hv), ["HV: ON (ON)"]);
    }

    #[test]
    fn heating_wires_and_cold_trap() {
        let mut store = PanelStore::default();
        let zone = HeatingZone::MischanlageAbsauganlage;
        let wire = instrument(&mut store, InstrumentCommand::ToggleHeatingWire(zone));
        assert_eq!(
            texts(&wire),
            ["Heizdrähte Mischanlage + Absauganlage: ON (ON)"]
        );
        let trap = instrument(&mut store, InstrumentCommand::ToggleKuehlfalle);
        assert_eq!(texts(&trap), ["Kühlfalle: ja"]);
        let panel = instrument(&mut store, InstrumentCommand::ToggleHeatingWirePanel);
        assert!(panel.appended.is_empty());
        assert!(store.instruments.show_heating_wires);
    }

    #[test]
    fn readings_are_logged_on_submit_only() {
        let mut store = PanelStore::default();
        instrument(&mut store, InstrumentCommand::SetPressure(PressureGauge::T3, "2e-6".into()));
        instrument(&mut store, InstrumentCommand::SetPressure(PressureGauge::Ch1, "850".into()));
        let set_tec = InstrumentCommand::SetTemperature(TemperatureProbe::Tec, "-20".into());
        instrument(&mut store, set_tec);
        assert!(store.log.is_empty());

        let t3 = instrument(&mut store, InstrumentCommand::SubmitPressure(PressureGauge::T3));
        let ch1 = instrument(&mut store, InstrumentCommand::SubmitPressure(PressureGauge::Ch1));
        let tec =
            instrument(&mut store, InstrumentCommand::SubmitTemperature(TemperatureProbe::Tec));
        let blank =
            instrument(&mut store, InstrumentCommand::SubmitTemperature(TemperatureProbe::CryoT1));

        assert_eq!(texts(&t3), ["T3: 2 × 10⁻⁶ mbar"]);
        assert_eq!(texts(&ch1), ["CH1: 850 mbar"]);
        assert_eq!(texts(&tec), ["TEC Temp: -20 °C"]);
        assert!(blank.appended.is_empty());
    }

    #[test]
    fn measurements_count_up_and_reset_on_clear() {
        let mut store = PanelStore::default();
        let measurement = Measurement {
            file_name: "run.dat".into(),
            amplitude: "3".into(),
            position: "12".into(),
        };
        apply(&mut store, PanelCommand::SubmitMeasurement(measurement.clone()));
        let second = apply(&mut store, PanelCommand::SubmitMeasurement(measurement));
        assert_eq!(
            texts(&second),
            ["Messung 2: Dateiname: run.dat, Amplitude: 3, Position: 12"]
        );

        let cleared = apply(&mut store, PanelCommand::ClearLog);
        assert!(cleared.truncate_log_file);
        assert_eq!(store.measurement_count, 0);
        assert_eq!(texts(&cleared), ["System: Logs cleared"]);
        assert_eq!(store.log.len(), 1);
    }

    #[test]
    fn visual_state_ignores_readings_and_log_activity() {
        let mut store = PanelStore::default();
        let before = store.visual_state();

        let typing = InstrumentCommand::SetPressure(PressureGauge::T1, "2e-6".into());
        instrument(&mut store, typing);
        instrument(&mut store, InstrumentCommand::SubmitPressure(PressureGauge::T1));
        apply(&mut store, PanelCommand::AddNote("pump warm".into()));
        assert_eq!(store.visual_state(), before);

        apply(&mut store, PanelCommand::ToggleValve("VacR".into()));
        assert_ne!(store.visual_state(), before);
    }

    #[test]
    fn system_events_are_mirrored_to_the_log_file() {
        let mut store = PanelStore::default();
        let loaded = apply(&mut store, PanelCommand::LogSystem("Schematic loaded".into()));
        assert!(!loaded.truncate_log_file);
        assert_eq!(texts(&loaded), ["System: Schematic loaded"]);
        assert_eq!(loaded.appended[0].to_record().component, "System");
    }

    #[test]
    fn notes_and_deletes() {
        let mut store = PanelStore::default();
        assert!(apply(&mut store, PanelCommand::AddNote("   ".into())).appended.is_empty());
        let note = apply(&mut store, PanelCommand::AddNote(" pump warm ".into()));
        assert_eq!(texts(&note), ["User: pump warm"]);

        apply(&mut store, PanelCommand::DeleteLogEntry(note.appended[0].id));
        assert!(store.log.is_empty());
    }
}
