//! Persisted copy of the panel state kept in browser storage.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::activity_log::{ActivityLog, LogEntry, LogId};
use crate::error::SnapshotError;
use crate::gas::GasSource;
use crate::instruments::{
    CryoRouting, HeatingWires, InstrumentState, PressureReadings, ProbePosition, SpectrometerFill,
    TemperatureReadings,
};
use crate::store::PanelStore;
use crate::valves::ValveStates;
use crate::view::{DEFAULT_LEFT_PANEL_WIDTH, DEFAULT_RIGHT_PANEL_WIDTH, PanelWidths};

pub const STORAGE_KEY: &str = "valve-schematic-state";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub valve_states: BTreeMap<String, bool>,
    pub probe_position: ProbePosition,
    pub cryo_direction: CryoRouting,
    pub spektrometer_state: SpectrometerFill,
    pub active_gas_source: Option<GasSource>,
    pub tec_on: bool,
    pub kuehlfalle: bool,
    pub mfc_on: bool,
    pub mfc_value: String,
    pub cryo_on: bool,
    pub heater_on: bool,
    pub hv_on: bool,
    pub heater_temp1: String,
    pub cryo_temp1: String,
    pub cryo_temp2: String,
    pub tec_temp: String,
    #[serde(rename = "pressureCH1")]
    pub pressure_ch1: String,
    #[serde(rename = "pressureCH2")]
    pub pressure_ch2: String,
    #[serde(rename = "pressureT1")]
    pub pressure_t1: String,
    #[serde(rename = "pressureT2")]
    pub pressure_t2: String,
    #[serde(rename = "pressureT3")]
    pub pressure_t3: String,
    #[serde(rename = "pressureT4")]
    pub pressure_t4: String,
    #[serde(rename = "pressureT5")]
    pub pressure_t5: String,
    pub heizdraehte_flow: bool,
    pub heizdraehte_tank: bool,
    pub heizdraehte_pumpe: bool,
    pub heizdraehte_misch_proben: bool,
    pub heizdraehte_misch_absaug: bool,
    pub heizdraehte_abpump: bool,
    pub left_sidebar_width: f64,
    pub right_sidebar_width: f64,
    pub messung_count: u32,
    pub show_heizdraehte: bool,
    pub show_pipe_labels: bool,
    pub logs: Vec<LogEntry>,
    pub next_log_id: LogId,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self::from_store(&PanelStore::default())
    }
}

impl PersistedSnapshot {
    pub fn from_store(store: &PanelStore) -> Self {
        let instruments = &store.instruments;
        let wires = &instruments.heating_wires;
        let pressures = &instruments.pressures;
        let temperatures = &instruments.temperatures;
        Self {
            valve_states: store.valves.iter().map(|(id, open)| (id.to_string(), open)).collect(),
            probe_position: instruments.probe_position,
            cryo_direction: instruments.cryo_routing,
            spektrometer_state: instruments.spectrometer_fill,
            active_gas_source: store.active_gas,
            tec_on: instruments.tec_on,
            kuehlfalle: instruments.kuehlfalle,
            mfc_on: instruments.mfc_on,
            mfc_value: instruments.mfc_value.clone(),
            cryo_on: instruments.cryo_on,
            heater_on: instruments.heater_on,
            hv_on: instruments.hv_on,
            heater_temp1: temperatures.heater_t1.clone(),
            cryo_temp1: temperatures.cryo_t1.clone(),
            cryo_temp2: temperatures.cryo_t2.clone(),
            tec_temp: temperatures.tec.clone(),
            pressure_ch1: pressures.ch1.clone(),
            pressure_ch2: pressures.ch2.clone(),
            pressure_t1: pressures.t1.clone(),
            pressure_t2: pressures.t2.clone(),
            pressure_t3: pressures.t3.clone(),
            pressure_t4: pressures.t4.clone(),
            pressure_t5: pressures.t5.clone(),
            heizdraehte_flow: wires.flow,
            heizdraehte_tank: wires.tank,
            heizdraehte_pumpe: wires.pumpe,
            heizdraehte_misch_proben: wires.misch_proben,
            heizdraehte_misch_absaug: wires.misch_absaug,
            heizdraehte_abpump: wires.abpump,
            left_sidebar_width: store.panel_widths.left,
            right_sidebar_width: store.panel_widths.right,
            messung_count: store.measurement_count,
            show_heizdraehte: instruments.show_heating_wires,
            show_pipe_labels: store.pipe_labels,
            logs: store.log.entries().to_vec(),
            next_log_id: store.log.next_id(),
        }
    }

    pub fn into_store(self) -> PanelStore {
        PanelStore {
            valves: ValveStates::from_persisted(&self.valve_states),
            active_gas: self.active_gas_source,
            instruments: InstrumentState {
                tec_on: self.tec_on,
                cryo_on: self.cryo_on,
                heater_on: self.heater_on,
                mfc_on: self.mfc_on,
                mfc_value: self.mfc_value,
                hv_on: self.hv_on,
                kuehlfalle: self.kuehlfalle,
                heating_wires: HeatingWires {
                    flow: self.heizdraehte_flow,
                    tank: self.heizdraehte_tank,
                    pumpe: self.heizdraehte_pumpe,
                    misch_proben: self.heizdraehte_misch_proben,
                    misch_absaug: self.heizdraehte_misch_absaug,
                    abpump: self.heizdraehte_abpump,
                },
                show_heating_wires: self.show_heizdraehte,
                probe_position: self.probe_position,
                cryo_routing: self.cryo_direction,
                spectrometer_fill: self.spektrometer_state,
                pressures: PressureReadings {
                    ch1: self.pressure_ch1,
                    ch2: self.pressure_ch2,
                    t1: self.pressure_t1,
                    t2: self.pressure_t2,
                    t3: self.pressure_t3,
                    t4: self.pressure_t4,
                    t5: self.pressure_t5,
                },
                temperatures: TemperatureReadings {
                    heater_t1: self.heater_temp1,
                    cryo_t1: self.cryo_temp1,
                    cryo_t2: self.cryo_temp2,
                    tec: self.tec_temp,
                },
            },
            pipe_labels: self.show_pipe_labels,
            measurement_count: self.messung_count,
            panel_widths: PanelWidths {
                left: self.left_sidebar_width,
                right: self.right_sidebar_width,
            },
            log: ActivityLog::restore(self.logs, self.next_log_id),
            pending: None,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Lenient parse: every field that is missing or has the wrong shape keeps
    /// its default, and unreadable log entries are skipped.
    pub fn from_json(text: &str) -> Self {
        let defaults = Self::default();
        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) else {
            return defaults;
        };
        let fields = Fields(&object);

        let valve_states = match object.get("valveStates") {
            Some(Value::Object(states)) => states
                .iter()
                .filter_map(|(id, open)| open.as_bool().map(|open| (id.clone(), open)))
                .collect(),
            _ => defaults.valve_states,
        };
        let logs = match object.get("logs") {
            Some(Value::Array(entries)) => entries.iter().filter_map(log_entry).collect(),
            _ => defaults.logs,
        };

        Self {
            valve_states,
            probe_position: fields.get("probePosition", defaults.probe_position),
            cryo_direction: fields.get("cryoDirection", defaults.cryo_direction),
            spektrometer_state: fields.get("spektrometerState", defaults.spektrometer_state),
            active_gas_source: fields.get("activeGasSource", defaults.active_gas_source),
            tec_on: fields.get("tecOn", defaults.tec_on),
            kuehlfalle: fields.get("kuehlfalle", defaults.kuehlfalle),
            mfc_on: fields.get("mfcOn", defaults.mfc_on),
            mfc_value: fields.get("mfcValue", defaults.mfc_value),
            cryo_on: fields.get("cryoOn", defaults.cryo_on),
            heater_on: fields.get("heaterOn", defaults.heater_on),
            hv_on: fields.get("hvOn", defaults.hv_on),
            heater_temp1: fields.get("heaterTemp1", defaults.heater_temp1),
            cryo_temp1: fields.get("cryoTemp1", defaults.cryo_temp1),
            cryo_temp2: fields.get("cryoTemp2", defaults.cryo_temp2),
            tec_temp: fields.get("tecTemp", defaults.tec_temp),
            pressure_ch1: fields.get("pressureCH1", defaults.pressure_ch1),
            pressure_ch2: fields.get("pressureCH2", defaults.pressure_ch2),
            pressure_t1: fields.get("pressureT1", defaults.pressure_t1),
            pressure_t2: fields.get("pressureT2", defaults.pressure_t2),
            pressure_t3: fields.get("pressureT3", defaults.pressure_t3),
            pressure_t4: fields.get("pressureT4", defaults.pressure_t4),
            pressure_t5: fields.get("pressureT5", defaults.pressure_t5),
            heizdraehte_flow: fields.get("heizdraehteFlow", defaults.heizdraehte_flow),
            heizdraehte_tank: fields.get("heizdraehteTank", defaults.heizdraehte_tank),
            heizdraehte_pumpe: fields.get("heizdraehtePumpe", defaults.heizdraehte_pumpe),
            heizdraehte_misch_proben: fields
                .get("heizdraehteMischProben", defaults.heizdraehte_misch_proben),
            heizdraehte_misch_absaug: fields
                .get("heizdraehteMischAbsaug", defaults.heizdraehte_misch_absaug),
            heizdraehte_abpump: fields.get("heizdraehteAbpump", defaults.heizdraehte_abpump),
            left_sidebar_width: fields.get("leftSidebarWidth", DEFAULT_LEFT_PANEL_WIDTH),
            right_sidebar_width: fields.get("rightSidebarWidth", DEFAULT_RIGHT_PANEL_WIDTH),
            messung_count: fields.get("messungCount", defaults.messung_count),
            show_heizdraehte: fields.get("showHeizdraehte", defaults.show_heizdraehte),
            show_pipe_labels: fields.get("showPipeLabels", defaults.show_pipe_labels),
            logs,
            next_log_id: fields.get("nextLogId", defaults.next_log_id),
        }
    }
}

/// Entries whose id is a number but not a valid `LogId` (fractional ids
/// written by older panels) get a placeholder, which makes the restored log
/// renumber itself.
fn log_entry(entry: &Value) -> Option<LogEntry> {
    let mut entry = entry.clone();
    if let Some(id) = entry.get_mut("id").filter(|id| id.is_number() && !id.is_u64()) {
        *id = Value::from(LogId::MAX);
    }
    serde_json::from_value(entry).ok()
}

struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.0
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{HeatingZone, PressureGauge, Switch};
    use crate::store::{InstrumentCommand, Measurement, PanelCommand};
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn busy_store() -> PanelStore {
        let mut store = PanelStore::default();
        let commands = [
            PanelCommand::ToggleValve("VacR".into()),
            PanelCommand::ToggleValve("V24".into()),
            PanelCommand::ToggleGasSource("Krypton".into()),
            PanelCommand::Instrument(InstrumentCommand::Toggle(Switch::Cryo)),
            PanelCommand::Instrument(InstrumentCommand::ToggleHeatingWire(HeatingZone::Tank)),
            PanelCommand::Instrument(InstrumentCommand::ToggleProbePosition),
            PanelCommand::Instrument(InstrumentCommand::ToggleSpectrometerFill),
            PanelCommand::Instrument(InstrumentCommand::SetPressure(
                PressureGauge::T4,
                "3e-7".into(),
            )),
            PanelCommand::AddNote("checked seals".into()),
            PanelCommand::TogglePipeLabels,
            PanelCommand::SetPanelWidths(PanelWidths { left: 310.5, right: 420.0 }),
        ];
        for command in commands {
            store.apply(command, now()).unwrap();
        }
        let first = store.log.entries()[0].id;
        store.apply(PanelCommand::DeleteLogEntry(first), now()).unwrap();
        store
    }

    #[test]
    fn round_trip_reproduces_store() {
        let store = busy_store();
        let text = store.save_snapshot().unwrap();
        assert_eq!(PanelStore::load_snapshot(Some(&text)), store);
    }

    #[test]
    fn uses_persisted_field_names() {
        let text = busy_store().save_snapshot().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["probePosition"], "schleuse");
        assert_eq!(value["cryoDirection"], "spektrometer");
        assert_eq!(value["spektrometerState"], "n2");
        assert_eq!(value["activeGasSource"], "Krypton");
        assert_eq!(value["pressureT4"], "3e-7");
        assert_eq!(value["valveStates"]["V25"], true);
        assert_eq!(value["heizdraehteTank"], true);
        assert_eq!(value["showPipeLabels"], true);
    }

    #[test]
    fn missing_snapshot_gives_defaults() {
        assert_eq!(PanelStore::load_snapshot(None), PanelStore::default());
        assert_eq!(PanelStore::load_snapshot(Some("not json")), PanelStore::default());
        assert_eq!(PanelStore::load_snapshot(Some("[1, 2]")), PanelStore::default());
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let text = r#"{
            "valveStates": {"VacR": true, "CH2": "yes", "V99": true},
            "tecOn": "on",
            "hvOn": true,
            "probePosition": "somewhere",
            "activeGasSource": "Argon",
            "leftSidebarWidth": 280,
            "messungCount": -4,
            "pressureCH1": "900",
            "logs": [
                {"id": 7, "timestamp": "2024-03-01T10:00:00.000Z",
                 "component": "User", "action": "hi"},
                {"id": "x", "timestamp": "nope"},
                {"id": 9, "timestamp": "2024-03-01T10:00:01.000Z",
                 "component": "HV", "action": "ON", "state": "ON"}
            ]
        }"#;
        let store = PanelStore::load_snapshot(Some(text));

        assert!(store.valves.is_open("VacR"));
        assert!(!store.valves.is_open("CH2"));
        assert_eq!(store.valves.open_count(), 1);
        assert!(!store.instruments.tec_on);
        assert!(store.instruments.hv_on);
        assert_eq!(store.instruments.probe_position, ProbePosition::Cryo);
        assert_eq!(store.active_gas, Some(GasSource::Argon));
        assert_eq!(store.panel_widths.left, 280.0);
        assert_eq!(store.panel_widths.right, DEFAULT_RIGHT_PANEL_WIDTH);
        assert_eq!(store.measurement_count, 0);
        assert_eq!(store.instruments.pressures.ch1, "900");
        assert_eq!(store.log.len(), 2);
        assert_eq!(store.log.next_id(), 10);
    }

    fn snapshot_with_logs(ids: &[&str], next_log_id: &str) -> String {
        let logs: Vec<String> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| {
                format!(
                    r#"{{"id":{id},"timestamp":"2024-03-01T10:00:0{index}.000Z",
                        "component":"User","action":"note {index}"}}"#
                )
            })
            .collect();
        format!(r#"{{"logs":[{}],"nextLogId":{next_log_id}}}"#, logs.join(","))
    }

    fn ids(store: &PanelStore) -> Vec<LogId> {
        store.log.entries().iter().map(|entry| entry.id).collect()
    }

    #[test]
    fn largest_log_id_is_renumbered() {
        let text = snapshot_with_logs(&["3", "18446744073709551615"], "0");
        let mut store = PanelStore::load_snapshot(Some(&text));
        assert_eq!(ids(&store), [0, 1]);

        store.apply(PanelCommand::AddNote("after reload".into()), now()).unwrap();
        assert_eq!(ids(&store), [0, 1, 2]);
        store.apply(PanelCommand::DeleteLogEntry(1), now()).unwrap();
        assert_eq!(store.log.len(), 2);
    }

    #[test]
    fn exhausted_log_counter_keeps_ids_unique() {
        let text = snapshot_with_logs(&["5"], "18446744073709551615");
        let mut store = PanelStore::load_snapshot(Some(&text));
        store.apply(PanelCommand::AddNote("x".into()), now()).unwrap();
        store.apply(PanelCommand::AddNote("y".into()), now()).unwrap();
        assert_eq!(ids(&store), [0, 1, 2]);
    }

    #[test]
    fn measurement_counter_stops_at_its_maximum() {
        let mut store = PanelStore::load_snapshot(Some(r#"{"messungCount":4294967295}"#));
        store.apply(PanelCommand::SubmitMeasurement(Measurement::default()), now()).unwrap();
        assert_eq!(store.measurement_count, u32::MAX);
        assert_eq!(store.log.len(), 1);
    }

    #[test]
    fn fractional_log_ids_are_renumbered_in_order() {
        let ids_from_older_panel = ["1709287200000.123", "1709287200000.456", "1709287201000.9"];
        let text = snapshot_with_logs(&ids_from_older_panel, "0");
        let store = PanelStore::load_snapshot(Some(&text));
        assert_eq!(ids(&store), [0, 1, 2]);
        let actions: Vec<_> =
            store.log.entries().iter().map(|entry| entry.action.as_str()).collect();
        assert_eq!(actions, ["note 0", "note 1", "note 2"]);
        assert_eq!(store.log.next_id(), 3);
    }
}
