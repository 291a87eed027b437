//! Auxiliary instruments around the valve network.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbePosition {
    #[default]
    Cryo,
    Schleuse,
}

impl ProbePosition {
    pub fn toggled(self) -> Self {
        match self {
            ProbePosition::Cryo => ProbePosition::Schleuse,
            ProbePosition::Schleuse => ProbePosition::Cryo,
        }
    }

    pub fn log_action(self) -> &'static str {
        match self {
            ProbePosition::Cryo => "in Cryo",
            ProbePosition::Schleuse => "in Schleuse",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProbePosition::Cryo => "Schliffchen in Cryo",
            ProbePosition::Schleuse => "Schliffchen in Schleuse",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CryoRouting {
    #[default]
    Spektrometer,
    Schleuse,
}

impl CryoRouting {
    pub fn toggled(self) -> Self {
        match self {
            CryoRouting::Spektrometer => CryoRouting::Schleuse,
            CryoRouting::Schleuse => CryoRouting::Spektrometer,
        }
    }

    pub fn log_action(self) -> &'static str {
        match self {
            CryoRouting::Spektrometer => "Zum Spektrometer",
            CryoRouting::Schleuse => "Zur Schleuse",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CryoRouting::Spektrometer => "Cryo zum Spektrometer",
            CryoRouting::Schleuse => "Cryo zur Schleuse",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpectrometerFill {
    #[default]
    Leer,
    N2,
}

impl SpectrometerFill {
    pub fn toggled(self) -> Self {
        match self {
            SpectrometerFill::Leer => SpectrometerFill::N2,
            SpectrometerFill::N2 => SpectrometerFill::Leer,
        }
    }

    pub fn log_action(self) -> &'static str {
        match self {
            SpectrometerFill::Leer => "Leer",
            SpectrometerFill::N2 => "N2 befüllt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpectrometerFill::Leer => "Spektrometer (leer)",
            SpectrometerFill::N2 => "Spektrometer (N2 befüllt)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    Tec,
    Cryo,
    CryoHeater,
    Mfc,
    HighVoltage,
}

impl Switch {
    pub fn component(self) -> &'static str {
        match self {
            Switch::Tec => "TEC",
            Switch::Cryo => "Cryo",
            Switch::CryoHeater => "Cryo Heater",
            Switch::Mfc => "MFC",
            Switch::HighVoltage => "HV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatingZone {
    Flow,
    Tank,
    Pumpe,
    MischanlageProbenleitung,
    MischanlageAbsauganlage,
    Abpumpleitungsschleuse,
}

impl HeatingZone {
    pub const ALL: [HeatingZone; 6] = [
        HeatingZone::Flow,
        HeatingZone::Tank,
        HeatingZone::Pumpe,
        HeatingZone::MischanlageProbenleitung,
        HeatingZone::MischanlageAbsauganlage,
        HeatingZone::Abpumpleitungsschleuse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeatingZone::Flow => "Flow",
            HeatingZone::Tank => "Tank",
            HeatingZone::Pumpe => "Pumpe",
            HeatingZone::MischanlageProbenleitung => "Mischanlage + Probenleitung",
            HeatingZone::MischanlageAbsauganlage => "Mischanlage + Absauganlage",
            HeatingZone::Abpumpleitungsschleuse => "Abpumpleitungsschleuse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureGauge {
    Ch1,
    Ch2,
    T1,
    T2,
    T3,
    T4,
    T5,
}

impl PressureGauge {
    pub const ALL: [PressureGauge; 7] = [
        PressureGauge::Ch1,
        PressureGauge::Ch2,
        PressureGauge::T1,
        PressureGauge::T2,
        PressureGauge::T3,
        PressureGauge::T4,
        PressureGauge::T5,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PressureGauge::Ch1 => "CH1",
            PressureGauge::Ch2 => "CH2",
            PressureGauge::T1 => "T1",
            PressureGauge::T2 => "T2",
            PressureGauge::T3 => "T3",
            PressureGauge::T4 => "T4",
            PressureGauge::T5 => "T5",
        }
    }

    /// Turbo gauges read in scientific notation.
    pub fn is_scientific(self) -> bool {
        !matches!(self, PressureGauge::Ch1 | PressureGauge::Ch2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureProbe {
    CryoHeater,
    CryoT1,
    CryoT2,
    Tec,
}

impl TemperatureProbe {
    pub fn component(self) -> &'static str {
        match self {
            TemperatureProbe::CryoHeater => "Cryo Heater",
            TemperatureProbe::CryoT1 => "Cryo T1",
            TemperatureProbe::CryoT2 => "Cryo T2",
            TemperatureProbe::Tec => "TEC Temp",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            TemperatureProbe::Tec => "°C",
            _ => "K",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeatingWires {
    pub flow: bool,
    pub tank: bool,
    pub pumpe: bool,
    pub misch_proben: bool,
    pub misch_absaug: bool,
    pub abpump: bool,
}

impl HeatingWires {
    pub fn get(&self, zone: HeatingZone) -> bool {
        match zone {
            HeatingZone::Flow => self.flow,
            HeatingZone::Tank => self.tank,
            HeatingZone::Pumpe => self.pumpe,
            HeatingZone::MischanlageProbenleitung => self.misch_proben,
            HeatingZone::MischanlageAbsauganlage => self.misch_absaug,
            HeatingZone::Abpumpleitungsschleuse => self.abpump,
        }
    }

    pub(crate) fn slot(&mut self, zone: HeatingZone) -> &mut bool {
        match zone {
            HeatingZone::Flow => &mut self.flow,
            HeatingZone::Tank => &mut self.tank,
            HeatingZone::Pumpe => &mut self.pumpe,
            HeatingZone::MischanlageProbenleitung => &mut self.misch_proben,
            HeatingZone::MischanlageAbsauganlage => &mut self.misch_absaug,
            HeatingZone::Abpumpleitungsschleuse => &mut self.abpump,
        }
    }
}

/// Pressure readings as typed by the operator (mbar).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressureReadings {
    pub ch1: String,
    pub ch2: String,
    pub t1: String,
    pub t2: String,
    pub t3: String,
    pub t4: String,
    pub t5: String,
}

impl PressureReadings {
    pub fn get(&self, gauge: PressureGauge) -> &str {
        match gauge {
            PressureGauge::Ch1 => &self.ch1,
            PressureGauge::Ch2 => &self.ch2,
            PressureGauge::T1 => &self.t1,
            PressureGauge::T2 => &self.t2,
            PressureGauge::T3 => &self.t3,
            PressureGauge::T4 => &self.t4,
            PressureGauge::T5 => &self.t5,
        }
    }

    pub(crate) fn slot(&mut self, gauge: PressureGauge) -> &mut String {
        match gauge {
            PressureGauge::Ch1 => &mut self.ch1,
            PressureGauge::Ch2 => &mut self.ch2,
            PressureGauge::T1 => &mut self.t1,
            PressureGauge::T2 => &mut self.t2,
            PressureGauge::T3 => &mut self.t3,
            PressureGauge::T4 => &mut self.t4,
            PressureGauge::T5 => &mut self.t5,
        }
    }
}

/// Temperature readings as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemperatureReadings {
    pub heater_t1: String,
    pub cryo_t1: String,
    pub cryo_t2: String,
    pub tec: String,
}

impl TemperatureReadings {
    pub fn get(&self, probe: TemperatureProbe) -> &str {
        match probe {
            TemperatureProbe::CryoHeater => &self.heater_t1,
            TemperatureProbe::CryoT1 => &self.cryo_t1,
            TemperatureProbe::CryoT2 => &self.cryo_t2,
            TemperatureProbe::Tec => &self.tec,
        }
    }

    pub(crate) fn slot(&mut self, probe: TemperatureProbe) -> &mut String {
        match probe {
            TemperatureProbe::CryoHeater => &mut self.heater_t1,
            TemperatureProbe::CryoT1 => &mut self.cryo_t1,
            TemperatureProbe::CryoT2 => &mut self.cryo_t2,
            TemperatureProbe::Tec => &mut self.tec,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentState {
    pub tec_on: bool,
    pub cryo_on: bool,
    pub heater_on: bool,
    pub mfc_on: bool,
    pub mfc_value: String,
    pub hv_on: bool,
    pub kuehlfalle: bool,
    pub heating_wires: HeatingWires,
    pub show_heating_wires: bool,
    pub probe_position: ProbePosition,
    pub cryo_routing: CryoRouting,
    pub spectrometer_fill: SpectrometerFill,
    pub pressures: PressureReadings,
    pub temperatures: TemperatureReadings,
}

impl InstrumentState {
    pub fn switch(&self, switch: Switch) -> bool {
        match switch {
            Switch::Tec => self.tec_on,
            Switch::Cryo => self.cryo_on,
            Switch::CryoHeater => self.heater_on,
            Switch::Mfc => self.mfc_on,
            Switch::HighVoltage => self.hv_on,
        }
    }

    pub(crate) fn switch_slot(&mut self, switch: Switch) -> &mut bool {
        match switch {
            Switch::Tec => &mut self.tec_on,
            Switch::Cryo => &mut self.cryo_on,
            Switch::CryoHeater => &mut self.heater_on,
            Switch::Mfc => &mut self.mfc_on,
            Switch::HighVoltage => &mut self.hv_on,
        }
    }
}

pub fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Renders a turbo gauge reading as `m × 10ⁿ` with a superscript exponent.
///
/// Input that does not parse as a finite number is returned unchanged.
pub fn format_scientific(value: &str) -> String {
    let Ok(number) = value.trim().parse::<f64>() else {
        return value.to_string();
    };
    if !number.is_finite() {
        return value.to_string();
    }
    let rendered = format!("{:e}", number);
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return value.to_string();
    };
    let mantissa = mantissa.parse::<f64>().unwrap_or(number);
    let exponent: String = exponent.chars().filter_map(superscript).collect();
    format!("{} × 10{}", mantissa, exponent)
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '-' => '⁻',
        '+' => return None,
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_uses_superscript_exponent() {
        assert_eq!(format_scientific("1.0e-5"), "1 × 10⁻⁵");
        assert_eq!(format_scientific("0.0025"), "2.5 × 10⁻³");
        assert_eq!(format_scientific("1234"), "1.234 × 10³");
    }

    #[test]
    fn scientific_leaves_garbage_alone() {
        assert_eq!(format_scientific("n/a"), "n/a");
        assert_eq!(format_scientific("inf"), "inf");
    }

    #[test]
    fn only_turbo_gauges_are_scientific() {
        let scientific: Vec<_> = PressureGauge::ALL
            .into_iter()
            .filter(|gauge| gauge.is_scientific())
            .map(PressureGauge::label)
            .collect();
        assert_eq!(scientific, ["T1", "T2", "T3", "T4", "T5"]);
    }
}
