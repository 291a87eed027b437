//! Valve catalog of the gas-handling schematic.
//!
//! Every valve is identified by its label and anchored in the diagram by the
//! exact `d` attribute of its SVG path. The catalog is fixed at compile time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveKind {
    #[serde(rename = "2-way")]
    TwoWay,
    #[serde(rename = "3-way")]
    ThreeWay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValveInfo {
    pub id: &'static str,
    pub path: &'static str,
    pub kind: ValveKind,
}

const fn two_way(id: &'static str, path: &'static str) -> ValveInfo {
    ValveInfo { id, path, kind: ValveKind::TwoWay }
}

const fn three_way(id: &'static str, path: &'static str) -> ValveInfo {
    ValveInfo { id, path, kind: ValveKind::ThreeWay }
}

pub const TWO_WAY_VALVES: &[ValveInfo] = &[
    two_way("VacR", "M 751 430 L 771 440 L 751 450 Z M 791 430 L 771 440 L 791 450 Z"),
    two_way("Neon", "M 741 470 L 761 480 L 741 490 Z M 781 470 L 761 480 L 781 490 Z"),
    two_way("Argon", "M 741 510 L 761 520 L 741 530 Z M 781 510 L 761 520 L 781 530 Z"),
    two_way("Krypton", "M 741 550 L 761 560 L 741 570 Z M 781 550 L 761 560 L 781 570 Z"),
    two_way("CH1", "M 701 380 L 721 390 L 701 400 Z M 741 380 L 721 390 L 741 400 Z"),
    two_way("RegR", "M 661 430 L 681 440 L 661 450 Z M 701 430 L 681 440 L 701 450 Z"),
    two_way("Flow", "M 541 550 L 561 560 L 541 570 Z M 581 550 L 561 560 L 581 570 Z"),
    two_way("Bypass", "M 261 580 L 281 590 L 261 600 Z M 301 580 L 281 590 L 301 600 Z"),
    two_way("nach MFC", "M 381 550 L 401 560 L 381 570 Z M 421 550 L 401 560 L 421 570 Z"),
    two_way(
        "Reg L",
        "M 621 365.05 L 641 375.05 L 621 385.05 Z M 661 365.05 L 641 375.05 L 661 385.05 Z",
    ),
    two_way("Mixing Tank", "M 501 340 L 521 350 L 501 360 Z M 541 340 L 521 350 L 541 360 Z"),
    two_way("Liquid/Gas Sample", "M 421 340 L 441 350 L 421 360 Z M 461 340 L 441 350 L 461 360 Z"),
    two_way("VacL", "M 621 280 L 641 290 L 621 300 Z M 661 280 L 641 290 L 661 300 Z"),
    two_way("CH2", "M 541 290 L 561 300 L 541 310 Z M 581 290 L 561 300 L 581 310 Z"),
    two_way("CryoR", "M 181 510 L 201 520 L 181 530 Z M 221 510 L 201 520 L 221 530 Z"),
    two_way("Abfuhr Cryo", "M 171 320 L 191 330 L 171 340 Z M 211 320 L 191 330 L 211 340 Z"),
    two_way(
        "Abfuhr Probe",
        "M 241 345.05 L 261 355.05 L 241 365.05 Z M 281 345.05 L 261 355.05 L 281 365.05 Z",
    ),
    two_way(
        "Absperrventil (T2 und Pumpen)",
        "M 361 247.48 L 381 257.48 L 361 267.48 Z M 401 247.48 L 381 257.48 L 401 267.48 Z",
    ),
    two_way("Schlauchanschluss", "M 301 300 L 321 310 L 301 320 Z M 341 300 L 321 310 L 341 320 Z"),
    two_way("T5 und T3", "M 501 190 L 521 200 L 501 210 Z M 541 190 L 521 200 L 541 210 Z"),
    two_way("Schleuse Probe", "M 231 480 L 251 490 L 231 500 Z M 271 480 L 251 490 L 271 500 Z"),
    two_way("CryoL", "M 101 510 L 121 520 L 101 530 Z M 141 510 L 121 520 L 141 530 Z"),
];

pub const THREE_WAY_VALVES: &[ValveInfo] = &[
    three_way(
        "V23",
        "M 361 110 L 381 117.5 L 361 125 Z M 401 110 L 381 117.5 L 401 125 Z M 381 117.5 L 393 130 L 369 130 Z",
    ),
    three_way(
        "V24",
        "M 171 110 L 191 117.5 L 171 125 Z M 211 110 L 191 117.5 L 211 125 Z M 191 117.5 L 203 130 L 179 130 Z",
    ),
    three_way(
        "V25",
        "M 171 200 L 191 207.5 L 171 215 Z M 211 200 L 191 207.5 L 211 215 Z M 191 207.5 L 203 220 L 179 220 Z",
    ),
    three_way(
        "V26",
        "M 361 44 L 381 51.5 L 361 59 Z M 401 44 L 381 51.5 L 401 59 Z M 381 51.5 L 393 64 L 369 64 Z",
    ),
];

/// A pair of three-way valves that always switch together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValveLink {
    /// Component name used in the activity log.
    pub name: &'static str,
    pub members: [&'static str; 2],
}

pub const VALVE_LINKS: &[ValveLink] = &[
    ValveLink { name: "Turbo Cryo", members: ["V24", "V25"] },
    ValveLink { name: "Turbo", members: ["V23", "V26"] },
];

pub fn all_valves() -> impl Iterator<Item = &'static ValveInfo> {
    TWO_WAY_VALVES.iter().chain(THREE_WAY_VALVES.iter())
}

pub fn find_valve(id: &str) -> Option<&'static ValveInfo> {
    all_valves().find(|valve| valve.id == id)
}

pub fn link_for(id: &str) -> Option<&'static ValveLink> {
    VALVE_LINKS.iter().find(|link| link.members.contains(&id))
}

/// Open/closed state of every declared valve, keyed by valve id.
///
/// Construction always covers the full catalog, so lookups by a declared id
/// never miss and undeclared ids never enter the map.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValveStates(BTreeMap<String, bool>);

impl Default for ValveStates {
    fn default() -> Self {
        Self(all_valves().map(|valve| (valve.id.to_string(), false)).collect())
    }
}

impl ValveStates {
    /// Builds states from persisted data, keeping declared valves only.
    pub fn from_persisted(persisted: &BTreeMap<String, bool>) -> Self {
        let mut states = Self::default();
        for (id, open) in persisted {
            if let Some(slot) = states.0.get_mut(id) {
                *slot = *open;
            }
        }
        states
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub(crate) fn set(&mut self, id: &str, open: bool) {
        if let Some(slot) = self.0.get_mut(id) {
            *slot = open;
        }
    }

    pub fn open_count(&self) -> usize {
        self.0.values().filter(|open| **open).count()
    }

    pub fn closed_count(&self) -> usize {
        self.0.len() - self.open_count()
    }

    pub(crate) fn close_all(&mut self) {
        self.0.values_mut().for_each(|open| *open = false);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(id, open)| (id.as_str(), *open))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = all_valves().map(|valve| valve.id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 26);
    }

    #[test]
    fn links_only_reference_three_way_valves() {
        for link in VALVE_LINKS {
            for member in link.members {
                let valve = find_valve(member).unwrap();
                assert_eq!(valve.kind, ValveKind::ThreeWay, "{member}");
            }
        }
    }

    #[test]
    fn persisted_states_drop_unknown_ids() {
        let mut persisted = BTreeMap::new();
        persisted.insert("Argon".to_string(), true);
        persisted.insert("V99".to_string(), true);

        let states = ValveStates::from_persisted(&persisted);

        assert!(states.is_open("Argon"));
        assert!(!states.is_open("V99"));
        assert_eq!(states.open_count(), 1);
        assert_eq!(states.iter().count(), 26);
    }
}
