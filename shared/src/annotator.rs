//! Rewrites the raw schematic SVG so it reflects the current panel state.
//!
//! The diagram is treated as opaque text. Valves are found by the exact `d`
//! geometry of their paths, gas bottles by the position attributes of their
//! rectangles, and labels by their literal text.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::gas::GasSource;
use crate::instruments::{CryoRouting, ProbePosition, SpectrometerFill};
use crate::valves::{ValveInfo, ValveStates, all_valves};

const OPEN_FILL: &str = "#22c55e";
const OPEN_STROKE: &str = "#16a34a";
const CLOSED_FILL: &str = "#ef4444";
const CLOSED_STROKE: &str = "#dc2626";
const IDLE_BOTTLE_FILL: &str = "#ffffff";

/// Labels that stay in the diagram for layout but are not shown.
const HIDDEN_LABELS: [&str; 5] = ["Bypass", "Flow", "RegR", "RegL", "Vacuum"];

/// Everything the annotated diagram depends on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualState {
    pub valves: ValveStates,
    pub active_gas: Option<GasSource>,
    pub probe_position: ProbePosition,
    pub cryo_routing: CryoRouting,
    pub spectrometer_fill: SpectrometerFill,
    pub pipe_labels: bool,
}

pub fn valve_colors(open: bool) -> (&'static str, &'static str) {
    if open { (OPEN_FILL, OPEN_STROKE) } else { (CLOSED_FILL, CLOSED_STROKE) }
}

pub fn annotate(raw: &str, state: &VisualState) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut svg = raw.to_string();

    for (valve, pattern) in valve_patterns() {
        svg = mark_valve(&svg, valve, pattern, state.valves.is_open(valve.id)).into_owned();
    }

    for label in HIDDEN_LABELS {
        svg = svg.replace(
            &format!(">{label}</div>"),
            &format!(r#"><span style="opacity:0;">{label}</span></div>"#),
        );
        for closing in ["</tspan>", "</text>"] {
            svg = svg.replace(
                &format!(">{label}{closing}"),
                &format!(r#"><tspan style="opacity:0;">{label}</tspan>{closing}"#),
            );
        }
    }

    svg = svg
        .replace(">Sample Tray<", &format!(">{}<", state.probe_position.label()))
        .replace(">Mirror in Cryostat<", &format!(">{}<", state.cryo_routing.label()))
        .replace(">Spectrometer<", &format!(">{}<", state.spectrometer_fill.label()));

    for (gas, pattern) in bottle_patterns() {
        let fill = if state.active_gas == Some(*gas) { gas.color() } else { IDLE_BOTTLE_FILL };
        let replacement = format!(
            r#"${{head}}data-gas-source="{gas}" style="fill: {fill}; stroke: #000000; stroke-width: 3; cursor: pointer;"${{tail}}"#
        );
        svg = pattern.replace_all(&svg, replacement.as_str()).into_owned();
    }

    if state.pipe_labels {
        svg = mark_pipes(&svg);
    }
    svg
}

fn mark_valve<'a>(svg: &'a str, valve: &ValveInfo, pattern: &Regex, open: bool) -> Cow<'a, str> {
    let (fill, stroke) = valve_colors(open);
    pattern.replace_all(svg, |caps: &Captures| {
        let before = strip_marking(&caps["before"]);
        let before = before.trim_end();
        let after = strip_marking(&caps["after"]);
        format!(
            r#"<path{before} data-valve-id="{id}" style="fill: {fill}; stroke: {stroke}; stroke-width: 2; cursor: pointer;" d="{path}"{after}{close}>"#,
            id = valve.id,
            path = valve.path,
            close = &caps["close"],
        )
    })
}

/// Drops attributes a valve path gets rewritten with.
fn strip_marking(attributes: &str) -> String {
    static STYLE: OnceLock<Regex> = OnceLock::new();
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let style =
        STYLE.get_or_init(|| Regex::new(r#"\s*style="[^"]*""#).expect("valid style regex"));
    let marker = MARKER
        .get_or_init(|| Regex::new(r#"\s*data-valve-id="[^"]*""#).expect("valid marker regex"));
    let without_style = style.replace_all(attributes, "");
    marker.replace_all(&without_style, "").into_owned()
}

/// Numbers every straight pipe segment `P1, P2, ...` in document order.
fn mark_pipes(svg: &str) -> String {
    static PIPE: OnceLock<Regex> = OnceLock::new();
    let pipe = PIPE.get_or_init(|| {
        Regex::new(
            r#"(?P<head><path[^>]*d=")(?P<geometry>M [0-9.]+ [0-9.]+ L [0-9.]+ [0-9.]+)(?P<middle>"[^>]*)style="(?P<style>[^"]*)"(?P<tail>[^>]*>)"#,
        )
        .expect("valid pipe regex")
    });

    let mut counter = 0;
    pipe.replace_all(svg, |caps: &Captures| {
        counter += 1;
        let style = caps["style"].trim_end();
        let separator = if style.is_empty() || style.ends_with(';') { "" } else { ";" };
        format!(
            r#"{head}{geometry}{middle}data-pipe-id="P{counter}" data-pipe-path="{geometry}" style="{style}{separator} cursor: pointer;"{tail}"#,
            head = &caps["head"],
            geometry = &caps["geometry"],
            middle = &caps["middle"],
            tail = &caps["tail"],
        )
    })
    .into_owned()
}

fn valve_patterns() -> &'static [(&'static ValveInfo, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static ValveInfo, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        all_valves()
            .map(|valve| {
                let pattern = format!(
                    r#"<path(?P<before>[^>]*?)d="{}"(?P<after>[^>]*?)(?P<close>/?)>"#,
                    regex::escape(valve.path)
                );
                (valve, Regex::new(&pattern).expect("escaped valve geometry"))
            })
            .collect()
    })
}

fn bottle_patterns() -> &'static [(GasSource, Regex)] {
    static PATTERNS: OnceLock<Vec<(GasSource, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        GasSource::ALL
            .into_iter()
            .map(|gas| {
                let pattern = format!(
                    r#"(?P<head><rect {}[^>]*)style="[^"]*"(?P<tail>[^>]*/>)"#,
                    regex::escape(gas.anchor())
                );
                (gas, Regex::new(&pattern).expect("escaped bottle anchor"))
            })
            .collect()
    })
}
