use serde::{Serialize, Deserialize};

pub mod activity_log;
pub mod annotator;
pub mod error;
pub mod gas;
pub mod instruments;
pub mod interaction;
pub mod snapshot;
pub mod store;
pub mod valves;
pub mod view;

pub use activity_log::{ActivityLog, LogEntry, LogId, LogRecord, download_file_name};
pub use annotator::{VisualState, annotate};
pub use error::{PanelError, SnapshotError};
pub use gas::GasSource;
pub use instruments::{
    CryoRouting, HeatingZone, InstrumentState, PressureGauge, ProbePosition, SpectrometerFill,
    Switch, TemperatureProbe, format_scientific,
};
pub use interaction::{Dispatch, HitMarkers, HoverState, InteractionDispatcher, PointerInput};
pub use snapshot::{PersistedSnapshot, STORAGE_KEY};
pub use store::{Confirmation, Effects, InstrumentCommand, Measurement, PanelCommand, PanelStore};
pub use valves::{THREE_WAY_VALVES, TWO_WAY_VALVES, ValveKind, ValveStates};
pub use view::{PanelSide, PanelWidths, ViewController, ViewTransform};

// ===== MESSAGE TYPES =====

#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    AppendLog(LogRecord),
    TruncateLog,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    LogAppended,
    LogTruncated,
    LogFileError(String),
}

// ===== ASSETS =====

/// Schematic served from the backend's public folder.
pub const SCHEMATIC_URL: &str = "/_api/public/schematic.svg";

/// REST endpoint mirroring `UpMsg::AppendLog` (POST) and `UpMsg::TruncateLog` (DELETE).
pub const LOG_ENDPOINT: &str = "/api/log";

/// JSON body returned by the log endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogResponse {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self { success: false, error: Some(error.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_response_json_shape() {
        assert_eq!(serde_json::to_string(&LogResponse::ok()).unwrap(), r#"{"success":true}"#);
        assert_eq!(
            serde_json::to_string(&LogResponse::failed("disk full")).unwrap(),
            r#"{"success":false,"error":"disk full"}"#
        );
    }

    #[test]
    fn log_record_accepts_missing_state() {
        let text = r#"{"timestamp":"2024-03-01T10:00:00.000Z","component":"User","action":"hi"}"#;
        let record: LogRecord = serde_json::from_str(text).unwrap();
        assert_eq!(record.state, None);
        assert_eq!(record.format_line(), "[2024-03-01T10:00:00.000Z] User: hi\n");
    }
}
