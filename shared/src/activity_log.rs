//! Append-only activity log.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub type LogId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: LogId,
    pub timestamp: DateTime<Utc>,
    pub component: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl LogEntry {
    /// Record submitted to the log file endpoint.
    pub fn to_record(&self) -> LogRecord {
        LogRecord {
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            component: self.component.clone(),
            action: self.action.clone(),
            state: self.state.clone(),
        }
    }

    /// `HH:MM:SS` in the given offset.
    pub fn time_label(&self, offset: FixedOffset) -> String {
        self.timestamp.with_timezone(&offset).format("%H:%M:%S").to_string()
    }

    /// `Jan 2, 2024` in the given offset.
    pub fn date_label(&self, offset: FixedOffset) -> String {
        self.timestamp.with_timezone(&offset).format("%b %-d, %Y").to_string()
    }
}

/// Wire form of a log entry as accepted by the log file endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// ISO-8601 timestamp.
    pub timestamp: String,
    pub component: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl LogRecord {
    /// `[timestamp] component: action (state)` followed by a newline.
    pub fn format_line(&self) -> String {
        let mut line = format_entry_text(
            &self.timestamp,
            &self.component,
            &self.action,
            self.state.as_deref(),
        );
        line.push('\n');
        line
    }
}

fn format_entry_text(time: &str, component: &str, action: &str, state: Option<&str>) -> String {
    match state.filter(|state| !state.is_empty()) {
        Some(state) => format!("[{time}] {component}: {action} ({state})"),
        None => format!("[{time}] {component}: {action}"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
    next_id: LogId,
}

impl ActivityLog {
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self::restore(entries, 0)
    }

    /// Rebuilds a log whose counter never falls behind the stored entries.
    ///
    /// Duplicate ids or an exhausted counter renumber the entries from zero,
    /// keeping their order.
    pub fn restore(entries: Vec<LogEntry>, next_id: LogId) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let unique = entries.iter().all(|entry| seen.insert(entry.id));
        let counter = entries.iter().try_fold(next_id, |counter, entry| {
            entry.id.checked_add(1).map(|after| counter.max(after))
        });

        let mut log = Self { entries, next_id: counter.unwrap_or(LogId::MAX) };
        if !unique || log.next_id == LogId::MAX {
            log.renumber();
        }
        log
    }

    fn renumber(&mut self) {
        for (id, entry) in (0..).zip(self.entries.iter_mut()) {
            entry.id = id;
        }
        self.next_id = self.entries.len() as LogId;
    }

    pub fn next_id(&self) -> LogId {
        self.next_id
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(
        &mut self,
        component: impl Into<String>,
        action: impl Into<String>,
        state: Option<&str>,
        now: DateTime<Utc>,
    ) -> LogEntry {
        if self.next_id == LogId::MAX {
            self.renumber();
        }
        let entry = LogEntry {
            id: self.next_id,
            timestamp: now,
            component: component.into(),
            action: action.into(),
            state: state.map(str::to_string),
        };
        self.next_id += 1;
        self.entries.push(entry.clone());
        entry
    }

    /// Removes one entry from memory. The log file keeps its line.
    pub fn delete(&mut self, id: LogId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Ids keep increasing across a clear so stale deletes never hit new entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether the entry at `index` starts a new calendar day in the listing.
    pub fn starts_new_day(&self, index: usize, offset: FixedOffset) -> bool {
        match index.checked_sub(1).and_then(|prev| self.entries.get(prev)) {
            None => true,
            Some(prev) => match self.entries.get(index) {
                Some(entry) => prev.date_label(offset) != entry.date_label(offset),
                None => false,
            },
        }
    }

    /// Text of the downloadable log file, one line per in-memory entry.
    pub fn render_download(&self, offset: FixedOffset) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let time = entry
                    .timestamp
                    .with_timezone(&offset)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string();
                format_entry_text(&time, &entry.component, &entry.action, entry.state.as_deref())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn download_file_name(now: DateTime<Utc>) -> String {
    format!("valve-log-{}.txt", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn line_omits_empty_state() {
        let mut record = LogRecord {
            timestamp: "2024-03-01T10:00:00.000Z".into(),
            component: "Argon".into(),
            action: "Gas bottle opened".into(),
            state: Some("OPEN".into()),
        };
        assert_eq!(
            record.format_line(),
            "[2024-03-01T10:00:00.000Z] Argon: Gas bottle opened (OPEN)\n"
        );

        record.state = Some(String::new());
        assert_eq!(record.format_line(), "[2024-03-01T10:00:00.000Z] Argon: Gas bottle opened\n");

        record.state = None;
        assert_eq!(record.format_line(), "[2024-03-01T10:00:00.000Z] Argon: Gas bottle opened\n");
    }

    #[test]
    fn record_timestamp_is_iso_with_millis() {
        let mut log = ActivityLog::default();
        let entry = log.append("System", "Schematic loaded", None, at(0));
        assert_eq!(entry.to_record().timestamp, "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn ids_are_unique_even_within_one_tick() {
        let mut log = ActivityLog::default();
        let a = log.append("A", "x", None, at(0));
        let b = log.append("B", "y", None, at(0));
        assert_ne!(a.id, b.id);
        assert_eq!(a.timestamp, b.timestamp);
        let components: Vec<_> = log.entries().iter().map(|e| e.component.as_str()).collect();
        assert_eq!(components, ["A", "B"]);
    }

    #[test]
    fn delete_removes_only_that_entry() {
        let mut log = ActivityLog::default();
        let a = log.append("A", "x", None, at(0));
        log.append("B", "y", None, at(1));

        assert!(log.delete(a.id));
        assert!(!log.delete(a.id));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].component, "B");
    }

    #[test]
    fn ids_continue_after_reload_and_clear() {
        let mut log = ActivityLog::default();
        log.append("A", "x", None, at(0));
        let last = log.append("B", "y", None, at(1));

        let mut reloaded = ActivityLog::from_entries(log.entries().to_vec());
        reloaded.clear();
        let next = reloaded.append("C", "z", None, at(2));
        assert!(next.id > last.id);
    }

    #[test]
    fn restore_renumbers_duplicate_ids_in_order() {
        let mut log = ActivityLog::default();
        let first = log.append("A", "x", None, at(0));
        let mut second = log.append("B", "y", None, at(1));
        second.id = first.id;

        let mut restored = ActivityLog::restore(vec![first, second], 0);
        let ids: Vec<_> = restored.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, [0, 1]);
        assert!(restored.delete(0));
        assert_eq!(restored.entries()[0].component, "B");
        assert_eq!(restored.append("C", "z", None, at(2)).id, 2);
    }

    #[test]
    fn download_lists_entries_in_order() {
        let mut log = ActivityLog::default();
        log.append("VacR Ventil", "OPENED", Some("OPEN"), at(0));
        log.append("User", "pump warm", None, at(61));

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            log.render_download(utc),
            "[2023-11-14 22:13:20] VacR Ventil: OPENED (OPEN)\n\
             [2023-11-14 22:14:21] User: pump warm"
        );
        assert_eq!(download_file_name(at(0)), "valve-log-2023-11-14.txt");
    }

    #[test]
    fn date_header_only_on_day_change() {
        let mut log = ActivityLog::default();
        log.append("A", "x", None, at(0));
        log.append("B", "y", None, at(60));
        log.append("C", "z", None, at(86_400));

        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(log.starts_new_day(0, utc));
        assert!(!log.starts_new_day(1, utc));
        assert!(log.starts_new_day(2, utc));
    }
}
