//! Right sidebar: the activity log with download, clear and free-text notes.

use shared::activity_log::download_file_name;
use shared::{LogEntry, LogId, PanelCommand, PanelStore};
use zoon::*;

use crate::browser;
use crate::control_panel::ControlPanel;
use crate::dataflow::Atom;
use crate::widgets::{NEUTRAL_COLOR, plain_button};

/// One rendered row: the entry plus the date label when it starts a new day.
#[derive(Clone, PartialEq)]
struct LogRow {
    entry: LogEntry,
    time: String,
    date: Option<String>,
}

fn log_rows(store: &PanelStore) -> Vec<LogRow> {
    let offset = browser::local_offset();
    let log = &store.log;
    log.entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| LogRow {
            entry: entry.clone(),
            time: entry.time_label(offset),
            date: log.starts_new_day(index, offset).then(|| entry.date_label(offset)),
        })
        .collect()
}

pub fn log_panel(control_panel: &ControlPanel) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Background::new().color("#ffffff"))
        .item(header(control_panel))
        .item(entries(control_panel))
        .item(note_form(control_panel))
}

fn header(control_panel: &ControlPanel) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(Padding::all(12))
        .s(Gap::new().x(6))
        .s(Borders::new().bottom(Border::new().width(1).color("#e2e8f0")))
        .item(
            El::new()
                .s(Width::fill())
                .s(Font::new().size(15).weight(FontWeight::SemiBold))
                .child("Activity Log"),
        )
        .item(plain_button("Download", "#bfdbfe", {
            let control_panel = control_panel.clone();
            move || download(&control_panel)
        }))
        .item(plain_button("Clear", "#fecaca", {
            let control_panel = control_panel.clone();
            move || control_panel.send(PanelCommand::ClearLog)
        }))
}

fn download(control_panel: &ControlPanel) {
    let text = control_panel.store.read(|store| store.log.render_download(browser::local_offset()));
    let file_name = download_file_name(browser::now());
    if let Err(error) = browser::download_text(&file_name, &text) {
        zoon::eprintln!("Failed to download {file_name}: {error}");
    }
}

fn entries(control_panel: &ControlPanel) -> impl Element {
    let delete_relay = control_panel.command_relay.clone();
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Padding::all(8))
        .s(Gap::new().y(6))
        .s(Scrollbars::y_and_clip_x())
        .items_signal_vec(
            control_panel
                .store
                .signal_ref(log_rows)
                .dedupe_cloned()
                .to_signal_vec()
                .map(move |row| {
                    let delete_relay = delete_relay.clone();
                    log_row(row, move |id| delete_relay.send(PanelCommand::DeleteLogEntry(id)))
                }),
        )
        .item_signal(
            control_panel
                .store
                .signal_ref(|store| store.log.is_empty())
                .map_true(|| {
                    El::new()
                        .s(Font::new().size(13).color("#94a3b8").center())
                        .child("No activity yet")
                }),
        )
}

fn row_colors(state: Option<&str>) -> (&'static str, &'static str) {
    match state {
        Some("OPEN") => ("#f0fdf4", "#bbf7d0"),
        Some("CLOSED") => ("#fef2f2", "#fecaca"),
        _ => ("#f8fafc", "#e2e8f0"),
    }
}

fn log_row(row: LogRow, on_delete: impl Fn(LogId) + 'static) -> impl Element {
    let (background, border) = row_colors(row.entry.state.as_deref());
    let id = row.entry.id;
    Column::new()
        .s(Width::fill())
        .s(Padding::all(8))
        .s(RoundedCorners::all(4))
        .s(Background::new().color(background))
        .s(Borders::all(Border::new().width(1).color(border)))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Gap::new().x(8))
                .s(Font::new().size(11).color("#64748b"))
                .item(El::new().child(row.time))
                .item(row.date.map(|date| El::new().child(date)))
                .item(
                    Button::new()
                        .s(Align::new().right())
                        .s(Padding::new().x(4))
                        .s(Font::new().color("#94a3b8"))
                        .update_raw_el(|raw_el| raw_el.attr("title", "Delete entry"))
                        .label("x")
                        .on_press(move || on_delete(id)),
                ),
        )
        .item(
            Paragraph::new()
                .s(Font::new().size(13))
                .content(
                    El::new()
                        .s(Font::new().weight(FontWeight::SemiBold))
                        .child(row.entry.component),
                )
                .content(format!(": {}", row.entry.action)),
        )
}

fn note_form(control_panel: &ControlPanel) -> impl Element {
    let note = Atom::new(String::new());
    let submit = {
        let note = note.clone();
        let control_panel = control_panel.clone();
        move || {
            let text = note.get_cloned();
            if !text.trim().is_empty() {
                control_panel.send(PanelCommand::AddNote(text));
                note.set(String::new());
            }
        }
    };

    Column::new()
        .s(Padding::all(12))
        .s(Gap::new().y(6))
        .s(Borders::new().top(Border::new().width(1).color("#e2e8f0")))
        .item(
            Row::new()
                .s(Gap::new().x(6))
                .item(
                    TextInput::new()
                        .s(Width::fill())
                        .s(Padding::new().x(8).y(6))
                        .s(Borders::all(Border::new().width(1).color("#cbd5e1")))
                        .s(RoundedCorners::all(4))
                        .label_hidden("Add note")
                        .placeholder(Placeholder::new("Add note..."))
                        .text_signal(note.signal())
                        .on_change({
                            let note = note.clone();
                            move |text| note.set(text)
                        })
                        .on_key_down_event({
                            let submit = submit.clone();
                            move |event| event.if_key(Key::Enter, || submit())
                        }),
                )
                .item(plain_button("Add", NEUTRAL_COLOR, submit)),
        )
        .item(
            El::new()
                .s(Font::new().size(11).color("#94a3b8"))
                .child_signal(
                    control_panel
                        .store
                        .signal_ref(|store| format!("{} log entries", store.log.len())),
                ),
        )
}
