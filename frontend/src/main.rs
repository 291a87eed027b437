//! Valve panel frontend entry point

use std::sync::OnceLock;
use zoon::*;

/// Stores the main application task handle to prevent it from being dropped.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod app;
mod browser;
mod clipboard;
mod connection;
mod control_panel;
mod dataflow;
mod schematic;
mod view_system;

mod dialogs;
mod instruments_panel;
mod log_panel;
mod widgets;

pub fn main() {
    let handle = Task::start_droppable(async {
        let app = crate::app::ValvePanelApp::new().await;
        let root_element = app.root();
        start_app("app", move || root_element);
    });
    let _ = MAIN_TASK.set(handle);
}
