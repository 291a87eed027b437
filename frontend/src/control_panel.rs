//! The panel's single state actor.
//!
//! Every operator action becomes a [`PanelCommand`] on `command_relay`. The
//! actor applies commands one at a time, persists the resulting snapshot and
//! hands new log entries to the [`LogMirror`].

use futures::StreamExt;
use shared::{PanelCommand, PanelStore, STORAGE_KEY, VisualState};
use zoon::*;

use crate::browser;
use crate::connection::LogMirror;
use crate::dataflow::{Actor, Relay, relay};

#[derive(Clone)]
pub struct ControlPanel {
    pub store: Actor<PanelStore>,
    pub command_relay: Relay<PanelCommand>,
}

impl ControlPanel {
    /// Restores the last snapshot from local storage and starts the actor.
    pub fn load(log_mirror: LogMirror) -> Self {
        let stored = browser::load_text(STORAGE_KEY);
        Self::new(PanelStore::load_snapshot(stored.as_deref()), log_mirror)
    }

    pub fn new(initial: PanelStore, log_mirror: LogMirror) -> Self {
        let (command_relay, mut command_stream) = relay::<PanelCommand>();

        let store = Actor::new(initial, async move |state| {
            while let Some(command) = command_stream.next().await {
                let result = state.lock_mut().apply(command, browser::now());
                match result {
                    Ok(effects) => {
                        save_snapshot(&state.lock_ref());
                        log_mirror.submit(effects);
                    }
                    Err(error) => zoon::eprintln!("Command rejected: {error}"),
                }
            }
        });

        Self { store, command_relay }
    }

    pub fn send(&self, command: PanelCommand) {
        self.command_relay.send(command);
    }

    pub fn log_system(&self, action: impl Into<String>) {
        self.send(PanelCommand::LogSystem(action.into()));
    }

    pub fn visual_state_signal(&self) -> impl Signal<Item = VisualState> + use<> {
        self.store.signal_ref(PanelStore::visual_state).dedupe_cloned()
    }

    pub fn pipe_labels_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.store.signal_ref(|store| store.pipe_labels)
    }
}

fn save_snapshot(store: &PanelStore) {
    let saved = store
        .save_snapshot()
        .map_err(|error| error.to_string())
        .and_then(|text| browser::store_text(STORAGE_KEY, &text));
    if let Err(error) = saved {
        zoon::eprintln!("Failed to persist panel state: {error}");
    }
}
