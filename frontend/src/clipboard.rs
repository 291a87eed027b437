use futures::StreamExt;
use wasm_bindgen_futures::spawn_local;

use crate::browser;
use crate::control_panel::ControlPanel;
use crate::dataflow::{Actor, Relay, relay};

/// Copies pipe geometry to the system clipboard and logs each successful copy.
#[derive(Clone)]
pub struct Clipboard {
    pub copy_requested_relay: Relay<String>,
    _writer: Actor<()>,
}

impl Clipboard {
    pub fn new(control_panel: ControlPanel) -> Self {
        let (copy_requested_relay, mut copy_requested_stream) = relay::<String>();

        let writer = Actor::new((), async move |_state| {
            while let Some(text) = copy_requested_stream.next().await {
                let control_panel = control_panel.clone();
                // Browser promises are not Send; run the write on the local executor.
                spawn_local(async move {
                    match browser::write_clipboard(&text).await {
                        Ok(()) => control_panel.log_system(format!("Copied: {text}")),
                        Err(error) => zoon::eprintln!("Clipboard error: {error}"),
                    }
                });
            }
        });

        Self { copy_requested_relay, _writer: writer }
    }
}
