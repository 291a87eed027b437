use futures::StreamExt;
use shared::{DownMsg, Effects, UpMsg};
use zoon::*;

use crate::dataflow::{Actor, Relay, relay};

/// Actor+Relay compatible Connection adapter
pub struct ConnectionAdapter {
    connection: Connection<UpMsg, DownMsg>,
}

impl ConnectionAdapter {
    pub fn new() -> Self {
        let connection = Connection::new(|down_msg, _| handle_down_msg(down_msg));
        ConnectionAdapter { connection }
    }

    pub async fn send_up_msg(&self, up_msg: UpMsg) {
        if let Err(error) = self.connection.send_up_msg(up_msg).await {
            zoon::eprintln!("Failed to send message: {:?}", error);
        }
    }
}

/// Submissions are fire-and-forget; the backend only ever reports failures.
fn handle_down_msg(down_msg: DownMsg) {
    match down_msg {
        DownMsg::LogAppended | DownMsg::LogTruncated => {}
        DownMsg::LogFileError(error) => zoon::eprintln!("Log file: {error}"),
    }
}

/// Mirrors new activity log entries into the backend's log file.
///
/// Effects are sent strictly in arrival order, so a truncation always lands
/// before the entries logged after it.
#[derive(Clone)]
pub struct LogMirror {
    pub effects_relay: Relay<Effects>,
    _sender: Actor<()>,
}

impl LogMirror {
    pub fn new() -> Self {
        let (effects_relay, mut effects_stream) = relay::<Effects>();

        let sender = Actor::new((), async move |_state| {
            let connection = ConnectionAdapter::new();
            while let Some(effects) = effects_stream.next().await {
                for up_msg in up_msgs(effects) {
                    connection.send_up_msg(up_msg).await;
                }
            }
        });

        Self { effects_relay, _sender: sender }
    }

    pub fn submit(&self, effects: Effects) {
        if effects.truncate_log_file || !effects.appended.is_empty() {
            self.effects_relay.send(effects);
        }
    }
}

fn up_msgs(effects: Effects) -> Vec<UpMsg> {
    let truncate = effects.truncate_log_file.then_some(UpMsg::TruncateLog);
    truncate
        .into_iter()
        .chain(effects.appended.iter().map(|entry| UpMsg::AppendLog(entry.to_record())))
        .collect()
}
