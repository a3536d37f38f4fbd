//! Background writer for the state slot
//!
//! Documents are queued on a channel and written by a single task, one at a
//! time and in submission order. Each write runs on the blocking pool so a
//! slow disk never stalls the async workers.

use super::slot::StateSlot;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum WriteCommand {
    Write(String),
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget handle for persisting documents
#[derive(Clone)]
pub struct SlotWriter {
    slot: Arc<dyn StateSlot>,
    queue: Option<mpsc::UnboundedSender<WriteCommand>>,
}

impl SlotWriter {
    /// Start a writer task on the current runtime
    ///
    /// Outside a runtime there is nothing to hand work to, so writes happen
    /// inline on the caller's thread.
    pub fn new(slot: Arc<dyn StateSlot>) -> Self {
        let queue = Handle::try_current().ok().map(|handle| {
            let (tx, rx) = mpsc::unbounded_channel();
            handle.spawn(run_writer(Arc::clone(&slot), rx));
            tx
        });

        Self { slot, queue }
    }

    /// Queue `document` for writing. Failures are logged, not returned.
    pub fn submit(&self, document: String) {
        match &self.queue {
            Some(queue) => {
                if queue.send(WriteCommand::Write(document)).is_err() {
                    warn!("State writer has stopped, dropping document");
                }
            }
            None => write_logged(self.slot.as_ref(), &document),
        }
    }

    /// Wait until every document submitted so far has been written
    pub async fn flush(&self) {
        let Some(queue) = &self.queue else {
            return;
        };

        let (done_tx, done_rx) = oneshot::channel();
        if queue.send(WriteCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run_writer(slot: Arc<dyn StateSlot>, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Write(document) => {
                let slot = Arc::clone(&slot);
                let written =
                    tokio::task::spawn_blocking(move || write_logged(slot.as_ref(), &document)).await;
                if let Err(e) = written {
                    warn!(error = %e, "State write task failed");
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("State writer stopped");
}

fn write_logged(slot: &dyn StateSlot, document: &str) {
    if let Err(e) = slot.write(document) {
        warn!(error = %e, "Failed to persist state");
    }
}
