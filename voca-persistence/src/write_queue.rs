use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::store::PersistentStore;

enum WriteCommand {
    Put { key: String, value: String },
    Flush(oneshot::Sender<usize>),
}

/// Write-behind queue in front of a `PersistentStore`.
///
/// A single writer task applies writes in submission order, so writes to the
/// same key never interleave. Only the newest value per key is kept while a
/// write is pending. Failed writes stay pending and are retried on the next
/// submission or flush.
#[derive(Clone)]
pub struct WriteQueue {
    sender: mpsc::UnboundedSender<WriteCommand>,
}

impl WriteQueue {
    /// Spawn the writer task on the current tokio runtime
    pub fn spawn(store: Arc<dyn PersistentStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, receiver));
        Self { sender }
    }

    /// Queue `value` for `key`. Never waits on the store.
    pub fn put(&self, key: impl Into<String>, value: String) {
        let key = key.into();
        if self.sender.send(WriteCommand::Put { key, value }).is_err() {
            warn!("Persistence writer has stopped; dropping write");
        }
    }

    /// Wait until everything queued so far has been attempted.
    /// Returns the number of keys still pending after failed writes.
    pub async fn flush(&self) -> Result<usize> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(WriteCommand::Flush(reply))
            .map_err(|_| anyhow!("Persistence writer has stopped"))?;
        response
            .await
            .map_err(|_| anyhow!("Persistence writer dropped flush request"))
    }
}

async fn run_writer(
    store: Arc<dyn PersistentStore>,
    mut receiver: mpsc::UnboundedReceiver<WriteCommand>,
) {
    let mut pending: BTreeMap<String, String> = BTreeMap::new();

    while let Some(command) = receiver.recv().await {
        match command {
            WriteCommand::Put { key, value } => {
                pending.insert(key, value);
                drain(store.as_ref(), &mut pending).await;
            }
            WriteCommand::Flush(reply) => {
                drain(store.as_ref(), &mut pending).await;
                let _ = reply.send(pending.len());
            }
        }
    }

    drain(store.as_ref(), &mut pending).await;
    if !pending.is_empty() {
        warn!("Persistence writer stopped with {} unsaved keys", pending.len());
    }
}

async fn drain(store: &dyn PersistentStore, pending: &mut BTreeMap<String, String>) {
    let keys: Vec<String> = pending.keys().cloned().collect();
    for key in keys {
        let Some(value) = pending.get(&key).cloned() else {
            continue;
        };
        match store.set(&key, value).await {
            Ok(()) => {
                pending.remove(&key);
                debug!("Persisted {}", key);
            }
            Err(e) => warn!("Failed to persist {} (will retry): {:#}", key, e),
        }
    }
}
