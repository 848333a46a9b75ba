use std::sync::Arc;

use tokio::sync::oneshot;

use crate::flashcards::Card;

/// A full copy of the card collection at one store revision
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub cards: Arc<Vec<Card>>,
}

/// Messages understood by the write-through task
#[derive(Debug)]
pub enum WriterMessage {
    /// Replace the durable contents with this snapshot
    Snapshot(Snapshot),
    /// Reply once everything queued before this message is written
    Flush(oneshot::Sender<()>),
    /// Finish pending work and stop
    Shutdown,
}

/// Messages drained from the channel in one pass of the writer.
///
/// Only the newest snapshot is kept: each write replaces the whole store, so an
/// older snapshot queued behind a newer one never needs writing.
#[derive(Debug, Default)]
pub struct PendingWrites {
    latest: Option<Snapshot>,
    flushes: Vec<oneshot::Sender<()>>,
    shutdown: bool,
    coalesced: u64,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: WriterMessage) {
        match message {
            WriterMessage::Snapshot(snapshot) => {
                let replaced = match &self.latest {
                    Some(current) if current.revision > snapshot.revision => return,
                    Some(_) => true,
                    None => false,
                };
                if replaced {
                    self.coalesced += 1;
                }
                self.latest = Some(snapshot);
            }
            WriterMessage::Flush(reply) => self.flushes.push(reply),
            WriterMessage::Shutdown => self.shutdown = true,
        }
    }

    pub fn take_latest(&mut self) -> Option<Snapshot> {
        self.latest.take()
    }

    /// Number of snapshots dropped in favour of a newer one
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Wake every flush waiter collected in this pass
    pub fn complete_flushes(&mut self) {
        for reply in self.flushes.drain(..) {
            let _ = reply.send(());
        }
    }
}
