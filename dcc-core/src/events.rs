//! Diagnostics emitted by the stores.
//!
//! Stores report what they did through an [`EventSink`]. The default sink
//! forwards everything to `tracing`; tests swap in a recording sink.

use std::fmt::Debug;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Something a store did or noticed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A character save found no prior record for its id.
    FirstSave { id: String },

    /// A prior record exists but could not be read; the save proceeds as a
    /// first save and the old history is not carried forward.
    PriorUnreadable { id: String, error: String },

    /// A save detected changes and appended a history entry.
    HistoryAppended {
        id: String,
        changes: Vec<String>,
        history_len: usize,
    },

    /// A save detected no changes. Any note passed with it was dropped.
    NoChanges { id: String, note_dropped: bool },

    /// A free-form note was appended without a diff.
    NoteAdded { id: String, history_len: usize },

    /// A record file was written.
    RecordWritten { kind: &'static str, path: PathBuf },

    /// A listing skipped a file it could not read or parse.
    RecordSkipped { path: PathBuf, reason: String },
}

/// Receives store events.
pub trait EventSink: Debug + Send + Sync {
    fn record(&self, event: &StoreEvent);
}

/// Forwards store events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &StoreEvent) {
        match event {
            StoreEvent::FirstSave { id } => {
                debug!(%id, "no prior record, saving as new character");
            }
            StoreEvent::PriorUnreadable { id, error } => {
                warn!(%id, %error, "prior record unreadable, history not carried forward");
            }
            StoreEvent::HistoryAppended {
                id,
                changes,
                history_len,
            } => {
                info!(%id, changes = changes.len(), history_len, "history entry appended");
                for change in changes {
                    debug!(%id, "  {change}");
                }
            }
            StoreEvent::NoChanges { id, note_dropped } => {
                debug!(%id, note_dropped, "no changes detected, history unchanged");
            }
            StoreEvent::NoteAdded { id, history_len } => {
                info!(%id, history_len, "history note added");
            }
            StoreEvent::RecordWritten { kind, path } => {
                debug!(kind, path = %path.display(), "record written");
            }
            StoreEvent::RecordSkipped { path, reason } => {
                debug!(path = %path.display(), %reason, "skipping unreadable record");
            }
        }
    }
}
