//! Character persistence with automatic change history.
//!
//! Every save compares the incoming snapshot against the record on disk and
//! appends a [`HistoryEntry`] describing what changed. The store is the only
//! writer of a character's history once the record exists.

use super::files::{read_record, record_path, replace_file, scan_records, write_record};
use super::StoreError;
use crate::clock::Clock;
use crate::events::{EventSink, StoreEvent};
use crate::history::{render_history, ChangeDetector};
use crate::models::{Character, HistoryEntry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Directory name for character records under the data directory.
pub const CHARACTERS_DIR: &str = "character-sheets";

/// Note attached when a character is soft-deleted.
pub const DELETE_NOTE: &str = "Character deleted";

/// Note attached when a character is restored.
pub const RESTORE_NOTE: &str = "Character restored";

const KIND: &str = "character";

/// What was on disk before a save.
#[derive(Debug)]
pub enum PriorRecord {
    /// No record exists for this id.
    Absent,
    /// The record parsed cleanly.
    Loaded(Box<Character>),
    /// A record exists but could not be read or parsed.
    Unreadable(StoreError),
}

/// How a save related to the record already on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No record existed; the submitted history was kept.
    Created,
    /// The record on disk could not be read and was overwritten.
    Replaced,
    /// A history entry with these changes was appended.
    Changed(Vec<String>),
    /// Nothing differed from the stored record.
    Unchanged,
}

/// File-backed character store.
#[derive(Debug)]
pub struct CharacterStore {
    dir: PathBuf,
    detector: ChangeDetector,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    /// Serializes read-modify-write per id within this process.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CharacterStore {
    /// Create a store rooted at `dir`. The directory is not created here.
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>, events: Arc<dyn EventSink>) -> Self {
        Self {
            dir: dir.into(),
            detector: ChangeDetector::new(),
            clock,
            events,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for `id`.
    pub fn record_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        record_path(&self.dir, id)
    }

    /// Path of the exported history report for `id`.
    pub fn history_export_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        super::files::validate_id(id)?;
        Ok(self.dir.join(format!("{id}-history.txt")))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Load one character.
    pub async fn get(&self, id: &str) -> Result<Character, StoreError> {
        let path = self.record_path(id)?;
        read_record(&path, KIND, id).await
    }

    /// Load the record on disk for `id`, classifying failures.
    pub async fn load_prior(&self, id: &str) -> PriorRecord {
        match self.get(id).await {
            Ok(character) => PriorRecord::Loaded(Box::new(character)),
            Err(StoreError::NotFound { .. }) => PriorRecord::Absent,
            Err(e) => PriorRecord::Unreadable(e),
        }
    }

    /// All characters whose active flag equals `active`.
    ///
    /// Unparseable files are skipped. Order is whatever the filesystem returns.
    pub async fn list(&self, active: bool) -> Result<Vec<Character>, StoreError> {
        let characters: Vec<Character> = scan_records(&self.dir, self.events.as_ref()).await?;
        Ok(characters
            .into_iter()
            .filter(|c| c.is_active == active)
            .collect())
    }

    /// Live characters.
    pub async fn list_active(&self) -> Result<Vec<Character>, StoreError> {
        self.list(true).await
    }

    /// Soft-deleted characters.
    pub async fn list_deleted(&self) -> Result<Vec<Character>, StoreError> {
        self.list(false).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Save a complete snapshot, appending a history entry when it differs
    /// from the record on disk.
    ///
    /// The incoming snapshot's own history is discarded in favor of the
    /// stored one, except on the first save of an id. `note` is attached to
    /// the new entry and dropped when nothing changed. Returns the snapshot
    /// as persisted.
    pub async fn save(&self, incoming: Character, note: &str) -> Result<Character, StoreError> {
        let (character, _) = self.save_with_outcome(incoming, note).await?;
        Ok(character)
    }

    /// Like [`save`](Self::save), also reporting what the save did.
    pub async fn save_with_outcome(
        &self,
        incoming: Character,
        note: &str,
    ) -> Result<(Character, SaveOutcome), StoreError> {
        let _guard = self.lock_record(&incoming.id).await?;
        self.save_locked(incoming, note).await
    }

    /// Append a narrative entry with no changes, bypassing the detector.
    pub async fn add_history_note(&self, id: &str, note: &str) -> Result<Character, StoreError> {
        let _guard = self.lock_record(id).await?;
        let mut character = self.get(id).await?;

        character
            .history
            .push(HistoryEntry::new(self.clock.now(), Vec::new(), note));
        self.events.record(&StoreEvent::NoteAdded {
            id: id.to_string(),
            history_len: character.history.len(),
        });

        self.write(&character).await?;
        Ok(character)
    }

    /// Soft-delete a character.
    ///
    /// Goes through [`save`](Self::save). The active flag is not diffed, so
    /// this adds no history entry on its own.
    pub async fn delete(&self, id: &str) -> Result<Character, StoreError> {
        self.set_active(id, false, DELETE_NOTE).await
    }

    /// Restore a soft-deleted character.
    pub async fn restore(&self, id: &str) -> Result<Character, StoreError> {
        self.set_active(id, true, RESTORE_NOTE).await
    }

    /// Write the rendered history next to the record and return its path.
    pub async fn export_history(&self, id: &str) -> Result<PathBuf, StoreError> {
        let path = self.history_export_path(id)?;
        let character = self.get(id).await?;
        replace_file(&path, render_history(&character).as_bytes()).await?;
        Ok(path)
    }

    async fn set_active(&self, id: &str, active: bool, note: &str) -> Result<Character, StoreError> {
        let _guard = self.lock_record(id).await?;
        let mut character = self.get(id).await?;
        character.is_active = active;
        let (character, _) = self.save_locked(character, note).await?;
        Ok(character)
    }

    async fn save_locked(
        &self,
        mut incoming: Character,
        note: &str,
    ) -> Result<(Character, SaveOutcome), StoreError> {
        let id = incoming.id.clone();

        let outcome = match self.load_prior(&id).await {
            PriorRecord::Loaded(prior) => {
                let changes = self.detector.compare(&prior, &incoming);
                let mut history = prior.history;

                let outcome = if changes.is_empty() {
                    self.events.record(&StoreEvent::NoChanges {
                        id,
                        note_dropped: !note.is_empty(),
                    });
                    SaveOutcome::Unchanged
                } else {
                    history.push(HistoryEntry::new(self.clock.now(), changes.clone(), note));
                    self.events.record(&StoreEvent::HistoryAppended {
                        id,
                        changes: changes.clone(),
                        history_len: history.len(),
                    });
                    SaveOutcome::Changed(changes)
                };

                incoming.history = history;
                outcome
            }
            PriorRecord::Absent => {
                self.events.record(&StoreEvent::FirstSave { id });
                SaveOutcome::Created
            }
            PriorRecord::Unreadable(error) => {
                self.events.record(&StoreEvent::PriorUnreadable {
                    id,
                    error: error.to_string(),
                });
                SaveOutcome::Replaced
            }
        };

        self.write(&incoming).await?;
        Ok((incoming, outcome))
    }

    async fn write(&self, character: &Character) -> Result<(), StoreError> {
        let path = self.record_path(&character.id)?;
        write_record(&path, character).await?;
        self.events.record(&StoreEvent::RecordWritten { kind: KIND, path });
        Ok(())
    }

    async fn lock_record(&self, id: &str) -> Result<OwnedMutexGuard<()>, StoreError> {
        super::files::validate_id(id)?;
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries only the map refers to have no holder or waiter.
            locks.retain(|key, lock| key == id || Arc::strong_count(lock) > 1);
            locks.entry(id.to_string()).or_default().clone()
        };
        Ok(lock.lock_owned().await)
    }
}
