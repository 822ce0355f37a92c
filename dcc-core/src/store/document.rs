//! Plain JSON document stores for maps, parties and world notes.
//!
//! These records are read and written whole. There is no change history.

use super::files::{read_record, record_path, scan_records, write_record};
use super::StoreError;
use crate::clock::Clock;
use crate::events::{EventSink, StoreEvent};
use crate::models::{Map, Party, WorldNote};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// A record kind stored one file per id.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Name used in errors and events.
    const KIND: &'static str;
    /// Directory name under the data directory.
    const DIR: &'static str;

    fn id(&self) -> &str;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

impl Document for Map {
    const KIND: &'static str = "map";
    const DIR: &'static str = "maps";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl Document for Party {
    const KIND: &'static str = "party";
    const DIR: &'static str = "parties";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl Document for WorldNote {
    const KIND: &'static str = "world note";
    const DIR: &'static str = "world-notes";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

/// File-backed store for one [`Document`] kind.
#[derive(Debug)]
pub struct DocumentStore<T> {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Document> DocumentStore<T> {
    /// Create a store rooted at `dir`. The directory is not created here.
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>, events: Arc<dyn EventSink>) -> Self {
        Self {
            dir: dir.into(),
            clock,
            events,
            _kind: PhantomData,
        }
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load one record.
    pub async fn get(&self, id: &str) -> Result<T, StoreError> {
        let path = record_path(&self.dir, id)?;
        read_record(&path, T::KIND, id).await
    }

    /// All records whose active flag equals `active`, skipping unparseable files.
    pub async fn list(&self, active: bool) -> Result<Vec<T>, StoreError> {
        let records: Vec<T> = scan_records(&self.dir, self.events.as_ref()).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.is_active() == active)
            .collect())
    }

    /// Replace the record with `document`.
    pub async fn save(&self, document: &T) -> Result<(), StoreError> {
        let path = record_path(&self.dir, document.id())?;
        write_record(&path, document).await?;
        self.events.record(&StoreEvent::RecordWritten {
            kind: T::KIND,
            path,
        });
        Ok(())
    }

    /// Soft-delete a record.
    pub async fn delete(&self, id: &str) -> Result<T, StoreError> {
        self.set_active(id, false).await
    }

    /// Restore a soft-deleted record.
    pub async fn restore(&self, id: &str) -> Result<T, StoreError> {
        self.set_active(id, true).await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<T, StoreError> {
        let mut document = self.get(id).await?;
        document.set_active(active);
        self.save(&document).await?;
        Ok(document)
    }
}

impl DocumentStore<Map> {
    /// Create and persist an empty map, returning its id.
    pub async fn create_map(
        &self,
        name: &str,
        grid_width: i64,
        grid_height: i64,
        grid_size: i64,
    ) -> Result<String, StoreError> {
        let id = format!("map-{}", Uuid::new_v4());
        let map = Map::new(id.clone(), name, grid_width, grid_height, grid_size);
        self.save(&map).await?;
        Ok(id)
    }

    /// Remove all drawings and icons from a map.
    pub async fn clear_map(&self, id: &str) -> Result<Map, StoreError> {
        let mut map = self.get(id).await?;
        map.clear();
        self.save(&map).await?;
        Ok(map)
    }
}

impl DocumentStore<Party> {
    /// Create and persist an active party, returning its id.
    pub async fn create_party(
        &self,
        name: &str,
        description: &str,
        character_ids: Vec<String>,
    ) -> Result<String, StoreError> {
        let now = self.clock.now();
        let party = Party {
            id: format!("party-{}", Uuid::new_v4()),
            name: name.to_string(),
            description: description.to_string(),
            character_ids,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.save(&party).await?;
        Ok(party.id)
    }

    /// Save a party, stamping its update time.
    pub async fn save_party(&self, party: &mut Party) -> Result<(), StoreError> {
        party.updated_at = self.clock.now();
        self.save(party).await
    }
}
