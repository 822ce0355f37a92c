//! Store configuration.

use crate::clock::{Clock, SystemClock};
use crate::events::{EventSink, TracingSink};
use crate::models::{Map, Party, WorldNote};
use crate::store::{CharacterStore, Document, DocumentStore, StoreError, Stores, CHARACTERS_DIR};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DCC_DATA_DIR";

/// Name of the data directory under the user's home.
pub const DEFAULT_DIR_NAME: &str = "dcc-character-sheet";

/// Configuration for opening the stores.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root of the data directory.
    pub base_dir: PathBuf,

    /// Time source for history entries and party timestamps.
    pub clock: Arc<dyn Clock>,

    /// Receiver of store diagnostics.
    pub events: Arc<dyn EventSink>,
}

impl StoreConfig {
    /// Create a config rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            clock: Arc::new(SystemClock),
            events: Arc::new(TracingSink),
        }
    }

    /// Resolve the data directory from the environment.
    ///
    /// Uses `DCC_DATA_DIR` when set, otherwise `~/dcc-character-sheet`, and
    /// falls back to the working directory when there is no home directory.
    pub fn from_env() -> Self {
        let base_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_base_dir);
        Self::new(base_dir)
    }

    /// Set the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the event sink.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Directory for character records.
    pub fn characters_dir(&self) -> PathBuf {
        self.base_dir.join(CHARACTERS_DIR)
    }

    /// Directory for records of a document kind.
    pub fn documents_dir<T: Document>(&self) -> PathBuf {
        self.base_dir.join(T::DIR)
    }

    /// Build the stores without touching the filesystem.
    pub fn stores(&self) -> Stores {
        Stores {
            characters: CharacterStore::new(
                self.characters_dir(),
                self.clock.clone(),
                self.events.clone(),
            ),
            maps: self.document_store::<Map>(),
            parties: self.document_store::<Party>(),
            world_notes: self.document_store::<WorldNote>(),
        }
    }

    /// Create the data directories and build the stores.
    pub async fn open(&self) -> Result<Stores, StoreError> {
        for dir in [
            self.characters_dir(),
            self.documents_dir::<Map>(),
            self.documents_dir::<Party>(),
            self.documents_dir::<WorldNote>(),
        ] {
            fs::create_dir_all(&dir).await?;
        }
        Ok(self.stores())
    }

    fn document_store<T: Document>(&self) -> DocumentStore<T> {
        DocumentStore::new(
            self.documents_dir::<T>(),
            self.clock.clone(),
            self.events.clone(),
        )
    }
}

fn default_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(DEFAULT_DIR_NAME)
}
