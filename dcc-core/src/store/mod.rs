//! File-backed stores for every entity kind.
//!
//! Layout under the data directory:
//!
//! ```text
//! <base>/character-sheets/<id>.json
//! <base>/character-sheets/<id>-history.txt
//! <base>/maps/<id>.json
//! <base>/parties/<id>.json
//! <base>/world-notes/<id>.json
//! ```

mod character;
mod document;
mod error;
mod files;

pub use character::{
    CharacterStore, PriorRecord, SaveOutcome, CHARACTERS_DIR, DELETE_NOTE, RESTORE_NOTE,
};
pub use document::{Document, DocumentStore};
pub use error::StoreError;

use crate::models::{Character, Map, Party, WorldNote};
use tracing::debug;

/// All stores for one data directory.
#[derive(Debug)]
pub struct Stores {
    pub characters: CharacterStore,
    pub maps: DocumentStore<Map>,
    pub parties: DocumentStore<Party>,
    pub world_notes: DocumentStore<WorldNote>,
}

impl Stores {
    /// Load the characters in a party.
    ///
    /// Members that no longer exist or cannot be parsed are left out.
    pub async fn party_members(&self, party_id: &str) -> Result<Vec<Character>, StoreError> {
        let party = self.parties.get(party_id).await?;

        let mut members = Vec::with_capacity(party.character_ids.len());
        for id in &party.character_ids {
            match self.characters.get(id).await {
                Ok(character) => members.push(character),
                Err(e) => debug!(party = party_id, character = %id, error = %e, "skipping party member"),
            }
        }

        Ok(members)
    }
}
