//! Character sheet persistence for DCC RPG campaigns.
//!
//! This crate provides:
//! - Character, map, party and world note records stored as JSON files
//! - Soft delete and restore for every record kind
//! - A change detector that describes what changed between two saves
//! - An append-only history log kept on every character
//!
//! # Quick Start
//!
//! ```ignore
//! use dcc_core::{Character, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stores = StoreConfig::from_env().open().await?;
//!
//!     let mut zed = Character::new("Zed");
//!     zed.level = 3;
//!     zed.current_health = 12;
//!     stores.characters.save(zed.clone(), "").await?;
//!
//!     zed.level = 4;
//!     zed.current_health = 9;
//!     let saved = stores.characters.save(zed, "took damage leveling").await?;
//!     for change in &saved.history[0].changes {
//!         println!("{change}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod events;
pub mod history;
pub mod models;
pub mod store;
pub mod testing;

// Primary public API
pub use clock::{Clock, SystemClock};
pub use config::StoreConfig;
pub use events::{EventSink, StoreEvent, TracingSink};
pub use history::{render_history, ChangeDetector};
pub use models::{
    Ability, Attribute, AttributeKind, Character, Class, Equipment, HistoryEntry, Map, Party,
    WorldNote,
};
pub use store::{CharacterStore, DocumentStore, SaveOutcome, StoreError, Stores};
