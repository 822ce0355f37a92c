//! Command handlers.

use crate::args::{CharacterCommand, MapCommand, PartyCommand, RecordCommand};
use anyhow::{Context, Result};
use dcc_core::models::{Map, Party, WorldNote};
use dcc_core::store::Document;
use dcc_core::{render_history, Character, DocumentStore, SaveOutcome, Stores};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

pub async fn character(stores: &Stores, command: CharacterCommand) -> Result<()> {
    let characters = &stores.characters;

    match command {
        CharacterCommand::List(args) => {
            let mut list = characters.list(!args.deleted).await?;
            list.sort_by(|a, b| a.name.cmp(&b.name));
            for c in &list {
                println!(
                    "{}  {} (level {}, HP {}/{})",
                    c.id, c.name, c.level, c.current_health, c.max_health
                );
            }
        }
        CharacterCommand::Show { id } => {
            let character = characters.get(&id).await?;
            println!("{}", serde_json::to_string_pretty(&character)?);
        }
        CharacterCommand::Save { file, note } => {
            let incoming: Character = read_json(&file, "character sheet")?;
            let (saved, outcome) = characters.save_with_outcome(incoming, &note).await?;

            match outcome {
                SaveOutcome::Created => println!("[CREATED] {} ({})", saved.name, saved.id),
                SaveOutcome::Replaced => println!(
                    "[REPLACED] {} ({}), previous record was unreadable",
                    saved.name, saved.id
                ),
                SaveOutcome::Changed(changes) => {
                    println!("[SAVED] {} ({})", saved.name, saved.id);
                    for change in &changes {
                        println!("  - {change}");
                    }
                }
                SaveOutcome::Unchanged => {
                    println!("[SAVED] {} ({}), no changes", saved.name, saved.id)
                }
            }
        }
        CharacterCommand::AddNote { id, note } => {
            let character = characters.add_history_note(&id, &note).await?;
            println!(
                "[NOTED] {} now has {} history entries",
                character.name,
                character.history.len()
            );
        }
        CharacterCommand::Delete { id } => {
            let character = characters.delete(&id).await?;
            println!("[DELETED] {}", character.name);
        }
        CharacterCommand::Restore { id } => {
            let character = characters.restore(&id).await?;
            println!("[RESTORED] {}", character.name);
        }
        CharacterCommand::History { id, export } => {
            if export {
                let path = characters.export_history(&id).await?;
                println!("History exported to: {}", path.display());
            } else {
                let character = characters.get(&id).await?;
                print!("{}", render_history(&character));
            }
        }
    }

    Ok(())
}

pub async fn map(stores: &Stores, command: MapCommand) -> Result<()> {
    match command {
        MapCommand::Create {
            name,
            width,
            height,
            grid_size,
        } => {
            let id = stores.maps.create_map(&name, width, height, grid_size).await?;
            println!("{id}");
        }
        MapCommand::Clear { id } => {
            let map = stores.maps.clear_map(&id).await?;
            println!("[CLEARED] {}", map.name);
        }
        MapCommand::Record(command) => {
            record(&stores.maps, command, map_summary).await?;
        }
    }
    Ok(())
}

pub async fn party(stores: &Stores, command: PartyCommand) -> Result<()> {
    match command {
        PartyCommand::Create {
            name,
            description,
            members,
        } => {
            let id = stores
                .parties
                .create_party(&name, &description, members)
                .await?;
            println!("{id}");
        }
        PartyCommand::Members { id } => {
            for c in stores.party_members(&id).await? {
                println!("{}  {} (level {})", c.id, c.name, c.level);
            }
        }
        // Parties go through save_party so the update time is stamped.
        PartyCommand::Record(RecordCommand::Save { file }) => {
            let mut party: Party = read_json(&file, "party")?;
            stores.parties.save_party(&mut party).await?;
            println!("[SAVED] {}", party_summary(&party));
        }
        PartyCommand::Record(command) => {
            record(&stores.parties, command, party_summary).await?;
        }
    }
    Ok(())
}

pub async fn note(stores: &Stores, command: RecordCommand) -> Result<()> {
    record(&stores.world_notes, command, note_summary).await
}

fn map_summary(map: &Map) -> String {
    format!("{} ({}x{})", map.name, map.grid_width, map.grid_height)
}

fn party_summary(party: &Party) -> String {
    format!("{} ({} members)", party.name, party.character_ids.len())
}

fn note_summary(note: &WorldNote) -> String {
    format!("[{}] {}", note.category, note.title)
}

async fn record<T: Document>(
    store: &DocumentStore<T>,
    command: RecordCommand,
    summary: impl Fn(&T) -> String,
) -> Result<()> {
    match command {
        RecordCommand::List(args) => {
            for doc in store.list(!args.deleted).await? {
                println!("{}  {}", doc.id(), summary(&doc));
            }
        }
        RecordCommand::Show { id } => {
            let doc = store.get(&id).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        RecordCommand::Save { file } => {
            let doc: T = read_json(&file, T::KIND)?;
            store.save(&doc).await?;
            println!("[SAVED] {}", summary(&doc));
        }
        RecordCommand::Delete { id } => {
            let doc = store.delete(&id).await?;
            println!("[DELETED] {}", summary(&doc));
        }
        RecordCommand::Restore { id } => {
            let doc = store.restore(&id).await?;
            println!("[RESTORED] {}", summary(&doc));
        }
    }
    Ok(())
}

/// Read a JSON record from `file`, or from stdin when `file` is "-".
fn read_json<T: DeserializeOwned>(file: &Path, kind: &str) -> Result<T> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    serde_json::from_str(&content).with_context(|| format!("Input is not a valid {kind}"))
}
