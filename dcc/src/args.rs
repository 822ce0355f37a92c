//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dcc")]
#[command(about = "Manage DCC character sheets, maps, parties and world notes")]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to ~/dcc-character-sheet)
    #[arg(long, global = true, env = "DCC_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Character sheets and their history
    #[command(subcommand)]
    Character(CharacterCommand),

    /// Maps
    #[command(subcommand)]
    Map(MapCommand),

    /// Party rosters
    #[command(subcommand)]
    Party(PartyCommand),

    /// World notes
    #[command(subcommand)]
    Note(RecordCommand),
}

#[derive(Subcommand)]
pub enum CharacterCommand {
    /// List characters
    List(ListArgs),

    /// Print a character as JSON
    Show { id: String },

    /// Save a complete character snapshot read from a JSON file ("-" for stdin)
    Save {
        file: PathBuf,

        /// Note attached to the history entry, if anything changed
        #[arg(long, short, default_value = "")]
        note: String,
    },

    /// Append a note to a character's history without changing the sheet
    AddNote { id: String, note: String },

    /// Soft-delete a character
    Delete { id: String },

    /// Restore a soft-deleted character
    Restore { id: String },

    /// Print a character's history
    History {
        id: String,

        /// Write the report next to the record instead of printing it
        #[arg(long)]
        export: bool,
    },
}

#[derive(Subcommand)]
pub enum MapCommand {
    /// Create an empty map
    Create {
        name: String,

        #[arg(long, default_value_t = 30)]
        width: i64,

        #[arg(long, default_value_t = 20)]
        height: i64,

        /// Pixel size of one grid cell
        #[arg(long, default_value_t = 40)]
        grid_size: i64,
    },

    /// Remove all drawings and icons from a map
    Clear { id: String },

    #[command(flatten)]
    Record(RecordCommand),
}

#[derive(Subcommand)]
pub enum PartyCommand {
    /// Create a party
    Create {
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Character id to include (repeatable)
        #[arg(long = "member")]
        members: Vec<String>,
    },

    /// List the characters in a party
    Members { id: String },

    #[command(flatten)]
    Record(RecordCommand),
}

/// Operations shared by every record kind.
#[derive(Subcommand)]
pub enum RecordCommand {
    /// List records
    List(ListArgs),

    /// Print a record as JSON
    Show { id: String },

    /// Create or replace a record from a JSON file ("-" for stdin)
    Save { file: PathBuf },

    /// Soft-delete a record
    Delete { id: String },

    /// Restore a soft-deleted record
    Restore { id: String },
}

#[derive(Args)]
pub struct ListArgs {
    /// Show deleted records instead of live ones
    #[arg(long)]
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character_save() {
        let cli = Cli::try_parse_from(["dcc", "character", "save", "zed.json", "-n", "leveled"])
            .expect("Should parse");
        match cli.command {
            Commands::Character(CharacterCommand::Save { file, note }) => {
                assert_eq!(file, PathBuf::from("zed.json"));
                assert_eq!(note, "leveled");
            }
            _ => panic!("Expected character save"),
        }
    }

    #[test]
    fn test_parse_shared_record_commands() {
        let cli = Cli::try_parse_from(["dcc", "map", "list", "--deleted"]).expect("Should parse");
        assert!(matches!(
            cli.command,
            Commands::Map(MapCommand::Record(RecordCommand::List(ListArgs { deleted: true })))
        ));

        let cli = Cli::try_parse_from(["dcc", "--data-dir", "/tmp/campaign", "note", "restore", "n1"])
            .expect("Should parse");
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/campaign")));
        assert!(matches!(
            cli.command,
            Commands::Note(RecordCommand::Restore { ref id }) if id == "n1"
        ));
    }

    #[test]
    fn test_map_create_defaults() {
        let cli = Cli::try_parse_from(["dcc", "map", "create", "Dungeon"]).expect("Should parse");
        match cli.command {
            Commands::Map(MapCommand::Create {
                name,
                width,
                height,
                grid_size,
            }) => {
                assert_eq!(name, "Dungeon");
                assert_eq!((width, height, grid_size), (30, 20, 40));
            }
            _ => panic!("Expected map create"),
        }
    }

    #[test]
    fn test_party_members_repeatable() {
        let cli = Cli::try_parse_from([
            "dcc", "party", "create", "Funnel", "--member", "a", "--member", "b",
        ])
        .expect("Should parse");
        match cli.command {
            Commands::Party(PartyCommand::Create { members, .. }) => {
                assert_eq!(members, vec!["a", "b"]);
            }
            _ => panic!("Expected party create"),
        }
    }

    #[test]
    fn test_parse_record_save() {
        for kind in ["map", "party", "note"] {
            let cli = Cli::try_parse_from(["dcc", kind, "save", "record.json"])
                .expect("Should parse");
            let command = match cli.command {
                Commands::Map(MapCommand::Record(command)) => command,
                Commands::Party(PartyCommand::Record(command)) => command,
                Commands::Note(command) => command,
                Commands::Character(_) => panic!("Expected a record command"),
                _ => panic!("Expected a record command"),
            };
            assert!(matches!(
                command,
                RecordCommand::Save { ref file } if file == &PathBuf::from("record.json")
            ));
        }
    }
}
