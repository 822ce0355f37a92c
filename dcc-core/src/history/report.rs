//! Plain-text rendering of a character's history.

use crate::models::Character;
use chrono::Local;
use std::fmt::Write;

/// Timestamp layout used in history reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const RULE_WIDTH: usize = 80;

/// Render the full history of a character, earliest entry first.
///
/// Timestamps are printed in the local time zone; records keep UTC.
pub fn render_history(character: &Character) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Character History: {}", character.name);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out.push('\n');

    for entry in &character.history {
        let local = entry.timestamp.with_timezone(&Local);
        let _ = writeln!(out, "[{}]", local.format(TIMESTAMP_FORMAT));
        for change in &entry.changes {
            let _ = writeln!(out, "  - {change}");
        }
        if !entry.note.is_empty() {
            let _ = writeln!(out, "  Note: {}", entry.note);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryEntry;
    use chrono::{DateTime, TimeZone, Utc};

    fn local(ts: DateTime<Utc>) -> String {
        ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
    }

    #[test]
    fn test_empty_history_has_header_only() {
        let character = Character::new("Zed");
        let report = render_history(&character);
        assert_eq!(
            report,
            format!("Character History: Zed\n{}\n\n", "=".repeat(80))
        );
    }

    #[test]
    fn test_entries_render_in_stored_order() {
        let mut character = Character::new("Zed");
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 5).unwrap();
        character.history.push(HistoryEntry::new(
            first,
            vec![
                "Level changed from 3 to 4".to_string(),
                "Health decreased by 3 (12 → 9)".to_string(),
            ],
            "took damage leveling",
        ));
        character.history.push(HistoryEntry::new(
            second,
            Vec::new(),
            "",
        ));

        let report = render_history(&character);
        let expected = format!(
            "Character History: Zed\n{}\n\n\
             [{}]\n\
             \x20 - Level changed from 3 to 4\n\
             \x20 - Health decreased by 3 (12 → 9)\n\
             \x20 Note: took damage leveling\n\
             \n\
             [{}]\n\
             \n",
            "=".repeat(80),
            local(first),
            local(second)
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn test_timestamps_use_local_zone() {
        let mut character = Character::new("Zed");
        let ts = Utc.with_ymd_and_hms(2024, 2, 11, 2, 15, 0).unwrap();
        character.history.push(HistoryEntry::new(ts, Vec::new(), "late session"));

        let report = render_history(&character);
        let offset = Local.offset_from_utc_datetime(&ts.naive_utc());
        let wall_clock = (ts.naive_utc() + offset).format(TIMESTAMP_FORMAT).to_string();
        assert!(report.contains(&format!("[{wall_clock}]")));
    }
}
