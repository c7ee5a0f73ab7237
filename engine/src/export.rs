use crate::error::{GameError, Result};
use crate::game::Game;
use crate::stats::format_clock;
use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_EXPORT_FILE: &str = "lacrosse_log.txt";

/// Plain-text game report: the activity log oldest first, then the score and
/// a line per player sorted by jersey number.
pub fn export_log(game: &Game) -> String {
    let mut out = String::from("Activity Log:\n");
    for entry in game.log().iter_chronological() {
        let stamp = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(out, "[{stamp}] {}", entry.message);
    }

    let _ = writeln!(out, "\nFinal score: {}", game.score());
    let _ = writeln!(out, "{}", game.clock().display());

    let mut players: Vec<_> = game.roster().iter().collect();
    players.sort_by_key(|p| p.number);
    out.push_str("\nPlayer Stats:\n");
    for player in players {
        let stats = game.stats_for(&player.id);
        let _ = writeln!(
            out,
            "{:<16} G: {:<3} T: {}",
            player.label(),
            stats.goals,
            format_clock(game.display_field_time(&player.id))
        );
    }
    out
}

pub fn write_export(path: &Path, game: &Game) -> Result<()> {
    std::fs::write(path, export_log(game))
        .map_err(|e| GameError::Persistence(format!("export to {} failed: {e}", path.display())))
}
