//! Player-facing message text.

use crate::unit::RollType;

/// Placeholder for an empty list.
pub fn none() -> String {
    "none".to_string()
}

/// Header for the active-modifier summary.
pub fn roll_modifiers(count: usize, list: &str) -> String {
    format!("Roll modifiers ({count}): {list}")
}

/// Shown when nothing can roll.
pub fn no_units() -> String {
    "No units".to_string()
}

/// Label for the hit threshold in roll reports.
pub fn roll_hit() -> &'static str {
    "hit"
}

/// Label for the crit threshold in roll reports.
pub fn roll_crit() -> &'static str {
    "crit"
}

/// Announced before dice are rolled.
pub fn player_rolling_for(player: &str, roll_type: RollType) -> String {
    format!("{player} rolling for {roll_type}")
}

/// Per-unit roll summary.
pub fn player_rolled(player: &str, report: &str) -> String {
    format!("{player} rolled: {report}")
}

/// Hit total after a roll.
pub fn player_landed_hits(player: &str, hits: u32) -> String {
    format!("{player} landed {hits} hit(s)")
}

/// Leadership resolution.
pub fn gains_command_tokens(player: &str, count: u32) -> String {
    format!("{player} gains {count} command tokens")
}

/// Swap resolution.
pub fn swapped(player: &str, consumed: usize, produced: u32, name: &str) -> String {
    format!("{player} swapped {consumed} for {produced} {name}")
}
