//! Game setup and roller settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// Smallest supported table.
pub const MIN_PLAYERS: u32 = 2;
/// Largest supported table.
pub const MAX_PLAYERS: u32 = 8;

fn default_player_count() -> u32 {
    6
}

fn default_game_points() -> u32 {
    10
}

/// Options chosen at game setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seated players.
    #[serde(default = "default_player_count")]
    pub player_count: u32,
    /// Victory points needed to win (10 or 14).
    #[serde(default = "default_game_points")]
    pub game_points: u32,
    /// Prophecy of Kings expansion enabled.
    #[serde(default)]
    pub pok: bool,
    /// Omega errata enabled.
    #[serde(default)]
    pub omega: bool,
    /// Codex I enabled.
    #[serde(default)]
    pub codex1: bool,
    /// Codex II enabled.
    #[serde(default)]
    pub codex2: bool,
    /// When setup was confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_at: Option<DateTime<Utc>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: default_player_count(),
            game_points: default_game_points(),
            pok: false,
            omega: false,
            codex1: false,
            codex2: false,
            setup_at: None,
        }
    }
}

impl GameConfig {
    /// Set the player count.
    pub fn with_player_count(mut self, player_count: u32) -> Self {
        self.player_count = player_count;
        self
    }

    /// Set the victory point target.
    pub fn with_game_points(mut self, game_points: u32) -> Self {
        self.game_points = game_points;
        self
    }

    /// Toggle Prophecy of Kings.
    pub fn with_pok(mut self, pok: bool) -> Self {
        self.pok = pok;
        self
    }

    /// Toggle Omega errata.
    pub fn with_omega(mut self, omega: bool) -> Self {
        self.omega = omega;
        self
    }

    /// Toggle Codex I.
    pub fn with_codex1(mut self, codex1: bool) -> Self {
        self.codex1 = codex1;
        self
    }

    /// Toggle Codex II.
    pub fn with_codex2(mut self, codex2: bool) -> Self {
        self.codex2 = codex2;
        self
    }

    /// Stamp the setup time as now.
    pub fn confirm(mut self) -> RulesResult<Self> {
        self.validate()?;
        self.setup_at = Some(Utc::now());
        tracing::info!(
            players = self.player_count,
            points = self.game_points,
            pok = self.pok,
            "game setup confirmed"
        );
        Ok(self)
    }

    /// Check every option is in range.
    pub fn validate(&self) -> RulesResult<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(RulesError::InvalidConfig(format!(
                "player count {} not in {MIN_PLAYERS}..={MAX_PLAYERS}",
                self.player_count
            )));
        }
        if self.game_points != 10 && self.game_points != 14 {
            return Err(RulesError::InvalidConfig(format!(
                "game points must be 10 or 14, got {}",
                self.game_points
            )));
        }
        Ok(())
    }
}

/// Settings for the reference dice primitive and spawned dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollerConfig {
    /// RNG seed.
    pub seed: u64,
    /// Faces per die.
    pub die_sides: u32,
    /// Seconds until spawned dice are removed.
    pub delete_after_seconds: u32,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            die_sides: 10,
            delete_after_seconds: 30,
        }
    }
}

impl RollerConfig {
    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the cleanup delay.
    pub fn with_delete_after_seconds(mut self, seconds: u32) -> Self {
        self.delete_after_seconds = seconds;
        self
    }
}
