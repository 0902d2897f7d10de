pub mod dice;
pub mod leadership;
pub mod modifiers;
pub mod roll;
pub mod swap;
pub mod units;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tt_core::{Hex, Table};
use tt_rules::{AuxData, AuxDataBuilder, Faction, GameConfig, RollType};

/// A table snapshot plus who plays what.
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub table: Table,
    /// Player slot to faction key.
    #[serde(default)]
    pub factions: BTreeMap<u32, String>,
    /// Factions not in the built-in list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_factions: Vec<Faction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GameConfig>,
}

impl Scenario {
    /// The faction played from `slot`, if the scenario names one.
    pub fn faction(&self, slot: u32) -> Result<Option<Faction>, String> {
        let Some(key) = self.factions.get(&slot) else {
            return Ok(None);
        };
        self.custom_factions
            .iter()
            .find(|f| &f.faction == key)
            .cloned()
            .or_else(|| Faction::builtin(key))
            .map(Some)
            .ok_or_else(|| format!("unknown faction: \"{key}\""))
    }
}

/// Read and validate a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&text)
        .map_err(|e| format!("invalid scenario {}: {e}", path.display()))?;
    if let Some(config) = &scenario.config {
        config.validate().map_err(|e| e.to_string())?;
    }
    tracing::debug!(
        objects = scenario.table.objects().len(),
        seats = scenario.table.seats.len(),
        "loaded scenario"
    );
    Ok(scenario)
}

/// Write a scenario back as pretty JSON.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> Result<(), String> {
    let text = serde_json::to_string_pretty(scenario).map_err(|e| e.to_string())?;
    fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

/// Where and for whom to resolve.
pub struct Resolution<'a> {
    pub hex: &'a str,
    pub player: u32,
    pub opponent: Option<u32>,
    pub roll_type: RollType,
    pub nebula: bool,
    pub defender: bool,
}

/// Build the modified unit context for a resolution.
pub fn resolve(scenario: &Scenario, resolution: &Resolution<'_>) -> Result<AuxData, String> {
    let hex: Hex = resolution.hex.parse().map_err(|e: tt_core::CoreError| e.to_string())?;
    scenario
        .table
        .seats
        .by_slot(resolution.player)
        .map_err(|e| e.to_string())?;

    let faction = scenario.faction(resolution.player)?;
    let opponent_faction = match resolution.opponent {
        Some(slot) => scenario.faction(slot)?,
        None => None,
    };

    let mut builder = AuxDataBuilder::new(&scenario.table, hex, resolution.player)
        .with_roll_type(resolution.roll_type)
        .with_nebula(resolution.nebula)
        .with_defender(resolution.defender);
    if let Some(opponent) = resolution.opponent {
        builder = builder.with_opponent(opponent);
    }
    if let Some(faction) = &faction {
        builder = builder.with_faction(faction);
    }
    if let Some(faction) = &opponent_faction {
        builder = builder.with_opponent_faction(faction);
    }
    builder.build().map_err(|e| e.to_string())
}

/// Format an optional number, or a dash.
fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
