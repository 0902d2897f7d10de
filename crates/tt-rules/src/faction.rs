//! Faction records.
//!
//! A faction's `abilities` are the keys faction-ability modifiers trigger on.
//! Tech, promissory note and unit entries are nsid *names*; the full nsid
//! depends on the card type and source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The four leader slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaders {
    /// Agent leader names.
    pub agents: Vec<String>,
    /// Commander leader names.
    pub commanders: Vec<String>,
    /// Hero leader names.
    pub heroes: Vec<String>,
    /// Mech unit names.
    pub mechs: Vec<String>,
}

/// One playable faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    /// Faction key, e.g. `jolnar`.
    pub faction: String,
    /// Content pack, e.g. `base`.
    #[serde(default = "default_source")]
    pub source: String,
    /// Faction ability keys, e.g. `fragile`.
    pub abilities: Vec<String>,
    /// Commodity limit.
    pub commodities: u32,
    /// Home system tile number.
    pub home: u32,
    /// Leaders.
    #[serde(default)]
    pub leaders: Leaders,
    /// Promissory note names.
    #[serde(default)]
    pub promissory_notes: Vec<String>,
    /// Faction technology names (not unit upgrades).
    #[serde(default)]
    pub techs: Vec<String>,
    /// Faction unit overrides and upgrades, flagship included.
    #[serde(default)]
    pub units: Vec<String>,
    /// Technologies owned at setup.
    #[serde(default)]
    pub starting_tech: Vec<String>,
    /// Units placed at setup.
    #[serde(default)]
    pub starting_units: BTreeMap<String, u32>,
    /// Extra setup instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_message: Option<String>,
}

fn default_source() -> String {
    "base".to_string()
}

impl Faction {
    /// True if the faction has `ability`.
    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability)
    }

    /// Built-in faction by key.
    pub fn builtin(key: &str) -> Option<Faction> {
        builtin_factions().into_iter().find(|f| f.faction == key)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn units(items: &[(&str, u32)]) -> BTreeMap<String, u32> {
    items.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

/// Factions shipped with the engine.
pub fn builtin_factions() -> Vec<Faction> {
    vec![
        Faction {
            faction: "jolnar".to_string(),
            source: default_source(),
            abilities: strings(&["fragile", "brilliant", "analytical"]),
            commodities: 4,
            home: 12,
            leaders: Leaders {
                agents: strings(&["doctor_sucaban"]),
                commanders: strings(&["ta_zern"]),
                heroes: strings(&["rin_the_masters_legacy"]),
                mechs: strings(&["shield_paling"]),
            },
            promissory_notes: strings(&["research_agreement"]),
            techs: strings(&["e_res_siphons", "spatial_conduit_cylinder"]),
            units: strings(&["j_ol_ibna_vel"]),
            starting_tech: strings(&[
                "neural_motivator",
                "antimass_deflectors",
                "sarween_tools",
                "plasma_scoring",
            ]),
            starting_units: units(&[
                ("carrier", 2),
                ("dreadnought", 1),
                ("fighter", 1),
                ("infantry", 2),
                ("pds", 2),
                ("space_dock", 1),
            ]),
            starting_message: None,
        },
        Faction {
            faction: "norr".to_string(),
            source: default_source(),
            abilities: strings(&["unrelenting"]),
            commodities: 3,
            home: 13,
            leaders: Leaders {
                agents: strings(&["tro_the_unrelenting"]),
                commanders: strings(&["gtrk"]),
                heroes: strings(&["sh_val_harbinger"]),
                mechs: strings(&["valkyrie_exoskeleton"]),
            },
            promissory_notes: strings(&["tekklar_legion"]),
            techs: strings(&["valkyrie_particle_weave"]),
            units: strings(&["c_morran_n_orr", "exotrireme", "exotrireme_2"]),
            starting_tech: Vec::new(),
            starting_units: units(&[
                ("carrier", 2),
                ("cruiser", 1),
                ("infantry", 5),
                ("pds", 1),
                ("space_dock", 1),
            ]),
            starting_message: None,
        },
        Faction {
            faction: "letnev".to_string(),
            source: default_source(),
            abilities: strings(&["armada", "munitions_reserves"]),
            commodities: 2,
            home: 10,
            leaders: Leaders::default(),
            promissory_notes: strings(&["war_funding"]),
            techs: strings(&["l4_disruptors", "non_euclidean_shielding"]),
            units: strings(&["arc_secundus"]),
            starting_tech: strings(&["antimass_deflectors", "plasma_scoring"]),
            starting_units: units(&[
                ("carrier", 1),
                ("destroyer", 1),
                ("dreadnought", 2),
                ("fighter", 1),
                ("infantry", 3),
                ("space_dock", 1),
            ]),
            starting_message: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let jolnar = Faction::builtin("jolnar").unwrap();
        assert!(jolnar.has_ability("fragile"));
        assert!(!jolnar.has_ability("unrelenting"));
        assert!(Faction::builtin("nobody").is_none());
    }

    #[test]
    fn deserialize_with_defaults() {
        let json = r#"{
            "faction": "custom",
            "abilities": ["unrelenting"],
            "commodities": 3,
            "home": 99
        }"#;
        let faction: Faction = serde_json::from_str(json).unwrap();
        assert_eq!(faction.source, "base");
        assert!(faction.units.is_empty());
        assert!(faction.starting_units.is_empty());
    }
}
