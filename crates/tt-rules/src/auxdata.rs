//! Per-resolution context: unit counts, the live attribute set, and the
//! modifiers that shaped it.
//!
//! An [`AuxData`] is built fresh for every roll from a table snapshot and is
//! dropped afterwards. Nothing it owns is shared with another resolution.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tt_core::{Hex, Table, TableObject, matches_type};

use crate::error::RulesResult;
use crate::faction::Faction;
use crate::modifier::{ModifierOwner, ModifierRegistry, UnitModifier, sort_priority_order};
use crate::unit::{RollType, UnitAttrsSet};

/// Largest multiplier a `<unit>_<n>` stack token may carry.
pub const MAX_TOKEN_STACK: u32 = 100;

/// Unit counts for one side, in the primary hex and its neighbors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitCounts {
    in_hex: BTreeMap<String, u32>,
    adjacent: BTreeMap<String, u32>,
}

impl UnitCounts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` units in the primary hex.
    pub fn add(&mut self, unit: &str, n: u32) {
        let count = self.in_hex.entry(unit.to_string()).or_default();
        *count = count.saturating_add(n);
    }

    /// Add `n` units in an adjacent hex.
    pub fn add_adjacent(&mut self, unit: &str, n: u32) {
        let count = self.adjacent.entry(unit.to_string()).or_default();
        *count = count.saturating_add(n);
    }

    /// Builder form of [`UnitCounts::add`].
    pub fn with(mut self, unit: &str, n: u32) -> Self {
        self.add(unit, n);
        self
    }

    /// Builder form of [`UnitCounts::add_adjacent`].
    pub fn with_adjacent(mut self, unit: &str, n: u32) -> Self {
        self.add_adjacent(unit, n);
        self
    }

    /// True if at least one `unit` is in the primary hex.
    pub fn has(&self, unit: &str) -> bool {
        self.count(unit) > 0
    }

    /// Number of `unit` in the primary hex.
    pub fn count(&self, unit: &str) -> u32 {
        self.in_hex.get(unit).copied().unwrap_or(0)
    }

    /// True if at least one `unit` is in an adjacent hex.
    pub fn has_adjacent(&self, unit: &str) -> bool {
        self.adjacent_count(unit) > 0
    }

    /// Number of `unit` across adjacent hexes.
    pub fn adjacent_count(&self, unit: &str) -> u32 {
        self.adjacent.get(unit).copied().unwrap_or(0)
    }
}

/// Read-only facts about a resolution, handed to modifier callbacks.
#[derive(Debug, Clone, Default)]
pub struct AuxFacts {
    /// The rolling player's units.
    pub counts: UnitCounts,
    /// The opponent's units.
    pub opponent_counts: UnitCounts,
    /// Rolling player.
    pub player_slot: u32,
    /// Opponent, if there is one.
    pub opponent_slot: Option<u32>,
    /// Primary hex.
    pub hex: Option<Hex>,
    /// Roll being resolved, if any.
    pub roll_type: Option<RollType>,
    /// The primary hex contains a nebula.
    pub in_nebula: bool,
    /// The rolling player is defending.
    pub is_defender: bool,
}

impl AuxFacts {
    /// Facts for `player_slot` with the given counts and nothing else.
    pub fn new(player_slot: u32, counts: UnitCounts) -> Self {
        Self {
            counts,
            player_slot,
            ..Self::default()
        }
    }

    /// Set the roll type.
    pub fn with_roll_type(mut self, roll_type: RollType) -> Self {
        self.roll_type = Some(roll_type);
        self
    }
}

/// Per-resolution aggregate of counts, attributes and active modifiers.
#[derive(Debug, Clone)]
pub struct AuxData {
    facts: AuxFacts,
    unit_attrs_set: UnitAttrsSet,
    unit_modifiers: Vec<Arc<UnitModifier>>,
    modifiers_applied: bool,
}

impl AuxData {
    /// Wrap facts and a set, with no modifiers applied yet.
    pub fn new(facts: AuxFacts, unit_attrs_set: UnitAttrsSet) -> Self {
        Self {
            facts,
            unit_attrs_set,
            unit_modifiers: Vec::new(),
            modifiers_applied: false,
        }
    }

    /// The facts callbacks see.
    pub fn facts(&self) -> &AuxFacts {
        &self.facts
    }

    /// True if the player has `unit` in the primary hex.
    pub fn has(&self, unit: &str) -> bool {
        self.facts.counts.has(unit)
    }

    /// The player's count of `unit` in the primary hex.
    pub fn count(&self, unit: &str) -> u32 {
        self.facts.counts.count(unit)
    }

    /// True if the player has `unit` in an adjacent hex.
    pub fn has_adjacent(&self, unit: &str) -> bool {
        self.facts.counts.has_adjacent(unit)
    }

    /// The player's count of `unit` across adjacent hexes.
    pub fn adjacent_count(&self, unit: &str) -> u32 {
        self.facts.counts.adjacent_count(unit)
    }

    /// The live attribute set.
    pub fn unit_attrs_set(&self) -> &UnitAttrsSet {
        &self.unit_attrs_set
    }

    /// Mutable access for modifier application.
    pub fn unit_attrs_set_mut(&mut self) -> &mut UnitAttrsSet {
        &mut self.unit_attrs_set
    }

    /// Active modifiers, in apply order.
    pub fn unit_modifiers(&self) -> &[Arc<UnitModifier>] {
        &self.unit_modifiers
    }

    /// Order `modifiers`, apply each to the set, and remember them.
    ///
    /// The same modifier selected twice is applied once. Only the first call
    /// has any effect; later calls are ignored.
    pub(crate) fn apply_unit_modifiers(&mut self, modifiers: Vec<Arc<UnitModifier>>) {
        if self.modifiers_applied {
            tracing::warn!(
                ignored = modifiers.len(),
                "unit modifiers already applied to this resolution"
            );
            return;
        }
        self.modifiers_applied = true;
        let mut unique: Vec<Arc<UnitModifier>> = Vec::with_capacity(modifiers.len());
        for modifier in modifiers {
            if !unique.iter().any(|m| Arc::ptr_eq(m, &modifier)) {
                unique.push(modifier);
            }
        }
        sort_priority_order(&mut unique);
        for modifier in &unique {
            tracing::debug!(
                modifier = %modifier.name,
                priority = %modifier.priority,
                "applying unit modifier"
            );
            modifier.apply(&mut self.unit_attrs_set, &self.facts);
        }
        self.unit_modifiers = unique;
    }
}

/// Builds an [`AuxData`] from a table snapshot.
#[derive(Debug, Clone)]
pub struct AuxDataBuilder<'a> {
    table: &'a Table,
    registry: Option<&'a ModifierRegistry>,
    hex: Hex,
    player_slot: u32,
    opponent_slot: Option<u32>,
    faction: Option<&'a Faction>,
    opponent_faction: Option<&'a Faction>,
    roll_type: Option<RollType>,
    in_nebula: bool,
    is_defender: bool,
}

impl<'a> AuxDataBuilder<'a> {
    /// Resolve for `player_slot` at `hex`, using the global registry.
    pub fn new(table: &'a Table, hex: Hex, player_slot: u32) -> Self {
        Self {
            table,
            registry: None,
            hex,
            player_slot,
            opponent_slot: None,
            faction: None,
            opponent_faction: None,
            roll_type: None,
            in_nebula: false,
            is_defender: false,
        }
    }

    /// Use an explicit registry instead of the global one.
    pub fn with_registry(mut self, registry: &'a ModifierRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the opponent.
    pub fn with_opponent(mut self, slot: u32) -> Self {
        self.opponent_slot = Some(slot);
        self
    }

    /// Set the player's faction.
    pub fn with_faction(mut self, faction: &'a Faction) -> Self {
        self.faction = Some(faction);
        self
    }

    /// Set the opponent's faction.
    pub fn with_opponent_faction(mut self, faction: &'a Faction) -> Self {
        self.opponent_faction = Some(faction);
        self
    }

    /// Set the roll type.
    pub fn with_roll_type(mut self, roll_type: RollType) -> Self {
        self.roll_type = Some(roll_type);
        self
    }

    /// Mark the primary hex as a nebula.
    pub fn with_nebula(mut self, in_nebula: bool) -> Self {
        self.in_nebula = in_nebula;
        self
    }

    /// Mark the player as the defender.
    pub fn with_defender(mut self, is_defender: bool) -> Self {
        self.is_defender = is_defender;
        self
    }

    /// Count, upgrade, select modifiers, and apply them.
    pub fn build(self) -> RulesResult<AuxData> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => ModifierRegistry::global()?,
        };

        let mut unit_attrs_set = UnitAttrsSet::default_set();
        self.apply_upgrades(&mut unit_attrs_set)?;

        let (counts, opponent_counts) = self.count_units(&unit_attrs_set);
        let facts = AuxFacts {
            counts,
            opponent_counts,
            player_slot: self.player_slot,
            opponent_slot: self.opponent_slot,
            hex: Some(self.hex),
            roll_type: self.roll_type,
            in_nebula: self.in_nebula,
            is_defender: self.is_defender,
        };

        let modifiers = self.select_modifiers(registry, &unit_attrs_set, &facts);
        tracing::debug!(
            player = self.player_slot,
            hex = %self.hex,
            selected = modifiers.len(),
            "selected unit modifiers"
        );

        let mut aux = AuxData::new(facts, unit_attrs_set);
        aux.apply_unit_modifiers(modifiers);
        Ok(aux)
    }

    fn apply_upgrades(&self, set: &mut UnitAttrsSet) -> RulesResult<()> {
        let upgrades = UnitAttrsSet::default_upgrade_set();
        for obj in self.table.objects() {
            if !obj.is_loose_card() || !matches_type(&obj.nsid, "card.technology.unit_upgrade") {
                continue;
            }
            if self.table.owner_slot(obj) != Some(self.player_slot) {
                continue;
            }
            let Some(nsid) = obj.parsed_nsid() else {
                continue;
            };
            let Some(unit) = nsid.name.strip_suffix("_2") else {
                continue;
            };
            if upgrades.contains(unit) && set.contains(unit) {
                tracing::debug!(unit, card = %obj.id, "applying unit upgrade");
                set.upgrade_unit(unit, &upgrades)?;
            }
        }
        Ok(())
    }

    /// Plastic units count one each. Stack tokens named `<unit>_<n>` count
    /// `n`; an unowned token belongs to whoever has plastic in its hex, the
    /// rolling player first.
    fn count_units(&self, set: &UnitAttrsSet) -> (UnitCounts, UnitCounts) {
        let mut mine = UnitCounts::new();
        let mut theirs = UnitCounts::new();
        let mut plastic: HashSet<(Hex, u32)> = HashSet::new();

        let mut tokens: Vec<(&TableObject, Hex, String, u32)> = Vec::new();
        for obj in self.table.objects() {
            let Some(hex) = obj.hex else {
                continue;
            };
            if hex != self.hex && !hex.is_adjacent(self.hex) {
                continue;
            }
            let Some(nsid) = obj.parsed_nsid() else {
                continue;
            };
            match nsid.kind.as_str() {
                "unit" => {
                    if !set.contains(&nsid.name) {
                        continue;
                    }
                    let owner = self.table.color_slot(obj).or(obj.owning_slot);
                    let Some(owner) = owner else {
                        continue;
                    };
                    plastic.insert((hex, owner));
                    self.tally(&mut mine, &mut theirs, owner, hex, &nsid.name, 1);
                }
                "token" => {
                    let Some((unit, n)) = nsid.name.rsplit_once('_') else {
                        continue;
                    };
                    let Ok(n) = n.parse::<u32>() else {
                        continue;
                    };
                    if n > MAX_TOKEN_STACK {
                        tracing::warn!(
                            object = %obj.id,
                            nsid = %obj.nsid,
                            max = MAX_TOKEN_STACK,
                            "skipping oversized stack token"
                        );
                        continue;
                    }
                    if set.contains(unit) {
                        tokens.push((obj, hex, unit.to_string(), n));
                    }
                }
                _ => {}
            }
        }

        for (obj, hex, unit, n) in tokens {
            let owner = obj.owning_slot.or_else(|| {
                [Some(self.player_slot), self.opponent_slot]
                    .into_iter()
                    .flatten()
                    .find(|slot| plastic.contains(&(hex, *slot)))
            });
            if let Some(owner) = owner {
                self.tally(&mut mine, &mut theirs, owner, hex, &unit, n);
            }
        }
        (mine, theirs)
    }

    fn tally(
        &self,
        mine: &mut UnitCounts,
        theirs: &mut UnitCounts,
        owner: u32,
        hex: Hex,
        unit: &str,
        n: u32,
    ) {
        let counts = if owner == self.player_slot {
            mine
        } else if Some(owner) == self.opponent_slot {
            theirs
        } else {
            return;
        };
        if hex == self.hex {
            counts.add(unit, n);
        } else {
            counts.add_adjacent(unit, n);
        }
    }

    fn select_modifiers(
        &self,
        registry: &ModifierRegistry,
        set: &UnitAttrsSet,
        facts: &AuxFacts,
    ) -> Vec<Arc<UnitModifier>> {
        let mut selected =
            registry.player_modifiers(self.table, self.player_slot, ModifierOwner::OwnSide);
        if let Some(opponent) = self.opponent_slot {
            selected.extend(registry.player_modifiers(
                self.table,
                opponent,
                ModifierOwner::Opponent,
            ));
        }
        if let Some(faction) = self.faction {
            selected.extend(registry.faction_modifiers(faction, ModifierOwner::OwnSide));
        }
        if let Some(faction) = self.opponent_faction {
            selected.extend(registry.faction_modifiers(faction, ModifierOwner::Opponent));
        }
        let own_abilities = self.present_abilities(set, &facts.counts);
        selected.extend(registry.unit_ability_modifiers(&own_abilities, ModifierOwner::OwnSide));
        let their_abilities = self.present_abilities(set, &facts.opponent_counts);
        selected.extend(
            registry.unit_ability_modifiers(&their_abilities, ModifierOwner::Opponent),
        );
        selected.extend(registry.trigger_if_modifiers(facts));
        selected
    }

    /// Abilities of units in the hex, plus adjacent units that can fire from
    /// range for the current roll.
    fn present_abilities(&self, set: &UnitAttrsSet, counts: &UnitCounts) -> Vec<String> {
        let mut abilities = Vec::new();
        for attrs in set.values() {
            let ranged = self
                .roll_type
                .and_then(|rt| attrs.roll(rt))
                .is_some_and(|r| r.is_ranged());
            let present = counts.has(&attrs.unit) || (ranged && counts.has_adjacent(&attrs.unit));
            if !present {
                continue;
            }
            for ability in &attrs.abilities {
                if !abilities.contains(ability) {
                    abilities.push(ability.clone());
                }
            }
        }
        abilities
    }
}
