//! Trigger tables and table selection.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, OnceLock};

use tt_core::Table;

use crate::auxdata::AuxFacts;
use crate::error::{RulesError, RulesResult};
use crate::faction::Faction;

use super::{ModifierOwner, Trigger, UnitModifier, builtin};

static GLOBAL: OnceLock<Result<ModifierRegistry, String>> = OnceLock::new();

/// Trigger tables mapping keys to the modifiers they activate.
#[derive(Debug, Default)]
pub struct ModifierRegistry {
    all: Vec<Arc<UnitModifier>>,
    by_nsid: HashMap<String, Arc<UnitModifier>>,
    by_faction_ability: HashMap<String, Arc<UnitModifier>>,
    by_unit_ability: HashMap<String, Arc<UnitModifier>>,
    trigger_if: Vec<Arc<UnitModifier>>,
}

fn claim(
    table: &mut HashMap<String, Arc<UnitModifier>>,
    kind: &'static str,
    key: &str,
    modifier: &Arc<UnitModifier>,
) -> RulesResult<()> {
    match table.entry(key.to_string()) {
        Entry::Occupied(_) => Err(RulesError::DuplicateTrigger {
            kind,
            key: key.to_string(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(Arc::clone(modifier));
            Ok(())
        }
    }
}

impl ModifierRegistry {
    /// Index `modifiers` by trigger, in order.
    ///
    /// Fails if two modifiers claim the same nsid, faction ability or unit
    /// ability.
    pub fn build(modifiers: impl IntoIterator<Item = UnitModifier>) -> RulesResult<Self> {
        let mut registry = Self::default();
        for (index, mut modifier) in modifiers.into_iter().enumerate() {
            modifier.set_registration(index);
            let modifier = Arc::new(modifier);
            match &modifier.trigger {
                Trigger::Nsid(nsid) => {
                    claim(&mut registry.by_nsid, "nsid", nsid, &modifier)?;
                }
                Trigger::Nsids(nsids) => {
                    for nsid in nsids {
                        claim(&mut registry.by_nsid, "nsid", nsid, &modifier)?;
                    }
                }
                Trigger::FactionAbility(ability) => {
                    claim(
                        &mut registry.by_faction_ability,
                        "faction ability",
                        ability,
                        &modifier,
                    )?;
                }
                Trigger::UnitAbility(ability) => {
                    claim(
                        &mut registry.by_unit_ability,
                        "unit ability",
                        ability,
                        &modifier,
                    )?;
                }
                Trigger::If(_) => registry.trigger_if.push(Arc::clone(&modifier)),
            }
            registry.all.push(modifier);
        }
        tracing::debug!(modifiers = registry.all.len(), "built modifier registry");
        Ok(registry)
    }

    /// The process-wide registry of built-in modifiers, built on first use.
    pub fn global() -> RulesResult<&'static ModifierRegistry> {
        GLOBAL
            .get_or_init(|| Self::build(builtin::builtin_modifiers()).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| RulesError::InvalidConfig(e.clone()))
    }

    /// Every registered modifier, in registration order.
    pub fn modifiers(&self) -> &[Arc<UnitModifier>] {
        &self.all
    }

    /// Number of registered modifiers.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Modifier triggered by a card nsid.
    pub fn nsid_modifier(&self, nsid: &str) -> Option<&Arc<UnitModifier>> {
        self.by_nsid.get(nsid)
    }

    /// Modifier triggered by a faction ability.
    pub fn faction_ability_modifier(&self, ability: &str) -> Option<&Arc<UnitModifier>> {
        self.by_faction_ability.get(ability)
    }

    /// Modifier triggered by a unit ability.
    pub fn unit_ability_modifier(&self, ability: &str) -> Option<&Arc<UnitModifier>> {
        self.by_unit_ability.get(ability)
    }

    /// Modifiers from loose cards on the table.
    ///
    /// Self and opponent modifiers must match `owner` and sit in front of
    /// `slot` (assigned owner, else nearest seat). `Any` modifiers are taken
    /// from every loose card. Faction abilities are not included.
    pub fn player_modifiers(
        &self,
        table: &Table,
        slot: u32,
        owner: ModifierOwner,
    ) -> Vec<Arc<UnitModifier>> {
        let mut found = Vec::new();
        for obj in table.objects() {
            let Some(modifier) = self.by_nsid.get(&obj.nsid) else {
                continue;
            };
            if !obj.is_loose_card() {
                continue;
            }
            if modifier.owner != ModifierOwner::Any {
                if modifier.owner != owner {
                    continue;
                }
                if table.owner_slot(obj) != Some(slot) {
                    continue;
                }
            }
            tracing::debug!(modifier = %modifier.name, card = %obj.id, slot, "found card modifier");
            found.push(Arc::clone(modifier));
        }
        found
    }

    /// Modifiers granted by a faction's abilities.
    pub fn faction_modifiers(&self, faction: &Faction, owner: ModifierOwner) -> Vec<Arc<UnitModifier>> {
        self.ability_modifiers(&self.by_faction_ability, &faction.abilities, owner)
    }

    /// Modifiers granted by unit abilities present in a resolution.
    pub fn unit_ability_modifiers(
        &self,
        abilities: &[String],
        owner: ModifierOwner,
    ) -> Vec<Arc<UnitModifier>> {
        self.ability_modifiers(&self.by_unit_ability, abilities, owner)
    }

    fn ability_modifiers(
        &self,
        table: &HashMap<String, Arc<UnitModifier>>,
        abilities: &[String],
        owner: ModifierOwner,
    ) -> Vec<Arc<UnitModifier>> {
        abilities
            .iter()
            .filter_map(|ability| table.get(ability))
            .filter(|modifier| modifier.owner.admits(owner))
            .cloned()
            .collect()
    }

    /// Predicate modifiers whose predicate holds for `facts`.
    pub fn trigger_if_modifiers(&self, facts: &AuxFacts) -> Vec<Arc<UnitModifier>> {
        self.trigger_if
            .iter()
            .filter(|modifier| match modifier.trigger {
                Trigger::If(predicate) => predicate(facts),
                _ => false,
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::PriorityTier;
    use tt_core::{Position, Seat, SeatDirectory, TableObject};

    fn card(name: &str, owner: ModifierOwner) -> UnitModifier {
        UnitModifier::new(
            name,
            "",
            PriorityTier::Adjust,
            owner,
            Trigger::Nsid(format!("card.action:test/{name}")),
        )
    }

    fn table() -> Table {
        let seats = SeatDirectory::new(vec![
            Seat::new(0, "Ada", "White").with_position(Position::new(50.0, 0.0, 0.0)),
            Seat::new(1, "Bo", "Blue").with_position(Position::new(-50.0, 0.0, 0.0)),
        ]);
        Table::new(seats)
            .with_object(TableObject::new("a", "card.action:test/mine").with_owner(0))
            .with_object(
                TableObject::new("b", "card.action:test/theirs")
                    .with_position(Position::new(-45.0, 0.0, 0.0)),
            )
            .with_object(TableObject::new("c", "card.action:test/shared").with_owner(1))
            .with_object(
                TableObject::new("d", "card.action:test/stacked")
                    .with_owner(0)
                    .with_stack_size(2),
            )
    }

    fn registry() -> ModifierRegistry {
        ModifierRegistry::build(vec![
            card("mine", ModifierOwner::OwnSide),
            card("theirs", ModifierOwner::Opponent),
            card("shared", ModifierOwner::Any),
            card("stacked", ModifierOwner::OwnSide),
        ])
        .unwrap()
    }

    fn names(mods: &[Arc<UnitModifier>]) -> Vec<&str> {
        mods.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn builtin_table_builds() {
        let registry = ModifierRegistry::global().unwrap();
        assert!(!registry.is_empty());
        assert!(registry.nsid_modifier("card.action:base/morale_boost").is_some());
        assert!(registry.faction_ability_modifier("fragile").is_some());
        assert!(registry.unit_ability_modifier("war_sun").is_some());
    }

    #[test]
    fn duplicate_nsid_is_fatal() {
        let err = ModifierRegistry::build(vec![
            card("mine", ModifierOwner::OwnSide),
            card("mine", ModifierOwner::Opponent),
        ])
        .unwrap_err();
        assert!(matches!(err, RulesError::DuplicateTrigger { kind: "nsid", .. }));
    }

    #[test]
    fn duplicate_nsid_within_list_is_fatal() {
        let m = UnitModifier::new(
            "twice",
            "",
            PriorityTier::Adjust,
            ModifierOwner::OwnSide,
            Trigger::Nsids(vec!["card.x:a/b".into(), "card.x:a/b".into()]),
        );
        assert!(ModifierRegistry::build(vec![m]).is_err());
    }

    #[test]
    fn duplicate_abilities_are_fatal() {
        let faction = |name: &str| {
            UnitModifier::new(
                name,
                "",
                PriorityTier::Adjust,
                ModifierOwner::OwnSide,
                Trigger::FactionAbility("fragile".into()),
            )
        };
        let err = ModifierRegistry::build(vec![faction("a"), faction("b")]).unwrap_err();
        assert!(matches!(
            err,
            RulesError::DuplicateTrigger {
                kind: "faction ability",
                ..
            }
        ));
    }

    #[test]
    fn registration_order_is_recorded() {
        let registry = registry();
        let order: Vec<_> = registry.modifiers().iter().map(|m| m.registration()).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn own_side_selection() {
        let registry = registry();
        let table = table();
        let found = registry.player_modifiers(&table, 0, ModifierOwner::OwnSide);
        assert_eq!(names(&found), vec!["mine", "shared"]);
    }

    #[test]
    fn opponent_selection_uses_nearest_seat() {
        let registry = registry();
        let table = table();
        let found = registry.player_modifiers(&table, 1, ModifierOwner::Opponent);
        assert_eq!(names(&found), vec!["theirs", "shared"]);
        assert!(
            registry
                .player_modifiers(&table, 0, ModifierOwner::Opponent)
                .iter()
                .all(|m| m.name != "theirs")
        );
    }

    #[test]
    fn faction_selection_filters_by_owner() {
        let registry = ModifierRegistry::build(vec![
            UnitModifier::new(
                "Fragile",
                "",
                PriorityTier::Adjust,
                ModifierOwner::OwnSide,
                Trigger::FactionAbility("fragile".into()),
            ),
            UnitModifier::new(
                "Everyone",
                "",
                PriorityTier::Adjust,
                ModifierOwner::Any,
                Trigger::FactionAbility("brilliant".into()),
            ),
        ])
        .unwrap();
        let jolnar = Faction::builtin("jolnar").unwrap();
        assert_eq!(
            names(&registry.faction_modifiers(&jolnar, ModifierOwner::OwnSide)),
            vec!["Fragile", "Everyone"]
        );
        assert_eq!(
            names(&registry.faction_modifiers(&jolnar, ModifierOwner::Opponent)),
            vec!["Everyone"]
        );
    }

    #[test]
    fn trigger_if_evaluates_predicate() {
        let registry = ModifierRegistry::build(vec![UnitModifier::new(
            "nebula",
            "",
            PriorityTier::Adjust,
            ModifierOwner::Any,
            Trigger::If(|facts| facts.in_nebula),
        )])
        .unwrap();
        let mut facts = AuxFacts::default();
        assert!(registry.trigger_if_modifiers(&facts).is_empty());
        facts.in_nebula = true;
        assert_eq!(registry.trigger_if_modifiers(&facts).len(), 1);
    }
}
