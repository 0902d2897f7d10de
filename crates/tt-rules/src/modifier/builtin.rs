//! The built-in modifier table.
//!
//! Registration order here is the tiebreak inside a priority tier.

use crate::auxdata::{AuxFacts, UnitCounts};
use crate::unit::{RollType, UnitAttrs, UnitAttrsSet};

use super::{ModifierOwner, PriorityTier, Trigger, UnitModifier};

fn adjust_combat_hit(attrs: &mut UnitAttrs, delta: i32) {
    for roll_type in [RollType::SpaceCombat, RollType::GroundCombat] {
        if let Some(roll) = attrs.roll_mut(roll_type) {
            roll.adjust_hit(delta);
        }
    }
}

fn present(counts: &UnitCounts, attrs: &UnitAttrs, roll_type: RollType) -> bool {
    let ranged = attrs.roll(roll_type).is_some_and(|r| r.is_ranged());
    counts.has(&attrs.unit) || (ranged && counts.has_adjacent(&attrs.unit))
}

/// Unit key of the present unit with the best (lowest) hit for `roll_type`.
/// Ties keep set order.
fn best_present_unit(set: &UnitAttrsSet, facts: &AuxFacts, roll_type: RollType) -> Option<String> {
    set.values()
        .filter(|attrs| present(&facts.counts, attrs, roll_type))
        .filter_map(|attrs| attrs.roll(roll_type).map(|r| (attrs, r.hit)))
        .min_by_key(|(_, hit)| *hit)
        .map(|(attrs, _)| attrs.unit.clone())
}

fn morale_boost() -> UnitModifier {
    UnitModifier::new(
        "Morale Boost",
        "+1 to all combat rolls this round",
        PriorityTier::Adjust,
        ModifierOwner::OwnSide,
        Trigger::Nsid("card.action:base/morale_boost".into()),
    )
    .combat()
    .each(|attrs, _| adjust_combat_hit(attrs, -1))
}

fn fighter_prototype() -> UnitModifier {
    UnitModifier::new(
        "Fighter Prototype",
        "+2 to fighter combat rolls this round",
        PriorityTier::Adjust,
        ModifierOwner::OwnSide,
        Trigger::Nsid("card.action:base/fighter_prototype".into()),
    )
    .combat()
    .each(|attrs, _| {
        if attrs.unit != "fighter" {
            return;
        }
        if let Some(roll) = attrs.roll_mut(RollType::SpaceCombat) {
            roll.adjust_hit(-2);
        }
    })
}

fn disable() -> UnitModifier {
    UnitModifier::new(
        "Disable",
        "PDS lose planetary shield and space cannon",
        PriorityTier::Mutate,
        ModifierOwner::Opponent,
        Trigger::Nsid("card.action:base/disable".into()),
    )
    .combat()
    .each(|attrs, _| {
        if attrs.unit == "pds" {
            attrs.planetary_shield = Some(false);
            attrs.abilities.retain(|a| a != "planetary_shield");
            attrs.set_roll(RollType::SpaceCannon, None);
        }
    })
}

fn articles_of_war() -> UnitModifier {
    UnitModifier::new(
        "Articles of War",
        "Mechs lose all abilities except sustain damage",
        PriorityTier::MutateEarly,
        ModifierOwner::Any,
        Trigger::Nsid("card.agenda:base/articles_of_war".into()),
    )
    .each(|attrs, _| {
        if attrs.unit == "mech" {
            attrs.abilities.retain(|a| a == "sustain_damage");
        }
    })
}

fn antimass_deflectors() -> UnitModifier {
    UnitModifier::new(
        "Antimass Deflectors",
        "-1 to space cannon rolls against this player",
        PriorityTier::Adjust,
        ModifierOwner::Opponent,
        Trigger::Nsid("card.technology.blue:base/antimass_deflectors".into()),
    )
    .combat()
    .each(|attrs, _| {
        if let Some(roll) = attrs.roll_mut(RollType::SpaceCannon) {
            roll.adjust_hit(1);
        }
    })
}

fn plasma_scoring() -> UnitModifier {
    UnitModifier::new(
        "Plasma Scoring",
        "One additional die for one unit's bombardment or space cannon",
        PriorityTier::Choose,
        ModifierOwner::OwnSide,
        Trigger::Nsid("card.technology.red:base/plasma_scoring".into()),
    )
    .combat()
    .all(|set, facts| {
        for roll_type in [RollType::Bombardment, RollType::SpaceCannon] {
            let Some(unit) = best_present_unit(set, facts, roll_type) else {
                continue;
            };
            if let Some(roll) = set.get_mut(&unit).and_then(|u| u.roll_mut(roll_type)) {
                roll.add_extra_dice(1);
            }
        }
    })
}

fn gravity_drive() -> UnitModifier {
    UnitModifier::new(
        "Gravity Drive",
        "+1 move to one ship",
        PriorityTier::Choose,
        ModifierOwner::OwnSide,
        Trigger::Nsid("card.technology.blue:base/gravity_drive".into()),
    )
    .all(|set, facts| {
        let slowest = set
            .values()
            .filter(|attrs| attrs.is_ship() && facts.counts.has(&attrs.unit))
            .filter_map(|attrs| attrs.movement.map(|m| (attrs.unit.clone(), m)))
            .min_by_key(|(_, m)| *m)
            .map(|(unit, _)| unit);
        if let Some(attrs) = slowest.and_then(|unit| set.get_mut(&unit)) {
            attrs.movement = attrs.movement.map(|m| m + 1);
        }
    })
}

fn tekklar_legion() -> UnitModifier {
    UnitModifier::new(
        "Tekklar Legion",
        "+1 to ground combat rolls",
        PriorityTier::Adjust,
        ModifierOwner::OwnSide,
        Trigger::Nsids(vec![
            "card.promissory.norr:base/tekklar_legion".into(),
            "card.promissory.norr:base.omega/tekklar_legion".into(),
        ]),
    )
    .combat()
    .each(|attrs, _| {
        if let Some(roll) = attrs.roll_mut(RollType::GroundCombat) {
            roll.adjust_hit(-1);
        }
    })
}

fn fragile() -> UnitModifier {
    UnitModifier::new(
        "Fragile",
        "-1 to all combat rolls",
        PriorityTier::Adjust,
        ModifierOwner::OwnSide,
        Trigger::FactionAbility("fragile".into()),
    )
    .combat()
    .each(|attrs, _| adjust_combat_hit(attrs, 1))
}

fn unrelenting() -> UnitModifier {
    UnitModifier::new(
        "Unrelenting",
        "+1 to all combat rolls",
        PriorityTier::Adjust,
        ModifierOwner::OwnSide,
        Trigger::FactionAbility("unrelenting".into()),
    )
    .combat()
    .each(|attrs, _| adjust_combat_hit(attrs, -1))
}

fn war_sun() -> UnitModifier {
    UnitModifier::new(
        "War Sun",
        "Other players' planetary shields are ignored",
        PriorityTier::Mutate,
        ModifierOwner::Opponent,
        Trigger::UnitAbility("war_sun".into()),
    )
    .combat()
    .each(|attrs, _| {
        if attrs.planetary_shield.is_some() {
            attrs.planetary_shield = Some(false);
        }
    })
}

fn nebula_defender() -> UnitModifier {
    UnitModifier::new(
        "Nebula",
        "+1 to combat rolls for the defender in a nebula",
        PriorityTier::Adjust,
        ModifierOwner::Any,
        Trigger::If(|facts| {
            facts.in_nebula && facts.is_defender && facts.roll_type == Some(RollType::SpaceCombat)
        }),
    )
    .combat()
    .each(|attrs, _| {
        if let Some(roll) = attrs.roll_mut(RollType::SpaceCombat) {
            roll.adjust_hit(-1);
        }
    })
}

/// Every built-in modifier, in registration order.
pub fn builtin_modifiers() -> Vec<UnitModifier> {
    vec![
        articles_of_war(),
        disable(),
        war_sun(),
        morale_boost(),
        fighter_prototype(),
        antimass_deflectors(),
        tekklar_legion(),
        fragile(),
        unrelenting(),
        nebula_defender(),
        plasma_scoring(),
        gravity_drive(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(set: &UnitAttrsSet, unit: &str, roll_type: RollType) -> Option<u32> {
        set.get(unit).and_then(|u| u.roll(roll_type)).map(|r| r.hit)
    }

    #[test]
    fn morale_boost_improves_combat_rolls() {
        let mut set = UnitAttrsSet::default_set();
        morale_boost().apply(&mut set, &AuxFacts::default());
        assert_eq!(hit(&set, "carrier", RollType::SpaceCombat), Some(8));
        assert_eq!(hit(&set, "infantry", RollType::GroundCombat), Some(7));
        assert_eq!(hit(&set, "pds", RollType::SpaceCannon), Some(6));
    }

    #[test]
    fn disable_strips_pds() {
        let mut set = UnitAttrsSet::default_set();
        disable().apply(&mut set, &AuxFacts::default());
        let pds = set.get("pds").unwrap();
        assert_eq!(pds.planetary_shield, Some(false));
        assert!(pds.roll(RollType::SpaceCannon).is_none());
        assert!(!pds.has_ability("planetary_shield"));
    }

    #[test]
    fn plasma_scoring_picks_best_present_unit() {
        let mut set = UnitAttrsSet::default_set();
        let facts = AuxFacts::new(0, UnitCounts::new().with("dreadnought", 1).with("war_sun", 1));
        plasma_scoring().apply(&mut set, &facts);
        let bombard = |unit: &str| {
            set.get(unit)
                .and_then(|u| u.roll(RollType::Bombardment))
                .and_then(|r| r.extra_dice)
        };
        assert_eq!(bombard("war_sun"), Some(1));
        assert_eq!(bombard("dreadnought"), None);
    }

    #[test]
    fn plasma_scoring_considers_ranged_adjacent_units() {
        let mut set = UnitAttrsSet::default_set();
        set.get_mut("pds")
            .unwrap()
            .set_roll(RollType::SpaceCannon, Some(crate::unit::RollAttrs::new(5).with_range(1)));
        let facts = AuxFacts::new(0, UnitCounts::new().with_adjacent("pds", 2));
        plasma_scoring().apply(&mut set, &facts);
        let extra = set
            .get("pds")
            .and_then(|u| u.roll(RollType::SpaceCannon))
            .and_then(|r| r.extra_dice);
        assert_eq!(extra, Some(1));
    }

    #[test]
    fn gravity_drive_boosts_slowest_present_ship() {
        let mut set = UnitAttrsSet::default_set();
        let facts = AuxFacts::new(0, UnitCounts::new().with("cruiser", 1).with("carrier", 1));
        gravity_drive().apply(&mut set, &facts);
        assert_eq!(set.get("carrier").unwrap().movement, Some(2));
        assert_eq!(set.get("cruiser").unwrap().movement, Some(2));
    }

    #[test]
    fn articles_of_war_keeps_sustain_damage() {
        let mut set = UnitAttrsSet::default_set();
        set.get_mut("mech").unwrap().abilities.push("deploy".into());
        articles_of_war().apply(&mut set, &AuxFacts::default());
        assert_eq!(set.get("mech").unwrap().abilities, vec!["sustain_damage".to_string()]);
    }

    #[test]
    fn nebula_requires_defender_in_space_combat() {
        let Trigger::If(predicate) = nebula_defender().trigger else {
            panic!("nebula modifier should be predicate-triggered");
        };
        let mut facts = AuxFacts::default().with_roll_type(RollType::SpaceCombat);
        facts.in_nebula = true;
        assert!(!predicate(&facts));
        facts.is_defender = true;
        assert!(predicate(&facts));
    }
}
