//! Unit modifiers: layered rules that rewrite unit attributes.
//!
//! A modifier moves through four stages. It is *registered* once in a
//! [`ModifierRegistry`], *selected* against the live table for one
//! resolution, *ordered* by [`PriorityTier`], and finally *applied* to that
//! resolution's [`UnitAttrsSet`].

pub mod builtin;
pub mod registry;

pub use registry::ModifierRegistry;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auxdata::AuxFacts;
use crate::unit::{UnitAttrs, UnitAttrsSet};

/// When a modifier runs relative to others.
///
/// `Mutate` tiers change what a unit *is*, `Adjust` tiers nudge numbers, and
/// `Choose` tiers pick a single unit after everything else has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    /// Value 9.
    #[serde(rename = "mutate.early")]
    MutateEarly,
    /// Value 10.
    #[serde(rename = "mutate")]
    Mutate,
    /// Value 11.
    #[serde(rename = "mutate.late")]
    MutateLate,
    /// Value 19.
    #[serde(rename = "adjust.early")]
    AdjustEarly,
    /// Value 20.
    #[serde(rename = "adjust")]
    Adjust,
    /// Value 21.
    #[serde(rename = "adjust.late")]
    AdjustLate,
    /// Value 29.
    #[serde(rename = "choose.early")]
    ChooseEarly,
    /// Value 30.
    #[serde(rename = "choose")]
    Choose,
    /// Value 30, tied with `Choose`; registration order breaks the tie.
    #[serde(rename = "choose.late")]
    ChooseLate,
}

impl PriorityTier {
    /// Sort key. Lower runs first.
    pub fn value(self) -> u32 {
        match self {
            Self::MutateEarly => 9,
            Self::Mutate => 10,
            Self::MutateLate => 11,
            Self::AdjustEarly => 19,
            Self::Adjust => 20,
            Self::AdjustLate => 21,
            Self::ChooseEarly => 29,
            Self::Choose | Self::ChooseLate => 30,
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MutateEarly => "mutate.early",
            Self::Mutate => "mutate",
            Self::MutateLate => "mutate.late",
            Self::AdjustEarly => "adjust.early",
            Self::Adjust => "adjust",
            Self::AdjustLate => "adjust.late",
            Self::ChooseEarly => "choose.early",
            Self::Choose => "choose",
            Self::ChooseLate => "choose.late",
        };
        write!(f, "{s}")
    }
}

/// Whose units a modifier affects, relative to the object that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOwner {
    /// The carrier's owner.
    #[serde(rename = "self")]
    OwnSide,
    /// The carrier owner's opponent.
    Opponent,
    /// Whoever is resolving, regardless of ownership.
    Any,
}

impl ModifierOwner {
    /// True if a modifier with this owner belongs in a `requested` scan.
    pub fn admits(self, requested: ModifierOwner) -> bool {
        self == Self::Any || self == requested
    }
}

impl fmt::Display for ModifierOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnSide => write!(f, "self"),
            Self::Opponent => write!(f, "opponent"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// Per-unit callback, run once for every record in the set.
pub type ApplyEach = fn(&mut UnitAttrs, &AuxFacts);
/// Whole-set callback, for rules that pick among units.
pub type ApplyAll = fn(&mut UnitAttrsSet, &AuxFacts);
/// Predicate deciding whether a generic modifier is active.
pub type TriggerIf = fn(&AuxFacts) -> bool;

/// What activates a modifier.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// A loose card with this nsid.
    Nsid(String),
    /// A loose card with any of these nsids.
    Nsids(Vec<String>),
    /// A faction ability key.
    FactionAbility(String),
    /// A unit ability key on a unit in the resolution.
    UnitAbility(String),
    /// A predicate over the resolution.
    If(TriggerIf),
}

/// The two optional capabilities of a modifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierEffect {
    /// Runs first, once per unit record.
    pub apply_each: Option<ApplyEach>,
    /// Runs second, once with the whole set.
    pub apply_all: Option<ApplyAll>,
}

/// One immutable rule that mutates unit attributes.
#[derive(Debug, Clone)]
pub struct UnitModifier {
    /// Display name.
    pub name: String,
    /// Short rules text.
    pub description: String,
    /// When it runs.
    pub priority: PriorityTier,
    /// Whose units it affects.
    pub owner: ModifierOwner,
    /// True if it matters for combat rolls.
    pub is_combat: bool,
    /// What activates it.
    pub trigger: Trigger,
    /// What it does.
    pub effect: ModifierEffect,
    registration: usize,
}

impl UnitModifier {
    /// Create a modifier with no effect yet.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        priority: PriorityTier,
        owner: ModifierOwner,
        trigger: Trigger,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            priority,
            owner,
            is_combat: false,
            trigger,
            effect: ModifierEffect::default(),
            registration: 0,
        }
    }

    /// Mark as relevant to combat rolls.
    pub fn combat(mut self) -> Self {
        self.is_combat = true;
        self
    }

    /// Set the per-unit callback.
    pub fn each(mut self, apply: ApplyEach) -> Self {
        self.effect.apply_each = Some(apply);
        self
    }

    /// Set the whole-set callback.
    pub fn all(mut self, apply: ApplyAll) -> Self {
        self.effect.apply_all = Some(apply);
        self
    }

    /// Position in the registry; the tiebreak within a tier.
    pub fn registration(&self) -> usize {
        self.registration
    }

    pub(crate) fn set_registration(&mut self, index: usize) {
        self.registration = index;
    }

    /// Apply to a set: the per-unit callback over every record in order,
    /// then the whole-set callback.
    pub fn apply(&self, unit_attrs_set: &mut UnitAttrsSet, facts: &AuxFacts) {
        if let Some(apply_each) = self.effect.apply_each {
            for unit_attrs in unit_attrs_set.values_mut() {
                apply_each(unit_attrs, facts);
            }
        }
        if let Some(apply_all) = self.effect.apply_all {
            apply_all(unit_attrs_set, facts);
        }
    }
}

/// Sort into apply order: by tier, then registration order.
///
/// The sort is stable, so two entries for the same modifier stay adjacent.
pub fn sort_priority_order(modifiers: &mut [Arc<UnitModifier>]) {
    modifiers.sort_by_key(|m| (m.priority.value(), m.registration));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auxdata::AuxFacts;
    use crate::unit::RollType;

    fn modifier(name: &str, priority: PriorityTier, registration: usize) -> Arc<UnitModifier> {
        let mut m = UnitModifier::new(
            name,
            "",
            priority,
            ModifierOwner::OwnSide,
            Trigger::Nsid(format!("card.action:test/{name}")),
        );
        m.set_registration(registration);
        Arc::new(m)
    }

    #[test]
    fn tiers_are_totally_ordered_except_choose_tie() {
        let tiers = [
            PriorityTier::MutateEarly,
            PriorityTier::Mutate,
            PriorityTier::MutateLate,
            PriorityTier::AdjustEarly,
            PriorityTier::Adjust,
            PriorityTier::AdjustLate,
            PriorityTier::ChooseEarly,
            PriorityTier::Choose,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].value() < pair[1].value());
        }
        assert_eq!(PriorityTier::Choose.value(), PriorityTier::ChooseLate.value());
    }

    #[test]
    fn sort_by_tier_then_registration() {
        let mut mods = vec![
            modifier("late_choose", PriorityTier::ChooseLate, 0),
            modifier("adjust", PriorityTier::Adjust, 3),
            modifier("choose", PriorityTier::Choose, 1),
            modifier("mutate", PriorityTier::Mutate, 2),
        ];
        sort_priority_order(&mut mods);
        let names: Vec<_> = mods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["mutate", "adjust", "late_choose", "choose"]);
    }

    #[test]
    fn tier_serde_names() {
        let tier: PriorityTier = serde_json::from_str("\"adjust.late\"").unwrap();
        assert_eq!(tier, PriorityTier::AdjustLate);
        assert_eq!(tier.to_string(), "adjust.late");
        let owner: ModifierOwner = serde_json::from_str("\"self\"").unwrap();
        assert_eq!(owner, ModifierOwner::OwnSide);
    }

    #[test]
    fn owner_admits() {
        assert!(ModifierOwner::Any.admits(ModifierOwner::OwnSide));
        assert!(ModifierOwner::Any.admits(ModifierOwner::Opponent));
        assert!(ModifierOwner::OwnSide.admits(ModifierOwner::OwnSide));
        assert!(!ModifierOwner::OwnSide.admits(ModifierOwner::Opponent));
    }

    #[test]
    fn apply_each_runs_before_apply_all() {
        // apply_each doubles, apply_all subtracts one: 9 -> 18 -> 17.
        // The reverse order would give 16.
        let m = UnitModifier::new(
            "both",
            "",
            PriorityTier::Adjust,
            ModifierOwner::Any,
            Trigger::If(|_| true),
        )
        .each(|attrs, _| {
            if let Some(roll) = attrs.roll_mut(RollType::SpaceCombat) {
                roll.hit *= 2;
            }
        })
        .all(|set, _| {
            if let Some(roll) = set
                .get_mut("carrier")
                .and_then(|u| u.roll_mut(RollType::SpaceCombat))
            {
                roll.hit -= 1;
            }
        });
        let mut set = UnitAttrsSet::default_set();
        m.apply(&mut set, &AuxFacts::default());
        let hit = set.get("carrier").and_then(|u| u.roll(RollType::SpaceCombat)).map(|r| r.hit);
        assert_eq!(hit, Some(17));
    }
}
