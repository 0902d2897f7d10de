//! Unit attributes: roll descriptors, per-unit records, and upgrades.
//!
//! Base records come from [`catalog`] and are never mutated. Each resolution
//! works on its own [`UnitAttrsSet`] copy, which modifiers rewrite in place.

pub mod catalog;
pub mod set;

pub use set::UnitAttrsSet;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// A kind of dice roll a unit can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollType {
    /// Shots at fighters before space combat.
    AntiFighterBarrage,
    /// Ships firing on planets before invasion.
    Bombardment,
    /// Planet-based guns firing into space.
    SpaceCannon,
    /// Ship-to-ship combat rounds.
    SpaceCombat,
    /// Ground-force combat rounds.
    GroundCombat,
}

impl RollType {
    /// Every roll type, in catalog order.
    pub const ALL: [RollType; 5] = [
        Self::AntiFighterBarrage,
        Self::Bombardment,
        Self::SpaceCannon,
        Self::SpaceCombat,
        Self::GroundCombat,
    ];

    /// True for the two combat-round roll types.
    pub fn is_combat_round(self) -> bool {
        matches!(self, Self::SpaceCombat | Self::GroundCombat)
    }

    /// The camelCase key used in data files.
    pub fn key(self) -> &'static str {
        match self {
            Self::AntiFighterBarrage => "antiFighterBarrage",
            Self::Bombardment => "bombardment",
            Self::SpaceCannon => "spaceCannon",
            Self::SpaceCombat => "spaceCombat",
            Self::GroundCombat => "groundCombat",
        }
    }

    /// Parse a roll type from its key or a kebab/snake spelling.
    pub fn parse(s: &str) -> RulesResult<Self> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && *c != ' ')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|rt| rt.key().to_lowercase() == folded)
            .ok_or_else(|| RulesError::UnknownRollType(s.to_string()))
    }
}

impl fmt::Display for RollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AntiFighterBarrage => write!(f, "Anti-Fighter Barrage"),
            Self::Bombardment => write!(f, "Bombardment"),
            Self::SpaceCannon => write!(f, "Space Cannon"),
            Self::SpaceCombat => write!(f, "Space Combat"),
            Self::GroundCombat => write!(f, "Ground Combat"),
        }
    }
}

/// Extra hits scored when a die meets a higher threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraHitsOn {
    /// Minimum face value for the extra hits.
    pub value: u32,
    /// Extra hits scored (1 if absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl ExtraHitsOn {
    /// Number of extra hits this threshold grants.
    pub fn extra_hits(&self) -> u32 {
        self.count.unwrap_or(1)
    }
}

/// How a unit rolls for one roll type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollAttrs {
    /// Minimum face value that scores a hit.
    pub hit: u32,
    /// Dice per unit (1 if absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<u32>,
    /// Flat bonus dice for the whole unit type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_dice: Option<u32>,
    /// Crit threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_hits_on: Option<ExtraHitsOn>,
    /// How many hexes away the unit can fire from (0 = same hex only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,
}

impl RollAttrs {
    /// A single-die roll hitting on `hit` or better.
    pub fn new(hit: u32) -> Self {
        Self {
            hit,
            dice: None,
            extra_dice: None,
            extra_hits_on: None,
            range: None,
        }
    }

    /// Set dice per unit.
    pub fn with_dice(mut self, dice: u32) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Set firing range.
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = Some(range);
        self
    }

    /// Dice rolled per unit.
    pub fn dice_per_unit(&self) -> u32 {
        self.dice.unwrap_or(1)
    }

    /// True if units in adjacent hexes may also roll.
    pub fn is_ranged(&self) -> bool {
        self.range.is_some_and(|r| r > 0)
    }

    /// Improve (negative) or worsen (positive) the hit threshold.
    pub fn adjust_hit(&mut self, delta: i32) {
        self.hit = self.hit.saturating_add_signed(delta).max(1);
    }

    /// Add flat bonus dice.
    pub fn add_extra_dice(&mut self, n: u32) {
        self.extra_dice = Some(self.extra_dice.unwrap_or(0) + n);
    }
}

fn default_level() -> u32 {
    1
}

/// Attributes of one unit type.
///
/// Optional fields double as "defined" markers for upgrades: a delta only
/// overrides what it sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAttrs {
    /// Unit key, e.g. `carrier`.
    pub unit: String,
    /// Upgrade level (1 = printed unit).
    #[serde(default = "default_level")]
    pub level: u32,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Resource cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f32>,
    /// Units produced per cost paid, or production bonus for structures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produce: Option<u32>,
    /// Movement value.
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub movement: Option<u32>,
    /// Transport capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Unit is a ship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship: Option<bool>,
    /// Unit is a ground force.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground: Option<bool>,
    /// Unit is a structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<bool>,
    /// Unit can absorb one hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustain_damage: Option<bool>,
    /// Unit blocks bombardment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planetary_shield: Option<bool>,
    /// Ability keys that may trigger unit modifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<String>,
    /// Anti-fighter barrage descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_fighter_barrage: Option<RollAttrs>,
    /// Bombardment descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bombardment: Option<RollAttrs>,
    /// Space cannon descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_cannon: Option<RollAttrs>,
    /// Space combat descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_combat: Option<RollAttrs>,
    /// Ground combat descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_combat: Option<RollAttrs>,
}

impl UnitAttrs {
    /// An empty level-1 record for `unit`.
    pub fn new(unit: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            level: 1,
            name: name.into(),
            cost: None,
            produce: None,
            movement: None,
            capacity: None,
            ship: None,
            ground: None,
            structure: None,
            sustain_damage: None,
            planetary_shield: None,
            abilities: Vec::new(),
            anti_fighter_barrage: None,
            bombardment: None,
            space_cannon: None,
            space_combat: None,
            ground_combat: None,
        }
    }

    /// The roll descriptor for a roll type, if the unit has one.
    pub fn roll(&self, roll_type: RollType) -> Option<&RollAttrs> {
        match roll_type {
            RollType::AntiFighterBarrage => self.anti_fighter_barrage.as_ref(),
            RollType::Bombardment => self.bombardment.as_ref(),
            RollType::SpaceCannon => self.space_cannon.as_ref(),
            RollType::SpaceCombat => self.space_combat.as_ref(),
            RollType::GroundCombat => self.ground_combat.as_ref(),
        }
    }

    /// Mutable roll descriptor for a roll type.
    pub fn roll_mut(&mut self, roll_type: RollType) -> Option<&mut RollAttrs> {
        self.roll_slot(roll_type).as_mut()
    }

    /// Replace (or remove, with `None`) the descriptor for a roll type.
    pub fn set_roll(&mut self, roll_type: RollType, attrs: Option<RollAttrs>) {
        *self.roll_slot(roll_type) = attrs;
    }

    fn roll_slot(&mut self, roll_type: RollType) -> &mut Option<RollAttrs> {
        match roll_type {
            RollType::AntiFighterBarrage => &mut self.anti_fighter_barrage,
            RollType::Bombardment => &mut self.bombardment,
            RollType::SpaceCannon => &mut self.space_cannon,
            RollType::SpaceCombat => &mut self.space_combat,
            RollType::GroundCombat => &mut self.ground_combat,
        }
    }

    /// True if the unit is a ship.
    pub fn is_ship(&self) -> bool {
        self.ship.unwrap_or(false)
    }

    /// True if the unit declares `ability`.
    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| a == ability)
    }

    /// Overlay every field `delta` defines onto this record.
    ///
    /// Mutates in place and takes `delta.level`. A roll descriptor in the
    /// delta replaces the whole descriptor for that roll type. Fails without
    /// touching `self` if the units differ.
    pub fn upgrade(&mut self, delta: &UnitAttrs) -> RulesResult<()> {
        if self.unit != delta.unit {
            return Err(RulesError::UpgradeMismatch {
                base: self.unit.clone(),
                delta: delta.unit.clone(),
            });
        }
        self.level = delta.level;
        if !delta.name.is_empty() {
            self.name.clone_from(&delta.name);
        }
        if !delta.abilities.is_empty() {
            self.abilities.clone_from(&delta.abilities);
        }
        overlay(&mut self.cost, &delta.cost);
        overlay(&mut self.produce, &delta.produce);
        overlay(&mut self.movement, &delta.movement);
        overlay(&mut self.capacity, &delta.capacity);
        overlay(&mut self.ship, &delta.ship);
        overlay(&mut self.ground, &delta.ground);
        overlay(&mut self.structure, &delta.structure);
        overlay(&mut self.sustain_damage, &delta.sustain_damage);
        overlay(&mut self.planetary_shield, &delta.planetary_shield);
        for roll_type in RollType::ALL {
            if let Some(attrs) = delta.roll(roll_type) {
                self.set_roll(roll_type, Some(attrs.clone()));
            }
        }
        Ok(())
    }
}

fn overlay<T: Clone>(base: &mut Option<T>, delta: &Option<T>) {
    if delta.is_some() {
        base.clone_from(delta);
    }
}
