//! Unit dice and the host primitive that rolls them.

mod rng;

pub use rng::RngDice;

use tt_core::Position;

use crate::error::{RulesError, RulesResult};
use crate::unit::{ExtraHitsOn, RollType, UnitAttrs};

/// One die rolled for one unit.
///
/// The face value is unset until the host settles the die.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDie {
    /// Unit key the die rolls for.
    pub unit: String,
    /// Roll type.
    pub roll_type: RollType,
    /// Minimum face that hits.
    pub hit: u32,
    /// Crit threshold, if the unit has one.
    pub extra_hits_on: Option<ExtraHitsOn>,
    /// Settled face value.
    pub value: Option<u32>,
    /// Where the host should place the die.
    pub spawn_position: Position,
    /// Seconds until the host removes the die, if set.
    pub delete_after_seconds: Option<u32>,
}

impl UnitDie {
    /// True once settled on a hitting face.
    pub fn is_hit(&self) -> bool {
        self.value.is_some_and(|v| v >= self.hit)
    }

    /// True once settled on a crit face.
    pub fn is_crit(&self) -> bool {
        match (&self.extra_hits_on, self.value) {
            (Some(crit), Some(v)) => v >= crit.value,
            _ => false,
        }
    }

    /// Hits scored: 0 if unsettled or a miss, 1 for a hit, plus the crit
    /// count on a crit face.
    pub fn count_hits(&self) -> u32 {
        if !self.is_hit() {
            return 0;
        }
        match &self.extra_hits_on {
            Some(crit) if self.is_crit() => 1 + crit.extra_hits(),
            _ => 1,
        }
    }

    /// Face value with one `#` per hit, or `?` if unsettled.
    pub fn value_str(&self) -> String {
        match self.value {
            Some(value) => format!("{value}{}", "#".repeat(self.count_hits() as usize)),
            None => "?".to_string(),
        }
    }
}

/// Builds dice for one unit and roll type.
#[derive(Debug, Clone)]
pub struct UnitDieBuilder<'a> {
    attrs: &'a UnitAttrs,
    roll_type: RollType,
    spawn_position: Position,
    delete_after_seconds: Option<u32>,
}

impl<'a> UnitDieBuilder<'a> {
    /// Start a builder for `attrs` rolling `roll_type`.
    pub fn new(attrs: &'a UnitAttrs, roll_type: RollType) -> Self {
        Self {
            attrs,
            roll_type,
            spawn_position: Position::default(),
            delete_after_seconds: None,
        }
    }

    /// Set the spawn position.
    pub fn with_spawn_position(mut self, position: Position) -> Self {
        self.spawn_position = position;
        self
    }

    /// Remove the die this many seconds after it settles.
    pub fn with_delete_after_seconds(mut self, seconds: u32) -> Self {
        self.delete_after_seconds = Some(seconds);
        self
    }

    /// Build one unrolled die.
    pub fn build(&self) -> RulesResult<UnitDie> {
        let roll = self
            .attrs
            .roll(self.roll_type)
            .ok_or_else(|| RulesError::NoRollAttrs {
                unit: self.attrs.unit.clone(),
                roll_type: self.roll_type,
            })?;
        Ok(UnitDie {
            unit: self.attrs.unit.clone(),
            roll_type: self.roll_type,
            hit: roll.hit,
            extra_hits_on: roll.extra_hits_on.clone(),
            value: None,
            spawn_position: self.spawn_position,
            delete_after_seconds: self.delete_after_seconds,
        })
    }
}

/// Completion callback for a batch roll. Receives every die, settled.
pub type RollComplete = Box<dyn FnOnce(Vec<UnitDie>)>;

/// The host's dice primitive.
///
/// Implementations settle every die in the batch and then call
/// `on_complete` exactly once. They may do so later; the engine does not
/// wait.
pub trait DiceHost {
    /// Roll a batch of dice.
    fn roll(&mut self, dice: Vec<UnitDie>, on_complete: RollComplete);
}
