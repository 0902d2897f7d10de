//! Rules engine for tabletop game automation.
//!
//! Reads a [`tt_core::Table`] snapshot and answers rules questions about it:
//! what each unit type can do once upgrades and modifiers are applied, how
//! many dice a player rolls, and which tokens can be traded for which. The
//! engine never touches the table directly; mutations go through
//! [`tt_core::TableHost`], dice through [`DiceHost`], and messages through
//! [`Broadcast`].

pub mod auxdata;
pub mod broadcast;
pub mod combat;
pub mod config;
pub mod dice;
pub mod error;
pub mod faction;
pub mod messages;
pub mod modifier;
pub mod strategy;
pub mod swap;
pub mod unit;

pub use auxdata::{AuxData, AuxDataBuilder, AuxFacts, UnitCounts};
pub use broadcast::{Broadcast, Message, MessageLog};
pub use combat::{CombatRoller, DiceCounts, UnitDice};
pub use config::{GameConfig, RollerConfig};
pub use dice::{DiceHost, RngDice, RollComplete, UnitDie, UnitDieBuilder};
pub use error::{RulesError, RulesResult};
pub use faction::Faction;
pub use modifier::{ModifierOwner, ModifierRegistry, PriorityTier, Trigger, UnitModifier};
pub use strategy::{Leadership, LeadershipSelection};
pub use swap::{SwapEngine, SwapOutcome, SwapRule};
pub use unit::{RollAttrs, RollType, UnitAttrs, UnitAttrsSet};
