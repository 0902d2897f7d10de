//! Error types for the rules engine.

use tt_core::CoreError;

use crate::unit::RollType;

/// Errors that can occur while building or running rules.
///
/// Configuration errors (`DuplicateTrigger`, `UpgradeMismatch`,
/// `InvalidConfig`) mean the rule data itself is wrong. They are raised
/// eagerly and never retried.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// Two modifiers claim the same trigger key.
    #[error("duplicate {kind} trigger: {key}")]
    DuplicateTrigger {
        /// Which trigger table collided ("nsid", "faction ability", "unit ability").
        kind: &'static str,
        /// The colliding key.
        key: String,
    },

    /// An upgrade delta was applied to a different unit type.
    #[error("cannot upgrade {base} with {delta} upgrade")]
    UpgradeMismatch {
        /// Unit of the record being upgraded.
        base: String,
        /// Unit named by the upgrade delta.
        delta: String,
    },

    /// A unit type is not in the attribute set.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// A unit has no roll descriptor for the requested roll type.
    #[error("{unit} cannot roll for {roll_type}")]
    NoRollAttrs {
        /// Unit type.
        unit: String,
        /// Requested roll type.
        roll_type: RollType,
    },

    /// A roll type name could not be parsed.
    #[error("unknown roll type: {0}")]
    UnknownRollType(String),

    /// A swap rule names something missing from the name table.
    #[error("unknown swap name: {0}")]
    UnknownSwapName(String),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// An error from the table model.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;
