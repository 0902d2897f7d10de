//! The per-resolution unit attribute set.

use crate::error::{RulesError, RulesResult};

use super::{UnitAttrs, catalog};

/// Per-resolution mapping from unit key to its attributes.
///
/// Keys are unique and iterate in insertion order, which for catalog-built
/// sets is catalog order. A set is owned by exactly one resolution; cloning
/// is a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitAttrsSet {
    entries: Vec<UnitAttrs>,
}

impl UnitAttrsSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh copy of every base unit in the catalog.
    pub fn default_set() -> Self {
        Self::from_records(catalog::base_units())
    }

    /// A fresh copy of every upgrade delta in the catalog.
    pub fn default_upgrade_set() -> Self {
        Self::from_records(catalog::unit_upgrades())
    }

    fn from_records(records: Vec<UnitAttrs>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Insert or replace the record for `attrs.unit`.
    ///
    /// Replacing keeps the original position.
    pub fn insert(&mut self, attrs: UnitAttrs) {
        match self.entries.iter_mut().find(|e| e.unit == attrs.unit) {
            Some(existing) => *existing = attrs,
            None => self.entries.push(attrs),
        }
    }

    /// The record for a unit.
    pub fn get(&self, unit: &str) -> Option<&UnitAttrs> {
        self.entries.iter().find(|e| e.unit == unit)
    }

    /// The mutable record for a unit.
    pub fn get_mut(&mut self, unit: &str) -> Option<&mut UnitAttrs> {
        self.entries.iter_mut().find(|e| e.unit == unit)
    }

    /// True if the set has a record for `unit`.
    pub fn contains(&self, unit: &str) -> bool {
        self.get(unit).is_some()
    }

    /// Records in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &UnitAttrs> {
        self.entries.iter()
    }

    /// Mutable records in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut UnitAttrs> {
        self.entries.iter_mut()
    }

    /// Unit keys in insertion order.
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.unit.as_str())
    }

    /// Number of unit types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Upgrade `unit` in place using its delta from `upgrades`.
    pub fn upgrade_unit(&mut self, unit: &str, upgrades: &UnitAttrsSet) -> RulesResult<()> {
        let delta = upgrades
            .get(unit)
            .ok_or_else(|| RulesError::UnknownUnit(unit.to_string()))?;
        let base = self
            .get_mut(unit)
            .ok_or_else(|| RulesError::UnknownUnit(unit.to_string()))?;
        base.upgrade(delta)
    }
}
