use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RollerConfig;

use super::{DiceHost, RollComplete, UnitDie};

/// In-process dice primitive backed by a seeded RNG.
///
/// Settles the whole batch immediately and fires the completion once.
#[derive(Debug, Clone)]
pub struct RngDice {
    rng: StdRng,
    sides: u32,
}

impl RngDice {
    /// Dice seeded from `config`.
    pub fn new(config: &RollerConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            sides: config.die_sides.max(1),
        }
    }
}

impl Default for RngDice {
    fn default() -> Self {
        Self::new(&RollerConfig::default())
    }
}

impl DiceHost for RngDice {
    fn roll(&mut self, mut dice: Vec<UnitDie>, on_complete: RollComplete) {
        for die in &mut dice {
            die.value = Some(self.rng.random_range(1..=self.sides));
        }
        tracing::info!(dice = dice.len(), "dice settled");
        on_complete(dice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::UnitDieBuilder;
    use crate::unit::{RollType, UnitAttrsSet};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn dice(n: usize) -> Vec<UnitDie> {
        let set = UnitAttrsSet::default_set();
        let die = UnitDieBuilder::new(set.get("carrier").unwrap(), RollType::SpaceCombat)
            .build()
            .unwrap();
        vec![die; n]
    }

    fn roll(host: &mut RngDice, n: usize) -> Vec<UnitDie> {
        let out = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&out);
        host.roll(dice(n), Box::new(move |settled| sink.borrow_mut().extend(settled)));
        out.take()
    }

    #[test]
    fn settles_every_die_in_range() {
        let mut host = RngDice::default();
        let settled = roll(&mut host, 50);
        assert_eq!(settled.len(), 50);
        assert!(settled.iter().all(|d| matches!(d.value, Some(1..=10))));
    }

    #[test]
    fn same_seed_same_faces() {
        let config = RollerConfig::default().with_seed(7);
        let a: Vec<_> = roll(&mut RngDice::new(&config), 20).into_iter().map(|d| d.value).collect();
        let b: Vec<_> = roll(&mut RngDice::new(&config), 20).into_iter().map(|d| d.value).collect();
        assert_eq!(a, b);
    }
}
