//! Combat roller: dice per unit, spawning, rolling, and reporting.

use std::rc::Rc;

use tt_core::{Position, Seat};

use crate::auxdata::AuxData;
use crate::broadcast::Broadcast;
use crate::config::RollerConfig;
use crate::dice::{DiceHost, UnitDie, UnitDieBuilder};
use crate::error::{RulesError, RulesResult};
use crate::messages;
use crate::unit::{RollAttrs, RollType};

/// Dice per unit type, in set order. Only units with dice appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiceCounts {
    entries: Vec<(String, u32)>,
}

impl DiceCounts {
    /// Dice for `unit`, if it rolls.
    pub fn get(&self, unit: &str) -> Option<u32> {
        self.entries.iter().find(|(u, _)| u == unit).map(|(_, n)| *n)
    }

    /// Total dice across units.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// `(unit, dice)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(u, n)| (u.as_str(), *n))
    }

    /// Number of unit types that roll.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing rolls.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Spawned dice grouped by unit, in set order.
pub type UnitDice = Vec<(String, Vec<UnitDie>)>;

/// Rolls one player's dice for one roll type.
#[derive(Debug, Clone)]
pub struct CombatRoller<'a> {
    aux: &'a AuxData,
    roll_type: RollType,
    player: &'a Seat,
    config: RollerConfig,
}

impl<'a> CombatRoller<'a> {
    /// Roller for `player` using an already-modified `aux`.
    pub fn new(aux: &'a AuxData, roll_type: RollType, player: &'a Seat) -> Self {
        Self {
            aux,
            roll_type,
            player,
            config: RollerConfig::default(),
        }
    }

    /// Override roller settings.
    pub fn with_config(mut self, config: RollerConfig) -> Self {
        self.config = config;
        self
    }

    /// Dice each unit type rolls.
    ///
    /// In-hex units roll their dice; adjacent units add theirs only when the
    /// descriptor has range. Flat extra dice apply only to a positive count.
    pub fn unit_to_dice_count(&self) -> DiceCounts {
        let mut counts = DiceCounts::default();
        for attrs in self.aux.unit_attrs_set().values() {
            let Some(roll) = attrs.roll(self.roll_type) else {
                continue;
            };
            let unit = attrs.unit.as_str();
            let per_unit = roll.dice_per_unit();
            let mut count: u32 = 0;
            if self.aux.has(unit) {
                count = count.saturating_add(self.aux.count(unit).saturating_mul(per_unit));
            }
            if roll.is_ranged() && self.aux.has_adjacent(unit) {
                count = count.saturating_add(self.aux.adjacent_count(unit).saturating_mul(per_unit));
            }
            if count > 0 {
                count = count.saturating_add(roll.extra_dice.unwrap_or(0));
                counts.entries.push((unit.to_string(), count));
            }
        }
        counts
    }

    /// Build unrolled dice for every unit that rolls.
    pub fn spawn_dice(&self, position: Position) -> RulesResult<UnitDice> {
        let mut unit_dice = Vec::new();
        for (unit, count) in self.unit_to_dice_count().iter() {
            let attrs = self
                .aux
                .unit_attrs_set()
                .get(unit)
                .ok_or_else(|| RulesError::UnknownUnit(unit.to_string()))?;
            let builder = UnitDieBuilder::new(attrs, self.roll_type)
                .with_spawn_position(position)
                .with_delete_after_seconds(self.config.delete_after_seconds);
            let dice = (0..count)
                .map(|_| builder.build())
                .collect::<RulesResult<Vec<_>>>()?;
            unit_dice.push((unit.to_string(), dice));
        }
        Ok(unit_dice)
    }

    /// Summary of active modifiers, optionally only combat ones.
    pub fn modifiers_report(&self, combat_only: bool) -> String {
        let modifiers: Vec<_> = self
            .aux
            .unit_modifiers()
            .iter()
            .filter(|m| !combat_only || m.is_combat)
            .collect();
        let list = if modifiers.is_empty() {
            messages::none()
        } else {
            modifiers
                .iter()
                .map(|m| format!("{} ({})", m.name, m.description))
                .collect::<Vec<_>>()
                .join(", ")
        };
        messages::roll_modifiers(modifiers.len(), &list)
    }

    fn reporter(&self) -> RollReporter {
        let headers = self
            .aux
            .unit_attrs_set()
            .values()
            .filter_map(|attrs| {
                let roll = attrs.roll(self.roll_type)?;
                Some((attrs.unit.clone(), unit_header(&attrs.name, roll)))
            })
            .collect();
        RollReporter {
            player_name: self.player.name.clone(),
            headers,
        }
    }

    /// Spawn and roll every die, reporting through `sink`.
    ///
    /// Announces the roll and the combat modifiers first. With no dice the
    /// host is never called. Otherwise the per-unit report goes out when the
    /// host completes the batch. Returns the spawned dice.
    pub fn roll(
        &self,
        position: Position,
        host: &mut dyn DiceHost,
        sink: Rc<dyn Broadcast>,
    ) -> RulesResult<Vec<UnitDie>> {
        let dice: Vec<UnitDie> = self
            .spawn_dice(position)?
            .into_iter()
            .flat_map(|(_, dice)| dice)
            .collect();

        sink.broadcast_all(&messages::player_rolling_for(&self.player.name, self.roll_type));
        sink.chat_all(&self.modifiers_report(true));

        if dice.is_empty() {
            sink.broadcast_all(&messages::no_units());
            return Ok(dice);
        }

        tracing::info!(
            player = %self.player.name,
            roll_type = %self.roll_type,
            dice = dice.len(),
            "rolling"
        );
        let reporter = self.reporter();
        host.roll(
            dice.clone(),
            Box::new(move |settled| sink.broadcast_all(&reporter.report(&settled))),
        );
        Ok(dice)
    }
}

/// `Name [hit:H(xN), crit(xK):V]: `
fn unit_header(name: &str, roll: &RollAttrs) -> String {
    let mut header = format!("{name} [{}:{}", messages::roll_hit(), roll.hit);
    if let Some(dice) = roll.dice.filter(|d| *d > 1) {
        header.push_str(&format!("(x{dice})"));
    }
    if let Some(crit) = &roll.extra_hits_on {
        header.push_str(&format!(
            ", {}(x{}):{}",
            messages::roll_crit(),
            crit.extra_hits() + 1,
            crit.value
        ));
    }
    header.push_str("]: ");
    header
}

/// Owned report state handed to the completion callback.
struct RollReporter {
    player_name: String,
    headers: Vec<(String, String)>,
}

impl RollReporter {
    fn report(&self, dice: &[UnitDie]) -> String {
        let mut lines = Vec::new();
        for (unit, header) in &self.headers {
            let values: Vec<String> = dice
                .iter()
                .filter(|d| &d.unit == unit)
                .map(UnitDie::value_str)
                .collect();
            if !values.is_empty() {
                lines.push(format!("{header}{}", values.join(", ")));
            }
        }
        let per_unit = if lines.is_empty() {
            messages::no_units()
        } else {
            lines.join(", ")
        };
        let hits: u32 = dice.iter().map(UnitDie::count_hits).sum();
        format!(
            "{}\n{}",
            messages::player_rolled(&self.player_name, &per_unit),
            messages::player_landed_hits(&self.player_name, hits)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auxdata::{AuxFacts, UnitCounts};
    use crate::broadcast::{Message, MessageLog};
    use crate::dice::RollComplete;
    use crate::modifier::{ModifierOwner, PriorityTier, Trigger, UnitModifier};
    use crate::unit::UnitAttrsSet;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn seat() -> Seat {
        Seat::new(0, "Ada", "White")
    }

    fn aux(counts: UnitCounts) -> AuxData {
        AuxData::new(AuxFacts::new(0, counts), UnitAttrsSet::default_set())
    }

    /// Settles dice to fixed faces, cycling.
    struct ScriptedDice {
        faces: Vec<u32>,
        calls: usize,
    }

    impl DiceHost for ScriptedDice {
        fn roll(&mut self, mut dice: Vec<UnitDie>, on_complete: RollComplete) {
            self.calls += 1;
            for (i, die) in dice.iter_mut().enumerate() {
                die.value = Some(self.faces[i % self.faces.len()]);
            }
            on_complete(dice);
        }
    }

    /// Holds the batch until the test settles it.
    #[derive(Default)]
    struct DeferredDice {
        pending: Option<(Vec<UnitDie>, RollComplete)>,
    }

    impl DiceHost for DeferredDice {
        fn roll(&mut self, dice: Vec<UnitDie>, on_complete: RollComplete) {
            self.pending = Some((dice, on_complete));
        }
    }

    #[test]
    fn extra_dice_only_add_to_positive_counts() {
        let mut aux = aux(UnitCounts::new().with("cruiser", 2));
        for unit in ["cruiser", "carrier"] {
            aux.unit_attrs_set_mut()
                .get_mut(unit)
                .and_then(|u| u.roll_mut(RollType::SpaceCombat))
                .unwrap()
                .add_extra_dice(1);
        }
        let seat = seat();
        let counts = CombatRoller::new(&aux, RollType::SpaceCombat, &seat).unit_to_dice_count();
        assert_eq!(counts.get("cruiser"), Some(3));
        assert_eq!(counts.get("carrier"), None);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn adjacent_units_need_range() {
        let mut aux = aux(UnitCounts::new().with_adjacent("pds", 2).with_adjacent("dreadnought", 1));
        let seat = seat();
        let roller = CombatRoller::new(&aux, RollType::SpaceCannon, &seat);
        assert!(roller.unit_to_dice_count().is_empty());

        aux.unit_attrs_set_mut()
            .get_mut("pds")
            .unwrap()
            .set_roll(RollType::SpaceCannon, Some(RollAttrs::new(5).with_range(1)));
        let roller = CombatRoller::new(&aux, RollType::SpaceCannon, &seat);
        let counts = roller.unit_to_dice_count();
        assert_eq!(counts.get("pds"), Some(2));
        assert_eq!(counts.get("dreadnought"), None);
    }

    #[test]
    fn multi_dice_units() {
        let aux = aux(UnitCounts::new().with("war_sun", 2).with("flagship", 1));
        let seat = seat();
        let counts = CombatRoller::new(&aux, RollType::SpaceCombat, &seat).unit_to_dice_count();
        assert_eq!(counts.get("war_sun"), Some(6));
        assert_eq!(counts.get("flagship"), Some(2));
        let order: Vec<_> = counts.iter().map(|(u, _)| u).collect();
        assert_eq!(order, vec!["flagship", "war_sun"]);
    }

    #[test]
    fn spawn_dice_per_unit() {
        let aux = aux(UnitCounts::new().with("carrier", 2));
        let seat = seat();
        let spawned = CombatRoller::new(&aux, RollType::SpaceCombat, &seat)
            .spawn_dice(Position::new(1.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(spawned.len(), 1);
        let (unit, dice) = &spawned[0];
        assert_eq!(unit, "carrier");
        assert_eq!(dice.len(), 2);
        assert!(dice.iter().all(|d| d.delete_after_seconds == Some(30) && d.value.is_none()));
    }

    #[test]
    fn modifiers_report_lists_or_says_none() {
        let mut aux = aux(UnitCounts::new());
        let seat = seat();
        assert_eq!(
            CombatRoller::new(&aux, RollType::SpaceCombat, &seat).modifiers_report(true),
            "Roll modifiers (0): none"
        );
        let boost = UnitModifier::new(
            "Boost",
            "+1",
            PriorityTier::Adjust,
            ModifierOwner::OwnSide,
            Trigger::If(|_| true),
        )
        .combat();
        let drive = UnitModifier::new(
            "Drive",
            "+1 move",
            PriorityTier::Choose,
            ModifierOwner::OwnSide,
            Trigger::If(|_| true),
        );
        aux.apply_unit_modifiers(vec![Arc::new(boost), Arc::new(drive)]);
        let roller = CombatRoller::new(&aux, RollType::SpaceCombat, &seat);
        assert_eq!(roller.modifiers_report(true), "Roll modifiers (1): Boost (+1)");
        assert_eq!(
            roller.modifiers_report(false),
            "Roll modifiers (2): Boost (+1), Drive (+1 move)"
        );
    }

    #[test]
    fn zero_dice_never_touches_host() {
        let aux = aux(UnitCounts::new().with("space_dock", 1));
        let seat = seat();
        let log = Rc::new(MessageLog::new());
        let mut host = ScriptedDice {
            faces: vec![10],
            calls: 0,
        };
        let dice = CombatRoller::new(&aux, RollType::SpaceCombat, &seat)
            .roll(Position::default(), &mut host, log.clone())
            .unwrap();
        assert!(dice.is_empty());
        assert_eq!(host.calls, 0);
        assert_eq!(
            log.messages(),
            vec![
                Message::All("Ada rolling for Space Combat".into()),
                Message::Chat("Roll modifiers (0): none".into()),
                Message::All("No units".into()),
            ]
        );
    }

    #[test]
    fn roll_reports_values_and_hits() {
        let aux = aux(UnitCounts::new().with("carrier", 2).with("flagship", 1));
        let seat = seat();
        let log = Rc::new(MessageLog::new());
        let mut host = ScriptedDice {
            faces: vec![10, 3, 9, 10],
            calls: 0,
        };
        let dice = CombatRoller::new(&aux, RollType::SpaceCombat, &seat)
            .roll(Position::default(), &mut host, log.clone())
            .unwrap();
        assert_eq!(dice.len(), 4);
        assert_eq!(host.calls, 1);
        let texts = log.texts();
        assert_eq!(texts.len(), 3);
        // carrier: 10 hit, 3 miss; flagship: 9 hit, 10 crit
        assert_eq!(
            texts[2],
            "Ada rolled: Carrier [hit:9]: 10#, 3, Flagship [hit:7(x2), crit(x2):10]: 9#, 10##\n\
             Ada landed 4 hit(s)"
        );
    }

    #[test]
    fn report_waits_for_completion() {
        let aux = aux(UnitCounts::new().with("cruiser", 1));
        let seat = seat();
        let log = Rc::new(MessageLog::new());
        let mut host = DeferredDice::default();
        CombatRoller::new(&aux, RollType::SpaceCombat, &seat)
            .roll(Position::default(), &mut host, log.clone())
            .unwrap();
        assert_eq!(log.texts().len(), 2);

        let (mut dice, on_complete) = host.pending.take().unwrap();
        dice[0].value = Some(2);
        on_complete(dice);
        let texts = log.texts();
        assert_eq!(texts.len(), 3);
        assert!(texts[2].ends_with("Ada landed 0 hit(s)"));
    }

    #[test]
    fn dice_counts_saturate() {
        let mut aux = aux(
            UnitCounts::new()
                .with("cruiser", u32::MAX)
                .with_adjacent("cruiser", u32::MAX),
        );
        let mut roll = RollAttrs::new(7).with_dice(3).with_range(1);
        roll.extra_dice = Some(2);
        aux.unit_attrs_set_mut()
            .get_mut("cruiser")
            .unwrap()
            .set_roll(RollType::SpaceCombat, Some(roll));
        let seat = seat();
        let counts = CombatRoller::new(&aux, RollType::SpaceCombat, &seat).unit_to_dice_count();
        assert_eq!(counts.get("cruiser"), Some(u32::MAX));
    }

    proptest! {
        #[test]
        fn dice_count_formula(n in 0u32..20, adj in 0u32..20, dice in 1u32..4, extra in 0u32..3, range in 0u32..2) {
            let mut aux = aux(UnitCounts::new().with("cruiser", n).with_adjacent("cruiser", adj));
            let mut roll = RollAttrs::new(7).with_dice(dice).with_range(range);
            if extra > 0 {
                roll.extra_dice = Some(extra);
            }
            aux.unit_attrs_set_mut()
                .get_mut("cruiser")
                .unwrap()
                .set_roll(RollType::SpaceCombat, Some(roll));
            let seat = seat();
            let counts = CombatRoller::new(&aux, RollType::SpaceCombat, &seat).unit_to_dice_count();
            let base = n * dice + if range > 0 { adj * dice } else { 0 };
            let expected = if base > 0 { Some(base + extra) } else { None };
            prop_assert_eq!(counts.get("cruiser"), expected);
        }
    }
}
