//! Strategy card resolution.

use std::collections::HashMap;

use tt_core::Seat;

use crate::broadcast::Broadcast;
use crate::messages;

/// Highest value the leadership slider allows.
pub const LEADERSHIP_MAX_VALUE: u32 = 10;
/// Bonus tokens for the primary ability.
pub const LEADERSHIP_PRIMARY_BONUS: u32 = 3;

/// One player's leadership choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadershipSelection {
    /// Tokens bought with influence.
    pub value: u32,
    /// Resolving the primary ability.
    pub primary: bool,
}

impl LeadershipSelection {
    /// Command tokens gained.
    pub fn command_tokens(&self) -> u32 {
        if self.primary {
            self.value + LEADERSHIP_PRIMARY_BONUS
        } else {
            self.value
        }
    }
}

/// Leadership card state for one play.
#[derive(Debug, Clone, Default)]
pub struct Leadership {
    selections: HashMap<u32, LeadershipSelection>,
    activating_slot: Option<u32>,
}

impl Leadership {
    /// Fresh state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The card was played: forget old choices.
    pub fn on_card_played(&mut self, activating_slot: u32) {
        self.selections.clear();
        self.activating_slot = Some(activating_slot);
    }

    /// Who played the card.
    pub fn activating_slot(&self) -> Option<u32> {
        self.activating_slot
    }

    /// A player's current choices.
    pub fn selection(&self, slot: u32) -> LeadershipSelection {
        self.selections.get(&slot).copied().unwrap_or_default()
    }

    /// Set the slider value, clamped to the slider range.
    pub fn set_value(&mut self, slot: u32, value: u32) {
        self.selections.entry(slot).or_default().value = value.min(LEADERSHIP_MAX_VALUE);
    }

    /// Toggle the primary checkbox.
    pub fn set_primary(&mut self, slot: u32, primary: bool) {
        self.selections.entry(slot).or_default().primary = primary;
    }

    /// Finish a player's selection and announce the result.
    pub fn on_selection_done(&self, seat: &Seat, sink: &dyn Broadcast) -> u32 {
        let tokens = self.selection(seat.slot).command_tokens();
        tracing::info!(player = %seat.name, tokens, "leadership resolved");
        sink.broadcast_all(&messages::gains_command_tokens(&seat.name, tokens));
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::MessageLog;

    #[test]
    fn primary_adds_three() {
        let mut card = Leadership::new();
        card.set_value(0, 2);
        card.set_primary(0, true);
        card.set_value(1, 2);
        assert_eq!(card.selection(0).command_tokens(), 5);
        assert_eq!(card.selection(1).command_tokens(), 2);
    }

    #[test]
    fn value_is_clamped() {
        let mut card = Leadership::new();
        card.set_value(0, 25);
        assert_eq!(card.selection(0).value, LEADERSHIP_MAX_VALUE);
    }

    #[test]
    fn playing_resets_selections() {
        let mut card = Leadership::new();
        card.set_value(0, 4);
        card.on_card_played(2);
        assert_eq!(card.selection(0), LeadershipSelection::default());
        assert_eq!(card.activating_slot(), Some(2));
    }

    #[test]
    fn selection_done_announces() {
        let mut card = Leadership::new();
        card.set_value(1, 1);
        card.set_primary(1, true);
        let log = MessageLog::new();
        let tokens = card.on_selection_done(&Seat::new(1, "Bo", "Blue"), &log);
        assert_eq!(tokens, 4);
        assert_eq!(log.texts(), vec!["Bo gains 4 command tokens"]);
    }
}
