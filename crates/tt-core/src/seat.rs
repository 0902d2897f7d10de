use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{CoreError, CoreResult};
use crate::object::Position;

/// A player seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Host player slot.
    pub slot: u32,
    /// Display name of the seated player.
    pub name: String,
    /// Color name used in saved data and templates (e.g. "White").
    pub color_name: String,
    /// Render color.
    #[serde(default)]
    pub color: Color,
    /// Where the seat's desk is.
    #[serde(default)]
    pub position: Position,
}

impl Seat {
    /// Create a seat.
    pub fn new(slot: u32, name: impl Into<String>, color_name: impl Into<String>) -> Self {
        Self {
            slot,
            name: name.into(),
            color_name: color_name.into(),
            color: Color::default(),
            position: Position::default(),
        }
    }

    /// Set the desk position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// All seats at the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatDirectory {
    seats: Vec<Seat>,
}

impl SeatDirectory {
    /// Create a directory from a list of seats.
    pub fn new(seats: Vec<Seat>) -> Self {
        Self { seats }
    }

    /// All seats in slot order as given.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// True if there are no seats.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Look up a seat by player slot.
    pub fn by_slot(&self, slot: u32) -> CoreResult<&Seat> {
        self.seats
            .iter()
            .find(|s| s.slot == slot)
            .ok_or(CoreError::SeatNotFound(slot))
    }

    /// Look up a seat by color name (case-insensitive).
    pub fn by_color(&self, color_name: &str) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|s| s.color_name.eq_ignore_ascii_case(color_name))
    }

    /// The seat whose desk is nearest to `position`.
    pub fn closest(&self, position: &Position) -> Option<&Seat> {
        self.seats.iter().min_by(|a, b| {
            a.position
                .distance_squared(position)
                .total_cmp(&b.position.distance_squared(position))
        })
    }
}
