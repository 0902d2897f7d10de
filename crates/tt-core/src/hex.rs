use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A board location in axial hex coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    /// Column axis.
    pub q: i32,
    /// Row axis.
    pub r: i32,
}

impl Hex {
    /// Create a hex at `(q, r)`.
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// True if `other` shares an edge with this hex.
    pub fn is_adjacent(self, other: Hex) -> bool {
        self.distance(other) == 1
    }

    /// Number of steps between two hexes.
    ///
    /// Computed in `i64`, so any pair of `i32` coordinates is in range.
    /// Distances past `u32::MAX` saturate.
    pub fn distance(self, other: Hex) -> u32 {
        let dq = i64::from(self.q) - i64::from(other.q);
        let dr = i64::from(self.r) - i64::from(other.r);
        let steps = (dq.unsigned_abs() + dr.unsigned_abs() + (dq + dr).unsigned_abs()) / 2;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }
}

impl FromStr for Hex {
    type Err = CoreError;

    /// Parse `"q,r"`, e.g. `"0,-1"`.
    fn from_str(s: &str) -> CoreResult<Self> {
        let malformed = || CoreError::InvalidHex(s.to_string());
        let (q, r) = s.split_once(',').ok_or_else(malformed)?;
        let q = q.trim().parse().map_err(|_| malformed())?;
        let r = r.trim().parse().map_err(|_| malformed())?;
        Ok(Self::new(q, r))
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_neighbors_are_adjacent() {
        let origin = Hex::new(0, 0);
        for (q, r) in [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)] {
            let n = Hex::new(q, r);
            assert!(origin.is_adjacent(n));
            assert_eq!(origin.distance(n), 1);
        }
        assert!(!origin.is_adjacent(origin));
        assert!(!origin.is_adjacent(Hex::new(2, -1)));
    }

    #[test]
    fn distance_across_axes() {
        assert_eq!(Hex::new(0, 0).distance(Hex::new(3, -3)), 3);
        assert_eq!(Hex::new(-1, 2).distance(Hex::new(1, 0)), 2);
    }

    #[test]
    fn distance_at_coordinate_limits() {
        let far = Hex::new(i32::MAX, 0);
        assert_eq!(far.distance(Hex::new(-1, 0)), 1u32 << 31);
        assert!(!far.is_adjacent(Hex::new(-1, 0)));
        assert!(far.is_adjacent(Hex::new(i32::MAX - 1, 0)));

        let corner = Hex::new(i32::MIN, i32::MIN);
        assert_eq!(corner.distance(Hex::new(i32::MAX, i32::MAX)), u32::MAX);
        assert_eq!(corner.distance(corner), 0);
    }

    #[test]
    fn extreme_coordinates_parse() {
        let hex: Hex = "2147483647,-2147483648".parse().unwrap();
        assert_eq!(hex, Hex::new(i32::MAX, i32::MIN));
        assert!(!hex.is_adjacent(Hex::new(0, 0)));
    }

    #[test]
    fn parse_and_display() {
        let hex: Hex = "2, -1".parse().unwrap();
        assert_eq!(hex, Hex::new(2, -1));
        assert_eq!(hex.to_string(), "2,-1");
        assert!("2".parse::<Hex>().is_err());
        assert!("a,b".parse::<Hex>().is_err());
    }
}
