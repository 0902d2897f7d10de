//! Table model for the tabletop rules engine.
//!
//! The host simulator owns the physical objects. This crate describes the
//! slice of that world the rules engine reads: a flat catalog of objects
//! labelled with namespaced ids, the hex grid they sit on, and the player
//! seats around the table. A [`Table`] can be built programmatically or
//! deserialized from JSON.

/// RGB colors parsed from hex strings.
pub mod color;
/// Error types used throughout the crate.
pub mod error;
/// Axial hex coordinates and adjacency.
pub mod hex;
/// Namespaced identifiers (`<type>:<source>/<name>`).
pub mod nsid;
/// Physical objects on the table.
pub mod object;
/// Player seats and nearest-seat lookup.
pub mod seat;
/// The table snapshot and the host interface for mutating it.
pub mod table;

/// Re-export color type.
pub use color::Color;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export hex coordinates.
pub use hex::Hex;
/// Re-export namespaced id types.
pub use nsid::{Nsid, matches_type};
/// Re-export object types.
pub use object::{ObjectId, Position, TableObject};
/// Re-export seat types.
pub use seat::{Seat, SeatDirectory};
/// Re-export table types.
pub use table::{Table, TableHost};
