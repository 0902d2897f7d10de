use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hex::Hex;
use crate::nsid::Nsid;

/// Host-assigned identifier of a physical object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Generate a fresh id for an object spawned by the engine.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in table space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X axis.
    pub x: f64,
    /// Y axis.
    pub y: f64,
    /// Z axis (height above the table).
    #[serde(default)]
    pub z: f64,
}

impl Position {
    /// Create a position.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared distance, ignoring height.
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

fn default_true() -> bool {
    true
}

fn default_stack() -> u32 {
    1
}

/// One physical object as seen by the rules engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableObject {
    /// Host id.
    pub id: ObjectId,
    /// Raw namespaced id. May be empty or malformed for unlabelled objects.
    #[serde(default)]
    pub nsid: String,
    /// Whether the object shows its front face.
    #[serde(default = "default_true")]
    pub face_up: bool,
    /// Player slot that owns the object, if the host assigned one.
    #[serde(default)]
    pub owning_slot: Option<u32>,
    /// Where the object sits.
    #[serde(default)]
    pub position: Position,
    /// Board hex under the object, if it is on the map.
    #[serde(default)]
    pub hex: Option<Hex>,
    /// Number of cards in this stack (1 for a single card or non-card).
    #[serde(default = "default_stack")]
    pub stack_size: u32,
    /// Whether the object is in a hand, holder, or container.
    #[serde(default)]
    pub held: bool,
    /// Opaque per-object payload, usually JSON.
    #[serde(default)]
    pub saved_data: String,
}

impl TableObject {
    /// Create a face-up, unowned, off-map object.
    pub fn new(id: impl Into<ObjectId>, nsid: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nsid: nsid.into(),
            face_up: true,
            owning_slot: None,
            position: Position::default(),
            hex: None,
            stack_size: 1,
            held: false,
            saved_data: String::new(),
        }
    }

    /// Set the face orientation.
    pub fn with_face_up(mut self, face_up: bool) -> Self {
        self.face_up = face_up;
        self
    }

    /// Set the owning player slot.
    pub fn with_owner(mut self, slot: u32) -> Self {
        self.owning_slot = Some(slot);
        self
    }

    /// Place the object at a position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Place the object on a board hex.
    pub fn with_hex(mut self, hex: Hex) -> Self {
        self.hex = Some(hex);
        self
    }

    /// Set the stack size.
    pub fn with_stack_size(mut self, stack_size: u32) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Record the owner color in the saved-data payload.
    pub fn with_color(mut self, color_name: &str) -> Self {
        self.saved_data = serde_json::json!({ "_color": color_name }).to_string();
        self
    }

    /// The parsed namespaced id, or `None` if it is malformed.
    pub fn parsed_nsid(&self) -> Option<Nsid> {
        match Nsid::parse(&self.nsid) {
            Ok(nsid) => Some(nsid),
            Err(e) => {
                if !self.nsid.is_empty() {
                    tracing::warn!(object = %self.id, "skipping object: {e}");
                }
                None
            }
        }
    }

    /// A lone, face-up card lying on the table (not stacked, not held).
    pub fn is_loose_card(&self) -> bool {
        self.face_up
            && self.stack_size == 1
            && !self.held
            && crate::nsid::matches_type(&self.nsid, "card")
    }

    /// Owner color stored in saved data under `_color`, if any.
    pub fn saved_color(&self) -> Option<String> {
        if self.saved_data.is_empty() {
            return None;
        }
        let value: serde_json::Value = serde_json::from_str(&self.saved_data).ok()?;
        value.get("_color")?.as_str().map(str::to_string)
    }
}
