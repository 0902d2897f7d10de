use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::hex::Hex;
use crate::object::{ObjectId, TableObject};
use crate::seat::SeatDirectory;

/// Mutations the rules engine asks the host to perform.
///
/// The engine decides *what* to remove and spawn; the host decides where the
/// new objects land and how they are animated.
pub trait TableHost {
    /// Remove an object from the table.
    fn destroy_object(&mut self, id: &ObjectId) -> CoreResult<TableObject>;

    /// Place a new object on the table. Returns its id.
    fn spawn_object(&mut self, object: TableObject) -> ObjectId;
}

/// A snapshot of every object on the table plus the seats around it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Player seats.
    #[serde(default)]
    pub seats: SeatDirectory,
    #[serde(default)]
    objects: Vec<TableObject>,
}

impl Table {
    /// Create an empty table with the given seats.
    pub fn new(seats: SeatDirectory) -> Self {
        Self {
            seats,
            objects: Vec::new(),
        }
    }

    /// Add an object. Returns its id.
    pub fn add_object(&mut self, object: TableObject) -> ObjectId {
        let id = object.id.clone();
        self.objects.push(object);
        id
    }

    /// Builder form of [`Table::add_object`].
    pub fn with_object(mut self, object: TableObject) -> Self {
        self.add_object(object);
        self
    }

    /// All objects, in the order they were added.
    pub fn objects(&self) -> &[TableObject] {
        &self.objects
    }

    /// Look up an object by id.
    pub fn get(&self, id: &ObjectId) -> CoreResult<&TableObject> {
        self.objects
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| CoreError::ObjectNotFound(id.clone()))
    }

    /// Objects sitting on the given hex.
    pub fn objects_in_hex(&self, hex: Hex) -> impl Iterator<Item = &TableObject> {
        self.objects.iter().filter(move |o| o.hex == Some(hex))
    }

    /// The slot owning an object: its assigned owner, or else the seat
    /// nearest to where it lies.
    pub fn owner_slot(&self, object: &TableObject) -> Option<u32> {
        object
            .owning_slot
            .or_else(|| self.seats.closest(&object.position).map(|s| s.slot))
    }

    /// The slot whose color is recorded in an object's saved data.
    pub fn color_slot(&self, object: &TableObject) -> Option<u32> {
        let color = object.saved_color()?;
        self.seats.by_color(&color).map(|s| s.slot)
    }
}

impl TableHost for Table {
    fn destroy_object(&mut self, id: &ObjectId) -> CoreResult<TableObject> {
        let index = self
            .objects
            .iter()
            .position(|o| &o.id == id)
            .ok_or_else(|| CoreError::ObjectNotFound(id.clone()))?;
        Ok(self.objects.remove(index))
    }

    fn spawn_object(&mut self, object: TableObject) -> ObjectId {
        self.add_object(object)
    }
}
