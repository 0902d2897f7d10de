use crate::object::ObjectId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while reading or mutating the table model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A namespaced id is missing its `:` or `/` separator, or has an empty part.
    #[error("malformed nsid: \"{0}\"")]
    InvalidNsid(String),

    /// A hex coordinate string could not be parsed.
    #[error("malformed hex: \"{0}\"")]
    InvalidHex(String),

    /// A color string is not of the form `#rrggbb`.
    #[error("malformed color: \"{0}\"")]
    InvalidColor(String),

    /// The requested object is not on the table.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// No seat is assigned to the requested player slot.
    #[error("no seat for player slot {0}")]
    SeatNotFound(u32),
}
