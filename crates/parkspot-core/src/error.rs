use crate::spot::SpotId;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// One of the three uniqueness rules enforced over parking spots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueConstraint {
    /// The `(apartment, block)` pair is already taken.
    ApartmentBlock,
    /// The license plate is already registered.
    LicensePlate,
    /// The spot number is already assigned.
    SpotNumber,
}

impl UniqueConstraint {
    /// All constraints, in the order conflict checks are performed.
    pub const CHECK_ORDER: [UniqueConstraint; 3] = [
        UniqueConstraint::ApartmentBlock,
        UniqueConstraint::LicensePlate,
        UniqueConstraint::SpotNumber,
    ];

    /// Message reported to callers when the constraint is violated.
    pub fn message(&self) -> &'static str {
        match self {
            UniqueConstraint::ApartmentBlock => {
                "Conflict: Parking Spot already registered for this apartment/block!"
            }
            UniqueConstraint::LicensePlate => "Conflict: License Plate Car is already in use!",
            UniqueConstraint::SpotNumber => "Conflict: Parking Spot is already in use!",
        }
    }

    /// Name of the unique key backing this constraint in the relational schema.
    pub fn key_name(&self) -> &'static str {
        match self {
            UniqueConstraint::ApartmentBlock => "uq_parking_spots_apartment_block",
            UniqueConstraint::LicensePlate => "uq_parking_spots_license_plate",
            UniqueConstraint::SpotNumber => "uq_parking_spots_spot_number",
        }
    }

    /// Finds the constraint whose key name appears in a database error message.
    pub fn from_key_message(message: &str) -> Option<Self> {
        Self::CHECK_ORDER
            .into_iter()
            .find(|constraint| message.contains(constraint.key_name()))
    }
}

impl Display for UniqueConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors raised by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("{0}")]
    Conflict(UniqueConstraint),
    #[error("parking spot not found: {0}")]
    NotFound(SpotId),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// A single violated rule on an inbound field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Structural validation failure, carrying every violated field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, message)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid input")?;
        for (i, error) in self.errors.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            Display::fmt(error, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the parking spot service.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Conflict(UniqueConstraint),
    #[error("parking spot not found: {0}")]
    NotFound(SpotId),
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Conflict(constraint) => ServiceError::Conflict(constraint),
            StorageError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Storage(other),
        }
    }
}
