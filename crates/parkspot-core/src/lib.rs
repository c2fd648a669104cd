//! Core types and traits for the Parkspot parking control service.
//!
//! This crate provides the domain model, payload validation, paging types
//! and the repository/service contracts shared by the storage backends,
//! the service implementation and the HTTP gateway.

pub mod clock;
pub mod error;
pub mod page;
pub mod parking;
pub mod repository;
pub mod spot;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{FieldError, ServiceError, StorageError, UniqueConstraint, ValidationError};
pub use page::{Direction, Page, PageRequest, Sort, SortField};
pub use parking::ParkingSpots;
pub use repository::{ReadRepository, Repository};
pub use spot::{ParkingSpot, ParkingSpotPayload, SpotId};
