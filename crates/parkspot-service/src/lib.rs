//! Parking spot service implementation.
//!
//! This crate provides [`ParkingSpotService`], the implementation of the
//! [`ParkingSpots`](parkspot_core::ParkingSpots) contract. Core types are
//! re-exported from `parkspot_core`.

pub mod service;

pub use parkspot_core::{ParkingSpots, ServiceError};
pub use service::ParkingSpotService;
