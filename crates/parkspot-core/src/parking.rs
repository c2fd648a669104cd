use crate::error::ServiceError;
use crate::page::{Page, PageRequest};
use crate::spot::{ParkingSpot, ParkingSpotPayload, SpotId};
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ServiceError>;

/// Business operations over parking spot records.
#[async_trait]
pub trait ParkingSpots: Send + Sync + 'static {
    /// Validates the payload, runs the conflict checks and stores a new record.
    async fn create(&self, payload: ParkingSpotPayload) -> Result<ParkingSpot>;

    /// Lists one page of records.
    async fn list(&self, request: PageRequest) -> Result<Page<ParkingSpot>>;

    /// Fetches a record, failing with `NotFound` if it does not exist.
    async fn get(&self, id: &SpotId) -> Result<ParkingSpot>;

    /// Replaces the caller-owned fields of an existing record.
    async fn update(&self, id: &SpotId, payload: ParkingSpotPayload) -> Result<ParkingSpot>;

    /// Deletes a record, failing with `NotFound` if it does not exist.
    async fn delete(&self, id: &SpotId) -> Result<()>;
}
