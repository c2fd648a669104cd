use crate::error::StorageError;
use crate::page::{Page, PageRequest};
use crate::spot::{ParkingSpot, SpotId};
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a parking spot repository.
///
/// The `exists_by_*` lookups accept the identifier of a record to leave out
/// of the check, so a record being updated never conflicts with itself.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record with the given identifier.
    /// Returns `None` if it does not exist.
    async fn find_by_id(&self, id: &SpotId) -> Result<Option<ParkingSpot>>;

    /// Returns one page of records in the requested order, with totals.
    async fn find_all(&self, request: &PageRequest) -> Result<Page<ParkingSpot>>;

    async fn exists_by_spot_number(
        &self,
        spot_number: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool>;

    async fn exists_by_license_plate(
        &self,
        license_plate: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool>;

    async fn exists_by_apartment_and_block(
        &self,
        apartment: &str,
        block: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts the record, or overwrites the stored one with the same `id`.
    ///
    /// Returns `Err(Conflict)` if another record already holds one of the
    /// unique values.
    async fn save(&self, spot: ParkingSpot) -> Result<ParkingSpot>;

    /// Removes the record. Returns `Err(NotFound)` if it does not exist.
    async fn delete(&self, id: &SpotId) -> Result<()>;
}
