use async_trait::async_trait;
use parkspot_core::validation::validate;
use parkspot_core::{
    Clock, Page, PageRequest, ParkingSpot, ParkingSpotPayload, ParkingSpots, Repository,
    ServiceError, SpotId, SystemClock, UniqueConstraint,
};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

type Result<T> = std::result::Result<T, ServiceError>;

/// A concrete implementation of the [`ParkingSpots`] trait.
///
/// This service wraps a [`Repository`] and a [`Clock`] to handle:
/// - payload validation, before any storage access
/// - conflict checks, in the order apartment/block, license plate, spot number
/// - registration timestamps, assigned once at creation
///
/// The existence checks give callers a precise error in the common case.
/// Two requests racing for the same unique value can both pass them; the
/// repository then rejects the losing write and that rejection is reported
/// as the same [`ServiceError::Conflict`].
#[derive(Debug)]
pub struct ParkingSpotService<R, C = SystemClock> {
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for ParkingSpotService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: Repository> ParkingSpotService<R, SystemClock> {
    /// Creates a new `ParkingSpotService` stamping records with the system clock.
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R: Repository, C: Clock> ParkingSpotService<R, C> {
    /// Creates a new `ParkingSpotService` with a custom clock.
    pub fn with_clock(repository: R, clock: C) -> Self {
        Self {
            repository: Arc::new(repository),
            clock: Arc::new(clock),
        }
    }

    /// Trims and validates an inbound payload.
    fn prepare(payload: ParkingSpotPayload) -> Result<ParkingSpotPayload> {
        let payload = payload.trimmed();
        validate(&payload)?;
        Ok(payload)
    }

    /// Fails with the first unique constraint the payload would violate.
    ///
    /// `excluding` names the record being updated so it is never counted
    /// as conflicting with itself.
    async fn check_conflicts(
        &self,
        payload: &ParkingSpotPayload,
        excluding: Option<&SpotId>,
    ) -> Result<()> {
        for constraint in UniqueConstraint::CHECK_ORDER {
            let taken = match constraint {
                UniqueConstraint::ApartmentBlock => {
                    self.repository
                        .exists_by_apartment_and_block(
                            &payload.apartment,
                            &payload.block,
                            excluding,
                        )
                        .await?
                }
                UniqueConstraint::LicensePlate => {
                    self.repository
                        .exists_by_license_plate(&payload.license_plate, excluding)
                        .await?
                }
                UniqueConstraint::SpotNumber => {
                    self.repository
                        .exists_by_spot_number(&payload.spot_number, excluding)
                        .await?
                }
            };

            if taken {
                warn!(?constraint, "rejecting parking spot on unique constraint");
                return Err(ServiceError::Conflict(constraint));
            }
        }

        Ok(())
    }

    async fn find(&self, id: &SpotId) -> Result<ParkingSpot> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(*id))
    }
}

#[async_trait]
impl<R: Repository, C: Clock> ParkingSpots for ParkingSpotService<R, C> {
    #[instrument(skip_all)]
    async fn create(&self, payload: ParkingSpotPayload) -> Result<ParkingSpot> {
        let payload = Self::prepare(payload)?;
        self.check_conflicts(&payload, None).await?;

        let spot = ParkingSpot::register(SpotId::generate(), payload, self.clock.now());
        let spot = self.repository.save(spot).await?;

        debug!(id = %spot.id, spot_number = %spot.spot_number, "registered parking spot");
        Ok(spot)
    }

    async fn list(&self, request: PageRequest) -> Result<Page<ParkingSpot>> {
        trace!(
            page = request.page(),
            size = request.size(),
            sort = %request.sort(),
            "listing parking spots"
        );
        Ok(self.repository.find_all(&request).await?)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn get(&self, id: &SpotId) -> Result<ParkingSpot> {
        self.find(id).await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn update(&self, id: &SpotId, payload: ParkingSpotPayload) -> Result<ParkingSpot> {
        let mut spot = self.find(id).await?;
        let payload = Self::prepare(payload)?;
        self.check_conflicts(&payload, Some(id)).await?;

        spot.apply(payload);
        let spot = self.repository.save(spot).await?;

        debug!(id = %spot.id, "updated parking spot");
        Ok(spot)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete(&self, id: &SpotId) -> Result<()> {
        self.find(id).await?;
        self.repository.delete(id).await?;

        debug!(id = %id, "deleted parking spot");
        Ok(())
    }
}
