use async_trait::async_trait;
use parking_lot::RwLock;
use parkspot_core::page::{Direction, Page, PageRequest, Sort, SortField};
use parkspot_core::repository::{ReadRepository, Repository, Result};
use parkspot_core::{ParkingSpot, SpotId, StorageError, UniqueConstraint};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::trace;

/// In-memory implementation of the repository contract.
///
/// A single lock guards all rows, so the uniqueness check and the write
/// performed by [`Repository::save`] are atomic. This makes the store a
/// final arbiter for the three unique constraints, the same role the
/// unique keys play in the relational schema.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    rows: RwLock<HashMap<SpotId, ParkingSpot>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn any_other(&self, excluding: Option<&SpotId>, pred: impl Fn(&ParkingSpot) -> bool) -> bool {
        self.rows
            .read()
            .values()
            .any(|spot| Some(&spot.id) != excluding && pred(spot))
    }
}

/// First constraint, in check order, that `spot` would violate.
fn violated_constraint(
    rows: &HashMap<SpotId, ParkingSpot>,
    spot: &ParkingSpot,
) -> Option<UniqueConstraint> {
    let others = || rows.values().filter(|other| other.id != spot.id);

    UniqueConstraint::CHECK_ORDER
        .into_iter()
        .find(|constraint| match constraint {
            UniqueConstraint::ApartmentBlock => {
                others().any(|other| other.occupies(&spot.apartment, &spot.block))
            }
            UniqueConstraint::LicensePlate => {
                others().any(|other| other.license_plate == spot.license_plate)
            }
            UniqueConstraint::SpotNumber => {
                others().any(|other| other.spot_number == spot.spot_number)
            }
        })
}

fn compare(a: &ParkingSpot, b: &ParkingSpot, sort: Sort) -> Ordering {
    let ordering = match sort.property {
        SortField::Id => a.id.cmp(&b.id),
        SortField::SpotNumber => a.spot_number.cmp(&b.spot_number),
        SortField::LicensePlate => a.license_plate.cmp(&b.license_plate),
        SortField::Brand => a.brand.cmp(&b.brand),
        SortField::Model => a.model.cmp(&b.model),
        SortField::Color => a.color.cmp(&b.color),
        SortField::ResponsibleName => a.responsible_name.cmp(&b.responsible_name),
        SortField::Apartment => a.apartment.cmp(&b.apartment),
        SortField::Block => a.block.cmp(&b.block),
        SortField::RegisteredAt => a.registered_at.cmp(&b.registered_at),
    };

    let ordering = match sort.direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    };

    ordering.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_id(&self, id: &SpotId) -> Result<Option<ParkingSpot>> {
        Ok(self.rows.read().get(id).cloned())
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<ParkingSpot>> {
        let rows = self.rows.read();
        let mut spots: Vec<&ParkingSpot> = rows.values().collect();
        spots.sort_by(|a, b| compare(a, b, request.sort()));

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = spots
            .into_iter()
            .skip(offset)
            .take(request.size() as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, *request, rows.len() as u64))
    }

    async fn exists_by_spot_number(
        &self,
        spot_number: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool> {
        Ok(self.any_other(excluding, |spot| spot.spot_number == spot_number))
    }

    async fn exists_by_license_plate(
        &self,
        license_plate: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool> {
        Ok(self.any_other(excluding, |spot| spot.license_plate == license_plate))
    }

    async fn exists_by_apartment_and_block(
        &self,
        apartment: &str,
        block: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool> {
        Ok(self.any_other(excluding, |spot| spot.occupies(apartment, block)))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn save(&self, spot: ParkingSpot) -> Result<ParkingSpot> {
        let mut rows = self.rows.write();

        if let Some(constraint) = violated_constraint(&rows, &spot) {
            trace!(id = %spot.id, ?constraint, "rejecting save on unique constraint");
            return Err(StorageError::Conflict(constraint));
        }

        rows.insert(spot.id, spot.clone());
        Ok(spot)
    }

    async fn delete(&self, id: &SpotId) -> Result<()> {
        match self.rows.write().remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(*id)),
        }
    }
}
