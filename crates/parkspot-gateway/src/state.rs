use std::sync::Arc;

use parkspot_core::ParkingSpots;

#[derive(Clone)]
pub struct AppState {
    spots: Arc<dyn ParkingSpots>,
}

impl AppState {
    pub fn new(spots: Arc<dyn ParkingSpots>) -> Self {
        Self { spots }
    }

    pub fn spots(&self) -> &dyn ParkingSpots {
        self.spots.as_ref()
    }
}
