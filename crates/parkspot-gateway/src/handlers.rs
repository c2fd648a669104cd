mod health;
mod spot;

pub use health::{health_handler, GREETING};
pub use spot::{
    create_spot_handler, delete_spot_handler, get_spot_handler, list_spots_handler,
    update_spot_handler,
};
