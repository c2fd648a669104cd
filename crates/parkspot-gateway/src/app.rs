use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_spot_handler, delete_spot_handler, get_spot_handler, health_handler,
    list_spots_handler, update_spot_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(health_handler))
            .route(
                "/parking-spot",
                get(list_spots_handler).post(create_spot_handler),
            )
            .route(
                "/parking-spot/{id}",
                get(get_spot_handler)
                    .put(update_spot_handler)
                    .delete(delete_spot_handler),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
