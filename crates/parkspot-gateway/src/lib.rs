//! HTTP gateway for the Parkspot parking control service.
//!
//! Exposes the parking spot CRUD API over axum. The router is built by
//! [`App::router`] from an [`AppState`] holding the service handle, so tests
//! can drive it without binding a socket.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
