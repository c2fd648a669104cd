mod error;
mod page;

pub use error::{ErrorResponse, MessageResponse};
pub use page::{ListParams, PageResponse, PageableResponse};
