//! HTTP adapter for restaurant search.

mod dto;
mod handlers;
mod routes;

pub use dto::{SearchRequest, SearchResponse};
pub use handlers::SearchHandlers;
pub use routes::search_routes;
