pub mod handlers;
pub mod routes;
pub mod search;
pub mod videos;

pub use routes::create_router;
