pub mod handler;
pub mod routes;

pub use routes::ai_routes;
