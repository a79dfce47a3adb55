pub mod handler;
pub mod routes;

pub use routes::auth_routes;
