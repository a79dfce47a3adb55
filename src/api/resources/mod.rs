/*
* Placeholder CRUD endpoints for the education domain.
* Nothing is persisted; every route answers with a static empty payload.
*/

pub mod catalog;
pub mod handler;
pub mod routes;

pub use routes::resource_routes;
