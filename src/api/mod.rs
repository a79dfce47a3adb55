// HTTP API: one directory per feature, each with `handler.rs` and `routes.rs`

pub mod ai;
pub mod auth;
pub mod health;
pub mod resources;
