pub mod controller;
pub mod crud;
pub mod gating;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;

pub use routes::profile_routes;
