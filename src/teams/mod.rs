pub mod models;
pub mod roster;
pub mod routes;

pub use models::Team;
