pub mod config;
pub mod db;
pub mod error;
pub mod guides;
pub mod routes;
pub mod views;

pub use routes::build_router;
