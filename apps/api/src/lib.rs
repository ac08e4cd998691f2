pub mod config;
pub mod cv;
pub mod errors;
pub mod extract;
pub mod index;
pub mod models;
pub mod parsing;
pub mod routes;
pub mod state;
