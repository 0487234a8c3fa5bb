//! Library exports for goodvibes-server, shared between the binary and tests.

pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
