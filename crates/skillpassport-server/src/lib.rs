//! Skill Passport Server - learner credentials API
//!
//! This crate provides the REST API for issuing learner credentials,
//! minting NFT records for them, rendering a learner's passport and
//! answering data-subject requests.

pub mod auth;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{Config, PassportSettings};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
