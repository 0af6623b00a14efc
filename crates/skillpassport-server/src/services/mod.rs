//! Operations behind the HTTP routes.

pub mod dashboard;
pub mod issuance;
pub mod minting;
pub mod privacy;
