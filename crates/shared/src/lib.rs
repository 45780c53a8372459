//! FleetDesk Shared Types and Utilities
//!
//! This crate contains the domain types, storage errors, and database helpers
//! shared by the FleetDesk services.

pub mod db;
pub mod error;
pub mod types;

pub use db::*;
pub use error::*;
pub use types::*;
