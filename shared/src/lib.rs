//! Shared types and models for the Inventory Management Console
//!
//! This crate contains the domain models, derived-state calculators and the
//! filter engine shared between the backend and other components of the
//! system. Everything here is pure: no I/O, no clocks, no globals.

pub mod filter;
pub mod models;
pub mod types;
pub mod validation;

pub use filter::*;
pub use models::*;
pub use types::*;
pub use validation::*;
