//! HTTP handlers
//!
//! Handlers stay thin: deserialize the request, construct the service over
//! the injected gateway, return the service result as JSON. All error
//! mapping happens in the error module's response conversion.

pub mod alert;
pub mod category;
pub mod company;
pub mod dashboard;
pub mod health;
pub mod movement;
pub mod product;
pub mod purchase_order;
pub mod supplier;
