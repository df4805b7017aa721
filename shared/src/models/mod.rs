//! Domain models for the Inventory Management Console

mod category;
mod company;
mod dashboard;
mod movement;
mod product;
mod purchase_order;
mod supplier;

pub use category::*;
pub use company::*;
pub use dashboard::*;
pub use movement::*;
pub use product::*;
pub use purchase_order::*;
pub use supplier::*;
