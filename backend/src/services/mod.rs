//! Service layer
//!
//! One service per console area, each holding the injected record gateway.
//! Services own validation, query construction, normalization and derived
//! state; handlers stay thin. List reads degrade to empty collections when
//! the gateway is unreachable, writes always propagate failures.

pub mod alert;
pub mod category;
pub mod company;
pub mod dashboard;
pub mod movement;
pub mod product;
pub mod purchase_order;
pub mod supplier;

pub use alert::AlertService;
pub use category::CategoryService;
pub use company::CompanyService;
pub use dashboard::DashboardService;
pub use movement::MovementService;
pub use product::ProductService;
pub use purchase_order::PurchaseOrderService;
pub use supplier::SupplierService;
