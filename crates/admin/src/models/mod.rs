//! Domain models for the back-office.

pub mod catalog;
pub mod order;
pub mod session;
pub mod stats;

pub use catalog::Product;
pub use order::{AdminOrder, AdminOrderItem, Order, OrderUser, ShippingAddress};
pub use session::{CurrentAdmin, keys as session_keys};
pub use stats::{DashboardStats, OrderReport, ProfitReport, ReportItem, SalesStats};
