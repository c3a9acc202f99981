//! Domain models for the storefront.

pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use catalog::Product;
pub use order::{Order, OrderItem, OrderWithItems, ShippingAddress};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
