//! Core types for Essenza.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod status;

pub use cart::{CartItem, normalize_cart_items};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
