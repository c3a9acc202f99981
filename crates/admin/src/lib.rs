//! Essenza Admin library.
//!
//! Back-office API for staff: dashboard, sales stats, profit reports,
//! product CRUD, and order management. The binary in `main.rs` is a thin
//! wrapper over these modules.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
