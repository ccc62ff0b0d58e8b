//! Middleware for Lectern
//!
//! Request-level middleware applied by the router.

pub mod auth;
