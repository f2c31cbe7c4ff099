//! Middleware module
//!
//! Contains the bearer-token authentication guard.

pub mod auth;
