//! Supabase integration module
//!
//! Provides the identity client used by the auth guard and the token-scoped
//! data client handed to resource handlers.

pub mod client;
pub mod models;
pub mod scoped;

pub use client::SupabaseClient;
pub use models::*;
pub use scoped::ScopedClient;
