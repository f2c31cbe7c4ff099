//! Integration tests for the Canopy relay
//!
//! These tests drive the real router through `axum-test` and verify the
//! complete request/response flow against mocked Supabase and provider APIs.

mod auth;
mod resources;
