//! Procurement opportunity matching and decision-support engine.
//!
//! Exposes the scoring core (C1-C10) plus the thin HTTP/auth host harness
//! so both `main` and the integration tests can drive them directly.

pub mod api;
pub mod auth;
pub mod error;
pub mod ingestion;
pub mod middleware;
pub mod models;
pub mod proposal;
pub mod repository;
pub mod rules;
pub mod scoring;
pub mod text;
