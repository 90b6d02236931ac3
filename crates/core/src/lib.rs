//! Core business logic for Caja.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Multi-fund balance aggregation and validation
//! - `dues` - Per-member dues tracking
//! - `reports` - Period summaries built on the aggregator
//! - `auth` - Password hashing

pub mod auth;
pub mod dues;
pub mod ledger;
pub mod reports;
