//! Tenant credential scoring and property matching for the rental marketplace.
//!
//! The scoring and matching engines are pure functions over plain records. The
//! marketplace service layers repositories, validation and HTTP routing on top of them.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
