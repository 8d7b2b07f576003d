//! AWS-oriented adapters and handlers for the profile update service.
//!
//! This crate owns runtime integration details (Lambda handler, record-service
//! HTTP client, DynamoDB mirror) and exposes a single runtime module boundary
//! for the contract, validation, and update-expression primitives.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod runtime;
pub mod telemetry;
