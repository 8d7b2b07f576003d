//! Shared profile update domain primitives.
//!
//! This crate owns the profile contract, the validation rule set and the
//! derivation of key-value update descriptors. It intentionally excludes AWS
//! SDK, HTTP client, and Lambda runtime concerns.

pub mod contract;
pub mod update_expression;
pub mod validation;
