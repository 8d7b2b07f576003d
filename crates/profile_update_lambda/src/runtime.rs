//! Domain primitives re-exported for adapters and binaries.

pub use profile_update_core::{contract, update_expression, validation};
