//! Category resource handlers
//!
//! Provides the per-method CRUD and echo operations executed against the shared
//! category store once a request has been validated.

pub mod categories;
pub mod utils;
