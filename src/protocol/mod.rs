//! Custom JSON Transfer Protocol (CJTP) message model
//!
//! Provides the request/response wire shapes, the status vocabulary, and the
//! structural checks a request must pass before dispatch.

pub mod message;
pub mod status;
pub mod validation;

pub use message::{Request, RequestBody, Response};
pub use status::StatusCode;

/// Requests larger than this are truncated by the single bounded read.
pub const MAX_REQUEST_BYTES: usize = 1024;
