//! TCP transport for CJTP
//!
//! One connection carries exactly one request and one response. Provides the
//! accepting server loop and a matching client.

pub mod client;
pub mod server;
