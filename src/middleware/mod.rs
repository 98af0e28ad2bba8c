//! Middleware applied to every response of the host.

pub mod security_headers;
