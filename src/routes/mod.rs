//! HTTP route handlers of the portal host.
//!
//! - `health`: liveness, readiness and version probes
//! - `client`: the client settings consumed by the browser UI
//! - `backend`: explicit 502 for endpoints that belong to the executor backend

pub mod backend;
pub mod client;
pub mod health;
