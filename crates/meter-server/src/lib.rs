//! HTTP boundary for the Meter analytics service.
//!
//! Request flow on protected routes: extract candidate secret → resolve it
//! through the credential store → evaluate the required capability → allow
//! (dispatch downstream, queue a usage stamp) or deny with 401/403. The
//! operator dashboard sits behind its own stateless constant-time gate.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod usage;
