//! CI helper for SSM port-forwarding sessions
//!
//! Two independently invoked phases share one piece of job state: `start`
//! launches the bundled connection script, extracts the session id from its
//! output and records it for the job; `stop` reads the id back and issues a
//! best-effort terminate call.

pub mod config;
pub mod error;
pub mod github;
pub mod session;
