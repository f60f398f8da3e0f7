//! Session lifecycle core
//!
//! `start` establishes the forwarding session and records its id; `stop`
//! reads the id back and terminates the session. The two phases only ever
//! communicate through the [`SESSION_ID_KEY`] state entry.

pub mod extract;
pub mod script;
pub mod start;
pub mod terminate;

pub use script::{ForwardingScript, ScriptOutput, ScriptRunner};
pub use start::Starter;
pub use terminate::{SsmClient, TerminateSession, Terminator};

/// State key under which the start phase records the session id
pub const SESSION_ID_KEY: &str = "SessionId";

/// Connection script shipped next to the binary
pub const SCRIPT_NAME: &str = "connect-with-port-forwarding.sh";
