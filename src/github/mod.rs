//! GitHub Actions runner interface
//!
//! Thin wrappers over the runner's three injection points: `INPUT_*`
//! environment variables, the `GITHUB_STATE` handoff file, and workflow
//! commands on stdout. Each sits behind a trait so the phases can be
//! exercised against in-memory fakes.

pub mod inputs;
pub mod state;
pub mod workflow;

pub use inputs::{EnvInputs, InputSource};
pub use state::{GithubState, StateStore};
pub use workflow::{GithubReporter, Reporter};
