//! Process execution for vibegate scanner invocations.
//!
//! Every external tool the gate runs (linters, secret detectors, git
//! introspection) goes through this crate's [`CommandSpec`] to guarantee
//! argv-style invocation. No shell string evaluation ever occurs, so
//! staged file names cross the trust boundary as discrete arguments.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
