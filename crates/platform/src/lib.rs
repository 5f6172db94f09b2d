//! Platform abstraction layer for the mak build orchestrator.
//!
//! This crate provides the two boundary collaborators the pipeline relies on:
//! - Directory probes (`WorkDir::has_file`, `WorkDir::has_folder`) and root
//!   relocation helpers
//! - Process execution returning an [`ExecutionResult`](mak_types::ExecutionResult)
//!   instead of an error, so the pipeline driver alone decides when to stop

pub mod core;
pub mod filesystem;
pub mod implementations;
pub mod process;

pub use core::Platform;
pub use filesystem::{find_git_root, WorkDir};
pub use implementations::native::NativeProcess;
pub use process::{PlatformCommand, ProcessOperations};
