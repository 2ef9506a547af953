//! Git backend gateway for folder-sync
//!
//! The backend is treated as an opaque command/response service: every
//! operation shells out to the `git` binary with the synchronized root as
//! its working directory and returns a structured exit-status/stdout/stderr
//! result. Nothing here inspects file contents; conflict detection is a
//! substring match over command output, deliberately confined to
//! [`MergeOutcome`].

pub mod error;
pub mod gateway;
pub mod output;

pub use error::{Error, Result};
pub use gateway::{GitCommandGateway, ProxyKind, VcsGateway};
pub use output::{CommandOutput, MergeOutcome};
