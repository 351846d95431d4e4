//! Single-flight hand-off of a request to an external task.
//!
//! This crate converts a fire-and-forget "control returned" notification from
//! a host environment back into a resumption of the caller that launched the
//! external task:
//! * [`InvocationBridge`]: owns the one pending completion slot
//! * [`HostEnvironment`]: capability that launches the external task
//! * [`CompletionPort`]: entry point the host uses to report completion
//!
//! At most one invocation may be pending. A second one is rejected with
//! [`BridgeError::AlreadyPending`], which callers should treat as a
//! programming error rather than a condition to retry.

#![warn(missing_docs)]

mod bridge;
mod error;
mod host;
mod slot;

pub use bridge::InvocationBridge;
pub use error::{BridgeError, LaunchError, Result};
pub use host::{CompletionPort, HostEnvironment};
