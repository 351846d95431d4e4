//! UI-facing request coordination on top of [`handoff_bridge`].
//!
//! A [`RequestCoordinator`] turns one user action into one
//! [`InvocationRequest`], hands it to the external wallet through the
//! single-flight bridge, and once control returns asks the
//! [`WalletSession`] collaborator for the outcome and folds it into the shared
//! [`UiState`].

mod action;
mod config;
mod coordinator;
mod error;
mod request;
mod session;
mod state;

pub use action::{ParseActionError, UserAction};
pub use config::{CoordinatorConfig, DEFAULT_MAX_BATCH, OverlapPolicy};
pub use coordinator::RequestCoordinator;
pub use error::{ConfigError, CoordinatorError, Result};
pub use request::{InvocationRequest, Operation, TxnVersion};
pub use session::{SessionError, SessionOutcome, WalletSession};
pub use state::{UiState, UiStateHandle};
