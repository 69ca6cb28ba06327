//! Remote operation gateway for the MemeMeow backend.
//!
//! Every non-trivial client operation (search, clipboard, preference storage,
//! hotkey registration, community manifests) is executed by a separate backend
//! process. This crate is the single door to it.
//!
//! - [`Backend`]: the transport seam; one async `invoke` per named operation.
//! - [`Gateway`]: races each invocation against a timeout and decodes typed
//!   results. Timeouts are soft: the backend call keeps running and its late
//!   reply is logged and dropped.
//! - [`MrpcBackend`]: msgpack-RPC over a unix socket, including the inbound
//!   event stream (`shortcut-registration-failed`).
//! - `MockBackend` (feature `test-utils`): scripted replies for tests.
#![warn(missing_docs)]

mod backend;
mod error;
mod gateway;
mod ipc;
#[cfg(feature = "test-utils")]
mod mock;

pub use backend::Backend;
pub use error::{Error, OperationError, Result};
pub use gateway::{DEFAULT_TIMEOUT_MS, Gateway};
pub use ipc::{EventRx, MrpcBackend};
#[cfg(feature = "test-utils")]
pub use mock::{MockBackend, Reply};
