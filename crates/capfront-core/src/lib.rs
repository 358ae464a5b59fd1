//! Domain model and shared stores for the capfront synchronization client.
//!
//! This crate holds everything that does not touch the network: the mirrored
//! records and their relationship queries, the per-user [`Snapshot`], the
//! [`SessionDirectory`] and [`AdminRegistry`] stores, the advisory circuit
//! state machine, the error taxonomy and the [`HttpTransport`] seam.

pub mod circuit;
pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod remote;
pub mod session;
pub mod snapshot;

pub use circuit::{ActionVerb, SimulationState};
pub use config::ClientConfig;
pub use directory::{AdminRegistry, RegistryData, SessionDirectory, SharedSession};
pub use error::{CapfrontError, RemoteError, Result};
pub use remote::{HttpTransport, Method, RawResponse, RemoteRequest};
pub use session::{MessageKind, UserMessage, UserSession};
pub use snapshot::Snapshot;
