//! # parley-llm — Generation-Service Plumbing
//!
//! Everything that talks to the external text-generation service:
//!
//! - [`request`] — pure transformation from (config snapshot, history, new
//!   utterance) to the wire payload, including stop-sequence templating
//! - [`client`] — thin `reqwest` wrapper over the two endpoints
//!   (`POST /api/v1/generate`, `GET /api/v1/model`)
//! - [`dispatch`] — the async dispatch bridge: a bounded tokio worker pool
//!   that performs the slow network call off the simulation thread and
//!   deposits outcomes into the shared reply queues
//!
//! ## Failure Contract
//!
//! Nothing in a worker ever crosses the thread boundary as an error. A
//! failed generation — connection refused, timeout, non-200, malformed
//! body, empty completion — is logged and dropped: no queue item, no
//! history mutation, no retry. The player simply never hears back.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod request;

pub use client::{Endpoint, GenClient};
pub use dispatch::{DispatchOptions, Dispatcher};
pub use error::GenError;
pub use request::{GenerateRequest, build_request, stop_sequences};
