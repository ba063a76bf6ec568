//! `gatehouse-core`: shared primitives for the access gate.
//!
//! Identifiers, content status and the error model. No IO lives here.

pub mod error;
pub mod id;
pub mod status;

pub use error::{GateError, GateResult};
pub use id::{ResourceId, UserId};
pub use status::ResourceStatus;
