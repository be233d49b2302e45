//! Flat object-storage gateway over a hierarchical grid store.
//!
//! This crate adapts a bucket/object interface onto a remote grid backend
//! that stores nested collections of data objects with attachable key/value
//! metadata. Buckets become collections under a configured mount point,
//! object keys are flattened into hashed physical names, and the flat
//! namespace is reconstructed from metadata attributes at listing time.
//!
//! # Architecture
//!
//! ```text
//! Embedding server (routing, auth, wire format)
//!        |
//!        v
//!   Gateway (bucket/object/listing/multipart/policy ops)
//!        |
//!        v
//!   SessionPool (fixed-size, eagerly connected)
//!        |
//!        v
//!   GridSession trait (collections, data objects, metadata queries)
//! ```
//!
//! The concrete backend client lives outside this crate; it implements the
//! traits in [`client`] and is handed to [`Gateway::connect`].

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod naming;
pub mod pool;
pub mod validation;

mod ops;

#[cfg(test)]
pub(crate) mod memgrid;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
