//! Gateway operation implementations.
//!
//! Each submodule adds one category of operations to
//! [`crate::gateway::Gateway`]: bucket CRUD, object CRUD, listing,
//! multipart uploads, and bucket policies.

pub mod bucket;
pub mod list;
pub mod multipart;
pub mod object;
pub mod policy;
