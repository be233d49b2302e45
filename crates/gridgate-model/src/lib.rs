//! Data types for the Gridgate flat object-storage contract.
//!
//! This crate defines the plain data shapes exchanged at the gateway
//! boundary: bucket, object and part descriptors, listing results,
//! bucket-policy documents, and the wire-level error-code enum with its
//! HTTP status mapping. It carries no behavior beyond construction helpers
//! and serialization.

pub mod error;
pub mod policy;
pub mod types;

pub use error::ErrorCode;
pub use policy::{BucketPolicy, PolicyStatement};
pub use types::{
    BucketInfo, CompletedPart, ListObjectsResult, ListObjectsV2Result, ListPartsResult,
    MultipartUploadsResult, ObjectInfo, PartInfo,
};
