//! Gateway error types.
//!
//! Defines [`GatewayError`], the domain error enum covering everything the
//! gateway can report. Each variant maps to a wire-level
//! [`gridgate_model::ErrorCode`] through [`GatewayError::code`], which the
//! embedding server uses to pick the response status and error body.

use gridgate_model::ErrorCode;

use crate::client::BackendError;

/// Gateway error type.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // -----------------------------------------------------------------------
    // Bucket errors
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The requested bucket name is not available.
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The specified bucket name is not valid.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The reason for the error.
        reason: String,
    },

    // -----------------------------------------------------------------------
    // Object / key errors
    // -----------------------------------------------------------------------
    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The object key exceeds the maximum allowed length.
    #[error("Your key is too long: {length} bytes")]
    KeyTooLong {
        /// Length of the offending key in bytes.
        length: usize,
    },

    /// The requested range is not satisfiable.
    #[error("The requested range is not satisfiable")]
    InvalidRange,

    // -----------------------------------------------------------------------
    // Multipart upload errors
    // -----------------------------------------------------------------------
    /// The specified multipart upload does not exist.
    #[error("The specified upload does not exist: {upload_id}")]
    NoSuchUpload {
        /// The upload id that was not found.
        upload_id: String,
    },

    /// The upload id is not a well-formed identifier.
    #[error("The specified upload id is not well formed: {upload_id}")]
    MalformedUploadId {
        /// The offending upload id.
        upload_id: String,
    },

    /// A referenced part could not be found.
    #[error("Part {part_number} could not be found")]
    InvalidPart {
        /// The missing part number.
        part_number: u32,
    },

    // -----------------------------------------------------------------------
    // Validation / catch-all
    // -----------------------------------------------------------------------
    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// A backend operation failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    /// The wire-level error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoSuchBucket { .. } => ErrorCode::NoSuchBucket,
            Self::BucketAlreadyExists { .. } => ErrorCode::BucketAlreadyExists,
            Self::InvalidBucketName { .. } => ErrorCode::InvalidBucketName,
            Self::NoSuchKey { .. } => ErrorCode::NoSuchKey,
            Self::KeyTooLong { .. } => ErrorCode::KeyTooLongError,
            Self::InvalidRange => ErrorCode::InvalidRange,
            Self::NoSuchUpload { .. } => ErrorCode::NoSuchUpload,
            Self::MalformedUploadId { .. } => ErrorCode::MalformedUploadId,
            Self::InvalidPart { .. } => ErrorCode::InvalidPart,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::Backend(_) | Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}

/// Convenience result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
