//! Wire-level error codes.
//!
//! Defines [`ErrorCode`], the set of error codes the gateway can surface to
//! callers, together with the canonical string form, a default HTTP status
//! code, and a default human-readable message for each code.

use std::fmt;

/// Well-known error codes surfaced by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Access to the resource was denied.
    AccessDenied,
    /// The requested bucket name is already taken.
    BucketAlreadyExists,
    /// An unexpected internal failure.
    InternalError,
    /// A request argument is invalid.
    InvalidArgument,
    /// The bucket name does not satisfy the naming rules.
    InvalidBucketName,
    /// A referenced part is missing or does not match.
    InvalidPart,
    /// The requested byte range cannot be satisfied.
    InvalidRange,
    /// The object key exceeds the maximum allowed length.
    KeyTooLongError,
    /// The upload id is not a well-formed identifier.
    MalformedUploadId,
    /// The specified bucket does not exist.
    NoSuchBucket,
    /// The specified key does not exist.
    NoSuchKey,
    /// The specified multipart upload does not exist.
    NoSuchUpload,
    /// The requested functionality is not implemented.
    NotImplemented,
}

impl ErrorCode {
    /// Returns the error code as a string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDenied",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::InternalError => "InternalError",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidBucketName => "InvalidBucketName",
            Self::InvalidPart => "InvalidPart",
            Self::InvalidRange => "InvalidRange",
            Self::KeyTooLongError => "KeyTooLongError",
            Self::MalformedUploadId => "MalformedUploadId",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::NoSuchUpload => "NoSuchUpload",
            Self::NotImplemented => "NotImplemented",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(self) -> http::StatusCode {
        match self {
            Self::InvalidArgument
            | Self::InvalidBucketName
            | Self::InvalidPart
            | Self::KeyTooLongError
            | Self::MalformedUploadId => http::StatusCode::BAD_REQUEST,
            Self::AccessDenied => http::StatusCode::FORBIDDEN,
            Self::NoSuchBucket | Self::NoSuchKey | Self::NoSuchUpload => {
                http::StatusCode::NOT_FOUND
            }
            Self::BucketAlreadyExists => http::StatusCode::CONFLICT,
            Self::InvalidRange => http::StatusCode::RANGE_NOT_SATISFIABLE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => http::StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Returns the default message for this error.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::AccessDenied => "Access Denied",
            Self::BucketAlreadyExists => "The requested bucket name is not available",
            Self::InternalError => "Internal server error",
            Self::InvalidArgument => "Invalid Argument",
            Self::InvalidBucketName => "The specified bucket is not valid",
            Self::InvalidPart => "One or more of the specified parts could not be found",
            Self::InvalidRange => "The requested range cannot be satisfied",
            Self::KeyTooLongError => "Your key is too long",
            Self::MalformedUploadId => "The specified upload id is not well formed",
            Self::NoSuchBucket => "The specified bucket does not exist",
            Self::NoSuchKey => "The specified key does not exist",
            Self::NoSuchUpload => "The specified multipart upload does not exist",
            Self::NotImplemented => "The functionality is not implemented",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
