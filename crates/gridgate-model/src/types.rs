//! Descriptor and result types of the gateway contract.
//!
//! These are plain data shapes: the gateway fills them in and the embedding
//! server serializes them onto the wire. Timestamps are always UTC.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary information about a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    /// The bucket name.
    pub name: String,
    /// When the bucket was created.
    pub created: DateTime<Utc>,
}

/// Summary information about an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    /// The bucket holding the object.
    pub bucket: String,
    /// The logical object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// When the object was last modified.
    pub modified_at: DateTime<Utc>,
    /// The entity tag for the object.
    pub etag: String,
    /// Content type derived from the key extension; empty when unknown.
    pub content_type: String,
    /// User-provided metadata attached to the object.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub user_metadata: HashMap<String, String>,
}

/// Result of a bucket listing (marker style).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsResult {
    /// Objects matching the prefix, in ascending key order.
    pub objects: Vec<ObjectInfo>,
    /// Grouped common prefixes, deduplicated and in ascending order.
    pub common_prefixes: Vec<String>,
    /// Whether the listing was cut short. Always `false` for this gateway.
    pub is_truncated: bool,
    /// Marker to resume from; empty when the listing is complete.
    pub next_marker: String,
}

/// Result of a bucket listing (continuation-token style).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsV2Result {
    /// Objects matching the prefix, in ascending key order.
    pub objects: Vec<ObjectInfo>,
    /// Grouped common prefixes, deduplicated and in ascending order.
    pub common_prefixes: Vec<String>,
    /// Whether the listing was cut short. Always `false` for this gateway.
    pub is_truncated: bool,
    /// The continuation token this page was produced from.
    pub continuation_token: String,
    /// Token to resume from; empty when the listing is complete.
    pub next_continuation_token: String,
}

/// A single part of an in-progress multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartInfo {
    /// The part number (1-based).
    pub part_number: u32,
    /// The entity tag for this part.
    pub etag: String,
    /// Size of this part in bytes.
    pub size: u64,
    /// When this part was uploaded.
    pub last_modified: DateTime<Utc>,
}

/// Result of listing the parts of a multipart upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPartsResult {
    /// The bucket holding the upload.
    pub bucket: String,
    /// The key the upload will create.
    pub key: String,
    /// The upload id.
    pub upload_id: String,
    /// Parts at or below this number were skipped.
    pub part_number_marker: u32,
    /// Marker to resume from when the result is truncated.
    pub next_part_number_marker: u32,
    /// Maximum number of parts requested.
    pub max_parts: u32,
    /// Whether more parts remain beyond this page.
    pub is_truncated: bool,
    /// Parts in ascending part-number order.
    pub parts: Vec<PartInfo>,
}

/// Result of listing in-progress multipart uploads.
///
/// This gateway intentionally reports no in-progress uploads, so the upload
/// list is always empty and the result never truncated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipartUploadsResult {
    /// The bucket that was queried.
    pub bucket: String,
    /// The prefix that was queried.
    pub prefix: String,
    /// Whether more uploads remain. Always `false`.
    pub is_truncated: bool,
}

/// A part reference supplied when completing a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPart {
    /// The part number (1-based).
    pub part_number: u32,
    /// The entity tag returned when the part was uploaded.
    pub etag: String,
}
