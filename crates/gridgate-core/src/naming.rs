//! Naming and metadata codec.
//!
//! The backend imposes hierarchical path semantics and path-length limits,
//! so logical keys are never stored as backend names. Instead every object
//! gets a hashed physical name, and the logical key survives only in a
//! search attribute attached to the object. The helpers here produce all
//! derived names, attribute values and entity tags; they are pure functions
//! shared by every operation module.

use md5::{Digest, Md5};
use rand::Rng;

// ---------------------------------------------------------------------------
// Reserved constants
// ---------------------------------------------------------------------------

/// Attribute carrying `bucket:::::key` on every listable object.
pub const SEARCH_ATTRIBUTE: &str = "gw_obj";

/// Attribute carrying the upload id on part objects.
pub const MULTIPART_ATTRIBUTE: &str = "gw_multipart";

/// Attribute carrying the location constraint on bucket collections.
pub const LOCATION_ATTRIBUTE: &str = "gw_loc";

/// Prefix for user-metadata attributes on objects.
pub const USER_METADATA_PREFIX: &str = "gw_meta_";

/// Separator between bucket and key in the search attribute value.
pub const BUCKET_KEY_SEPARATOR: &str = ":::::";

/// Prefix marking opaque (non-lexicographic) listing markers.
pub const MARKER_PREFIX: &str = "{gridgate}";

/// Sub-collection of each bucket holding multipart part objects.
pub const MULTIPART_COLLECTION: &str = "multiparts";

/// Key prefix reserved for internal staging objects.
pub const STAGING_PREFIX: &str = "gridgate.sys.tmp/";

// ---------------------------------------------------------------------------
// Hashing and derived names
// ---------------------------------------------------------------------------

/// Lowercase-hex MD5 digest of a string.
fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// The physical backend name for a logical key.
///
/// Always 32 lowercase hex characters, so keys of any length and character
/// set map to filesystem-safe, length-bounded names. The logical key is
/// recovered from the search attribute, never from this name.
///
/// # Examples
///
/// ```
/// use gridgate_core::naming::physical_object_name;
///
/// let name = physical_object_name("2024/photos/cat.png");
/// assert_eq!(name.len(), 32);
/// assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn physical_object_name(key: &str) -> String {
    md5_hex(key)
}

/// The search attribute value identifying an object: `bucket:::::key`.
///
/// # Examples
///
/// ```
/// use gridgate_core::naming::search_attribute_value;
///
/// assert_eq!(search_attribute_value("photos", "a/b.txt"), "photos:::::a/b.txt");
/// ```
#[must_use]
pub fn search_attribute_value(bucket: &str, key: &str) -> String {
    format!("{bucket}{BUCKET_KEY_SEPARATOR}{key}")
}

/// Derive an entity tag from a backend checksum string.
///
/// The backend's checksum format is opaque to callers, so it is rehashed
/// into a fixed-shape hex digest with a `-1` suffix.
///
/// # Examples
///
/// ```
/// use gridgate_core::naming::entity_tag;
///
/// let tag = entity_tag("sha2:ABCDEF==");
/// assert_eq!(tag.len(), 34);
/// assert!(tag.ends_with("-1"));
/// ```
#[must_use]
pub fn entity_tag(checksum: &str) -> String {
    format!("{}-1", md5_hex(checksum))
}

/// Name of the side object recording a multipart upload's state.
///
/// The name embeds the upload id and the key hash, so it is locatable from
/// `(key, upload_id)` without any scan or query.
#[must_use]
pub fn upload_meta_object_name(key: &str, upload_id: &str) -> String {
    format!("multipart_v1_{upload_id}_{}.json", md5_hex(key))
}

/// Name of the auxiliary object holding one uploaded part.
///
/// Deterministic per `(key, part_number)`, so re-uploading a part number
/// replaces the previous content.
#[must_use]
pub fn part_object_name(key: &str, part_number: u32) -> String {
    format!("{}_{part_number}", md5_hex(key))
}

// ---------------------------------------------------------------------------
// Upload ids
// ---------------------------------------------------------------------------

/// Generate a fresh multipart upload id: 8 random bytes as 16 hex chars.
///
/// # Examples
///
/// ```
/// use gridgate_core::naming::{generate_upload_id, is_valid_upload_id};
///
/// let id = generate_upload_id();
/// assert!(is_valid_upload_id(&id));
/// ```
#[must_use]
pub fn generate_upload_id() -> String {
    let mut rng = rand::rng();
    let mut buf = [0u8; 8];
    rng.fill(&mut buf);
    hex::encode(buf)
}

/// Whether a string is a well-formed upload id (exactly 16 hex chars).
#[must_use]
pub fn is_valid_upload_id(upload_id: &str) -> bool {
    upload_id.len() == 16 && upload_id.chars().all(|c| c.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// Derive a content type from the key's file extension.
///
/// Returns an empty string when the extension is unknown or absent; the
/// embedding server decides the fallback.
///
/// # Examples
///
/// ```
/// use gridgate_core::naming::content_type_for_key;
///
/// assert_eq!(content_type_for_key("report.pdf"), "application/pdf");
/// assert_eq!(content_type_for_key("archive/data.bin"), "");
/// ```
#[must_use]
pub fn content_type_for_key(key: &str) -> String {
    let extension = key
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "log" => mime::TEXT_PLAIN.to_string(),
        "html" | "htm" => mime::TEXT_HTML.to_string(),
        "css" => mime::TEXT_CSS.to_string(),
        "csv" => mime::TEXT_CSV.to_string(),
        "xml" => mime::TEXT_XML.to_string(),
        "js" => mime::TEXT_JAVASCRIPT.to_string(),
        "json" => mime::APPLICATION_JSON.to_string(),
        "pdf" => mime::APPLICATION_PDF.to_string(),
        "png" => mime::IMAGE_PNG.to_string(),
        "jpg" | "jpeg" => mime::IMAGE_JPEG.to_string(),
        "gif" => mime::IMAGE_GIF.to_string(),
        "svg" => mime::IMAGE_SVG.to_string(),
        "mp3" => "audio/mpeg".to_owned(),
        "mp4" => "video/mp4".to_owned(),
        "zip" => "application/zip".to_owned(),
        "gz" => "application/gzip".to_owned(),
        "tar" => "application/x-tar".to_owned(),
        _ => String::new(),
    }
}
