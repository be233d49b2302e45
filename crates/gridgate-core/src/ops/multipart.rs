//! Multipart upload operations.
//!
//! An upload's entire state lives in the backend: a JSON side object under
//! the bucket records the logical key and captured metadata, and each part
//! is an auxiliary data object in the bucket's `multiparts` sub-collection
//! tagged with the upload id. Neither carries the search attribute, so
//! in-progress state never appears in listings. Any pooled session can
//! serve any step of an upload.
//!
//! Every operation rejects a malformed upload id (anything but 16 hex
//! characters) before touching the backend, then verifies the side object
//! exists.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use chrono::Utc;
use gridgate_model::{CompletedPart, ListPartsResult, MultipartUploadsResult, ObjectInfo, PartInfo};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{BackendError, GridSession, ValueFilter};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::naming::{
    MULTIPART_ATTRIBUTE, SEARCH_ATTRIBUTE, USER_METADATA_PREFIX, content_type_for_key, entity_tag,
    generate_upload_id, is_valid_upload_id, part_object_name, physical_object_name,
    search_attribute_value, upload_meta_object_name,
};
use crate::pool::PooledSession;
use crate::validation::validate_object_key;

/// The JSON document stored in the upload's side object.
#[derive(Debug, Serialize, Deserialize)]
struct UploadMeta {
    /// The logical key the upload will create.
    name: String,
    /// User metadata captured at initiation time.
    metadata: HashMap<String, String>,
}

fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

impl<S: GridSession> Gateway<S> {
    fn upload_meta_path(&self, bucket: &str, key: &str, upload_id: &str) -> String {
        format!(
            "{}/{}",
            self.bucket_path(bucket),
            upload_meta_object_name(key, upload_id)
        )
    }

    fn part_path(&self, bucket: &str, key: &str, part_number: u32) -> String {
        format!(
            "{}/{}",
            self.multipart_path(bucket),
            part_object_name(key, part_number)
        )
    }

    /// Reject malformed ids before any backend call, then require the side
    /// object to exist.
    async fn check_upload(
        &self,
        session: &mut PooledSession<S>,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> GatewayResult<()> {
        if !is_valid_upload_id(upload_id) {
            return Err(GatewayError::MalformedUploadId {
                upload_id: upload_id.to_owned(),
            });
        }
        let meta_path = self.upload_meta_path(bucket, key, upload_id);
        if !session.object_exists(&meta_path).await? {
            return Err(GatewayError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            });
        }
        Ok(())
    }

    /// Begin a multipart upload and return its id.
    ///
    /// The side object is durably written before the id is returned, so a
    /// returned id is always resolvable by later operations on any session.
    pub async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        user_metadata: &HashMap<String, String>,
    ) -> GatewayResult<String> {
        validate_object_key(key)?;

        let upload_id = generate_upload_id();
        let meta = UploadMeta {
            name: key.to_owned(),
            metadata: user_metadata.clone(),
        };
        let body = serde_json::to_vec(&meta)
            .map_err(|e| GatewayError::Internal(anyhow::Error::new(e)))?;

        let meta_path = self.upload_meta_path(bucket, key, &upload_id);
        let mut session = self.session().await;

        session
            .stat_collection(&self.bucket_path(bucket))
            .await
            .map_err(|err| match err {
                BackendError::NotFound { .. } => GatewayError::NoSuchBucket {
                    bucket: bucket.to_owned(),
                },
                other => other.into(),
            })?;

        session.write_object(&meta_path, &body).await?;

        debug!(bucket = %bucket, key = %key, upload_id = %upload_id, "create_multipart_upload completed");
        Ok(upload_id)
    }

    /// Upload one part of a multipart upload.
    ///
    /// The part object's name is deterministic per `(key, part_number)`, so
    /// re-uploading a part number replaces the previous content.
    pub async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        data: Bytes,
    ) -> GatewayResult<PartInfo> {
        let mut session = self.session().await;
        self.check_upload(&mut session, bucket, key, upload_id)
            .await?;

        let path = self.part_path(bucket, key, part_number);
        session.write_object(&path, &data).await?;
        session
            .set_object_attribute(&path, MULTIPART_ATTRIBUTE, upload_id)
            .await?;

        debug!(
            bucket = %bucket,
            key = %key,
            upload_id = %upload_id,
            part_number,
            "upload_part completed"
        );

        Ok(PartInfo {
            part_number,
            etag: md5_hex(&data),
            size: data.len() as u64,
            last_modified: Utc::now(),
        })
    }

    /// List the parts of an in-progress upload.
    ///
    /// Parts are found by the upload-id attribute, deduplicated by part
    /// number (later rows win), returned in ascending order starting after
    /// `part_number_marker`, and truncated at `max_parts`.
    pub async fn list_parts(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number_marker: u32,
        max_parts: u32,
    ) -> GatewayResult<ListPartsResult> {
        let mut session = self.session().await;
        self.check_upload(&mut session, bucket, key, upload_id)
            .await?;

        let rows = session
            .query_objects_by_attribute(
                MULTIPART_ATTRIBUTE,
                &ValueFilter::Equals(upload_id.to_owned()),
            )
            .await?;

        let name_prefix = format!("{}_", physical_object_name(key));
        let mut by_number: BTreeMap<u32, PartInfo> = BTreeMap::new();
        for row in rows {
            let Some(number) = row
                .object_name
                .strip_prefix(name_prefix.as_str())
                .and_then(|suffix| suffix.parse::<u32>().ok())
            else {
                continue;
            };
            by_number.insert(
                number,
                PartInfo {
                    part_number: number,
                    etag: md5_hex(row.checksum.as_bytes()),
                    size: row.size,
                    last_modified: row.modified_at,
                },
            );
        }

        let remaining: Vec<PartInfo> = by_number
            .into_values()
            .filter(|p| p.part_number > part_number_marker)
            .collect();
        let is_truncated = remaining.len() > max_parts as usize;
        let parts: Vec<PartInfo> = remaining.into_iter().take(max_parts as usize).collect();
        let next_part_number_marker = if is_truncated {
            parts.last().map_or(0, |p| p.part_number)
        } else {
            0
        };

        Ok(ListPartsResult {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            upload_id: upload_id.to_owned(),
            part_number_marker,
            next_part_number_marker,
            max_parts,
            is_truncated,
            parts,
        })
    }

    /// Abort a multipart upload, destroying its parts and side object.
    ///
    /// Parts are matched by the key-hash name prefix, not by upload id, so
    /// a concurrent upload for the same key loses its parts too.
    pub async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> GatewayResult<()> {
        let mut session = self.session().await;
        self.check_upload(&mut session, bucket, key, upload_id)
            .await?;

        let collection = self.multipart_path(bucket);
        let name_prefix = physical_object_name(key);
        let entries = session.list_objects(&collection).await?;
        for entry in entries {
            if entry.name.starts_with(name_prefix.as_str()) {
                session
                    .destroy_object(&format!("{collection}/{}", entry.name))
                    .await?;
            }
        }

        session
            .destroy_object(&self.upload_meta_path(bucket, key, upload_id))
            .await?;

        debug!(bucket = %bucket, key = %key, upload_id = %upload_id, "abort_multipart_upload completed");
        Ok(())
    }

    /// Complete a multipart upload, assembling the final object.
    ///
    /// Parts are appended in ascending part-number order regardless of the
    /// order given; each part is destroyed as soon as it is consumed. A
    /// missing part aborts the operation without rolling back bytes already
    /// appended.
    pub async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> GatewayResult<ObjectInfo> {
        let mut session = self.session().await;
        self.check_upload(&mut session, bucket, key, upload_id)
            .await?;

        let meta_path = self.upload_meta_path(bucket, key, upload_id);
        let body = session.read_object_all(&meta_path).await?;
        let meta: UploadMeta = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::Internal(anyhow::Error::new(e)))?;
        session.destroy_object(&meta_path).await?;

        let final_path = self.object_path(bucket, key);
        session.write_object(&final_path, &[]).await?;

        let mut ordered: Vec<&CompletedPart> = parts.iter().collect();
        ordered.sort_by_key(|p| p.part_number);

        let mut total: u64 = 0;
        for part in ordered {
            let part_path = self.part_path(bucket, key, part.part_number);
            let data = session
                .read_object_all(&part_path)
                .await
                .map_err(|err| match err {
                    BackendError::NotFound { .. } => GatewayError::InvalidPart {
                        part_number: part.part_number,
                    },
                    other => other.into(),
                })?;
            session.append_object(&final_path, &data).await?;
            session.destroy_object(&part_path).await?;
            total += data.len() as u64;
        }

        session
            .set_object_attribute(
                &final_path,
                SEARCH_ATTRIBUTE,
                &search_attribute_value(bucket, key),
            )
            .await?;
        for (name, value) in &meta.metadata {
            session
                .set_object_attribute(&final_path, &format!("{USER_METADATA_PREFIX}{name}"), value)
                .await?;
        }

        let checksum = session.object_checksum(&final_path).await?;

        debug!(
            bucket = %bucket,
            key = %key,
            upload_id = %upload_id,
            size = total,
            "complete_multipart_upload completed"
        );

        Ok(ObjectInfo {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            size: total,
            modified_at: Utc::now(),
            etag: entity_tag(&checksum),
            content_type: content_type_for_key(key),
            user_metadata: meta.metadata,
        })
    }

    /// List in-progress multipart uploads.
    ///
    /// Enumerating uploads would require scanning every bucket's side
    /// objects; the result is intentionally always empty.
    pub async fn list_multipart_uploads(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> GatewayResult<MultipartUploadsResult> {
        let mut session = self.session().await;
        session
            .stat_collection(&self.bucket_path(bucket))
            .await
            .map_err(|err| match err {
                BackendError::NotFound { .. } => GatewayError::NoSuchBucket {
                    bucket: bucket.to_owned(),
                },
                other => other.into(),
            })?;

        Ok(MultipartUploadsResult {
            bucket: bucket.to_owned(),
            prefix: prefix.to_owned(),
            is_truncated: false,
        })
    }
}
