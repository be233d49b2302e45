//! Object CRUD operations.
//!
//! Objects live as hashed physical data objects inside the bucket
//! collection; the logical key is carried by the search attribute. Reads
//! address the physical name directly, while metadata lookups go through a
//! targeted attribute query.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::Utc;
use gridgate_model::ObjectInfo;
use tracing::debug;

use crate::client::{BackendError, GridSession, ValueFilter};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::naming::{
    SEARCH_ATTRIBUTE, USER_METADATA_PREFIX, content_type_for_key, entity_tag,
    search_attribute_value,
};
use crate::validation::validate_object_key;

fn not_found_to_no_such_key(err: BackendError, key: &str) -> GatewayError {
    match err {
        BackendError::NotFound { .. } => GatewayError::NoSuchKey {
            key: key.to_owned(),
        },
        other => other.into(),
    }
}

impl<S: GridSession> Gateway<S> {
    /// Read object content.
    ///
    /// `length` of `None` reads to the end. Range checking beyond the sign
    /// of the offset is delegated to the backend read cursor.
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        offset: i64,
        length: Option<u64>,
    ) -> GatewayResult<Bytes> {
        let Ok(offset) = u64::try_from(offset) else {
            return Err(GatewayError::InvalidRange);
        };

        let path = self.object_path(bucket, key);
        let mut session = self.session().await;
        session
            .read_object(&path, offset, length)
            .await
            .map_err(|err| not_found_to_no_such_key(err, key))
    }

    /// Look up an object's descriptor by its search attribute.
    pub async fn head_object(&self, bucket: &str, key: &str) -> GatewayResult<ObjectInfo> {
        let value = search_attribute_value(bucket, key);
        let mut session = self.session().await;
        let rows = session
            .query_objects_by_attribute(SEARCH_ATTRIBUTE, &ValueFilter::Equals(value))
            .await?;

        // One physical object per key; extra rows would be stale duplicates,
        // the first row wins.
        let row = rows.into_iter().next().ok_or_else(|| GatewayError::NoSuchKey {
            key: key.to_owned(),
        })?;

        Ok(ObjectInfo {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            size: row.size,
            modified_at: row.modified_at,
            etag: entity_tag(&row.checksum),
            content_type: content_type_for_key(key),
            user_metadata: HashMap::new(),
        })
    }

    /// Create or replace an object.
    ///
    /// Writes the physical data object, then attaches the search attribute
    /// and prefixed user-metadata attributes. A mid-stream write failure
    /// leaves a truncated object behind; there is no rollback.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        user_metadata: &HashMap<String, String>,
    ) -> GatewayResult<ObjectInfo> {
        validate_object_key(key)?;

        let path = self.object_path(bucket, key);
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

        session.write_object(&path, &data).await?;
        session
            .set_object_attribute(&path, SEARCH_ATTRIBUTE, &search_attribute_value(bucket, key))
            .await?;
        for (name, value) in user_metadata {
            session
                .set_object_attribute(&path, &format!("{USER_METADATA_PREFIX}{name}"), value)
                .await?;
        }

        let checksum = session.object_checksum(&path).await?;

        debug!(bucket = %bucket, key = %key, size = data.len(), "put_object completed");

        Ok(ObjectInfo {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            size: data.len() as u64,
            modified_at: Utc::now(),
            etag: entity_tag(&checksum),
            content_type: content_type_for_key(key),
            user_metadata: user_metadata.clone(),
        })
    }

    /// Copy an object by reading the source fully and writing a fresh
    /// destination object. The backend's server-side copy is not used, so
    /// the destination always comes out listable and searchable.
    pub async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> GatewayResult<ObjectInfo> {
        let data = {
            let src_path = self.object_path(src_bucket, src_key);
            let mut session = self.session().await;
            session
                .read_object_all(&src_path)
                .await
                .map_err(|err| not_found_to_no_such_key(err, src_key))?
        };

        self.put_object(dst_bucket, dst_key, data, &HashMap::new())
            .await
    }

    /// Delete an object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> GatewayResult<()> {
        let path = self.object_path(bucket, key);
        let mut session = self.session().await;

        if !session.object_exists(&path).await? {
            return Err(GatewayError::NoSuchKey {
                key: key.to_owned(),
            });
        }
        session.destroy_object(&path).await?;

        debug!(bucket = %bucket, key = %key, "delete_object completed");
        Ok(())
    }
}
