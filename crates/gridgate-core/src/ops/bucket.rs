//! Bucket CRUD operations.
//!
//! Buckets are collections directly beneath the configured mount point.
//! Creation also provisions the `multiparts` sub-collection; a bucket
//! without it is considered incompletely created. Mutating operations end
//! with a fire-and-forget pool refresh so all sessions observe the
//! namespace change promptly.

use gridgate_model::BucketInfo;
use tracing::debug;

use crate::client::{BackendError, GridSession};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::naming::LOCATION_ATTRIBUTE;
use crate::validation::validate_bucket_name;

impl<S: GridSession> Gateway<S> {
    /// Create a bucket.
    ///
    /// Creates the backend collection and its `multiparts` sub-collection,
    /// and records a non-empty `location` as a collection attribute.
    pub async fn create_bucket(&self, bucket: &str, location: &str) -> GatewayResult<()> {
        validate_bucket_name(bucket)?;

        let path = self.bucket_path(bucket);
        {
            let mut session = self.session().await;

            if session.stat_collection(&path).await.is_ok() {
                return Err(GatewayError::BucketAlreadyExists {
                    bucket: bucket.to_owned(),
                });
            }

            session.create_collection(&path).await?;
            if !location.is_empty() {
                session
                    .set_collection_attribute(&path, LOCATION_ATTRIBUTE, location)
                    .await?;
            }
            // Creation is incomplete until the multipart sub-collection
            // exists.
            session
                .create_collection(&self.multipart_path(bucket))
                .await?;
        }

        self.spawn_refresh();
        debug!(bucket = %bucket, "create_bucket completed");
        Ok(())
    }

    /// Look up a bucket, returning its name and creation time.
    pub async fn bucket_info(&self, bucket: &str) -> GatewayResult<BucketInfo> {
        let path = self.bucket_path(bucket);
        let mut session = self.session().await;

        let stat = session
            .stat_collection(&path)
            .await
            .map_err(|err| match err {
                BackendError::NotFound { .. } => GatewayError::NoSuchBucket {
                    bucket: bucket.to_owned(),
                },
                other => other.into(),
            })?;

        Ok(BucketInfo {
            name: bucket.to_owned(),
            created: stat.created_at,
        })
    }

    /// List all buckets, unpaginated.
    pub async fn list_buckets(&self) -> GatewayResult<Vec<BucketInfo>> {
        let mut session = self.session().await;
        let collections = session.list_collections(&self.config.mount).await?;

        Ok(collections
            .into_iter()
            .map(|stat| BucketInfo {
                name: stat.name,
                created: stat.created_at,
            })
            .collect())
    }

    /// Delete a bucket and everything in it, including multipart state.
    pub async fn delete_bucket(&self, bucket: &str) -> GatewayResult<()> {
        let path = self.bucket_path(bucket);
        {
            let mut session = self.session().await;

            session
                .stat_collection(&path)
                .await
                .map_err(|err| match err {
                    BackendError::NotFound { .. } => GatewayError::NoSuchBucket {
                        bucket: bucket.to_owned(),
                    },
                    other => other.into(),
                })?;

            session.destroy_collection(&path).await?;
        }

        self.spawn_refresh();
        debug!(bucket = %bucket, "delete_bucket completed");
        Ok(())
    }
}
