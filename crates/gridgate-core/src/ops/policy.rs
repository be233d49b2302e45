//! Bucket policy operations.
//!
//! Backend permissions are not translated into policy documents. Reads
//! serve a fixed read-anyone policy so anonymous browsing tools work;
//! writes and deletes are accepted and discarded.

use gridgate_model::BucketPolicy;
use tracing::debug;

use crate::client::{BackendError, GridSession};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;

impl<S: GridSession> Gateway<S> {
    async fn require_bucket(&self, bucket: &str) -> GatewayResult<()> {
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
        Ok(())
    }

    /// Return the fixed read-anyone policy for an existing bucket.
    pub async fn get_bucket_policy(&self, bucket: &str) -> GatewayResult<BucketPolicy> {
        self.require_bucket(bucket).await?;
        Ok(BucketPolicy::read_only(bucket))
    }

    /// Accept and discard a bucket policy.
    pub async fn put_bucket_policy(
        &self,
        bucket: &str,
        _policy: &BucketPolicy,
    ) -> GatewayResult<()> {
        self.require_bucket(bucket).await?;
        debug!(bucket = %bucket, "put_bucket_policy accepted (no-op)");
        Ok(())
    }

    /// Accept a policy deletion without changing anything.
    pub async fn delete_bucket_policy(&self, bucket: &str) -> GatewayResult<()> {
        self.require_bucket(bucket).await?;
        debug!(bucket = %bucket, "delete_bucket_policy accepted (no-op)");
        Ok(())
    }
}
