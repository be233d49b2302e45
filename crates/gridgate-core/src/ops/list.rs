//! Listing operations.
//!
//! The flat namespace is reconstructed from one ascending metadata query on
//! the search attribute; the backend hierarchy is never walked. Delimiter
//! grouping, marker filtering and key recovery all happen gateway-side on
//! the returned rows.
//!
//! Listings are never reported as truncated and no continuation token is
//! ever issued: the `{gridgate}` marker style is recognized so opaque
//! markers are not misread as lexicographic filters, but paging is left to
//! the caller re-listing with a plain marker.

use std::collections::{BTreeSet, HashMap};

use gridgate_model::{ListObjectsResult, ListObjectsV2Result, ObjectInfo};
use tracing::debug;

use crate::client::{BackendError, GridSession, ValueFilter};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::naming::{
    BUCKET_KEY_SEPARATOR, MARKER_PREFIX, SEARCH_ATTRIBUTE, STAGING_PREFIX, content_type_for_key,
    entity_tag, search_attribute_value,
};

/// Default and maximum number of object entries per listing.
const DEFAULT_MAX_KEYS: i32 = 1000;

impl<S: GridSession> Gateway<S> {
    /// List objects under a prefix (marker style).
    ///
    /// Objects accumulate up to `max_keys`; common prefixes are collected
    /// independently of that cap. `max_keys` of zero or less selects the
    /// default of 1000.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        delimiter: &str,
        max_keys: i32,
    ) -> GatewayResult<ListObjectsResult> {
        let limit = if max_keys <= 0 {
            DEFAULT_MAX_KEYS
        } else {
            max_keys.min(DEFAULT_MAX_KEYS)
        };
        let limit = limit as usize;

        // Markers carrying the reserved prefix are opaque continuation
        // tokens, which this gateway never issues; they must not be applied
        // as lexicographic filters.
        let lexical_marker =
            (!marker.is_empty() && !marker.starts_with(MARKER_PREFIX)).then_some(marker);

        let rows = {
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

            session
                .query_objects_by_attribute(
                    SEARCH_ATTRIBUTE,
                    &ValueFilter::Prefix(search_attribute_value(bucket, prefix)),
                )
                .await?
        };

        let strip = format!("{bucket}{BUCKET_KEY_SEPARATOR}");
        let mut objects = Vec::new();
        let mut common_prefixes = BTreeSet::new();

        for row in rows {
            let Some(key) = row.value.strip_prefix(strip.as_str()) else {
                continue;
            };

            // Recursive listings hide internal staging objects; delimiter
            // browsing may descend into the staging prefix deliberately.
            if delimiter.is_empty() && key.starts_with(STAGING_PREFIX) {
                continue;
            }

            if !delimiter.is_empty() {
                let rest = &key[prefix.len()..];
                if let Some(idx) = rest.find(delimiter) {
                    let common = format!("{prefix}{}{delimiter}", &rest[..idx]);
                    if common == STAGING_PREFIX {
                        continue;
                    }
                    if lexical_marker.is_some_and(|m| common.as_str() <= m) {
                        continue;
                    }
                    common_prefixes.insert(common);
                    continue;
                }
            }

            if lexical_marker.is_some_and(|m| key <= m) {
                continue;
            }

            if objects.len() < limit {
                objects.push(ObjectInfo {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                    size: row.size,
                    modified_at: row.modified_at,
                    etag: entity_tag(&row.checksum),
                    content_type: content_type_for_key(key),
                    user_metadata: HashMap::new(),
                });
            }
        }

        debug!(
            bucket = %bucket,
            prefix = %prefix,
            objects = objects.len(),
            prefixes = common_prefixes.len(),
            "list_objects completed"
        );

        Ok(ListObjectsResult {
            objects,
            common_prefixes: common_prefixes.into_iter().collect(),
            is_truncated: false,
            next_marker: String::new(),
        })
    }

    /// List objects under a prefix (continuation-token style).
    ///
    /// A thin adapter over [`Gateway::list_objects`]: a non-empty
    /// continuation token takes precedence over `start_after` as the
    /// marker.
    pub async fn list_objects_v2(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: &str,
        start_after: &str,
        delimiter: &str,
        max_keys: i32,
    ) -> GatewayResult<ListObjectsV2Result> {
        let marker = if continuation_token.is_empty() {
            start_after
        } else {
            continuation_token
        };

        let result = self
            .list_objects(bucket, prefix, marker, delimiter, max_keys)
            .await?;

        Ok(ListObjectsV2Result {
            objects: result.objects,
            common_prefixes: result.common_prefixes,
            is_truncated: result.is_truncated,
            continuation_token: continuation_token.to_owned(),
            next_continuation_token: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use gridgate_model::ErrorCode;

    use crate::gateway::Gateway;
    use crate::memgrid::{MemSession, test_gateway};
    use crate::naming::STAGING_PREFIX;

    async fn seeded_gateway(keys: &[&str]) -> Gateway<MemSession> {
        let gateway = test_gateway().await;
        gateway.create_bucket("data", "").await.unwrap();
        for key in keys {
            gateway
                .put_object("data", key, Bytes::from_static(b"x"), &HashMap::new())
                .await
                .unwrap();
        }
        gateway
    }

    #[tokio::test]
    async fn test_should_group_keys_under_delimiter() {
        let gateway = seeded_gateway(&["a/b.txt", "a/c.txt", "top.txt"]).await;

        let result = gateway.list_objects("data", "", "", "/", 1000).await.unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["top.txt"]);
        assert_eq!(result.common_prefixes, vec!["a/"]);
        assert!(!result.is_truncated);
    }

    #[tokio::test]
    async fn test_should_list_recursively_without_delimiter() {
        let gateway = seeded_gateway(&["a/b.txt", "a/c.txt", "top.txt"]).await;

        let result = gateway.list_objects("data", "", "", "", 1000).await.unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/b.txt", "a/c.txt", "top.txt"]);
        assert!(result.common_prefixes.is_empty());
    }

    #[tokio::test]
    async fn test_should_narrow_listing_by_prefix() {
        let gateway = seeded_gateway(&["logs/1.txt", "logs/2.txt", "data/3.txt"]).await;

        let result = gateway
            .list_objects("data", "logs/", "", "", 1000)
            .await
            .unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["logs/1.txt", "logs/2.txt"]);
    }

    #[tokio::test]
    async fn test_should_group_nested_prefixes_relative_to_query_prefix() {
        let gateway = seeded_gateway(&["a/x/1.txt", "a/y/2.txt", "a/3.txt"]).await;

        let result = gateway
            .list_objects("data", "a/", "", "/", 1000)
            .await
            .unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/3.txt"]);
        assert_eq!(result.common_prefixes, vec!["a/x/", "a/y/"]);
    }

    #[tokio::test]
    async fn test_should_filter_entries_at_or_below_plain_marker() {
        let gateway = seeded_gateway(&["a.txt", "b.txt", "c.txt"]).await;

        let result = gateway
            .list_objects("data", "", "b.txt", "", 1000)
            .await
            .unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["c.txt"]);
    }

    #[tokio::test]
    async fn test_should_ignore_reserved_prefix_markers() {
        let gateway = seeded_gateway(&["a.txt", "b.txt"]).await;

        let result = gateway
            .list_objects("data", "", "{gridgate}opaque-token", "", 1000)
            .await
            .unwrap();
        assert_eq!(result.objects.len(), 2);
    }

    #[tokio::test]
    async fn test_should_cap_objects_but_not_common_prefixes() {
        let gateway = seeded_gateway(&["d1/x", "d2/x", "d3/x", "a1", "a2", "a3"]).await;

        let result = gateway.list_objects("data", "", "", "/", 2).await.unwrap();
        assert_eq!(result.objects.len(), 2);
        // Prefixes accumulate past the object cap.
        assert_eq!(result.common_prefixes.len(), 3);
        // Preserved behavior: the cut listing is still reported complete.
        assert!(!result.is_truncated);
        assert!(result.next_marker.is_empty());
    }

    #[tokio::test]
    async fn test_should_hide_staging_objects_from_recursive_listings() {
        let staged = format!("{STAGING_PREFIX}upload.part");
        let gateway = seeded_gateway(&[staged.as_str(), "visible.txt"]).await;

        let result = gateway.list_objects("data", "", "", "", 1000).await.unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["visible.txt"]);

        // Delimiter browsing never surfaces the staging prefix either.
        let browsed = gateway.list_objects("data", "", "", "/", 1000).await.unwrap();
        assert!(!browsed.common_prefixes.iter().any(|p| p == STAGING_PREFIX));
    }

    #[tokio::test]
    async fn test_should_report_missing_bucket_on_list() {
        let gateway = test_gateway().await;
        let err = gateway
            .list_objects("ghost", "", "", "", 1000)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoSuchBucket);
    }

    #[tokio::test]
    async fn test_should_adapt_v2_continuation_token_to_marker() {
        let gateway = seeded_gateway(&["a.txt", "b.txt", "c.txt"]).await;

        let result = gateway
            .list_objects_v2("data", "", "a.txt", "zzz", "", 1000)
            .await
            .unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        // The continuation token wins over start_after.
        assert_eq!(keys, vec!["b.txt", "c.txt"]);
        assert_eq!(result.continuation_token, "a.txt");
        assert!(result.next_continuation_token.is_empty());
    }

    #[tokio::test]
    async fn test_should_adapt_v2_start_after_when_no_token() {
        let gateway = seeded_gateway(&["a.txt", "b.txt", "c.txt"]).await;

        let result = gateway
            .list_objects_v2("data", "", "", "b.txt", "", 1000)
            .await
            .unwrap();
        let keys: Vec<&str> = result.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["c.txt"]);
    }
}
