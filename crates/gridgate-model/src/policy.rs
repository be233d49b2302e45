//! Bucket policy documents.
//!
//! The gateway does not evaluate policies; it serves a fixed read-anyone
//! document so that anonymous browsing tools work against gateway buckets.
//! The types serialize to the standard policy-document JSON shape.

use serde::{Deserialize, Serialize};

/// Policy language version used for generated documents.
pub const POLICY_VERSION: &str = "2012-10-17";

/// A bucket policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketPolicy {
    /// Policy language version.
    #[serde(rename = "Version")]
    pub version: String,
    /// The policy statements.
    #[serde(rename = "Statement")]
    pub statements: Vec<PolicyStatement>,
}

/// A single statement within a bucket policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// `"Allow"` or `"Deny"`.
    #[serde(rename = "Effect")]
    pub effect: String,
    /// The principal the statement applies to.
    #[serde(rename = "Principal")]
    pub principal: Principal,
    /// The allowed or denied actions.
    #[serde(rename = "Action")]
    pub actions: Vec<String>,
    /// The resources the statement applies to.
    #[serde(rename = "Resource")]
    pub resources: Vec<String>,
}

/// The principal of a policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account identifiers; `"*"` means anyone.
    #[serde(rename = "AWS")]
    pub aws: Vec<String>,
}

impl BucketPolicy {
    /// Build the fixed read-anyone policy for a bucket.
    ///
    /// Grants `GetBucketLocation`, `ListBucket` and `GetObject` to any
    /// principal on the bucket and its contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridgate_model::BucketPolicy;
    ///
    /// let policy = BucketPolicy::read_only("photos");
    /// assert_eq!(policy.statements.len(), 2);
    /// ```
    #[must_use]
    pub fn read_only(bucket: &str) -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statements: vec![
                PolicyStatement {
                    effect: "Allow".to_owned(),
                    principal: Principal {
                        aws: vec!["*".to_owned()],
                    },
                    actions: vec![
                        "s3:GetBucketLocation".to_owned(),
                        "s3:ListBucket".to_owned(),
                    ],
                    resources: vec![format!("arn:aws:s3:::{bucket}")],
                },
                PolicyStatement {
                    effect: "Allow".to_owned(),
                    principal: Principal {
                        aws: vec!["*".to_owned()],
                    },
                    actions: vec!["s3:GetObject".to_owned()],
                    resources: vec![format!("arn:aws:s3:::{bucket}/*")],
                },
            ],
        }
    }
}
