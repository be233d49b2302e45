//! Outbound backend contract.
//!
//! The gateway talks to the grid store exclusively through the traits in
//! this module. A concrete client crate implements [`GridConnector`] and
//! [`GridSession`] over the backend's RPC protocol; tests use an in-memory
//! implementation. Paths are absolute, `/`-separated backend paths rooted
//! at the zone, not logical object keys.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Errors produced by the backend client.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Establishing or re-establishing a session failed.
    #[error("connect to {host}:{port} failed: {reason}")]
    Connect {
        /// Backend host.
        host: String,
        /// Backend port.
        port: u16,
        /// Failure detail from the transport.
        reason: String,
    },

    /// The addressed collection or data object does not exist.
    #[error("path not found: {path}")]
    NotFound {
        /// The backend path that was not found.
        path: String,
    },

    /// A metadata query failed.
    #[error("metadata query failed: {reason}")]
    Query {
        /// Failure detail from the backend.
        reason: String,
    },

    /// A read, write or delete failed mid-operation.
    #[error("backend i/o failed on {path}: {reason}")]
    Io {
        /// The backend path being operated on.
        path: String,
        /// Failure detail from the backend.
        reason: String,
    },
}

/// Convenience result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Parameters for establishing a backend session.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Backend host.
    pub host: String,
    /// Backend port.
    pub port: u16,
    /// Backend zone name.
    pub zone: String,
    /// Account name used for authentication.
    pub username: String,
    /// Account password used for authentication.
    pub password: String,
    /// Absolute path of the mount collection all buckets live under.
    pub mount: String,
}

/// How to match attribute values in a metadata query.
#[derive(Debug, Clone)]
pub enum ValueFilter {
    /// The attribute value equals the given string exactly.
    Equals(String),
    /// The attribute value starts with the given string.
    Prefix(String),
}

/// One row of a metadata query result.
///
/// Rows are returned in ascending order of [`MetaRow::value`].
#[derive(Debug, Clone)]
pub struct MetaRow {
    /// The matched attribute value.
    pub value: String,
    /// When the tagged data object was last modified.
    pub modified_at: DateTime<Utc>,
    /// Size of the tagged data object in bytes.
    pub size: u64,
    /// Backend-reported checksum string of the tagged data object.
    pub checksum: String,
    /// Physical name of the tagged data object (last path segment).
    pub object_name: String,
}

/// Facts about a collection.
#[derive(Debug, Clone)]
pub struct CollectionStat {
    /// Name of the collection (last path segment).
    pub name: String,
    /// When the collection was created.
    pub created_at: DateTime<Utc>,
}

/// One entry of a collection content listing.
#[derive(Debug, Clone)]
pub struct EntryStat {
    /// Name of the entry (last path segment).
    pub name: String,
    /// Size in bytes; zero for collections.
    pub size: u64,
    /// When the entry was last modified.
    pub modified_at: DateTime<Utc>,
}

/// Factory for backend sessions.
#[async_trait]
pub trait GridConnector: Send + Sync {
    /// The session type this connector produces.
    type Session: GridSession;

    /// Establish an authenticated session against the backend.
    async fn connect(&self, options: &ConnectOptions) -> BackendResult<Self::Session>;
}

/// An authenticated backend session.
///
/// Sessions are owned exclusively by one caller at a time (the pool hands
/// out exclusive guards), so all methods take `&mut self`. Setting an
/// attribute whose name is already present on the target replaces its
/// value.
#[async_trait]
pub trait GridSession: Send + 'static {
    /// Re-validate the session's server-side state.
    async fn refresh(&mut self) -> BackendResult<()>;

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    /// Create a collection. Fails if it already exists.
    async fn create_collection(&mut self, path: &str) -> BackendResult<()>;

    /// Destroy a collection and everything beneath it.
    async fn destroy_collection(&mut self, path: &str) -> BackendResult<()>;

    /// Stat a collection, failing with [`BackendError::NotFound`] if absent.
    async fn stat_collection(&mut self, path: &str) -> BackendResult<CollectionStat>;

    /// List the collections directly beneath `path`.
    async fn list_collections(&mut self, path: &str) -> BackendResult<Vec<CollectionStat>>;

    /// Attach or replace an attribute on a collection.
    async fn set_collection_attribute(
        &mut self,
        path: &str,
        name: &str,
        value: &str,
    ) -> BackendResult<()>;

    // -----------------------------------------------------------------------
    // Data objects
    // -----------------------------------------------------------------------

    /// Create or replace a data object with the given content.
    async fn write_object(&mut self, path: &str, data: &[u8]) -> BackendResult<()>;

    /// Append content to an existing data object.
    async fn append_object(&mut self, path: &str, data: &[u8]) -> BackendResult<()>;

    /// Read `length` bytes starting at `offset`; `None` reads to the end.
    async fn read_object(
        &mut self,
        path: &str,
        offset: u64,
        length: Option<u64>,
    ) -> BackendResult<Bytes>;

    /// Read a data object in full.
    async fn read_object_all(&mut self, path: &str) -> BackendResult<Bytes>;

    /// Return the backend's checksum string for a data object.
    async fn object_checksum(&mut self, path: &str) -> BackendResult<String>;

    /// Destroy a data object.
    async fn destroy_object(&mut self, path: &str) -> BackendResult<()>;

    /// Whether a data object exists at `path`.
    async fn object_exists(&mut self, path: &str) -> BackendResult<bool>;

    /// Attach or replace an attribute on a data object.
    async fn set_object_attribute(
        &mut self,
        path: &str,
        name: &str,
        value: &str,
    ) -> BackendResult<()>;

    /// List the data objects directly beneath a collection.
    async fn list_objects(&mut self, path: &str) -> BackendResult<Vec<EntryStat>>;

    // -----------------------------------------------------------------------
    // Metadata queries
    // -----------------------------------------------------------------------

    /// Find data objects carrying the attribute `name` with a matching
    /// value, ordered ascending by value.
    async fn query_objects_by_attribute(
        &mut self,
        name: &str,
        filter: &ValueFilter,
    ) -> BackendResult<Vec<MetaRow>>;
}
