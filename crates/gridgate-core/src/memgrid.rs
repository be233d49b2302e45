//! In-memory grid backend for tests.
//!
//! Implements the [`crate::client`] traits over shared in-process maps so
//! every gateway operation can be exercised end to end without a real
//! backend. All sessions produced by one [`MemGridConnector`] share the
//! same store, mirroring how pooled sessions see one remote namespace.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use parking_lot::Mutex;

use crate::client::{
    BackendError, BackendResult, CollectionStat, ConnectOptions, EntryStat, GridConnector,
    GridSession, MetaRow, ValueFilter,
};

#[derive(Debug, Default)]
struct Store {
    collections: BTreeMap<String, CollectionEntry>,
    objects: BTreeMap<String, ObjectEntry>,
}

#[derive(Debug)]
struct CollectionEntry {
    created_at: DateTime<Utc>,
    attributes: HashMap<String, String>,
}

#[derive(Debug)]
struct ObjectEntry {
    data: Vec<u8>,
    modified_at: DateTime<Utc>,
    attributes: HashMap<String, String>,
}

impl ObjectEntry {
    fn checksum(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(&self.data);
        hex::encode(hasher.finalize())
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

fn name_of(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Test connector producing [`MemSession`]s over one shared store.
#[derive(Debug, Clone)]
pub(crate) struct MemGridConnector {
    store: Arc<Mutex<Store>>,
    connects: Arc<AtomicUsize>,
    refreshes: Arc<AtomicUsize>,
    fail_after: Option<usize>,
}

impl MemGridConnector {
    /// Build a connector whose store already contains the mount collection
    /// chain.
    pub(crate) fn new(mount: &str) -> Self {
        let mut store = Store::default();
        let mut path = String::new();
        for segment in mount.split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
            store.collections.insert(
                path.clone(),
                CollectionEntry {
                    created_at: Utc::now(),
                    attributes: HashMap::new(),
                },
            );
        }
        Self {
            store: Arc::new(Mutex::new(store)),
            connects: Arc::new(AtomicUsize::new(0)),
            refreshes: Arc::new(AtomicUsize::new(0)),
            fail_after: None,
        }
    }

    /// Make connection attempts beyond the first `n` fail.
    pub(crate) fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub(crate) fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GridConnector for MemGridConnector {
    type Session = MemSession;

    async fn connect(&self, options: &ConnectOptions) -> BackendResult<Self::Session> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if attempt >= limit {
                return Err(BackendError::Connect {
                    host: options.host.clone(),
                    port: options.port,
                    reason: "injected connect failure".to_owned(),
                });
            }
        }
        Ok(MemSession {
            store: Arc::clone(&self.store),
            refreshes: Arc::clone(&self.refreshes),
        })
    }
}

/// One session over the shared in-memory store.
#[derive(Debug)]
pub(crate) struct MemSession {
    store: Arc<Mutex<Store>>,
    refreshes: Arc<AtomicUsize>,
}

#[async_trait]
impl GridSession for MemSession {
    async fn refresh(&mut self) -> BackendResult<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_collection(&mut self, path: &str) -> BackendResult<()> {
        let mut store = self.store.lock();
        if store.collections.contains_key(path) {
            return Err(BackendError::Io {
                path: path.to_owned(),
                reason: "collection already exists".to_owned(),
            });
        }
        store.collections.insert(
            path.to_owned(),
            CollectionEntry {
                created_at: Utc::now(),
                attributes: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn destroy_collection(&mut self, path: &str) -> BackendResult<()> {
        let mut store = self.store.lock();
        if store.collections.remove(path).is_none() {
            return Err(BackendError::NotFound {
                path: path.to_owned(),
            });
        }
        let prefix = format!("{path}/");
        store.collections.retain(|p, _| !p.starts_with(&prefix));
        store.objects.retain(|p, _| !p.starts_with(&prefix));
        Ok(())
    }

    async fn stat_collection(&mut self, path: &str) -> BackendResult<CollectionStat> {
        let store = self.store.lock();
        store
            .collections
            .get(path)
            .map(|entry| CollectionStat {
                name: name_of(path).to_owned(),
                created_at: entry.created_at,
            })
            .ok_or_else(|| BackendError::NotFound {
                path: path.to_owned(),
            })
    }

    async fn list_collections(&mut self, path: &str) -> BackendResult<Vec<CollectionStat>> {
        let store = self.store.lock();
        if !store.collections.contains_key(path) {
            return Err(BackendError::NotFound {
                path: path.to_owned(),
            });
        }
        let prefix = format!("{path}/");
        Ok(store
            .collections
            .iter()
            .filter(|(p, _)| p.starts_with(&prefix) && !p[prefix.len()..].contains('/'))
            .map(|(p, entry)| CollectionStat {
                name: name_of(p).to_owned(),
                created_at: entry.created_at,
            })
            .collect())
    }

    async fn set_collection_attribute(
        &mut self,
        path: &str,
        name: &str,
        value: &str,
    ) -> BackendResult<()> {
        let mut store = self.store.lock();
        let entry = store
            .collections
            .get_mut(path)
            .ok_or_else(|| BackendError::NotFound {
                path: path.to_owned(),
            })?;
        entry.attributes.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    async fn write_object(&mut self, path: &str, data: &[u8]) -> BackendResult<()> {
        let mut store = self.store.lock();
        if !store.collections.contains_key(parent_of(path)) {
            return Err(BackendError::NotFound {
                path: parent_of(path).to_owned(),
            });
        }
        store.objects.insert(
            path.to_owned(),
            ObjectEntry {
                data: data.to_vec(),
                modified_at: Utc::now(),
                attributes: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn append_object(&mut self, path: &str, data: &[u8]) -> BackendResult<()> {
        let mut store = self.store.lock();
        let entry = store
            .objects
            .get_mut(path)
            .ok_or_else(|| BackendError::NotFound {
                path: path.to_owned(),
            })?;
        entry.data.extend_from_slice(data);
        entry.modified_at = Utc::now();
        Ok(())
    }

    async fn read_object(
        &mut self,
        path: &str,
        offset: u64,
        length: Option<u64>,
    ) -> BackendResult<Bytes> {
        let store = self.store.lock();
        let entry = store
            .objects
            .get(path)
            .ok_or_else(|| BackendError::NotFound {
                path: path.to_owned(),
            })?;
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let start = start.min(entry.data.len());
        let end = match length {
            Some(len) => start
                .saturating_add(usize::try_from(len).unwrap_or(usize::MAX))
                .min(entry.data.len()),
            None => entry.data.len(),
        };
        Ok(Bytes::copy_from_slice(&entry.data[start..end]))
    }

    async fn read_object_all(&mut self, path: &str) -> BackendResult<Bytes> {
        self.read_object(path, 0, None).await
    }

    async fn object_checksum(&mut self, path: &str) -> BackendResult<String> {
        let store = self.store.lock();
        store
            .objects
            .get(path)
            .map(ObjectEntry::checksum)
            .ok_or_else(|| BackendError::NotFound {
                path: path.to_owned(),
            })
    }

    async fn destroy_object(&mut self, path: &str) -> BackendResult<()> {
        let mut store = self.store.lock();
        store
            .objects
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound {
                path: path.to_owned(),
            })
    }

    async fn object_exists(&mut self, path: &str) -> BackendResult<bool> {
        Ok(self.store.lock().objects.contains_key(path))
    }

    async fn set_object_attribute(
        &mut self,
        path: &str,
        name: &str,
        value: &str,
    ) -> BackendResult<()> {
        let mut store = self.store.lock();
        let entry = store
            .objects
            .get_mut(path)
            .ok_or_else(|| BackendError::NotFound {
                path: path.to_owned(),
            })?;
        entry.attributes.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    async fn list_objects(&mut self, path: &str) -> BackendResult<Vec<EntryStat>> {
        let store = self.store.lock();
        if !store.collections.contains_key(path) {
            return Err(BackendError::NotFound {
                path: path.to_owned(),
            });
        }
        let prefix = format!("{path}/");
        Ok(store
            .objects
            .iter()
            .filter(|(p, _)| p.starts_with(&prefix) && !p[prefix.len()..].contains('/'))
            .map(|(p, entry)| EntryStat {
                name: name_of(p).to_owned(),
                size: entry.data.len() as u64,
                modified_at: entry.modified_at,
            })
            .collect())
    }

    async fn query_objects_by_attribute(
        &mut self,
        name: &str,
        filter: &ValueFilter,
    ) -> BackendResult<Vec<MetaRow>> {
        let store = self.store.lock();
        let mut rows: Vec<MetaRow> = store
            .objects
            .iter()
            .filter_map(|(path, entry)| {
                let value = entry.attributes.get(name)?;
                let matched = match filter {
                    ValueFilter::Equals(expected) => value == expected,
                    ValueFilter::Prefix(prefix) => value.starts_with(prefix.as_str()),
                };
                matched.then(|| MetaRow {
                    value: value.clone(),
                    modified_at: entry.modified_at,
                    size: entry.data.len() as u64,
                    checksum: entry.checksum(),
                    object_name: name_of(path).to_owned(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.value.cmp(&b.value));
        Ok(rows)
    }
}

/// Build a connected gateway over a fresh in-memory backend.
pub(crate) async fn test_gateway() -> crate::Gateway<MemSession> {
    let config = crate::GatewayConfig::builder()
        .zone("testZone".into())
        .username("tester".into())
        .mount("/testZone/home/tester".into())
        .build();
    let connector = MemGridConnector::new(&config.mount);
    crate::Gateway::connect(&connector, config)
        .await
        .expect("in-memory connect")
}
