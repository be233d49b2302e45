//! Fixed-size backend session pool.
//!
//! [`SessionPool`] holds a fixed number of eagerly-established sessions.
//! [`SessionPool::acquire`] waits until a session is free and hands out an
//! exclusive [`PooledSession`] guard; dropping the guard returns the
//! session. The pool never grows, shrinks, or replaces sessions, so a
//! session left broken by a backend failure permanently reduces effective
//! capacity.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

use crate::client::{BackendResult, ConnectOptions, GridConnector, GridSession};

/// Default number of sessions held by the pool.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// A fixed-size pool of backend sessions.
#[derive(Debug)]
pub struct SessionPool<S> {
    /// Idle sessions, rotated front-to-back so sequential acquire/release
    /// cycles visit every session.
    idle: Mutex<VecDeque<S>>,
    /// One permit per pooled session.
    permits: Arc<Semaphore>,
    /// Number of sessions established at connect time.
    size: usize,
}

impl<S: GridSession> SessionPool<S> {
    /// Establish `size` sessions eagerly and build the pool.
    ///
    /// All sessions share one credential set and mount point. If any
    /// connection attempt fails the error is returned and the sessions
    /// established so far are dropped; a partially-filled pool is never
    /// produced.
    pub async fn connect<C>(
        connector: &C,
        options: &ConnectOptions,
        size: usize,
    ) -> BackendResult<Arc<Self>>
    where
        C: GridConnector<Session = S>,
    {
        let mut idle = VecDeque::with_capacity(size);
        for _ in 0..size {
            idle.push_back(connector.connect(options).await?);
        }

        debug!(size, host = %options.host, "session pool established");

        Ok(Arc::new(Self {
            idle: Mutex::new(idle),
            permits: Arc::new(Semaphore::new(size)),
            size,
        }))
    }

    /// Number of sessions the pool was built with.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Wait for a free session and take exclusive ownership of it.
    pub async fn acquire(self: &Arc<Self>) -> PooledSession<S> {
        // The semaphore is never closed, so acquire only fails after a
        // close() this module never issues.
        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => unreachable!("session pool semaphore is never closed"),
        };

        let session = {
            let mut idle = self.idle.lock();
            match idle.pop_front() {
                Some(session) => session,
                // A held permit guarantees an idle session.
                None => unreachable!("permit held but no idle session"),
            }
        };

        PooledSession {
            pool: Arc::clone(self),
            session: Some(session),
            _permit: permit,
        }
    }

    /// Refresh every pooled session in a detached background task.
    ///
    /// Acquires sessions one at a time, so in-flight operations are never
    /// interrupted; the front-to-back rotation means each session is
    /// visited once. Refresh failures are logged and swallowed. The caller
    /// never waits on the task.
    pub fn spawn_refresh(self: &Arc<Self>) {
        let pool = Arc::clone(self);
        tokio::spawn(async move {
            for _ in 0..pool.size {
                let mut session = pool.acquire().await;
                if let Err(error) = session.refresh().await {
                    warn!(error = %error, "session refresh failed");
                }
            }
        });
    }
}

/// Exclusive ownership of one pooled session.
///
/// Dropping the guard returns the session to the pool.
#[derive(Debug)]
pub struct PooledSession<S> {
    pool: Arc<SessionPool<S>>,
    session: Option<S>,
    _permit: OwnedSemaphorePermit,
}

impl<S> Deref for PooledSession<S> {
    type Target = S;

    fn deref(&self) -> &S {
        // Only emptied in Drop.
        match self.session.as_ref() {
            Some(session) => session,
            None => unreachable!("pooled session already returned"),
        }
    }
}

impl<S> DerefMut for PooledSession<S> {
    fn deref_mut(&mut self) -> &mut S {
        match self.session.as_mut() {
            Some(session) => session,
            None => unreachable!("pooled session already returned"),
        }
    }
}

impl<S> Drop for PooledSession<S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.pool.idle.lock().push_back(session);
        }
        // The permit is released when `_permit` drops, after the session
        // is back in the queue.
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::memgrid::MemGridConnector;

    fn options() -> ConnectOptions {
        ConnectOptions {
            host: "localhost".to_owned(),
            port: 1247,
            zone: "testZone".to_owned(),
            username: "tester".to_owned(),
            password: "secret".to_owned(),
            mount: "/testZone/home/tester".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_should_establish_full_pool_eagerly() {
        let connector = MemGridConnector::new("/testZone/home/tester");
        let pool = SessionPool::connect(&connector, &options(), 4)
            .await
            .unwrap();
        assert_eq!(pool.size(), 4);
        assert_eq!(connector.connect_count(), 4);
    }

    #[tokio::test]
    async fn test_should_fail_atomically_when_a_connect_fails() {
        let connector = MemGridConnector::new("/testZone/home/tester").fail_after(2);
        let result = SessionPool::connect(&connector, &options(), 4).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_should_block_acquire_until_a_session_is_free() {
        let connector = MemGridConnector::new("/testZone/home/tester");
        let pool = SessionPool::connect(&connector, &options(), 1)
            .await
            .unwrap();

        let held = pool.acquire().await;

        // With the single session held, a second acquire must not complete.
        let blocked = tokio::time::timeout(Duration::from_millis(50), pool.acquire()).await;
        assert!(blocked.is_err());

        drop(held);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), pool.acquire()).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_should_return_sessions_on_guard_drop() {
        let connector = MemGridConnector::new("/testZone/home/tester");
        let pool = SessionPool::connect(&connector, &options(), 2)
            .await
            .unwrap();

        for _ in 0..10 {
            let a = pool.acquire().await;
            let b = pool.acquire().await;
            drop(a);
            drop(b);
        }
        assert_eq!(pool.idle.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_should_refresh_each_session_once_in_background() {
        let connector = MemGridConnector::new("/testZone/home/tester");
        let pool = SessionPool::connect(&connector, &options(), 3)
            .await
            .unwrap();

        pool.spawn_refresh();

        // The refresh task runs detached; poll until it has visited all
        // sessions.
        for _ in 0..100 {
            if connector.refresh_count() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(connector.refresh_count(), 3);
    }
}
