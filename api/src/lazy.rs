use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::error::MarketError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InitState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Failed(String),
}

/// Shared handle to an external client that is set up on first use.
///
/// Concurrent `init` calls share one in-flight initialization. Once ready the
/// handle never re-initializes; after a failure the next `init` tries again.
pub struct LazyClient<T> {
    cell: OnceCell<Arc<T>>,
    state: Mutex<InitState>,
}

impl<T> Default for LazyClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LazyClient<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            state: Mutex::new(InitState::Uninitialized),
        }
    }

    pub fn state(&self) -> InitState {
        self.state.lock().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }

    pub async fn init<F, Fut>(&self, init: F) -> Result<Arc<T>, MarketError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, MarketError>>,
    {
        if let Some(client) = self.cell.get() {
            return Ok(client.clone());
        }

        let result = self
            .cell
            .get_or_try_init(|| async move {
                *self.state.lock() = InitState::Initializing;
                init().await.map(Arc::new)
            })
            .await;

        match result {
            Ok(client) => {
                *self.state.lock() = InitState::Ready;
                Ok(client.clone())
            }
            Err(err) => {
                tracing::warn!("client initialization failed: {}", err);
                *self.state.lock() = InitState::Failed(err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_init_runs_once() {
        let lazy: LazyClient<String> = LazyClient::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        assert_eq!(lazy.state(), InitState::Uninitialized);

        let make = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, MarketError>("client".to_string())
        };

        let (a, b) = futures::join!(lazy.init(make), lazy.init(make));
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(lazy.state(), InitState::Ready);
        assert!(lazy.is_ready());

        let again = lazy.init(make).await.unwrap();
        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_init_retries() {
        let lazy: LazyClient<u32> = LazyClient::new();

        let err = lazy
            .init(|| async { Err(MarketError::MissingConfig("MORALIS_API_KEY")) })
            .await;
        assert!(err.is_err());
        assert!(matches!(lazy.state(), InitState::Failed(_)));
        assert!(!lazy.is_ready());
        assert!(lazy.get().is_none());

        let ok = lazy.init(|| async { Ok(5) }).await.unwrap();
        assert_eq!(*ok, 5);
        assert_eq!(lazy.state(), InitState::Ready);
    }

    #[tokio::test]
    async fn test_state_is_initializing_while_init_runs() {
        let lazy: LazyClient<u32> = LazyClient::new();
        let handle = &lazy;
        let seen = lazy
            .init(|| async move {
                let during = handle.state();
                assert!(!handle.is_ready());
                Ok::<_, MarketError>(if during == InitState::Initializing { 1 } else { 0 })
            })
            .await
            .unwrap();
        assert_eq!(*seen, 1);
        assert_eq!(lazy.state(), InitState::Ready);
    }
}
