//! Bounded, order-preserving fan-out.
//!
//! Every item is spawned onto the runtime, a semaphore caps how many run at
//! once, and results land in a slot indexed by input position. Completion
//! order never leaks into the returned vector.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::domain::error::{DiffLintError, Result};

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of items in flight. Never below 1.
    pub max_concurrent: usize,
}

impl PoolConfig {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(cores)
    }
}

/// Run `task` over `items` concurrently and return results in input order.
pub async fn map_ordered<T, R, F, Fut>(
    items: Vec<T>,
    config: &PoolConfig,
    task: F,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    map_ordered_with(items, config, task, |_| {}).await
}

/// Like [`map_ordered`], calling `on_complete` as each item finishes
/// (in completion order).
pub async fn map_ordered_with<T, R, F, Fut, C>(
    items: Vec<T>,
    config: &PoolConfig,
    task: F,
    mut on_complete: C,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    C: FnMut(&R),
{
    let total = items.len();
    let task = Arc::new(task);
    let sem = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
    let mut join_set = JoinSet::new();

    for (idx, item) in items.into_iter().enumerate() {
        let task = Arc::clone(&task);
        let sem = Arc::clone(&sem);
        join_set.spawn(async move {
            let _permit = sem.acquire_owned().await.ok();
            (idx, task(item).await)
        });
    }

    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (idx, result) = joined.map_err(|e| DiffLintError::Join(e.to_string()))?;
        on_complete(&result);
        slots[idx] = Some(result);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.ok_or_else(|| DiffLintError::Join(format!("missing result for item {idx}")))
        })
        .collect()
}
