//! Batch executor.

use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BatchResult<T, E> {
    pub successes: Vec<(usize, T)>,
    pub failures: Vec<(usize, E)>,
    pub execution_time: Duration,
    pub total_processed: usize,
}

impl<T, E> BatchResult<T, E> {
    pub fn new() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
            execution_time: Duration::ZERO,
            total_processed: 0,
        }
    }
    pub fn add_success(&mut self, i: usize, r: T) {
        self.successes.push((i, r));
    }
    pub fn add_failure(&mut self, i: usize, e: E) {
        self.failures.push((i, e));
    }
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
impl<T, E> Default for BatchResult<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    Sequential,
    Concurrent { max_concurrency: usize },
}
impl Default for BatchStrategy {
    fn default() -> Self {
        BatchStrategy::Concurrent { max_concurrency: 8 }
    }
}

/// Runs independent operations to completion and collects every outcome.
///
/// No item is abandoned: a failure is recorded and the remaining items still run.
#[derive(Debug, Clone, Default)]
pub struct BatchExecutor {
    strategy: BatchStrategy,
}

impl BatchExecutor {
    pub fn new(strategy: BatchStrategy) -> Self {
        let strategy = match strategy {
            BatchStrategy::Concurrent { max_concurrency } => BatchStrategy::Concurrent {
                max_concurrency: max_concurrency.max(1),
            },
            s => s,
        };
        Self { strategy }
    }

    pub fn strategy(&self) -> BatchStrategy {
        self.strategy
    }

    pub async fn execute<I, R, E, F, Fut>(&self, items: Vec<I>, executor_fn: F) -> BatchResult<R, E>
    where
        F: Fn(I) -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
    {
        match self.strategy {
            BatchStrategy::Sequential => self.execute_sequential(items, executor_fn).await,
            BatchStrategy::Concurrent { max_concurrency } => {
                self.execute_concurrent(items, max_concurrency, executor_fn).await
            }
        }
    }

    async fn execute_sequential<I, R, E, F, Fut>(&self, items: Vec<I>, executor_fn: F) -> BatchResult<R, E>
    where
        F: Fn(I) -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
    {
        let start = Instant::now();
        let total = items.len();
        let mut result = BatchResult::new();
        for (i, item) in items.into_iter().enumerate() {
            match executor_fn(item).await {
                Ok(r) => result.add_success(i, r),
                Err(e) => result.add_failure(i, e),
            }
        }
        result.execution_time = start.elapsed();
        result.total_processed = total;
        result
    }

    async fn execute_concurrent<I, R, E, F, Fut>(
        &self,
        items: Vec<I>,
        max_concurrency: usize,
        executor_fn: F,
    ) -> BatchResult<R, E>
    where
        F: Fn(I) -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
    {
        let start = Instant::now();
        let total = items.len();
        let executor_fn = &executor_fn;
        let outcomes: Vec<(usize, std::result::Result<R, E>)> = stream::iter(items.into_iter().enumerate())
            .map(|(i, item)| async move { (i, executor_fn(item).await) })
            .buffer_unordered(max_concurrency)
            .collect()
            .await;

        let mut result = BatchResult::new();
        for (i, outcome) in outcomes {
            match outcome {
                Ok(r) => result.add_success(i, r),
                Err(e) => result.add_failure(i, e),
            }
        }
        result.execution_time = start.elapsed();
        result.total_processed = total;
        result
    }
}
