//! Bounded worker pool for stages 5 (TTS) and 6 (clipping) (§5): runs up to
//! `workers` tasks concurrently. Results come back in input order regardless
//! of completion order, the same guarantee `vclip-worker`'s scene/style
//! fan-out relies on (`futures::future::join_all` over a `Vec`, which
//! preserves the order of the futures it was given).

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::cancel::CancelSignal;

/// Runs one future per item, bounded to `workers` concurrent tasks at a
/// time. `results[i]` always corresponds to `items[i]`. The cancel signal
/// is checked at each worker-task boundary (right after a permit is
/// acquired, before the task body runs) as well as inside each adapter
/// call (§5); a task not yet started when cancellation is observed yields
/// `None` instead of running, while one already in flight finishes
/// naturally.
pub async fn run_bounded<T, F, Fut, R>(items: Vec<T>, workers: usize, cancel: &CancelSignal, f: F) -> Vec<Option<R>>
where
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = R>,
{
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));

    let tasks: Vec<_> = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let fut = f(idx, item);
            async move {
                let _permit = semaphore.acquire().await.expect("semaphore is never closed");
                if cancel.is_cancelled() {
                    return None;
                }
                Some(fut.await)
            }
        })
        .collect();

    join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cancel::CancelToken;

    #[tokio::test]
    async fn results_preserve_input_order_despite_completion_order() {
        let items = vec![30u64, 10, 20];
        let (_token, signal) = CancelToken::new();
        let results = run_bounded(items, 2, &signal, |idx, delay_ms| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            idx
        })
        .await;
        assert_eq!(results, vec![Some(0), Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn runs_every_item_even_with_a_single_worker() {
        let items = vec![1, 2, 3, 4];
        let (_token, signal) = CancelToken::new();
        let results = run_bounded(items, 1, &signal, |_idx, item| async move { item * 2 }).await;
        assert_eq!(results, vec![Some(2), Some(4), Some(6), Some(8)]);
    }

    #[tokio::test]
    async fn cancellation_stops_tasks_not_yet_started() {
        let items = vec![1, 2, 3, 4];
        let (token, signal) = CancelToken::new();
        token.cancel();
        let results = run_bounded(items, 1, &signal, |_idx, item| async move { item * 2 }).await;
        assert!(results.iter().all(|r| r.is_none()));
    }
}
