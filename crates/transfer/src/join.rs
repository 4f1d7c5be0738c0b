//! All-or-cancel aggregation of concurrent part operations.

use std::future::Future;

use tokio::task::{JoinError, JoinSet};

/// Run `operations` concurrently and collect their results in input order.
///
/// Every operation is spawned onto the runtime immediately, in input order.
/// The aggregate succeeds only when all of them succeed. On the first
/// failure observed, the remaining operations are aborted (best effort: an
/// aborted task stops at its next await point) and that failure is
/// returned.
///
/// # Arguments
/// * `operations` - Futures to run; each must own everything it touches
///
/// # Returns
/// One value per operation, in the order the operations were given.
pub async fn join_all_or_cancel<T, E, F>(
    operations: impl IntoIterator<Item = F>,
) -> Result<Vec<T>, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: From<JoinError> + Send + 'static,
{
    let mut set: JoinSet<(usize, Result<T, E>)> = JoinSet::new();
    for (index, operation) in operations.into_iter().enumerate() {
        set.spawn(async move { (index, operation.await) });
    }

    let mut slots: Vec<Option<T>> = Vec::with_capacity(set.len());
    slots.resize_with(set.len(), || None);

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, Ok(value))) => slots[index] = Some(value),
            Ok((index, Err(err))) => {
                log::trace!(
                    "operation {} failed, cancelling {} pending siblings",
                    index,
                    set.len()
                );
                set.abort_all();
                return Err(err);
            }
            Err(join_err) => {
                set.abort_all();
                return Err(E::from(join_err));
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::error::TransferError;

    #[tokio::test]
    async fn test_results_in_input_order() {
        let operations = (0..5u64).map(|i| async move {
            // Later operations finish first
            tokio::time::sleep(Duration::from_millis(50 - i * 10)).await;
            Ok::<u64, TransferError>(i)
        });

        let results: Vec<u64> = join_all_or_cancel(operations).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let operations: Vec<std::future::Ready<Result<u8, TransferError>>> = Vec::new();
        let results = join_all_or_cancel(operations).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_first_failure_cancels_pending() {
        let finished = Arc::new(AtomicUsize::new(0));
        let slow_completed = Arc::new(AtomicBool::new(false));

        let mut operations = Vec::new();
        for i in 0..4u32 {
            let finished = Arc::clone(&finished);
            let slow_completed = Arc::clone(&slow_completed);
            operations.push(async move {
                if i == 1 {
                    return Err(TransferError::Cancelled);
                }
                if i == 3 {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    slow_completed.store(true, Ordering::SeqCst);
                }
                finished.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            });
        }

        let result = tokio::time::timeout(Duration::from_secs(5), join_all_or_cancel(operations))
            .await
            .expect("aggregate must not wait for the slow operation");
        assert!(matches!(result, Err(TransferError::Cancelled)));
        assert!(!slow_completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panic_is_reported() {
        let operations = (0..2u8).map(|i| async move {
            if i == 1 {
                panic!("part exploded");
            }
            Ok::<u8, TransferError>(i)
        });
        let result = join_all_or_cancel(operations).await;
        assert!(matches!(result, Err(TransferError::TaskFailed { .. })));
    }
}
