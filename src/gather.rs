//! Concurrent fan-out of independent reads.
//!
//! Reads feeding one resolution are independent, so they run concurrently on
//! scoped threads and are awaited together. A gather is all-or-nothing: if
//! any read fails (or panics) the caller gets an error and no partial
//! results.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ScopedJoinHandle};

use crossbeam_channel::{bounded, unbounded};

use crate::error::{SidesError, SidesResult};

fn join<T>(handle: ScopedJoinHandle<'_, SidesResult<T>>, slot: &str) -> SidesResult<T> {
    handle
        .join()
        .map_err(|_| SidesError::internal(format!("gather task '{slot}' panicked")))?
}

/// Runs three fallible closures concurrently and waits for all of them.
///
/// Returns every result, or the first error in argument order.
///
/// # Examples
///
/// ```
/// use series_sides::gather::try_join3;
///
/// let (a, b, c) = try_join3(|| Ok(1), || Ok("two"), || Ok(3.0)).unwrap();
/// assert_eq!((a, b, c), (1, "two", 3.0));
/// ```
pub fn try_join3<A, B, C, FA, FB, FC>(fa: FA, fb: FB, fc: FC) -> SidesResult<(A, B, C)>
where
    A: Send,
    B: Send,
    C: Send,
    FA: FnOnce() -> SidesResult<A> + Send,
    FB: FnOnce() -> SidesResult<B> + Send,
    FC: FnOnce() -> SidesResult<C> + Send,
{
    thread::scope(|scope| {
        let ha = scope.spawn(fa);
        let hb = scope.spawn(fb);
        let hc = scope.spawn(fc);

        let a = join(ha, "first");
        let b = join(hb, "second");
        let c = join(hc, "third");
        Ok((a?, b?, c?))
    })
}

/// Runs homogeneous fallible tasks on at most `max_concurrency` workers.
///
/// Results come back in task order. After the first failure, tasks that
/// have not started yet are skipped; the error with the lowest task index
/// among those observed is returned.
pub fn try_join_all<T, F>(tasks: Vec<F>, max_concurrency: usize) -> SidesResult<Vec<T>>
where
    T: Send,
    F: FnOnce() -> SidesResult<T> + Send,
{
    let count = tasks.len();
    if count == 0 {
        return Ok(Vec::new());
    }
    let workers = max_concurrency.clamp(1, count);
    log::debug!("gathering {count} tasks on {workers} workers");

    let (job_tx, job_rx) = bounded::<(usize, F)>(count);
    for job in tasks.into_iter().enumerate() {
        job_tx
            .send(job)
            .map_err(|_| SidesError::internal("gather job queue closed early"))?;
    }
    drop(job_tx);

    let (result_tx, result_rx) = unbounded::<(usize, SidesResult<T>)>();
    let failed = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let failed = &failed;
            scope.spawn(move || {
                for (index, task) in job_rx.iter() {
                    if failed.load(Ordering::Acquire) {
                        continue;
                    }
                    let result = panic::catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|_| {
                        Err(SidesError::internal(format!("gather task {index} panicked")))
                    });
                    if result.is_err() {
                        failed.store(true, Ordering::Release);
                    }
                    if result_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<SidesResult<T>>> = std::iter::repeat_with(|| None).take(count).collect();
    for (index, result) in result_rx.iter() {
        slots[index] = Some(result);
    }

    let mut values = Vec::with_capacity(count);
    let mut skipped = false;
    for slot in slots {
        match slot {
            Some(Ok(value)) => values.push(value),
            Some(Err(e)) => return Err(e),
            None => skipped = true,
        }
    }
    if skipped {
        return Err(SidesError::internal("gather aborted without an error"));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::storage::{SeriesId, StorageError};

    #[test]
    fn join3_returns_all_results() {
        let (a, b, ()) = try_join3(|| Ok(vec![1, 2]), || Ok("x".to_string()), || Ok(())).unwrap();
        assert_eq!(a, vec![1, 2]);
        assert_eq!(b, "x");
    }

    #[test]
    fn join3_fails_as_a_whole() {
        let ran = AtomicUsize::new(0);
        let result = try_join3(
            || {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            },
            || -> SidesResult<u8> { Err(StorageError::SeriesNotFound(SeriesId::new("s")).into()) },
            || {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(3)
            },
        );
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(ran.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn join3_reports_panics() {
        let result = try_join3(|| Ok(1), || -> SidesResult<u8> { panic!("boom") }, || Ok(3));
        assert!(matches!(result, Err(SidesError::Internal { .. })));
    }

    #[test]
    fn join_all_preserves_task_order() {
        let tasks: Vec<_> = (0..20u64)
            .map(|i| {
                move || -> SidesResult<u64> {
                    thread::sleep(std::time::Duration::from_millis(20 - i));
                    Ok(i * 10)
                }
            })
            .collect();
        let values = try_join_all(tasks, 4).unwrap();
        assert_eq!(values, (0..20u64).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn join_all_empty_is_ok() {
        let tasks: Vec<fn() -> SidesResult<u8>> = Vec::new();
        assert!(try_join_all(tasks, 3).unwrap().is_empty());
    }

    #[test]
    fn join_all_fails_on_any_error() {
        let tasks: Vec<Box<dyn FnOnce() -> SidesResult<u32> + Send>> = vec![
            Box::new(|| Ok(1)),
            Box::new(|| Err(StorageError::ConnectionError("reset".to_string()).into())),
            Box::new(|| Ok(3)),
        ];
        let err = try_join_all(tasks, 1).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn join_all_reports_panics() {
        let tasks: Vec<Box<dyn FnOnce() -> SidesResult<u32> + Send>> =
            vec![Box::new(|| Ok(1)), Box::new(|| panic!("worker blew up"))];
        let err = try_join_all(tasks, 2).unwrap_err();
        assert!(matches!(err, SidesError::Internal { .. }));
    }
}
