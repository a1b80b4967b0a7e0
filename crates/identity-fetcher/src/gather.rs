//! Fixed fan-out / fan-in over a shared result queue

use std::future::Future;

use tokio::sync::mpsc;

/// Result of one gathered job
#[derive(Debug)]
pub struct Gathered<T> {
    pub label: &'static str,
    /// `None` when the job's task ended without reporting (it panicked)
    pub value: Option<T>,
}

/// Run every job on its own task and wait until all of them have reported.
///
/// Each task writes exactly one message into a shared unbounded queue and
/// the caller performs exactly `jobs.len()` receives. Results come back in
/// arrival order; jobs that never reported are appended at the end with no
/// value.
pub async fn scatter_gather<T, F>(jobs: Vec<(&'static str, F)>) -> Vec<Gathered<T>>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let expected = jobs.len();
    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, T)>();
    let mut labels = Vec::with_capacity(expected);

    for (index, (label, job)) in jobs.into_iter().enumerate() {
        labels.push(label);
        let tx = tx.clone();
        tokio::spawn(async move {
            let value = job.await;
            // The receiver only disappears if the caller itself was dropped
            let _ = tx.send((index, value));
        });
    }
    // Only task-held senders remain, so the queue closes once all tasks exit
    drop(tx);

    let mut reported = vec![false; expected];
    let mut results = Vec::with_capacity(expected);
    for _ in 0..expected {
        match rx.recv().await {
            Some((index, value)) => {
                reported[index] = true;
                results.push(Gathered {
                    label: labels[index],
                    value: Some(value),
                });
            }
            None => break,
        }
    }

    for (index, label) in labels.into_iter().enumerate() {
        if !reported[index] {
            results.push(Gathered { label, value: None });
        }
    }

    results
}
