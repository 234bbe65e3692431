//! Fixed-size worker pool for playout batches.
//!
//! Workers pull boxed jobs off a shared queue; submitting returns a handle
//! whose `wait` blocks until the job has run. Shutdown closes the queue,
//! lets in-flight and queued work drain, then joins the workers. Submitting
//! after shutdown is an error, not a panic — it only happens during process
//! teardown.

use std::num::NonZeroUsize;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::trace;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors from submitting to or waiting on the pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    ShutDown,

    #[error("worker exited before finishing the job")]
    Lost,
}

/// Handle to one submitted unit of work.
pub struct JobHandle<T> {
    receiver: mpsc::Receiver<T>,
}

impl<T> JobHandle<T> {
    /// Block until the job completes and return its result.
    pub fn wait(self) -> Result<T, PoolError> {
        self.receiver.recv().map_err(|_| PoolError::Lost)
    }
}

/// A fixed-size pool of worker threads.
pub struct WorkerPool {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
}

static GLOBAL: Lazy<Arc<WorkerPool>> = Lazy::new(|| {
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    Arc::new(WorkerPool::new(workers))
});

impl WorkerPool {
    /// The process-wide pool, sized to the hardware and created on first
    /// use. It lives until process exit.
    pub fn global() -> Arc<WorkerPool> {
        Arc::clone(&GLOBAL)
    }

    /// Spawn a pool with `workers` threads.
    pub fn new(workers: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..workers)
            .map(|i| {
                let receiver = Arc::clone(&receiver);
                thread::Builder::new()
                    .name(format!("playout-{i}"))
                    .spawn(move || worker_loop(receiver))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(handles),
        }
    }

    /// Number of worker threads.
    pub fn len(&self) -> usize {
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Submit a unit of work. Fails once shutdown has begun.
    pub fn execute<T, F>(&self, job: F) -> Result<JobHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (done, receiver) = mpsc::channel();
        let boxed: Job = Box::new(move || {
            // The submitter may have stopped waiting; that is not an error.
            let _ = done.send(job());
        });

        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .ok_or(PoolError::ShutDown)?
            .send(boxed)
            .map_err(|_| PoolError::ShutDown)?;

        Ok(JobHandle { receiver })
    }

    /// Close the queue, drain queued work and join the workers. Idempotent.
    pub fn shutdown(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);

        let workers = std::mem::take(
            &mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for handle in workers {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(receiver: Arc<Mutex<mpsc::Receiver<Job>>>) {
    loop {
        // Hold the queue lock only while picking up the next job.
        let job = {
            let queue = receiver.lock().unwrap_or_else(PoisonError::into_inner);
            queue.recv()
        };
        match job {
            Ok(job) => job(),
            // Queue closed and drained: orderly exit.
            Err(_) => break,
        }
    }
    trace!("worker draining complete");
}
