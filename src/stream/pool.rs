//! Fixed-size worker pool.
//!
//! Spawns `W` threads that all pull from one shared task channel and
//! push into one shared results channel. When the task channel closes
//! and the last worker exits, every results sender is gone — that
//! closure is the writer's end-of-stream signal.

use std::sync::Arc;
use std::thread;

use flume::{Receiver, Sender};

use crate::chunk::ChunkProcessor;
use crate::error::Error;
use crate::stream::cancel::CancelToken;
use crate::types::{Task, TaskResult};

/// Pool of workers sharing one chunk processor.
pub struct WorkerPool {
    processor: Arc<ChunkProcessor>,
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool of `workers` threads (at least one).
    #[must_use]
    pub fn new(processor: ChunkProcessor, workers: usize) -> Self {
        Self { processor: Arc::new(processor), workers: workers.max(1) }
    }

    /// Runs the pool to completion.
    ///
    /// Blocks until the task channel closes and all workers have
    /// drained. Each worker polls cancellation between taking a task
    /// and processing it; a cancelled task is answered with a
    /// `Cancelled` result so its index is never silently dropped.
    pub fn run(&self, tasks: &Receiver<Task>, results: Sender<TaskResult>, cancel: &CancelToken) {
        let mut handles = Vec::with_capacity(self.workers);

        for _ in 0..self.workers {
            let processor = Arc::clone(&self.processor);
            let tasks = tasks.clone();
            let results = results.clone();
            let cancel = cancel.clone();

            handles.push(thread::spawn(move || {
                while let Ok(task) = tasks.recv() {
                    if cancel.is_cancelled() {
                        // Tagged like any other failed result, so the
                        // writer always sees which chunk it was.
                        let _ = results.send(TaskResult::err(task.index, Error::Cancelled.for_chunk(task.index)));
                        break;
                    }

                    let result = processor.process(&task);
                    if results.send(result).is_err() {
                        break;
                    }
                }
            }));
        }

        // Drop the original sender so the results channel closes when
        // the last worker's clone goes away.
        drop(results);

        for handle in handles {
            let _ = handle.join();
        }
    }
}
