//! Serial main queue.
//!
//! All card state is mutated and observed from jobs on this queue. Jobs run one
//! at a time, in the order they were dispatched, on whichever thread drives the
//! queue.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use crate::error::SessionError;

/// A unit of work for the main queue.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Cloneable sender side of a [`MainQueue`].
#[derive(Clone)]
pub struct QueueHandle {
    tx: UnboundedSender<Job>,
}

impl QueueHandle {
    /// Schedule a job after everything already queued.
    pub fn dispatch<F>(&self, job: F) -> Result<(), SessionError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .map_err(|_| SessionError::QueueClosed)
    }

    /// True once the queue itself has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single-threaded serial executor.
pub struct MainQueue {
    tx: UnboundedSender<Job>,
    rx: UnboundedReceiver<Job>,
}

impl MainQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Get a handle for dispatching jobs.
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run every job that is queued, including jobs queued while draining.
    ///
    /// Returns the number of jobs run.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            count += 1;
        }
        if count > 0 {
            trace!("main queue ran {} jobs", count);
        }
        count
    }

    /// Wait for the next job and run it.
    ///
    /// Never returns `false` while the queue still holds its own sender; use
    /// [`MainQueue::run`] to drain until all handles are gone.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run jobs until every [`QueueHandle`] has been dropped.
    pub async fn run(self) -> usize {
        let MainQueue { tx, mut rx } = self;
        drop(tx);

        let mut count = 0;
        while let Some(job) = rx.recv().await {
            job();
            count += 1;
        }
        count
    }
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}
