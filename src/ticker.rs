//! Periodic refresh driver.
//!
//! The generator never schedules anything itself. A front end that wants a
//! live display spawns a [`Ticker`] and keeps the returned [`TickerHandle`];
//! cancelling or dropping the handle stops the refreshes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::generator::{DynamicCodeGenerator, Frame};
use crate::time::TimeSource;

pub struct Ticker;

impl Ticker {
    /// Call `on_frame` right away and then once per `every` on the current tokio runtime.
    pub fn spawn<T, F>(
        generator: Arc<DynamicCodeGenerator<T>>,
        session_id: i64,
        every: Duration,
        mut on_frame: F,
    ) -> TickerHandle
    where
        T: TimeSource + 'static,
        F: FnMut(Frame) + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let every = every.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => on_frame(generator.frame(session_id)),
                }
            }
            tracing::debug!(session_id, "ticker stopped");
        });

        TickerHandle {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// Owner of a running [`Ticker`]. Dropping it aborts the refresh task.
#[derive(Debug)]
pub struct TickerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stop refreshing and wait for the in-flight callback, if any, to return.
    pub async fn cancel(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "ticker task ended abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
