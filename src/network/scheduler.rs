use log::{debug, info};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A task re-run on a fixed period by its own thread until stopped.
///
/// The task returns `false` to end the job early. Stopping wakes the thread
/// immediately instead of waiting out the current period.
pub struct RecurringJob {
    name: String,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RecurringJob {
    /// Run `task` now and then every `period`
    pub fn start<F>(name: &str, period: Duration, mut task: F) -> std::io::Result<RecurringJob>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread_name = name.to_string();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                info!("Job {thread_name} started, period {period:?}");
                loop {
                    if !task() {
                        debug!("Job {thread_name} finished on its own");
                        break;
                    }
                    match stop_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        // Stop signal or the owner went away
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("Job {thread_name} stopped");
            })?;

        Ok(RecurringJob {
            name: name.to_string(),
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Signal the job and wait for its thread to exit
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            // A job dropping its own handle cannot join itself
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for RecurringJob {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_runs_immediately_and_repeats() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let mut job = RecurringJob::start("counter", Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while runs.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        job.stop();
        assert!(runs.load(Ordering::SeqCst) >= 3);
        assert!(job.is_finished());
    }

    #[test]
    fn test_stop_does_not_wait_for_period() {
        let mut job =
            RecurringJob::start("sleepy", Duration::from_secs(3600), || true).unwrap();
        let started = Instant::now();
        job.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(job.is_finished());
    }

    #[test]
    fn test_task_can_end_job() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let job = RecurringJob::start("once", Duration::from_millis(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        })
        .unwrap();
        drop(job);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
