// --- File: crates/dentify_calsync/src/worker.rs ---
//! The background delivery loop.
//!
//! Booking handlers enqueue [`CalendarEvent`]s on a bounded channel and move
//! on; this worker drains the channel and delivers each event to the external
//! calendar with a few retries. Only retryable failures (network errors, 5xx)
//! get another attempt; client errors are dropped after the first. Delivery
//! failures are logged and dropped, they never reach the booking path.

use crate::service::CalendarSyncError;
use dentify_common::services::{CalendarEvent, CalendarSyncService};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default number of events the queue holds before `try_send` starts failing.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default delivery attempts per event.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Tuning knobs for the sync worker.
#[derive(Debug, Clone)]
pub struct SyncWorkerOptions {
    pub queue_capacity: usize,
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each further attempt.
    pub retry_base_delay: Duration,
}

impl Default for SyncWorkerOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

/// Spawns the delivery loop and returns the sending half of its queue.
///
/// The worker exits once every sender has been dropped and the queue is
/// drained, so the returned handle can be awaited on shutdown.
pub fn spawn_sync_worker<S>(
    service: Arc<S>,
    options: SyncWorkerOptions,
) -> (mpsc::Sender<CalendarEvent>, JoinHandle<()>)
where
    S: CalendarSyncService<Error = CalendarSyncError> + 'static,
{
    let (tx, mut rx) = mpsc::channel::<CalendarEvent>(options.queue_capacity.max(1));

    let handle = tokio::spawn(async move {
        info!("Calendar sync worker started");
        while let Some(event) = rx.recv().await {
            deliver_with_retries(service.as_ref(), event, &options).await;
        }
        info!("Calendar sync worker stopped");
    });

    (tx, handle)
}

async fn deliver_with_retries<S>(service: &S, event: CalendarEvent, options: &SyncWorkerOptions)
where
    S: CalendarSyncService<Error = CalendarSyncError>,
{
    let max_attempts = options.max_attempts.max(1);
    let mut delay = options.retry_base_delay;

    for attempt in 1..=max_attempts {
        match service.push_event(event.clone()).await {
            Ok(result) => {
                debug!(
                    "Synced event '{}' on attempt {} (external id: {:?})",
                    event.summary, attempt, result.event_id
                );
                return;
            }
            Err(e) if !e.is_retryable() => {
                warn!(
                    "Dropping event '{}', the calendar rejected it: {}",
                    event.summary, e
                );
                return;
            }
            Err(e) if attempt < max_attempts => {
                warn!(
                    "Calendar sync attempt {}/{} for '{}' failed: {}",
                    attempt, max_attempts, event.summary, e
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => {
                warn!(
                    "Dropping event '{}' after {} failed attempts: {}",
                    event.summary, max_attempts, e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dentify_common::services::{BoxFuture, CalendarEventResult};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls with the given status, succeeds
    /// afterwards.
    struct FlakyService {
        failures: u32,
        failure_status: u16,
        calls: AtomicU32,
    }

    impl FlakyService {
        fn new(failures: u32) -> Self {
            Self::with_status(failures, 503)
        }

        fn with_status(failures: u32, failure_status: u16) -> Self {
            Self {
                failures,
                failure_status,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl CalendarSyncService for FlakyService {
        type Error = CalendarSyncError;

        fn push_event(
            &self,
            _event: CalendarEvent,
        ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let failures = self.failures;
            let failure_status = self.failure_status;
            Box::pin(async move {
                if call < failures {
                    Err(CalendarSyncError::ApiError {
                        status_code: failure_status,
                        message: "refused".to_string(),
                    })
                } else {
                    Ok(CalendarEventResult {
                        event_id: Some("evt_1".to_string()),
                        status: "confirmed".to_string(),
                    })
                }
            })
        }
    }

    fn event() -> CalendarEvent {
        CalendarEvent {
            start_time: "2030-01-09T10:00:00+00:00".to_string(),
            end_time: "2030-01-09T10:30:00+00:00".to_string(),
            summary: "Dental Appointment: Checkup".to_string(),
            description: None,
            attendees: vec!["asha@example.com".to_string()],
        }
    }

    fn fast_options() -> SyncWorkerOptions {
        SyncWorkerOptions {
            queue_capacity: 8,
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn delivers_after_transient_failures() {
        let service = Arc::new(FlakyService::new(2));
        let (tx, handle) = spawn_sync_worker(Arc::clone(&service), fast_options());

        tx.send(event()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        // Two failures plus the successful third attempt
        assert_eq!(service.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let service = Arc::new(FlakyService::new(u32::MAX));
        let (tx, handle) = spawn_sync_worker(Arc::clone(&service), fast_options());

        tx.send(event()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(service.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let service = Arc::new(FlakyService::with_status(u32::MAX, 422));
        let (tx, handle) = spawn_sync_worker(Arc::clone(&service), fast_options());

        tx.send(event()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        // A 4xx means the payload is bad; retrying cannot help.
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drains_every_queued_event() {
        let service = Arc::new(FlakyService::new(0));
        let (tx, handle) = spawn_sync_worker(Arc::clone(&service), fast_options());

        for _ in 0..5 {
            tx.send(event()).await.unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(service.calls.load(Ordering::SeqCst), 5);
    }
}
