// --- File: crates/dentify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! This module provides trait definitions for external services used by the application.
//! These traits allow for dependency injection and easier testing by decoupling the
//! application logic from specific implementations of external services.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A trait for pushing booked appointments to an external calendar.
///
/// Implementations are best-effort collaborators: callers treat failures as
/// log-and-continue, never as a booking failure.
pub trait CalendarSyncService: Send + Sync {
    /// Error type returned by calendar sync operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Push a single event to the external calendar.
    fn push_event(&self, event: CalendarEvent) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}

/// An event payload for the external calendar API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// The start time of the event, RFC 3339.
    pub start_time: String,
    /// The end time of the event, RFC 3339.
    pub end_time: String,
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// Attendee email addresses (patient and practitioner).
    #[serde(default)]
    pub attendees: Vec<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID the external calendar assigned to the event.
    pub event_id: Option<String>,
    /// The status reported by the external calendar.
    pub status: String,
}
