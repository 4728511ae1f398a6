// --- File: crates/dentify_calsync/src/lib.rs ---
//! Outbound calendar synchronisation for Dentify.
//!
//! [`ExternalCalendarService`] speaks the third-party calendar HTTP API;
//! [`spawn_sync_worker`] runs it behind a bounded queue so bookings never
//! wait on (or fail because of) the external calendar.

pub mod service;
pub mod worker;

pub use service::{CalendarSyncError, ExternalCalendarService};
pub use worker::{
    spawn_sync_worker, SyncWorkerOptions, DEFAULT_MAX_ATTEMPTS, DEFAULT_QUEUE_CAPACITY,
};
