//! Repository interface for appointments
//!
//! This module defines the storage capability set the booking service needs:
//! create (conflict-checked), query by date range, and status updates.
//! Appointments are soft-deleted only; cancellation is a status change.

use crate::error::DbError;
use chrono::{DateTime, Utc};
use dentify_common::models::{Appointment, AppointmentStatus};
use dentify_common::services::BoxFuture;

/// Outcome of a conflict-checked appointment insert.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// The slot was free and the appointment was persisted.
    Created(Appointment),
    /// An active appointment for the same practitioner overlaps the
    /// requested window; nothing was persisted.
    Conflict,
}

/// Repository for appointments.
///
/// The conflict check and the insert in [`create_if_free`] must execute
/// atomically: two concurrent requests for the same slot must not both
/// succeed. Reads are served without locking.
///
/// [`create_if_free`]: AppointmentRepository::create_if_free
pub trait AppointmentRepository: Send + Sync {
    /// Initialize the database schema.
    ///
    /// Creates the appointments table and its indexes if they don't exist.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Insert the appointment iff no active (pending/confirmed) appointment
    /// for the same practitioner overlaps `[start - buffer, end + buffer]`.
    fn create_if_free(
        &self,
        appointment: Appointment,
        buffer_minutes: i64,
    ) -> BoxFuture<'_, CreateOutcome, DbError>;

    /// Find appointments whose start time falls within `[start, end)`.
    ///
    /// Cancelled appointments are included only when `include_cancelled` is set.
    fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_cancelled: bool,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError>;

    /// Find active appointments for one practitioner overlapping `[start, end)`.
    ///
    /// Used by the availability checker to subtract busy windows.
    fn find_active_for_practitioner(
        &self,
        practitioner_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError>;

    /// Find an appointment by its identifier.
    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Appointment>, DbError>;

    /// Update the status of an appointment.
    ///
    /// Returns `false` if no appointment with the given id exists.
    fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> BoxFuture<'_, bool, DbError>;
}

/// Formats a timestamp the way it is stored in the appointments table.
///
/// Always second-resolution UTC ("2024-01-10T14:00:00Z") so that the stored
/// strings compare lexicographically in chronological order.
pub fn to_db_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parses a timestamp stored by [`to_db_time`].
pub fn from_db_time(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("invalid stored timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn db_time_round_trips() {
        let t = Utc.with_ymd_and_hms(2024, 1, 10, 14, 0, 0).unwrap();
        let raw = to_db_time(t);
        assert_eq!(raw, "2024-01-10T14:00:00Z");
        assert_eq!(from_db_time(&raw).unwrap(), t);
    }

    #[test]
    fn db_time_orders_lexicographically() {
        let earlier = to_db_time(Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap());
        let later = to_db_time(Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap());
        assert!(earlier < later);
    }
}
