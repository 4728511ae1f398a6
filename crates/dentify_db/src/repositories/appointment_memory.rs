//! In-memory implementation of the appointment repository
//!
//! Backs handler and service tests that don't want a real database, and
//! doubles as a reference for the conflict semantics the SQL implementation
//! must provide.

use crate::error::DbError;
use crate::repositories::appointment::{AppointmentRepository, CreateOutcome};
use chrono::{DateTime, Duration, Utc};
use dentify_common::models::{Appointment, AppointmentStatus};
use dentify_common::services::BoxFuture;
use std::sync::Mutex;

/// In-memory appointment repository
#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored appointments, cancelled included.
    pub fn len(&self) -> usize {
        self.appointments.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn overlaps(existing: &Appointment, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> bool {
    existing.start_time < window_end && existing.end_time() > window_start
}

impl AppointmentRepository for InMemoryAppointmentRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn create_if_free(
        &self,
        appointment: Appointment,
        buffer_minutes: i64,
    ) -> BoxFuture<'_, CreateOutcome, DbError> {
        Box::pin(async move {
            // The lock plays the role of the database's atomicity: the
            // conflict check and the insert happen under one critical section.
            let mut appointments = self.appointments.lock().unwrap();

            let window_start = appointment.start_time - Duration::minutes(buffer_minutes);
            let window_end = appointment.end_time() + Duration::minutes(buffer_minutes);

            let conflict = appointments.iter().any(|existing| {
                existing.practitioner_email == appointment.practitioner_email
                    && existing.status.is_active()
                    && overlaps(existing, window_start, window_end)
            });

            if conflict {
                return Ok(CreateOutcome::Conflict);
            }

            appointments.push(appointment.clone());
            Ok(CreateOutcome::Created(appointment))
        })
    }

    fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_cancelled: bool,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError> {
        Box::pin(async move {
            let appointments = self.appointments.lock().unwrap();
            let mut found: Vec<Appointment> = appointments
                .iter()
                .filter(|a| a.start_time >= start && a.start_time < end)
                .filter(|a| include_cancelled || a.status.is_active())
                .cloned()
                .collect();
            found.sort_by_key(|a| a.start_time);
            Ok(found)
        })
    }

    fn find_active_for_practitioner(
        &self,
        practitioner_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError> {
        let practitioner_email = practitioner_email.to_string();
        Box::pin(async move {
            let appointments = self.appointments.lock().unwrap();
            let mut found: Vec<Appointment> = appointments
                .iter()
                .filter(|a| a.practitioner_email == practitioner_email)
                .filter(|a| a.status.is_active())
                .filter(|a| overlaps(a, start, end))
                .cloned()
                .collect();
            found.sort_by_key(|a| a.start_time);
            Ok(found)
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Appointment>, DbError> {
        let id = id.to_string();
        Box::pin(async move {
            let appointments = self.appointments.lock().unwrap();
            Ok(appointments.iter().find(|a| a.id == id).cloned())
        })
    }

    fn update_status(&self, id: &str, status: AppointmentStatus) -> BoxFuture<'_, bool, DbError> {
        let id = id.to_string();
        Box::pin(async move {
            let mut appointments = self.appointments.lock().unwrap();
            match appointments.iter_mut().find(|a| a.id == id) {
                Some(appointment) => {
                    appointment.status = status;
                    appointment.updated_at = Some(Utc::now());
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dentify_common::models::ServiceKind;

    fn appointment(id: &str, practitioner: &str, hour: u32, minute: u32) -> Appointment {
        Appointment {
            id: id.to_string(),
            patient_name: "Asha Patel".to_string(),
            patient_email: "asha@example.com".to_string(),
            practitioner_email: practitioner.to_string(),
            service: ServiceKind::Checkup,
            start_time: Utc.with_ymd_and_hms(2024, 1, 10, hour, minute, 0).unwrap(),
            duration_minutes: 30,
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn overlapping_booking_conflicts() {
        let repo = InMemoryAppointmentRepository::new();
        let first = repo
            .create_if_free(appointment("a1", "dr.rao@example.com", 14, 0), 0)
            .await
            .unwrap();
        assert!(matches!(first, CreateOutcome::Created(_)));

        let second = repo
            .create_if_free(appointment("a2", "dr.rao@example.com", 14, 0), 0)
            .await
            .unwrap();
        assert!(matches!(second, CreateOutcome::Conflict));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn different_practitioners_do_not_conflict() {
        let repo = InMemoryAppointmentRepository::new();
        repo.create_if_free(appointment("a1", "dr.rao@example.com", 14, 0), 0)
            .await
            .unwrap();
        let other = repo
            .create_if_free(appointment("a2", "dr.mehta@example.com", 14, 0), 0)
            .await
            .unwrap();
        assert!(matches!(other, CreateOutcome::Created(_)));
    }

    #[tokio::test]
    async fn buffer_extends_the_conflict_window() {
        let repo = InMemoryAppointmentRepository::new();
        repo.create_if_free(appointment("a1", "dr.rao@example.com", 14, 0), 0)
            .await
            .unwrap();

        // 14:30 touches the existing 14:00-14:30 slot only through the buffer
        let adjacent = repo
            .create_if_free(appointment("a2", "dr.rao@example.com", 14, 30), 15)
            .await
            .unwrap();
        assert!(matches!(adjacent, CreateOutcome::Conflict));
    }

    #[tokio::test]
    async fn cancelled_appointment_frees_the_slot() {
        let repo = InMemoryAppointmentRepository::new();
        repo.create_if_free(appointment("a1", "dr.rao@example.com", 14, 0), 0)
            .await
            .unwrap();
        assert!(repo
            .update_status("a1", AppointmentStatus::Cancelled)
            .await
            .unwrap());

        let rebooked = repo
            .create_if_free(appointment("a2", "dr.rao@example.com", 14, 0), 0)
            .await
            .unwrap();
        assert!(matches!(rebooked, CreateOutcome::Created(_)));

        // Soft delete: the cancelled record is still stored
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn find_in_range_excludes_cancelled_by_default() {
        let repo = InMemoryAppointmentRepository::new();
        repo.create_if_free(appointment("a1", "dr.rao@example.com", 10, 0), 0)
            .await
            .unwrap();
        repo.update_status("a1", AppointmentStatus::Cancelled)
            .await
            .unwrap();

        let day_start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let day_end = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();

        let active = repo.find_in_range(day_start, day_end, false).await.unwrap();
        assert!(active.is_empty());

        let all = repo.find_in_range(day_start, day_end, true).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
