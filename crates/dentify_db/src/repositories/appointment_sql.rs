//! SQL implementation of the appointment repository
//!
//! The conflict check and the insert are a single conditional INSERT
//! statement. SQLite serializes writers, so the statement alone closes the
//! race there; on MVCC backends (Postgres) two concurrent statements can
//! both pass the NOT EXISTS check, so a unique partial index over active
//! slots backstops the insert and the loser's unique violation is reported
//! as a conflict.

use crate::error::DbError;
use crate::repositories::appointment::{
    from_db_time, to_db_time, AppointmentRepository, CreateOutcome,
};
use crate::DbClient;
use chrono::{DateTime, Duration, Utc};
use dentify_common::models::{Appointment, AppointmentStatus, ServiceKind};
use dentify_common::services::BoxFuture;
use sqlx::any::AnyRow;
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, error, info};

/// SQL implementation of the appointment repository
#[derive(Debug, Clone)]
pub struct SqlAppointmentRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlAppointmentRepository {
    /// Create a new SQL appointment repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn row_to_appointment(row: &AnyRow) -> Result<Appointment, DbError> {
    let service_raw: String = row
        .try_get("service")
        .map_err(|e| DbError::DecodeError(e.to_string()))?;
    let status_raw: String = row
        .try_get("status")
        .map_err(|e| DbError::DecodeError(e.to_string()))?;
    let start_raw: String = row
        .try_get("start_time")
        .map_err(|e| DbError::DecodeError(e.to_string()))?;

    Ok(Appointment {
        id: row
            .try_get("id")
            .map_err(|e| DbError::DecodeError(e.to_string()))?,
        patient_name: row.try_get("patient_name").unwrap_or_default(),
        patient_email: row.try_get("patient_email").unwrap_or_default(),
        practitioner_email: row.try_get("practitioner_email").unwrap_or_default(),
        service: ServiceKind::from_str(&service_raw).map_err(DbError::DecodeError)?,
        start_time: from_db_time(&start_raw)?,
        duration_minutes: row.try_get("duration_minutes").unwrap_or(30),
        status: AppointmentStatus::from_str(&status_raw).map_err(DbError::DecodeError)?,
        notes: row.try_get("notes").ok(),
        created_at: row
            .try_get::<String, _>("created_at")
            .ok()
            .and_then(|raw| from_db_time(&raw).ok()),
        updated_at: row
            .try_get::<String, _>("updated_at")
            .ok()
            .and_then(|raw| from_db_time(&raw).ok()),
    })
}

impl AppointmentRepository for SqlAppointmentRepository {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async move {
            debug!("Initializing appointment schema");

            let query = r#"
                CREATE TABLE IF NOT EXISTS appointments (
                    id TEXT PRIMARY KEY,
                    patient_name TEXT NOT NULL,
                    patient_email TEXT NOT NULL,
                    practitioner_email TEXT NOT NULL,
                    service TEXT NOT NULL,
                    start_time TEXT NOT NULL,
                    end_time TEXT NOT NULL,
                    duration_minutes BIGINT NOT NULL,
                    status TEXT NOT NULL,
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
            "#;

            self.db_client.execute(query).await?;

            self.db_client
                .execute(
                    r#"
                    CREATE INDEX IF NOT EXISTS idx_appointments_practitioner_start
                    ON appointments (practitioner_email, start_time)
                    "#,
                )
                .await?;

            // Uniqueness backstop for MVCC backends where two concurrent
            // conditional inserts can both pass the NOT EXISTS check.
            // Cancelled rows are excluded so a freed slot can be rebooked.
            self.db_client
                .execute(
                    r#"
                    CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_active_slot
                    ON appointments (practitioner_email, start_time)
                    WHERE status IN ('pending', 'confirmed')
                    "#,
                )
                .await?;

            info!("Appointment schema initialized successfully");
            Ok(())
        })
    }

    fn create_if_free(
        &self,
        appointment: Appointment,
        buffer_minutes: i64,
    ) -> BoxFuture<'_, CreateOutcome, DbError> {
        Box::pin(async move {
            debug!(
                "Creating appointment for {} with {} at {}",
                appointment.patient_email, appointment.practitioner_email, appointment.start_time
            );

            let start = to_db_time(appointment.start_time);
            let end = to_db_time(appointment.end_time());
            let window_start =
                to_db_time(appointment.start_time - Duration::minutes(buffer_minutes));
            let window_end =
                to_db_time(appointment.end_time() + Duration::minutes(buffer_minutes));
            let now = to_db_time(Utc::now());

            // Conditional insert: the overlap check and the write are one
            // statement. The unique partial index on active slots catches
            // the case where two concurrent statements both pass the check.
            let query = r#"
                INSERT INTO appointments (
                    id, patient_name, patient_email, practitioner_email, service,
                    start_time, end_time, duration_minutes, status, notes,
                    created_at, updated_at
                )
                SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11
                WHERE NOT EXISTS (
                    SELECT 1 FROM appointments
                    WHERE practitioner_email = $4
                      AND status IN ('pending', 'confirmed')
                      AND start_time < $12
                      AND end_time > $13
                )
            "#;

            let result = match sqlx::query(query)
                .bind(&appointment.id)
                .bind(&appointment.patient_name)
                .bind(&appointment.patient_email)
                .bind(&appointment.practitioner_email)
                .bind(appointment.service.as_str())
                .bind(&start)
                .bind(&end)
                .bind(appointment.duration_minutes)
                .bind(appointment.status.as_str())
                .bind(&appointment.notes)
                .bind(&now)
                .bind(&window_end)
                .bind(&window_start)
                .execute(self.db_client.pool())
                .await
            {
                Ok(result) => result,
                Err(e)
                    if e.as_database_error()
                        .is_some_and(|db| db.is_unique_violation()) =>
                {
                    info!(
                        "Slot conflict (lost insert race) for {} at {}",
                        appointment.practitioner_email, start
                    );
                    return Ok(CreateOutcome::Conflict);
                }
                Err(e) => {
                    error!("Failed to insert appointment: {}", e);
                    return Err(DbError::QueryError(e.to_string()));
                }
            };

            if result.rows_affected() == 0 {
                info!(
                    "Slot conflict for {} at {}",
                    appointment.practitioner_email, start
                );
                return Ok(CreateOutcome::Conflict);
            }

            info!("Appointment {} created successfully", appointment.id);
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
            debug!("Finding appointments between {} and {}", start, end);

            let query = if include_cancelled {
                r#"
                SELECT id, patient_name, patient_email, practitioner_email, service,
                       start_time, end_time, duration_minutes, status, notes,
                       created_at, updated_at
                FROM appointments
                WHERE start_time >= $1 AND start_time < $2
                ORDER BY start_time
                "#
            } else {
                r#"
                SELECT id, patient_name, patient_email, practitioner_email, service,
                       start_time, end_time, duration_minutes, status, notes,
                       created_at, updated_at
                FROM appointments
                WHERE start_time >= $1 AND start_time < $2
                  AND status IN ('pending', 'confirmed')
                ORDER BY start_time
                "#
            };

            let rows = sqlx::query(query)
                .bind(to_db_time(start))
                .bind(to_db_time(end))
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find appointments: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            rows.iter().map(row_to_appointment).collect()
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
            let query = r#"
                SELECT id, patient_name, patient_email, practitioner_email, service,
                       start_time, end_time, duration_minutes, status, notes,
                       created_at, updated_at
                FROM appointments
                WHERE practitioner_email = $1
                  AND status IN ('pending', 'confirmed')
                  AND start_time < $2
                  AND end_time > $3
                ORDER BY start_time
            "#;

            let rows = sqlx::query(query)
                .bind(&practitioner_email)
                .bind(to_db_time(end))
                .bind(to_db_time(start))
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find practitioner appointments: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            rows.iter().map(row_to_appointment).collect()
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Appointment>, DbError> {
        let id = id.to_string();
        Box::pin(async move {
            let query = r#"
                SELECT id, patient_name, patient_email, practitioner_email, service,
                       start_time, end_time, duration_minutes, status, notes,
                       created_at, updated_at
                FROM appointments
                WHERE id = $1
            "#;

            let row = sqlx::query(query)
                .bind(&id)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find appointment {}: {}", id, e);
                    DbError::QueryError(e.to_string())
                })?;

            row.as_ref().map(row_to_appointment).transpose()
        })
    }

    fn update_status(&self, id: &str, status: AppointmentStatus) -> BoxFuture<'_, bool, DbError> {
        let id = id.to_string();
        Box::pin(async move {
            debug!("Updating appointment {} to status {}", id, status);

            let query = r#"
                UPDATE appointments
                SET status = $1, updated_at = $2
                WHERE id = $3
            "#;

            let result = sqlx::query(query)
                .bind(status.as_str())
                .bind(to_db_time(Utc::now()))
                .bind(&id)
                .execute(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to update appointment status: {}", e);
                    DbError::QueryError(e.to_string())
                })?;

            Ok(result.rows_affected() > 0)
        })
    }
}
