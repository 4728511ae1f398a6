// --- File: crates/dentify_booking/src/logic.rs ---
use crate::schedule::ClinicSchedule;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use dentify_common::models::{Appointment, AppointmentStatus, ServiceKind, TimeSlot};
use dentify_db::{AppointmentRepository, CreateOutcome, DbError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Booking conflict")]
    Conflict,
    #[error("Persistence error: {0}")]
    Persistence(#[from] DbError),
}

// --- Data Structures ---
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Target date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2024-01-10"))]
    pub date: String,

    /// Restrict the check to one practitioner's calendar
    #[cfg_attr(feature = "openapi", schema(example = "dr.rao@example.com"))]
    pub practitioner: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailableSlotsResponse {
    pub slots: Vec<TimeSlot>,
}

#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookSlotRequest {
    /// Appointment date in YYYY-MM-DD format, clinic time zone
    pub date: String,
    /// Appointment start in HH:MM format, clinic time zone
    pub time: String,
    pub service: ServiceKind,
    pub practitioner_email: String,
    pub patient_name: String,
    pub patient_email: String,
    pub notes: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub appointment_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub message: String,
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct BookedAppointmentsQuery {
    pub start_date: String,              // YYYY-MM-DD format
    pub end_date: String,                // YYYY-MM-DD format
    pub include_cancelled: Option<bool>, // Whether to include cancelled appointments
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Serialize)]
pub struct BookedAppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct CancellationResponse {
    pub success: bool,
    pub message: String,
}

// --- Availability Logic ---

/// Returns the open, unbooked slots for one clinic day.
///
/// The sequence is lazy, restartable per call, and bounded by opening hours:
/// slots are generated at the schedule's granularity between open and close,
/// and every slot overlapping a busy period (widened by the buffer) is
/// dropped. A date outside the clinic's working days yields an empty
/// sequence, not an error.
pub fn available_slots<'a>(
    date: NaiveDate,
    busy_periods: &'a [(DateTime<Utc>, DateTime<Utc>)],
    schedule: &'a ClinicSchedule,
) -> impl Iterator<Item = TimeSlot> + 'a {
    let slot = Duration::minutes(schedule.slot_duration_minutes);
    let buffer = Duration::minutes(schedule.buffer_minutes);
    let merged_busy = merge_busy_periods(busy_periods);

    let day_slots: i64 = if schedule.is_working_day(date.weekday()) {
        let open = (schedule.close_time - schedule.open_time).num_minutes();
        open / schedule.slot_duration_minutes
    } else {
        0
    };

    (0..day_slots).filter_map(move |index| {
        let start_local_time = schedule.open_time + slot * index as i32;
        let naive_start = date.and_time(start_local_time);

        // Skip times that don't exist locally (DST gap)
        let start_local = schedule
            .time_zone
            .from_local_datetime(&naive_start)
            .earliest()?;
        let end_local = start_local + slot;

        let start_utc = start_local.with_timezone(&Utc);
        let end_utc = end_local.with_timezone(&Utc);
        let window_start = start_utc - buffer;
        let window_end = end_utc + buffer;

        let overlaps = merged_busy
            .iter()
            .any(|(busy_start, busy_end)| *busy_start < window_end && *busy_end > window_start);
        if overlaps {
            return None;
        }

        Some(TimeSlot {
            start_time: start_local.to_rfc3339(),
            end_time: end_local.to_rfc3339(),
        })
    })
}

/// Merge overlapping or adjacent busy periods so the per-slot overlap scan
/// touches each interval once.
fn merge_busy_periods(
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    if busy.is_empty() {
        return vec![];
    }
    let mut sorted = busy.to_vec();
    sorted.sort_by_key(|(start, _)| *start);
    let mut merged = vec![sorted[0]];
    for &(start, end) in &sorted[1..] {
        let last = merged.last_mut().unwrap();
        if start <= last.1 {
            last.1 = last.1.max(end);
        } else {
            merged.push((start, end));
        }
    }
    merged
}

// --- Booking Logic ---

/// Validates a booking request against the clinic schedule and, when the
/// slot is in order, persists it through the repository.
///
/// The repository performs the conflict check and the insert atomically, so
/// of two concurrent requests for the same slot exactly one returns `Ok`;
/// the other gets [`BookingError::Conflict`].
pub async fn book_slot(
    repository: &dyn AppointmentRepository,
    schedule: &ClinicSchedule,
    request: BookSlotRequest,
    now: DateTime<Utc>,
) -> Result<Appointment, BookingError> {
    if request.patient_name.trim().is_empty() {
        return Err(BookingError::Validation("patient_name is required".into()));
    }
    if !request.patient_email.contains('@') {
        return Err(BookingError::Validation(format!(
            "invalid patient_email: {}",
            request.patient_email
        )));
    }
    if !schedule.knows_practitioner(&request.practitioner_email) {
        return Err(BookingError::Validation(format!(
            "unknown practitioner: {}",
            request.practitioner_email
        )));
    }

    let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
        .map_err(|_| BookingError::Validation("invalid date format (YYYY-MM-DD)".into()))?;
    let time = chrono::NaiveTime::parse_from_str(&request.time, "%H:%M")
        .map_err(|_| BookingError::Validation("invalid time format (HH:MM)".into()))?;

    if !schedule.is_working_day(date.weekday()) {
        return Err(BookingError::Validation(format!(
            "the clinic is closed on {}",
            date.weekday()
        )));
    }

    let duration = Duration::minutes(schedule.slot_duration_minutes);
    let end_time = time + duration;
    if !schedule.within_hours(time, end_time) {
        return Err(BookingError::Validation(format!(
            "slot {}-{} is outside clinic hours {}-{}",
            time, end_time, schedule.open_time, schedule.close_time
        )));
    }

    let start_local = schedule
        .time_zone
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| {
            BookingError::Validation("requested time is ambiguous in the clinic time zone".into())
        })?;
    let start_utc = start_local.with_timezone(&Utc);

    if start_utc <= now {
        return Err(BookingError::Validation(
            "appointment date cannot be in the past".into(),
        ));
    }

    let appointment = Appointment {
        id: uuid::Uuid::new_v4().to_string(),
        patient_name: request.patient_name.trim().to_string(),
        patient_email: request.patient_email.trim().to_lowercase(),
        practitioner_email: request.practitioner_email.clone(),
        service: request.service,
        start_time: start_utc,
        duration_minutes: schedule.slot_duration_minutes,
        status: AppointmentStatus::Pending,
        notes: request.notes.clone(),
        created_at: None,
        updated_at: None,
    };

    debug!(
        "Booking {} for {} with {} at {}",
        appointment.service, appointment.patient_email, appointment.practitioner_email, start_utc
    );

    match repository
        .create_if_free(appointment, schedule.buffer_minutes)
        .await?
    {
        CreateOutcome::Created(appointment) => Ok(appointment),
        CreateOutcome::Conflict => Err(BookingError::Conflict),
    }
}

/// The UTC bounds of one clinic day, used when collecting busy periods.
pub fn day_bounds(date: NaiveDate, schedule: &ClinicSchedule) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = schedule
        .time_zone
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()));
    (start, start + Duration::days(1))
}
