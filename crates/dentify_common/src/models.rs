// --- File: crates/dentify_common/src/models.rs ---
//! Domain models shared across the Dentify crates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dental services the clinic offers.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Checkup,
    Cleaning,
    Whitening,
    Filling,
    RootCanal,
    Implant,
    Orthodontics,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Checkup => "checkup",
            ServiceKind::Cleaning => "cleaning",
            ServiceKind::Whitening => "whitening",
            ServiceKind::Filling => "filling",
            ServiceKind::RootCanal => "root_canal",
            ServiceKind::Implant => "implant",
            ServiceKind::Orthodontics => "orthodontics",
        }
    }

    /// Human-readable label used in calendar event summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceKind::Checkup => "Dental Checkup",
            ServiceKind::Cleaning => "Teeth Cleaning",
            ServiceKind::Whitening => "Teeth Whitening",
            ServiceKind::Filling => "Dental Filling",
            ServiceKind::RootCanal => "Root Canal Treatment",
            ServiceKind::Implant => "Dental Implant",
            ServiceKind::Orthodontics => "Orthodontic Consultation",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checkup" => Ok(ServiceKind::Checkup),
            "cleaning" => Ok(ServiceKind::Cleaning),
            "whitening" => Ok(ServiceKind::Whitening),
            "filling" => Ok(ServiceKind::Filling),
            "root_canal" => Ok(ServiceKind::RootCanal),
            "implant" => Ok(ServiceKind::Implant),
            "orthodontics" => Ok(ServiceKind::Orthodontics),
            other => Err(format!("unknown service kind: {}", other)),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an appointment. Appointments are never hard-deleted;
/// cancellation is a status change so the audit history is preserved.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the appointment still occupies its time slot.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked appointment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// UUID v4 identifier assigned at creation.
    pub id: String,
    pub patient_name: String,
    pub patient_email: String,
    /// The practitioner the slot is booked against; conflicts are per practitioner.
    pub practitioner_email: String,
    pub service: ServiceKind,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub created_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }
}

/// A candidate booking window. Computed, never persisted.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// RFC 3339, in the clinic time zone.
    pub start_time: String,
    /// RFC 3339, in the clinic time zone.
    pub end_time: String,
}
