// --- File: crates/dentify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., DATABASE_URL loaded via DENTIFY_DATABASE__URL
}

// --- Clinic Schedule Config ---
// Static clinic schedule: read-only at runtime, passed into the booking
// components at construction.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ClinicConfig {
    /// IANA time zone the clinic operates in (e.g., "Europe/Zurich").
    pub time_zone: Option<String>,
    /// Days of the week the clinic is open, short names ("Mon".."Sun").
    pub working_days: Option<Vec<String>>,
    /// Opening time, "HH:MM".
    pub open_time: Option<String>,
    /// Closing time, "HH:MM".
    pub close_time: Option<String>,
    /// Slot granularity in minutes.
    pub slot_duration_minutes: Option<i64>,
    /// Buffer kept free around each appointment, in minutes.
    pub buffer_minutes: Option<i64>,
    /// Practitioner emails appointments can be booked against.
    #[serde(default)]
    pub practitioners: Vec<String>,
}

// --- External Calendar Config ---
// Holds non-secret calendar config. API key may come from CALENDAR_API_KEY.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendarApiConfig {
    /// Base URL of the third-party calendar API.
    pub base_url: String,
    pub api_key: Option<String>,
    pub time_zone: Option<String>,
    /// Maximum delivery attempts per event, defaults to 3.
    pub max_attempts: Option<u32>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_calendar_sync: bool,

    // --- Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub clinic: Option<ClinicConfig>,
    #[serde(default)]
    pub calendar: Option<CalendarApiConfig>,
}
