// --- File: crates/dentify_booking/src/schedule.rs ---
//! The clinic's weekly schedule, parsed once from configuration.
//!
//! All booking and availability decisions consult this value; nothing reads
//! schedule settings from ambient state after construction.

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use dentify_common::{config_error, DentifyError};
use dentify_config::ClinicConfig;
use std::str::FromStr;

/// Parsed, immutable clinic schedule.
#[derive(Debug, Clone)]
pub struct ClinicSchedule {
    /// Time zone the open/close times are expressed in.
    pub time_zone: Tz,
    /// Days of the week the clinic takes appointments.
    pub working_days: Vec<Weekday>,
    /// Opening time of the working day.
    pub open_time: NaiveTime,
    /// Closing time of the working day.
    pub close_time: NaiveTime,
    /// Slot granularity in minutes.
    pub slot_duration_minutes: i64,
    /// Buffer kept free around each appointment, in minutes.
    pub buffer_minutes: i64,
    /// Practitioners appointments can be booked against.
    pub practitioners: Vec<String>,
}

const DEFAULT_WORKING_DAYS: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn parse_weekday(day: &str) -> Option<Weekday> {
    match day {
        "Mon" => Some(Weekday::Mon),
        "Tue" => Some(Weekday::Tue),
        "Wed" => Some(Weekday::Wed),
        "Thu" => Some(Weekday::Thu),
        "Fri" => Some(Weekday::Fri),
        "Sat" => Some(Weekday::Sat),
        "Sun" => Some(Weekday::Sun),
        _ => None,
    }
}

impl ClinicSchedule {
    /// Build the schedule from the raw config section.
    ///
    /// Unset fields fall back to a 09:00-17:00, Mon-Sat clinic with
    /// 30-minute slots and no buffer.
    pub fn from_config(config: &ClinicConfig) -> Result<Self, DentifyError> {
        let time_zone = match &config.time_zone {
            Some(name) => Tz::from_str(name)
                .map_err(|_| config_error(format!("invalid clinic time zone: {}", name)))?,
            None => chrono_tz::UTC,
        };

        let open_time = match &config.open_time {
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
                .map_err(|_| config_error(format!("invalid clinic open_time: {}", raw)))?,
            None => NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        let close_time = match &config.close_time {
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
                .map_err(|_| config_error(format!("invalid clinic close_time: {}", raw)))?,
            None => NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        };
        if close_time <= open_time {
            return Err(config_error("clinic close_time must be after open_time"));
        }

        let working_days = match &config.working_days {
            Some(days) => {
                let parsed: Vec<Weekday> =
                    days.iter().filter_map(|d| parse_weekday(d)).collect();
                if parsed.is_empty() {
                    return Err(config_error("clinic working_days lists no valid days"));
                }
                parsed
            }
            None => DEFAULT_WORKING_DAYS.to_vec(),
        };

        let slot_duration_minutes = config.slot_duration_minutes.unwrap_or(30);
        if slot_duration_minutes <= 0 {
            return Err(config_error("clinic slot_duration_minutes must be positive"));
        }
        let buffer_minutes = config.buffer_minutes.unwrap_or(0);
        if buffer_minutes < 0 {
            return Err(config_error("clinic buffer_minutes must not be negative"));
        }

        Ok(Self {
            time_zone,
            working_days,
            open_time,
            close_time,
            slot_duration_minutes,
            buffer_minutes,
            practitioners: config.practitioners.clone(),
        })
    }

    pub fn is_working_day(&self, day: Weekday) -> bool {
        self.working_days.contains(&day)
    }

    /// Whether `[start, end]` (local clinic times on a working day) lies
    /// within opening hours.
    pub fn within_hours(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.open_time && end <= self.close_time && start < end
    }

    /// Whether the practitioner is one the clinic books for. An empty
    /// configured list accepts any practitioner.
    pub fn knows_practitioner(&self, practitioner_email: &str) -> bool {
        self.practitioners.is_empty()
            || self.practitioners.iter().any(|p| p == practitioner_email)
    }
}
