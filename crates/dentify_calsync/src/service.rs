// --- File: crates/dentify_calsync/src/service.rs ---
use dentify_common::http::client::create_client;
use dentify_common::services::{
    BoxFuture, CalendarEvent, CalendarEventResult, CalendarSyncService,
};
use dentify_config::CalendarApiConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar-API-specific error types.
#[derive(Error, Debug)]
pub enum CalendarSyncError {
    /// Error occurred during a calendar API request
    #[error("Calendar API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the calendar API
    #[error("Calendar API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing or incomplete calendar configuration
    #[error("Calendar configuration missing or incomplete")]
    ConfigError,
}

impl CalendarSyncError {
    /// Client errors (4xx) won't succeed on a retry; everything else might.
    pub fn is_retryable(&self) -> bool {
        match self {
            CalendarSyncError::ApiError { status_code, .. } => *status_code >= 500,
            CalendarSyncError::RequestError(_) => true,
            CalendarSyncError::ConfigError => false,
        }
    }
}

/// The request body the calendar API expects for event creation.
#[derive(Debug, Serialize)]
struct CreateEventPayload<'a> {
    summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    start_time: &'a str,
    end_time: &'a str,
    time_zone: &'a str,
    attendees: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CreateEventReply {
    #[serde(default)]
    id: Option<String>,
    #[serde(default = "default_status")]
    status: String,
}

fn default_status() -> String {
    "confirmed".to_string()
}

/// Pushes booked appointments to the external calendar over HTTP.
pub struct ExternalCalendarService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    time_zone: String,
}

impl ExternalCalendarService {
    /// Build the service from the `[calendar]` config section.
    pub fn from_config(config: &CalendarApiConfig) -> Result<Self, CalendarSyncError> {
        if config.base_url.trim().is_empty() {
            return Err(CalendarSyncError::ConfigError);
        }
        let client = create_client(30, true).map_err(CalendarSyncError::RequestError)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            time_zone: config
                .time_zone
                .clone()
                .unwrap_or_else(|| "UTC".to_string()),
        })
    }
}

impl CalendarSyncService for ExternalCalendarService {
    type Error = CalendarSyncError;

    fn push_event(&self, event: CalendarEvent) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        Box::pin(async move {
            let url = format!("{}/event", self.base_url);
            let payload = CreateEventPayload {
                summary: &event.summary,
                description: event.description.as_deref(),
                start_time: &event.start_time,
                end_time: &event.end_time,
                time_zone: &self.time_zone,
                attendees: &event.attendees,
            };

            let mut request = self.client.post(&url).json(&payload);
            if let Some(api_key) = &self.api_key {
                request = request.header("X-Api-Key", api_key);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(CalendarSyncError::ApiError {
                    status_code: status.as_u16(),
                    message: body,
                });
            }

            let reply: CreateEventReply = response.json().await?;
            Ok(CalendarEventResult {
                event_id: reply.id,
                status: reply.status,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> CalendarApiConfig {
        CalendarApiConfig {
            base_url: base_url.to_string(),
            api_key: Some("test-key".to_string()),
            time_zone: Some("Europe/Zurich".to_string()),
            max_attempts: None,
        }
    }

    #[test]
    fn empty_base_url_is_a_config_error() {
        let result = ExternalCalendarService::from_config(&config("  "));
        assert!(matches!(result, Err(CalendarSyncError::ConfigError)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let service =
            ExternalCalendarService::from_config(&config("https://calendar.example.com/"))
                .unwrap();
        assert_eq!(service.base_url, "https://calendar.example.com");
    }

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        let server_side = CalendarSyncError::ApiError {
            status_code: 503,
            message: "overloaded".to_string(),
        };
        let client_side = CalendarSyncError::ApiError {
            status_code: 422,
            message: "bad payload".to_string(),
        };
        assert!(server_side.is_retryable());
        assert!(!client_side.is_retryable());
        assert!(!CalendarSyncError::ConfigError.is_retryable());
    }
}
