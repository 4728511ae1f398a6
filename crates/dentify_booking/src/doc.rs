// File: crates/dentify_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AvailabilityQuery, AvailableSlotsResponse, BookSlotRequest, BookedAppointmentsQuery,
    BookedAppointmentsResponse, BookingResponse, CancellationResponse,
};
use dentify_common::models::{Appointment, AppointmentStatus, ServiceKind, TimeSlot};

#[utoipa::path(
    get,
    path = "/availability",
    params(
        ("date" = String, Query, description = "Target date in YYYY-MM-DD format", example = "2025-06-11", format = "date"),
        ("practitioner" = Option<String>, Query, description = "Restrict the check to one practitioner's calendar", example = "dr.rao@example.com")
    ),
    responses(
        (status = 200, description = "Open time slots for the requested day", body = AvailableSlotsResponse),
        (status = 400, description = "Invalid date format",
         example = json!({"error": {"message": "Validation error: Invalid date format (YYYY-MM-DD)", "code": 400}})
        ),
        (status = 500, description = "Internal error",
         example = json!({"error": {"message": "Internal error: Failed to query availability", "code": 500}})
        )
    ),
    tag = "Booking"
)]
fn doc_get_availability_handler() {}

#[utoipa::path(
    post,
    path = "/book",
    request_body(content = BookSlotRequest, example = json!({
        "date": "2025-06-11",
        "time": "10:00",
        "service": "checkup",
        "practitioner_email": "dr.rao@example.com",
        "patient_name": "Asha Patel",
        "patient_email": "asha@example.com",
        "notes": "First visit"
    })),
    responses(
        (status = 200, description = "Booking result", body = BookingResponse,
         example = json!({
             "success": true,
             "appointment_id": "7d18f9a2-1a8c-4b2e-9f44-0f4c6a31d8a1",
             "status": "pending",
             "message": "Appointment booked successfully."
         })
        ),
        (status = 400, description = "Malformed or out-of-hours request",
         example = json!({"error": {"message": "Validation error: slot 18:00:00-18:30:00 is outside clinic hours 09:00:00-17:00:00", "code": 400}})
        ),
        (status = 409, description = "Slot already booked",
         example = json!({"error": {"message": "Conflict: Requested time slot is no longer available.", "code": 409}})
        ),
        (status = 500, description = "Booking failed",
         example = json!({"error": {"message": "Internal error: Failed to book appointment.", "code": 500}})
        )
    ),
    tag = "Booking"
)]
fn doc_book_slot_handler() {}

#[utoipa::path(
    get,
    path = "/bookings",
    params(
        ("start_date" = String, Query, description = "Start date in YYYY-MM-DD format", example = "2025-06-09", format = "date"),
        ("end_date" = String, Query, description = "End date in YYYY-MM-DD format", example = "2025-06-13", format = "date"),
        ("include_cancelled" = Option<bool>, Query, description = "Whether to include cancelled appointments", example = false)
    ),
    responses(
        (status = 200, description = "Appointments in the range", body = BookedAppointmentsResponse),
        (status = 400, description = "Invalid date range",
         example = json!({"error": {"message": "Validation error: end_date must be after start_date", "code": 400}})
        ),
        (status = 500, description = "Failed to fetch appointments",
         example = json!({"error": {"message": "Internal error: Failed to fetch booked appointments", "code": 500}})
        )
    ),
    tag = "Booking"
)]
fn doc_get_bookings_handler() {}

#[utoipa::path(
    patch,
    path = "/admin/cancel/{appointment_id}",
    params(
        ("appointment_id" = String, Path, description = "The ID of the appointment to mark as cancelled")
    ),
    responses(
        (status = 200, description = "Cancellation result", body = CancellationResponse,
         example = json!({
             "success": true,
             "message": "Appointment marked as cancelled successfully."
         })
        ),
        (status = 404, description = "Appointment not found",
         example = json!({"error": {"message": "Not found: Appointment not found.", "code": 404}})
        ),
        (status = 500, description = "Cancellation failed",
         example = json!({"error": {"message": "Internal error: Failed to cancel appointment.", "code": 500}})
        )
    ),
    tag = "Booking"
)]
fn doc_cancel_appointment_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_availability_handler,
        doc_book_slot_handler,
        doc_get_bookings_handler,
        doc_cancel_appointment_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailableSlotsResponse,
            BookSlotRequest,
            BookingResponse,
            BookedAppointmentsQuery,
            BookedAppointmentsResponse,
            CancellationResponse,
            Appointment,
            AppointmentStatus,
            ServiceKind,
            TimeSlot
        )
    ),
    tags(
        (name = "Booking", description = "Dental appointment booking API")
    ),
    servers(
        (url = "/api", description = "Booking API server")
    )
)]
pub struct BookingApiDoc;
