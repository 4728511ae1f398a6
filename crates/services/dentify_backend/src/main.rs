// File: crates/services/dentify_backend/src/main.rs
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use dentify_booking::handlers::BookingState;
use dentify_booking::routes as booking_routes;
use dentify_booking::schedule::ClinicSchedule;
use dentify_calsync::{spawn_sync_worker, ExternalCalendarService, SyncWorkerOptions};
use dentify_config::load_config;
use dentify_db::{AppointmentRepository, DbClient, SqlAppointmentRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[axum::debug_handler]
async fn health_handler(
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if db.is_healthy().await {
        Ok(Json(json!({ "status": "ok", "database": "reachable" })))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": "unreachable" })),
        ))
    }
}

#[tokio::main]
async fn main() {
    dentify_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));

    // Database and the appointment repository
    let db_client = Arc::new(
        DbClient::new(&config)
            .await
            .expect("Failed to connect to the database"),
    );
    let repository = Arc::new(SqlAppointmentRepository::new(db_client.as_ref().clone()));
    repository
        .init_schema()
        .await
        .expect("Failed to initialise the appointments schema");

    let clinic_config = config.clinic.clone().unwrap_or_default();
    let schedule = Arc::new(
        ClinicSchedule::from_config(&clinic_config)
            .expect("Invalid clinic schedule configuration"),
    );

    // Calendar sync worker, enabled by config
    let sync_tx = if config.use_calendar_sync {
        match config.calendar.as_ref() {
            Some(calendar_config) => match ExternalCalendarService::from_config(calendar_config) {
                Ok(service) => {
                    let options = SyncWorkerOptions {
                        max_attempts: calendar_config
                            .max_attempts
                            .unwrap_or(dentify_calsync::DEFAULT_MAX_ATTEMPTS),
                        ..SyncWorkerOptions::default()
                    };
                    let (tx, _handle) = spawn_sync_worker(Arc::new(service), options);
                    info!("Calendar sync enabled ({})", calendar_config.base_url);
                    Some(tx)
                }
                Err(e) => {
                    warn!("Calendar sync disabled, invalid configuration: {}", e);
                    None
                }
            },
            None => {
                warn!("use_calendar_sync is set but the [calendar] section is missing");
                None
            }
        }
    } else {
        None
    };

    let booking_state = Arc::new(BookingState {
        schedule,
        repository,
        sync_tx,
    });

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Dentify API!" }))
        .route("/health", get(health_handler))
        .with_state(db_client)
        .merge(booking_routes::routes(booking_state));

    #[allow(unused_mut)]
    let mut app = Router::new()
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use dentify_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Dentify API",
                version = "0.1.0",
                description = "Dental clinic booking API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Booking", description = "Availability and appointment endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
