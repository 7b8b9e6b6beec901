//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, availability, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dimora API",
        version = "1.0.0",
        description = "Real Estate Marketplace Appointment REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Availability
        availability::get_available_days,
        availability::get_available_slots_by_day,
        // Appointments
        appointments::create_appointment,
        appointments::get_agent_appointments,
        appointments::get_account_appointments,
        appointments::confirm_appointment,
        appointments::reject_appointment,
        appointments::cancel_appointment,
    ),
    components(
        schemas(
            // Availability
            availability::AvailableDaysResponse,
            availability::DayAvailability,
            availability::SlotsByDayResponse,
            // Appointments
            appointments::CreateAppointmentRequest,
            appointments::AppointmentResponse,
            appointments::AppointmentSummary,
            appointments::AppointmentListResponse,
            crate::models::appointment::Appointment,
            crate::models::appointment::AppointmentStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Free visit slots for advertisements"),
        (name = "appointments", description = "Appointment booking and lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
