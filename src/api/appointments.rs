//! Appointment booking and lifecycle endpoints

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::appointment::{Appointment, AppointmentFilter, AppointmentStatus},
};

use super::{availability::require_positive_id, AuthenticatedSession};

/// Create appointment request
#[derive(Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    /// Requested visit instant (RFC 3339, whole working hour)
    pub appointment_at: DateTime<Utc>,
}

/// Appointment details returned by create and transition endpoints
#[derive(Serialize, ToSchema)]
pub struct AppointmentResponse {
    /// Status message
    pub message: String,
    pub appointment_id: i32,
    pub status: AppointmentStatus,
    pub appointment_at: DateTime<Utc>,
    pub advertisement_id: i32,
    pub agent_id: i32,
    pub account_id: i32,
}

impl AppointmentResponse {
    fn new(message: impl Into<String>, a: &Appointment) -> Self {
        Self {
            message: message.into(),
            appointment_id: a.id,
            status: a.status,
            appointment_at: a.appointment_at,
            advertisement_id: a.advertisement_id,
            agent_id: a.agent_id,
            account_id: a.account_id,
        }
    }
}

/// One appointment in a listing
#[derive(Serialize, ToSchema)]
pub struct AppointmentSummary {
    pub appointment_id: i32,
    pub status: AppointmentStatus,
    pub appointment_at: DateTime<Utc>,
    pub advertisement_id: i32,
    pub agent_id: i32,
    pub account_id: i32,
}

impl From<Appointment> for AppointmentSummary {
    fn from(a: Appointment) -> Self {
        Self {
            appointment_id: a.id,
            status: a.status,
            appointment_at: a.appointment_at,
            advertisement_id: a.advertisement_id,
            agent_id: a.agent_id,
            account_id: a.account_id,
        }
    }
}

/// Appointment listing response
#[derive(Serialize, ToSchema)]
pub struct AppointmentListResponse {
    /// Authenticated subject the listing belongs to
    pub subject_id: i32,
    pub appointments: Vec<AppointmentSummary>,
}

/// Listing filters
#[derive(Deserialize, IntoParams)]
pub struct ListAppointmentsQuery {
    /// Filter by status (requested, confirmed, cancelled, rejected)
    pub status: Option<String>,
    /// Range start (RFC 3339); applied only together with `to`
    pub from: Option<DateTime<Utc>>,
    /// Range end (RFC 3339); applied only together with `from`
    pub to: Option<DateTime<Utc>>,
}

impl ListAppointmentsQuery {
    fn into_filter(self) -> AppResult<AppointmentFilter> {
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => Some(
                AppointmentStatus::from_str(s)
                    .map_err(|_| AppError::Validation("Invalid status value".to_string()))?,
            ),
        };
        Ok(AppointmentFilter {
            status,
            from: self.from,
            to: self.to,
        })
    }
}

/// Book a visit slot for an advertisement
#[utoipa::path(
    post,
    path = "/advertisements/{id}/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Advertisement ID")
    ),
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment requested", body = AppointmentResponse),
        (status = 400, description = "Invalid or past slot"),
        (status = 404, description = "Advertisement not found"),
        (status = 409, description = "Slot already taken")
    )
)]
pub async fn create_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Path(advertisement_id): Path<i32>,
    Json(request): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<AppointmentResponse>)> {
    let account_id = claims.require_account()?;
    require_positive_id(advertisement_id, "advertisement")?;

    let appointment = state
        .services
        .appointments
        .create(account_id, advertisement_id, request.appointment_at)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse::new(
            "Appointment requested successfully",
            &appointment,
        )),
    ))
}

/// List appointments handled by the authenticated agent
#[utoipa::path(
    get,
    path = "/agents/me/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(ListAppointmentsQuery),
    responses(
        (status = 200, description = "Agent's appointments", body = AppointmentListResponse),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn get_agent_appointments(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Query(query): Query<ListAppointmentsQuery>,
) -> AppResult<Json<AppointmentListResponse>> {
    let agent_id = claims.require_agent()?;
    let filter = query.into_filter()?;

    let appointments = state
        .services
        .appointments
        .list_for_agent(agent_id, filter)
        .await?;

    Ok(Json(AppointmentListResponse {
        subject_id: agent_id,
        appointments: appointments.into_iter().map(Into::into).collect(),
    }))
}

/// List appointments requested by the authenticated account
#[utoipa::path(
    get,
    path = "/accounts/me/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(ListAppointmentsQuery),
    responses(
        (status = 200, description = "Account's appointments", body = AppointmentListResponse),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn get_account_appointments(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Query(query): Query<ListAppointmentsQuery>,
) -> AppResult<Json<AppointmentListResponse>> {
    let account_id = claims.require_account()?;
    let filter = query.into_filter()?;

    let appointments = state
        .services
        .appointments
        .list_for_account(account_id, filter)
        .await?;

    Ok(Json(AppointmentListResponse {
        subject_id: account_id,
        appointments: appointments.into_iter().map(Into::into).collect(),
    }))
}

/// Agent confirms a requested appointment
#[utoipa::path(
    patch,
    path = "/appointments/{id}/confirm",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment confirmed", body = AppointmentResponse),
        (status = 400, description = "Not in requested status"),
        (status = 403, description = "Not an agent session"),
        (status = 404, description = "Appointment not found for this agent"),
        (status = 409, description = "Status changed concurrently")
    )
)]
pub async fn confirm_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Path(appointment_id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    let agent_id = claims.require_agent()?;
    require_positive_id(appointment_id, "appointment")?;

    let appointment = state
        .services
        .appointments
        .confirm(appointment_id, agent_id)
        .await?;

    Ok(Json(AppointmentResponse::new(
        "Appointment confirmed successfully",
        &appointment,
    )))
}

/// Agent rejects a requested appointment
#[utoipa::path(
    patch,
    path = "/appointments/{id}/reject",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment rejected", body = AppointmentResponse),
        (status = 400, description = "Not in requested status"),
        (status = 403, description = "Not an agent session"),
        (status = 404, description = "Appointment not found for this agent"),
        (status = 409, description = "Status changed concurrently")
    )
)]
pub async fn reject_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Path(appointment_id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    let agent_id = claims.require_agent()?;
    require_positive_id(appointment_id, "appointment")?;

    let appointment = state
        .services
        .appointments
        .reject(appointment_id, agent_id)
        .await?;

    Ok(Json(AppointmentResponse::new(
        "Appointment rejected successfully",
        &appointment,
    )))
}

/// Account cancels a requested or confirmed appointment
#[utoipa::path(
    patch,
    path = "/appointments/{id}/cancel",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 400, description = "Already cancelled or rejected"),
        (status = 403, description = "Not an account session"),
        (status = 404, description = "Appointment not found for this account"),
        (status = 409, description = "Status changed concurrently")
    )
)]
pub async fn cancel_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Path(appointment_id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    let account_id = claims.require_account()?;
    require_positive_id(appointment_id, "appointment")?;

    let appointment = state
        .services
        .appointments
        .cancel(appointment_id, account_id)
        .await?;

    Ok(Json(AppointmentResponse::new(
        "Appointment cancelled successfully",
        &appointment,
    )))
}
