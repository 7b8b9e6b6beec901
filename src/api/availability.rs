//! Availability endpoints for advertisement visit slots

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

use super::AuthenticatedSession;

/// Date range query for availability lookups
#[derive(Deserialize, IntoParams)]
pub struct AvailableDaysQuery {
    /// Range start (RFC 3339); defaults to now
    pub from: Option<DateTime<Utc>>,
    /// Range end (RFC 3339); defaults to the configured window after now
    pub to: Option<DateTime<Utc>>,
}

/// Single-day query for availability lookups
#[derive(Deserialize, IntoParams)]
pub struct SlotsByDayQuery {
    /// Calendar day (YYYY-MM-DD)
    pub day: NaiveDate,
}

/// Free hours for a single day
#[derive(Serialize, ToSchema)]
pub struct DayAvailability {
    /// Calendar day (YYYY-MM-DD)
    pub day: NaiveDate,
    /// Free hours of day, ascending
    pub hours: Vec<u32>,
}

/// Availability over a range, grouped by day
#[derive(Serialize, ToSchema)]
pub struct AvailableDaysResponse {
    pub advertisement_id: i32,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub days: Vec<DayAvailability>,
}

/// Flat slot list for one day
#[derive(Serialize, ToSchema)]
pub struct SlotsByDayResponse {
    pub advertisement_id: i32,
    /// Calendar day (YYYY-MM-DD)
    pub day: NaiveDate,
    /// Free slot instants (RFC 3339)
    pub slots: Vec<DateTime<Utc>>,
}

/// Get free visit days for an advertisement
#[utoipa::path(
    get,
    path = "/advertisements/{id}/availability/days",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Advertisement ID"),
        AvailableDaysQuery
    ),
    responses(
        (status = 200, description = "Free hours grouped by day", body = AvailableDaysResponse),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Advertisement not found")
    )
)]
pub async fn get_available_days(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Path(advertisement_id): Path<i32>,
    Query(query): Query<AvailableDaysQuery>,
) -> AppResult<Json<AvailableDaysResponse>> {
    claims.require_account()?;
    require_positive_id(advertisement_id, "advertisement")?;

    let availability = state
        .services
        .availability
        .available_days(advertisement_id, query.from, query.to)
        .await?;

    Ok(Json(AvailableDaysResponse {
        advertisement_id,
        from: availability.from,
        to: availability.to,
        days: availability
            .days
            .into_iter()
            .map(|(day, hours)| DayAvailability { day, hours })
            .collect(),
    }))
}

/// Get free visit slots for an advertisement on a single day
#[utoipa::path(
    get,
    path = "/advertisements/{id}/availability/slots",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Advertisement ID"),
        SlotsByDayQuery
    ),
    responses(
        (status = 200, description = "Free slots for the day", body = SlotsByDayResponse),
        (status = 400, description = "Invalid day"),
        (status = 404, description = "Advertisement not found")
    )
)]
pub async fn get_available_slots_by_day(
    State(state): State<crate::AppState>,
    AuthenticatedSession(claims): AuthenticatedSession,
    Path(advertisement_id): Path<i32>,
    Query(query): Query<SlotsByDayQuery>,
) -> AppResult<Json<SlotsByDayResponse>> {
    claims.require_account()?;
    require_positive_id(advertisement_id, "advertisement")?;

    let slots = state
        .services
        .availability
        .available_slots_by_day(advertisement_id, query.day)
        .await?;

    Ok(Json(SlotsByDayResponse {
        advertisement_id,
        day: query.day,
        slots,
    }))
}

/// Path ids are serial columns, so zero and below never match
pub(super) fn require_positive_id(id: i32, what: &str) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::Validation(format!("Invalid {} id", what)));
    }
    Ok(())
}
