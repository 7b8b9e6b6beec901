//! Appointment model, status lifecycle and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::session::SessionRole;

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

/// Appointment lifecycle status
///
/// Stored as the Postgres enum `appointment_status`; decoding rejects
/// any value outside this closed set. `Requested` and `Confirmed` are
/// the active statuses: they occupy a slot and participate in the
/// no-double-booking constraint. `Cancelled` and `Rejected` are
/// terminal and free the slot permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Requested,
    Confirmed,
    Cancelled,
    Rejected,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Requested => "requested",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(AppointmentStatus::Requested),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "rejected" => Ok(AppointmentStatus::Rejected),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AppointmentAction
// ---------------------------------------------------------------------------

/// A status transition request on an existing appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Confirm,
    Reject,
    Cancel,
}

impl AppointmentAction {
    /// Statuses this action may be applied from
    pub fn allowed_from(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentAction::Confirm | AppointmentAction::Reject => {
                &[AppointmentStatus::Requested]
            }
            AppointmentAction::Cancel => {
                &[AppointmentStatus::Requested, AppointmentStatus::Confirmed]
            }
        }
    }

    /// Status the appointment ends up in
    pub fn target(&self) -> AppointmentStatus {
        match self {
            AppointmentAction::Confirm => AppointmentStatus::Confirmed,
            AppointmentAction::Reject => AppointmentStatus::Rejected,
            AppointmentAction::Cancel => AppointmentStatus::Cancelled,
        }
    }

    /// Session role authorized to invoke this action. Confirm and
    /// reject belong to the agent handling the listing; cancel belongs
    /// to the account that requested the visit.
    pub fn actor(&self) -> SessionRole {
        match self {
            AppointmentAction::Confirm | AppointmentAction::Reject => SessionRole::Agent,
            AppointmentAction::Cancel => SessionRole::Account,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            AppointmentAction::Confirm => "confirmed",
            AppointmentAction::Reject => "rejected",
            AppointmentAction::Cancel => "cancelled",
        }
    }
}

// ---------------------------------------------------------------------------
// Appointment
// ---------------------------------------------------------------------------

/// Appointment model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: i32,
    /// Reserved visit instant (always a whole working hour, UTC)
    pub appointment_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Agent handling the advertisement
    pub agent_id: i32,
    /// Account that requested the visit
    pub account_id: i32,
    pub advertisement_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new appointment insert
#[derive(Debug, Clone)]
pub struct CreateAppointment {
    pub appointment_at: DateTime<Utc>,
    pub agent_id: i32,
    pub account_id: i32,
    pub advertisement_id: i32,
}

/// Optional filters for appointment listings
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
