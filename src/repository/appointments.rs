//! Appointments repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::appointment::{
        Appointment, AppointmentFilter, AppointmentStatus, CreateAppointment,
    },
};

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
}

/// A date range filter needs both bounds; a lone bound is ignored
fn filter_range(filter: &AppointmentFilter) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match (filter.from, filter.to) {
        (Some(from), Some(to)) => (Some(from), Some(to)),
        _ => (None, None),
    }
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Instants already occupied for an agent within a range
    ///
    /// Only active statuses (`requested`, `confirmed`) hold a slot;
    /// cancelled and rejected appointments free it.
    pub async fn taken_slots(
        &self,
        agent_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        let slots = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT appointment_at FROM appointments
            WHERE agent_id = $1
              AND appointment_at BETWEEN $2 AND $3
              AND status IN ('requested', 'confirmed')
            "#,
        )
        .bind(agent_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    /// Insert a new appointment in `requested` status
    ///
    /// The partial unique index on `(agent_id, appointment_at)` over
    /// active statuses is the authoritative conflict detector: of N
    /// concurrent inserts for the same slot exactly one commits, the
    /// rest surface here as `Conflict`. The violation is recognized
    /// from the driver signal alone; no state is re-queried, which
    /// would just reopen the race window.
    pub async fn insert_requested(&self, new: &CreateAppointment) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (appointment_at, status, agent_id, account_id, advertisement_id)
            VALUES ($1, 'requested', $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(new.appointment_at)
        .bind(new.agent_id)
        .bind(new.account_id)
        .bind(new.advertisement_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false)
            {
                AppError::Conflict("Slot already taken".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    /// Get an appointment by id, scoped to the handling agent
    pub async fn get_by_id_for_agent(
        &self,
        id: i32,
        agent_id: i32,
    ) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 AND agent_id = $2",
        )
        .bind(id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment with id {} not found", id)))
    }

    /// Get an appointment by id, scoped to the requesting account
    pub async fn get_by_id_for_account(
        &self,
        id: i32,
        account_id: i32,
    ) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 AND account_id = $2",
        )
        .bind(id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment with id {} not found", id)))
    }

    /// Appointments handled by an agent, optionally filtered
    pub async fn list_for_agent(
        &self,
        agent_id: i32,
        filter: &AppointmentFilter,
    ) -> AppResult<Vec<Appointment>> {
        // The date filter only applies as a complete pair
        let (from, to) = filter_range(filter);

        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE agent_id = $1
              AND ($2::appointment_status IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR appointment_at BETWEEN $3 AND $4)
            ORDER BY appointment_at
            "#,
        )
        .bind(agent_id)
        .bind(filter.status)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Appointments requested by an account, optionally filtered
    pub async fn list_for_account(
        &self,
        account_id: i32,
        filter: &AppointmentFilter,
    ) -> AppResult<Vec<Appointment>> {
        let (from, to) = filter_range(filter);

        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE account_id = $1
              AND ($2::appointment_status IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR appointment_at BETWEEN $3 AND $4)
            ORDER BY appointment_at
            "#,
        )
        .bind(account_id)
        .bind(filter.status)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Compare-and-swap status update
    ///
    /// The `WHERE` clause re-asserts the status the caller observed,
    /// so two concurrent transitions on the same row cannot both win.
    /// Returns `None` when the row no longer holds `expected`.
    pub async fn update_status_cas(
        &self,
        id: i32,
        expected: AppointmentStatus,
        next: AppointmentStatus,
    ) -> AppResult<Option<Appointment>> {
        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
