//! Appointment booking and lifecycle service

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{
            Appointment, AppointmentAction, AppointmentFilter, CreateAppointment,
        },
        session::SessionRole,
    },
    repository::Repository,
    slots::WorkingHours,
};

#[derive(Clone)]
pub struct AppointmentsService {
    repository: Repository,
    hours: WorkingHours,
}

impl AppointmentsService {
    pub fn new(repository: Repository, hours: WorkingHours) -> Self {
        Self { repository, hours }
    }

    /// Book a visit slot for an advertisement
    ///
    /// Validates the slot against the same policy that generates the
    /// availability grid, then inserts optimistically. Availability is
    /// not re-checked first: the unique constraint arbitrates
    /// concurrent writers, and an application-level pre-check would
    /// only add a second race window.
    pub async fn create(
        &self,
        account_id: i32,
        advertisement_id: i32,
        appointment_at: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        if !self.hours.is_valid_slot(&appointment_at) {
            return Err(AppError::Validation(
                "appointment_at must be a whole working hour on a weekday".to_string(),
            ));
        }

        if appointment_at <= Utc::now() {
            return Err(AppError::Validation(
                "appointment_at must be in the future".to_string(),
            ));
        }

        let agent_id = self
            .repository
            .advertisements
            .owner_agent_id(advertisement_id)
            .await?;

        let appointment = self
            .repository
            .appointments
            .insert_requested(&CreateAppointment {
                appointment_at,
                agent_id,
                account_id,
                advertisement_id,
            })
            .await?;

        tracing::info!(
            appointment_id = appointment.id,
            agent_id,
            %appointment_at,
            "appointment requested"
        );

        Ok(appointment)
    }

    /// Agent confirms a requested appointment
    pub async fn confirm(&self, id: i32, agent_id: i32) -> AppResult<Appointment> {
        self.transition(id, agent_id, AppointmentAction::Confirm).await
    }

    /// Agent rejects a requested appointment
    pub async fn reject(&self, id: i32, agent_id: i32) -> AppResult<Appointment> {
        self.transition(id, agent_id, AppointmentAction::Reject).await
    }

    /// Account cancels a requested or confirmed appointment
    pub async fn cancel(&self, id: i32, account_id: i32) -> AppResult<Appointment> {
        self.transition(id, account_id, AppointmentAction::Cancel).await
    }

    /// Apply a lifecycle transition for the given actor
    ///
    /// Lookup is scoped by actor id, so an appointment belonging to
    /// someone else reads as not found. The status observed here is
    /// re-asserted by the conditional update; losing that
    /// compare-and-swap to a concurrent transition yields `Conflict`
    /// instead of silently overwriting the other writer.
    async fn transition(
        &self,
        id: i32,
        actor_id: i32,
        action: AppointmentAction,
    ) -> AppResult<Appointment> {
        let current = match action.actor() {
            SessionRole::Agent => {
                self.repository
                    .appointments
                    .get_by_id_for_agent(id, actor_id)
                    .await?
            }
            SessionRole::Account => {
                self.repository
                    .appointments
                    .get_by_id_for_account(id, actor_id)
                    .await?
            }
        };

        if !action.allowed_from().contains(&current.status) {
            let allowed = action
                .allowed_from()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(AppError::Validation(format!(
                "Only {} appointments can be {}, current status is {}",
                allowed,
                action.verb(),
                current.status
            )));
        }

        let updated = self
            .repository
            .appointments
            .update_status_cas(id, current.status, action.target())
            .await?;

        match updated {
            Some(appointment) => {
                tracing::info!(
                    appointment_id = id,
                    actor_id,
                    status = %appointment.status,
                    "appointment {}",
                    action.verb()
                );
                Ok(appointment)
            }
            None => Err(AppError::Conflict(
                "Appointment status changed concurrently".to_string(),
            )),
        }
    }

    /// Appointments handled by an agent
    pub async fn list_for_agent(
        &self,
        agent_id: i32,
        filter: AppointmentFilter,
    ) -> AppResult<Vec<Appointment>> {
        validate_filter_range(&filter)?;
        self.repository
            .appointments
            .list_for_agent(agent_id, &filter)
            .await
    }

    /// Appointments requested by an account
    pub async fn list_for_account(
        &self,
        account_id: i32,
        filter: AppointmentFilter,
    ) -> AppResult<Vec<Appointment>> {
        validate_filter_range(&filter)?;
        self.repository
            .appointments
            .list_for_account(account_id, &filter)
            .await
    }
}

/// A range filter needs both bounds, in order
fn validate_filter_range(filter: &AppointmentFilter) -> AppResult<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from >= to {
            return Err(AppError::Validation("Invalid date range".to_string()));
        }
    }
    Ok(())
}
