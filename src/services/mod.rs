//! Business logic services

pub mod appointments;
pub mod availability;

use crate::{config::BookingConfig, repository::Repository, slots::WorkingHours};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub appointments: appointments::AppointmentsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, booking: BookingConfig) -> Self {
        let hours = WorkingHours::new(booking.open_hour, booking.close_hour);
        Self {
            availability: availability::AvailabilityService::new(
                repository.clone(),
                hours,
                booking.default_window_days,
            ),
            appointments: appointments::AppointmentsService::new(repository, hours),
        }
    }
}
