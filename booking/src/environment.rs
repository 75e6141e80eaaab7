//! Injected dependencies shared by the booking reducers.

use crate::api::SalonApi;
use salon_booking_core::environment::Clock;
use std::sync::Arc;

/// Environment for [`AppointmentReducer`](crate::AppointmentReducer) and
/// [`CartReducer`](crate::CartReducer)
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Backend API used by effects
    pub api: SalonApi,
    /// Clock used to reject bookings in the past
    pub clock: Arc<dyn Clock>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(api: SalonApi, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }
}
