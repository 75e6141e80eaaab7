//! Appointment-style booking wizard.
//!
//! Four steps fill in strictly in order: service, staff member, date and
//! time, customer details. Changing a step clears every step after it, so a
//! later step is never populated without the ones before it.
//!
//! [`AppointmentState`] carries the data operations; [`AppointmentReducer`]
//! wraps them as actions and adds the network effects (loading availability,
//! submitting the booking).

use crate::environment::BookingEnvironment;
use crate::error::WizardError;
use crate::types::{
    AppointmentConfirmation, AppointmentRequest, CustomerDetails, Service, Staff, StaffId,
};
use chrono::NaiveDate;
use salon_booking_client::ServiceResult;
use salon_booking_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A step of the appointment wizard, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    /// Step 1
    Service,
    /// Step 2
    Staff,
    /// Step 3
    DateTime,
    /// Step 4
    CustomerDetails,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Service => "service",
            Self::Staff => "staff member",
            Self::DateTime => "date and time",
            Self::CustomerDetails => "customer details",
        })
    }
}

/// Outcome of submitting the booking
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    /// Nothing submitted
    #[default]
    Idle,
    /// Request in flight
    Pending,
    /// Backend accepted the booking
    Confirmed(AppointmentConfirmation),
    /// Backend or transport rejected the booking; the draft is kept
    Failed {
        /// User-facing message
        message: String,
        /// Status code, when known
        status_code: Option<i64>,
    },
}

/// State of one appointment booking session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentState {
    /// Step 1
    pub service: Option<Service>,
    /// Step 2
    pub staff: Option<Staff>,
    /// Step 3, date part (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// Step 3, time part (`HH:MM`)
    pub time: Option<String>,
    /// Step 4
    pub customer_details: Option<CustomerDetails>,
    /// Slots loaded for [`Self::availability_for`]
    pub available_times: Vec<String>,
    /// Staff member and date the last availability request was made for
    pub availability_for: Option<(StaffId, String)>,
    /// Submission status
    pub submission: Submission,
    /// Submissions started in this session; tags the one in flight
    pub submissions: u64,
    /// Last rejected operation (if any)
    pub last_error: Option<String>,
}

impl AppointmentState {
    /// Creates an empty wizard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the service; clears every later step
    pub fn set_service(&mut self, service: Service) {
        self.service = Some(service);
        self.clear_after(WizardStep::Service);
    }

    /// Choose the staff member; clears date, time and customer details
    ///
    /// # Errors
    ///
    /// [`WizardError::MissingStep`] if no service is chosen.
    pub fn set_staff(&mut self, staff: Staff) -> Result<(), WizardError> {
        self.require(WizardStep::Service, WizardStep::Staff)?;
        self.staff = Some(staff);
        self.clear_after(WizardStep::Staff);
        self.clear_availability();
        Ok(())
    }

    /// Choose date and time; clears customer details
    ///
    /// # Errors
    ///
    /// [`WizardError::MissingStep`] if no staff member is chosen.
    pub fn set_date_time(
        &mut self,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.require(WizardStep::Staff, WizardStep::DateTime)?;
        self.date = Some(date.into());
        self.time = Some(time.into());
        self.clear_after(WizardStep::DateTime);
        Ok(())
    }

    /// Enter customer details (the last step)
    ///
    /// # Errors
    ///
    /// [`WizardError::MissingStep`] if date and time are not chosen.
    pub fn set_customer_details(&mut self, details: CustomerDetails) -> Result<(), WizardError> {
        self.require(WizardStep::DateTime, WizardStep::CustomerDetails)?;
        self.customer_details = Some(details);
        Ok(())
    }

    /// Clear everything
    ///
    /// The submission counter survives, so a request started before the
    /// reset can never be mistaken for a later one.
    pub fn reset(&mut self) {
        *self = Self {
            submissions: self.submissions,
            ..Self::default()
        };
    }

    /// Clear every step strictly after `step`, keeping `step` itself
    pub fn reset_from(&mut self, step: WizardStep) {
        self.clear_after(step);
    }

    /// The last completed step, or `None` for an empty wizard
    #[must_use]
    pub fn stage(&self) -> Option<WizardStep> {
        if self.customer_details.is_some() {
            Some(WizardStep::CustomerDetails)
        } else if self.date.is_some() && self.time.is_some() {
            Some(WizardStep::DateTime)
        } else if self.staff.is_some() {
            Some(WizardStep::Staff)
        } else if self.service.is_some() {
            Some(WizardStep::Service)
        } else {
            None
        }
    }

    /// First step that still needs input
    #[must_use]
    pub fn next_step(&self) -> Option<WizardStep> {
        match self.stage() {
            None => Some(WizardStep::Service),
            Some(WizardStep::Service) => Some(WizardStep::Staff),
            Some(WizardStep::Staff) => Some(WizardStep::DateTime),
            Some(WizardStep::DateTime) => Some(WizardStep::CustomerDetails),
            Some(WizardStep::CustomerDetails) => None,
        }
    }

    /// Whether every step is filled in
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stage() == Some(WizardStep::CustomerDetails)
    }

    /// Whether a submission is in flight
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.submission, Submission::Pending)
    }

    /// Build the booking request from a complete wizard
    ///
    /// # Errors
    ///
    /// [`WizardError::Incomplete`] naming the first empty step.
    pub fn appointment_request(&self) -> Result<AppointmentRequest, WizardError> {
        match (
            &self.service,
            &self.staff,
            &self.date,
            &self.time,
            &self.customer_details,
        ) {
            (Some(service), Some(staff), Some(date), Some(time), Some(customer)) => {
                Ok(AppointmentRequest {
                    service_id: service.id.clone(),
                    staff_id: staff.id.clone(),
                    date: date.clone(),
                    time: time.clone(),
                    customer: customer.clone(),
                })
            },
            _ => Err(WizardError::Incomplete {
                missing: self.next_step().unwrap_or(WizardStep::CustomerDetails),
            }),
        }
    }

    fn require(&self, required: WizardStep, attempted: WizardStep) -> Result<(), WizardError> {
        if self.stage() >= Some(required) {
            Ok(())
        } else {
            Err(WizardError::MissingStep {
                required,
                attempted,
            })
        }
    }

    fn clear_after(&mut self, step: WizardStep) {
        if step < WizardStep::Staff {
            self.staff = None;
            self.clear_availability();
        }
        if step < WizardStep::DateTime {
            self.date = None;
            self.time = None;
        }
        if step < WizardStep::CustomerDetails {
            self.customer_details = None;
        }
    }

    fn clear_availability(&mut self) {
        self.available_times.clear();
        self.availability_for = None;
    }
}

/// Actions for the appointment wizard
#[derive(Clone, Debug)]
pub enum AppointmentAction {
    // Commands
    /// Choose the service
    SetService {
        /// Chosen service
        service: Service,
    },
    /// Choose the staff member
    SetStaff {
        /// Chosen staff member
        staff: Staff,
    },
    /// Choose date and time
    SetDateTime {
        /// `YYYY-MM-DD`
        date: String,
        /// `HH:MM`
        time: String,
    },
    /// Enter customer details
    SetCustomerDetails {
        /// Contact details
        details: CustomerDetails,
    },
    /// Clear every step after `step`
    ResetFrom {
        /// Last step to keep
        step: WizardStep,
    },
    /// Clear everything
    Reset,
    /// Load free slots for the chosen staff member on `date`
    LoadAvailability {
        /// `YYYY-MM-DD`
        date: String,
    },
    /// Send the booking to the backend
    Submit,

    // Effect feedback
    /// Result of [`AppointmentAction::LoadAvailability`]
    AvailabilityLoaded {
        /// Staff member the slots were loaded for
        staff_id: StaffId,
        /// Date the slots were loaded for
        date: String,
        /// Slots or failure
        result: ServiceResult<Vec<String>>,
    },
    /// Result of [`AppointmentAction::Submit`]
    SubmissionCompleted {
        /// Which submission this answers
        submission_id: u64,
        /// Confirmation or failure
        result: ServiceResult<AppointmentConfirmation>,
    },
}

/// Reducer for the appointment wizard
#[derive(Clone, Debug, Default)]
pub struct AppointmentReducer;

impl AppointmentReducer {
    /// Creates a new `AppointmentReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn reject(state: &mut AppointmentState, error: &WizardError) {
        tracing::debug!(error = %error, "Appointment action rejected");
        state.last_error = Some(error.to_string());
    }

    /// Apply a wizard edit, refusing it while a submission is in flight
    fn edit<F>(state: &mut AppointmentState, edit: F)
    where
        F: FnOnce(&mut AppointmentState) -> Result<(), WizardError>,
    {
        if state.is_submitting() {
            Self::reject(state, &WizardError::SubmissionPending);
            return;
        }

        match edit(state) {
            Ok(()) => {
                state.last_error = None;
                state.submission = Submission::Idle;
            },
            Err(error) => Self::reject(state, &error),
        }
    }

    fn validate_date(date: &str, env: &BookingEnvironment) -> Result<(), WizardError> {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            WizardError::InvalidDate {
                date: date.to_string(),
            }
        })?;

        if day < env.clock.now().date_naive() {
            return Err(WizardError::PastDate {
                date: date.to_string(),
            });
        }

        Ok(())
    }
}

impl Reducer for AppointmentReducer {
    type State = AppointmentState;
    type Action = AppointmentAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Wizard steps ==========
            AppointmentAction::SetService { service } => {
                Self::edit(state, |s| {
                    s.set_service(service);
                    Ok(())
                });
                SmallVec::new()
            },

            AppointmentAction::SetStaff { staff } => {
                Self::edit(state, |s| s.set_staff(staff));
                SmallVec::new()
            },

            AppointmentAction::SetDateTime { date, time } => {
                Self::edit(state, |s| s.set_date_time(date, time));
                SmallVec::new()
            },

            AppointmentAction::SetCustomerDetails { details } => {
                Self::edit(state, |s| s.set_customer_details(details));
                SmallVec::new()
            },

            AppointmentAction::ResetFrom { step } => {
                Self::edit(state, |s| {
                    s.reset_from(step);
                    Ok(())
                });
                SmallVec::new()
            },

            AppointmentAction::Reset => {
                state.reset();
                SmallVec::new()
            },

            // ========== Availability ==========
            AppointmentAction::LoadAvailability { date } => {
                let Some(staff_id) = state.staff.as_ref().map(|staff| staff.id.clone()) else {
                    Self::reject(
                        state,
                        &WizardError::MissingStep {
                            required: WizardStep::Staff,
                            attempted: WizardStep::DateTime,
                        },
                    );
                    return SmallVec::new();
                };

                if let Err(error) = Self::validate_date(&date, env) {
                    Self::reject(state, &error);
                    return SmallVec::new();
                }

                state.available_times.clear();
                state.availability_for = Some((staff_id.clone(), date.clone()));
                state.last_error = None;

                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.available_times(&staff_id, &date).await;
                    Some(AppointmentAction::AvailabilityLoaded { staff_id, date, result })
                }]
            },

            AppointmentAction::AvailabilityLoaded {
                staff_id,
                date,
                result,
            } => {
                let current = state
                    .availability_for
                    .as_ref()
                    .is_some_and(|(s, d)| *s == staff_id && *d == date);
                if !current {
                    tracing::debug!(%staff_id, %date, "Dropping stale availability");
                    return SmallVec::new();
                }

                match result {
                    Ok(times) => state.available_times = times,
                    Err(error) => {
                        state.availability_for = None;
                        state.last_error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },

            // ========== Submission ==========
            AppointmentAction::Submit => {
                if state.is_submitting() {
                    Self::reject(state, &WizardError::SubmissionPending);
                    return SmallVec::new();
                }

                let request = match state.appointment_request() {
                    Ok(request) => request,
                    Err(error) => {
                        Self::reject(state, &error);
                        return SmallVec::new();
                    },
                };

                state.submissions += 1;
                state.submission = Submission::Pending;
                state.last_error = None;

                let submission_id = state.submissions;
                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.create_appointment(&request).await;
                    Some(AppointmentAction::SubmissionCompleted { submission_id, result })
                }]
            },

            AppointmentAction::SubmissionCompleted {
                submission_id,
                result,
            } => {
                if !state.is_submitting() || submission_id != state.submissions {
                    tracing::debug!(submission_id, "Dropping stale submission result");
                    return SmallVec::new();
                }

                match result {
                    Ok(confirmation) => {
                        tracing::info!(booking_id = %confirmation.booking_id, "Appointment booked");
                        state.reset();
                        state.submission = Submission::Confirmed(confirmation);
                    },
                    Err(error) => {
                        state.submission = Submission::Failed {
                            message: error.to_string(),
                            status_code: error.status_code(),
                        };
                        state.last_error = Some(error.to_string());
                    },
                }
                SmallVec::new()
            },
        }
    }
}
