//! Rejected wizard transitions.

use crate::appointment::WizardStep;
use crate::types::ServiceId;
use thiserror::Error;

/// Why a wizard operation was refused
///
/// A refused operation leaves the state untouched; reducers record the
/// message in `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// A later step was set before an earlier one
    #[error("Cannot set {attempted} before {required} is chosen")]
    MissingStep {
        /// Step that must be populated first
        required: WizardStep,
        /// Step the caller tried to set
        attempted: WizardStep,
    },

    /// The booking cannot be submitted yet
    #[error("Booking is incomplete: {missing} is missing")]
    Incomplete {
        /// First step that is still empty
        missing: WizardStep,
    },

    /// A request for this session is already in flight
    #[error("A submission is already in progress")]
    SubmissionPending,

    /// Availability was requested for a date that is not `YYYY-MM-DD`
    #[error("Invalid date '{date}', expected YYYY-MM-DD")]
    InvalidDate {
        /// Date as given
        date: String,
    },

    /// Availability was requested for a day that has already passed
    #[error("Cannot book on {date}: the date is in the past")]
    PastDate {
        /// Date as given
        date: String,
    },

    /// Checkout with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Removal of a service that is not in the cart
    #[error("Service {id} is not in the cart")]
    NotInCart {
        /// Service asked for
        id: ServiceId,
    },

    /// Checkout without customer details
    #[error("Customer details are required")]
    MissingCustomer,
}
