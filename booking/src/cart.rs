//! Cart-style sales wizard.
//!
//! The merchant builds an ordered list of services (repeats allowed), adds
//! the buyer, and checks out.

use crate::environment::BookingEnvironment;
use crate::error::WizardError;
use crate::types::{CartItem, CustomerDetails, Money, SaleReceipt, SaleRequest, ServiceId};
use salon_booking_client::ServiceResult;
use salon_booking_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};

/// Checkout status of the cart
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStatus {
    /// Not checked out
    #[default]
    Idle,
    /// Sale request in flight
    Pending,
    /// Sale recorded
    Completed(SaleReceipt),
    /// Sale rejected; the cart is kept
    Failed {
        /// User-facing message
        message: String,
        /// Status code, when known
        status_code: Option<i64>,
    },
}

/// State of one sales session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Services in the order they were added
    pub services: Vec<CartItem>,
    /// Buyer
    pub customer: Option<CustomerDetails>,
    /// Checkout status
    pub checkout: CheckoutStatus,
    /// Checkouts started in this session; tags the one in flight
    pub checkouts: u64,
    /// Last rejected operation (if any)
    pub last_error: Option<String>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list
    pub fn set_services(&mut self, services: Vec<CartItem>) {
        self.services = services;
    }

    /// Append one service; repeats are kept
    pub fn add_service(&mut self, item: CartItem) {
        self.services.push(item);
    }

    /// Remove the first entry for `id`
    ///
    /// Returns whether an entry was removed.
    pub fn remove_service(&mut self, id: &ServiceId) -> bool {
        match self.services.iter().position(|item| item.id == *id) {
            Some(index) => {
                self.services.remove(index);
                true
            },
            None => false,
        }
    }

    /// Set the buyer
    pub fn set_customer(&mut self, customer: CustomerDetails) {
        self.customer = Some(customer);
    }

    /// Clear everything except the checkout counter
    pub fn reset(&mut self) {
        *self = Self {
            checkouts: self.checkouts,
            ..Self::default()
        };
    }

    /// Sum of all line prices
    #[must_use]
    pub fn total(&self) -> Money {
        self.services
            .iter()
            .fold(Money::ZERO, |total, item| total.saturating_add(item.price))
    }

    /// How many times `id` is in the cart
    #[must_use]
    pub fn count_of(&self, id: &ServiceId) -> usize {
        self.services.iter().filter(|item| item.id == *id).count()
    }

    /// Whether the cart has no services
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Whether a checkout is in flight
    #[must_use]
    pub const fn is_checking_out(&self) -> bool {
        matches!(self.checkout, CheckoutStatus::Pending)
    }

    /// Build the sale request
    ///
    /// # Errors
    ///
    /// [`WizardError::EmptyCart`] or [`WizardError::MissingCustomer`].
    pub fn sale_request(&self) -> Result<SaleRequest, WizardError> {
        if self.is_empty() {
            return Err(WizardError::EmptyCart);
        }
        let customer = self.customer.clone().ok_or(WizardError::MissingCustomer)?;

        Ok(SaleRequest {
            items: self.services.iter().map(|item| item.id.clone()).collect(),
            customer,
            total: self.total(),
        })
    }
}

/// Actions for the cart wizard
#[derive(Clone, Debug)]
pub enum CartAction {
    // Commands
    /// Replace the cart contents
    SetServices {
        /// New contents
        services: Vec<CartItem>,
    },
    /// Add one service
    AddService {
        /// Line to append
        item: CartItem,
    },
    /// Remove one unit of a service
    RemoveService {
        /// Service to remove
        id: ServiceId,
    },
    /// Set the buyer
    SetCustomer {
        /// Buyer details
        customer: CustomerDetails,
    },
    /// Clear the cart
    Reset,
    /// Record the sale with the backend
    Checkout,

    // Effect feedback
    /// Result of [`CartAction::Checkout`]
    CheckoutCompleted {
        /// Which checkout this answers
        checkout_id: u64,
        /// Receipt or failure
        result: ServiceResult<SaleReceipt>,
    },
}

/// Reducer for the cart wizard
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn reject(state: &mut CartState, error: &WizardError) {
        tracing::debug!(error = %error, "Cart action rejected");
        state.last_error = Some(error.to_string());
    }

    fn edit<F>(state: &mut CartState, edit: F)
    where
        F: FnOnce(&mut CartState) -> Result<(), WizardError>,
    {
        if state.is_checking_out() {
            Self::reject(state, &WizardError::SubmissionPending);
            return;
        }

        match edit(state) {
            Ok(()) => {
                state.last_error = None;
                state.checkout = CheckoutStatus::Idle;
            },
            Err(error) => Self::reject(state, &error),
        }
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::SetServices { services } => {
                Self::edit(state, |s| {
                    s.set_services(services);
                    Ok(())
                });
                SmallVec::new()
            },

            CartAction::AddService { item } => {
                Self::edit(state, |s| {
                    s.add_service(item);
                    Ok(())
                });
                SmallVec::new()
            },

            CartAction::RemoveService { id } => {
                Self::edit(state, |s| {
                    if s.remove_service(&id) {
                        Ok(())
                    } else {
                        Err(WizardError::NotInCart { id })
                    }
                });
                SmallVec::new()
            },

            CartAction::SetCustomer { customer } => {
                Self::edit(state, |s| {
                    s.set_customer(customer);
                    Ok(())
                });
                SmallVec::new()
            },

            CartAction::Reset => {
                state.reset();
                SmallVec::new()
            },

            CartAction::Checkout => {
                if state.is_checking_out() {
                    Self::reject(state, &WizardError::SubmissionPending);
                    return SmallVec::new();
                }

                let request = match state.sale_request() {
                    Ok(request) => request,
                    Err(error) => {
                        Self::reject(state, &error);
                        return SmallVec::new();
                    },
                };

                tracing::debug!(items = request.items.len(), total = %request.total, "Checking out");
                state.checkouts += 1;
                state.checkout = CheckoutStatus::Pending;
                state.last_error = None;

                let checkout_id = state.checkouts;
                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.create_sale(&request).await;
                    Some(CartAction::CheckoutCompleted { checkout_id, result })
                }]
            },

            CartAction::CheckoutCompleted {
                checkout_id,
                result,
            } => {
                if !state.is_checking_out() || checkout_id != state.checkouts {
                    tracing::debug!(checkout_id, "Dropping stale checkout result");
                    return SmallVec::new();
                }

                match result {
                    Ok(receipt) => {
                        tracing::info!(sale_id = %receipt.sale_id, "Sale recorded");
                        state.reset();
                        state.checkout = CheckoutStatus::Completed(receipt);
                    },
                    Err(error) => {
                        state.checkout = CheckoutStatus::Failed {
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
